use highcharts_rs::core::{CallbackFunction, ConfigObject, JsLiteralFormat, JsValue, Nullable};
use highcharts_rs::options::{
    Axis, AxisType, ChartOptions, Color, DataPoint, ExportFormat, Exporting, Gradient, Language,
    Options, PlotOptions, Series, SeriesOptions, SeriesType, Size, Time, Title, Tooltip,
};
use highcharts_rs::ChartError;

const TEMPERATURE_LITERAL: &str = r"
var options = {
  chart: { type: 'line', height: null },
  title: { text: 'Temperature' },
  xAxis: { categories: ['Jan', 'Feb', 'Mar'] },
  tooltip: {
    formatter: function () {
      return this.y + ' C';
    }
  },
  series: [{ name: 'Tokyo', data: [7.0, 6.9, null] }],
  drilldown: { breadcrumbs: { floating: true } }
};
";

#[test]
fn typed_sections_are_read_from_a_literal() {
    let options = Options::from_js_literal(TEMPERATURE_LITERAL).expect("parse options");

    let chart = options.chart.as_ref().expect("chart section");
    assert_eq!(chart.series_type, Some(SeriesType::Line));
    assert_eq!(chart.height, Some(Nullable::Null));

    let x_axis = options.x_axis.as_ref().expect("x axis");
    assert_eq!(x_axis.len(), 1);
    assert_eq!(
        x_axis[0].categories.as_deref(),
        Some(&["Jan".to_owned(), "Feb".to_owned(), "Mar".to_owned()][..])
    );

    let formatter = options
        .tooltip
        .as_ref()
        .and_then(|tooltip| tooltip.formatter.as_ref())
        .expect("formatter");
    assert_eq!(formatter.body(), "return this.y + ' C';");

    let series = options.series.as_ref().expect("series");
    assert_eq!(series[0].name.as_deref(), Some("Tokyo"));
    assert_eq!(
        series[0].data.as_deref(),
        Some(&[DataPoint::Number(7.0), DataPoint::Number(6.9), DataPoint::Null][..])
    );

    assert_eq!(
        options
            .extra
            .get("drilldown")
            .and_then(|drilldown| drilldown.get_path("breadcrumbs.floating")),
        Some(&JsValue::Bool(true))
    );
}

#[test]
fn literal_round_trip_preserves_options() {
    let options = Options::from_js_literal(TEMPERATURE_LITERAL).expect("parse options");
    let literal = options
        .to_js_literal_with(JsLiteralFormat::default())
        .expect("render options");
    let reparsed = Options::from_js_literal(&literal).expect("reparse options");
    assert_eq!(reparsed, options);
}

#[test]
fn json_round_trip_keeps_callbacks_as_source_text() {
    let formatter = CallbackFunction::new(["value"], "return value * 2;").expect("callback");
    let options = Options::new()
        .with_title("Doubled")
        .with_tooltip(Tooltip::default().with_formatter(formatter.clone()));

    let json = options.to_json().expect("to json");
    let raw: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(
        raw["tooltip"]["formatter"],
        "function(value) {\n  return value * 2;\n}"
    );

    let restored = Options::from_json(&json).expect("from json");
    assert_eq!(
        restored.tooltip.and_then(|tooltip| tooltip.formatter),
        Some(formatter)
    );
}

#[test]
fn single_and_multiple_axes_are_accepted() {
    let single = Options::from_js_literal("{ yAxis: { title: { text: 'Rain' } } }").expect("single");
    assert_eq!(single.y_axis.map(|axes| axes.len()), Some(1));

    let many = Options::from_js_literal("{ yAxis: [{ id: 'a' }, { id: 'b', opposite: true }] }")
        .expect("many");
    let axes = many.y_axis.expect("y axes");
    assert_eq!(axes.len(), 2);
    assert_eq!(axes[1].opposite, Some(true));
}

#[test]
fn axis_range_and_categories_are_validated() {
    let inverted = Options::new().with_y_axis(Axis::new(AxisType::Linear).with_range(10.0, 1.0));
    assert!(matches!(
        inverted.validate(),
        Err(ChartError::InvalidValue { .. })
    ));

    let categories_on_datetime = Options::new()
        .with_x_axis(Axis::new(AxisType::Datetime).with_categories(["a", "b"]));
    assert!(categories_on_datetime.validate().is_err());

    let categories = Options::new()
        .with_x_axis(Axis::new(AxisType::Category).with_categories(["a", "b"]));
    assert!(categories.validate().is_ok());
}

#[test]
fn duplicate_series_ids_are_rejected() {
    let options = Options::new()
        .with_series(Series::new(SeriesType::Line).with_id("s"))
        .with_series(Series::new(SeriesType::Bar).with_id("s"));
    let error = options.validate().expect_err("duplicate ids");
    assert!(error.to_string().contains("duplicate series id"));
}

#[test]
fn invalid_values_are_rejected_on_parse() {
    let error = Options::from_js_literal("{ tooltip: { valueDecimals: 40 } }").expect_err("decimals");
    assert!(matches!(error, ChartError::InvalidValue { .. }));

    let error = Options::from_js_literal("{ chart: { type: 'pyramid3dx' } }").expect_err("type");
    assert!(matches!(error, ChartError::InvalidData(_)));
}

#[test]
fn non_finite_points_are_rejected() {
    let options = Options::new().with_series(
        Series::new(SeriesType::Line).with_data([1.0, f64::NAN]),
    );
    assert!(options.validate().is_err());
}

#[test]
fn series_lookup_by_id() {
    let mut options = Options::new();
    options.add_series(Series::new(SeriesType::Area).with_id("rain").with_data([1.0]));
    options.add_series(Series::new(SeriesType::Line).with_id("temp"));

    options
        .series_by_id_mut("rain")
        .expect("rain series")
        .push_point(2.0);

    assert_eq!(options.series_by_id("rain").map(Series::data_len), Some(2));
    assert!(options.series_by_id("snow").is_none());
}

#[test]
fn point_shapes_serialize_like_highcharts() {
    let series = Series::new(SeriesType::Scatter).with_data([
        DataPoint::xy(1.0, 2.0),
        DataPoint::named("Chrome", 61.0),
        DataPoint::from(None::<f64>),
    ]);
    let options = Options::new().with_series(series);
    let value = options.to_js_value().expect("lower options");
    let data = value
        .get_path("series")
        .and_then(JsValue::as_array)
        .and_then(|series| series[0].get_path("data"))
        .and_then(JsValue::as_array)
        .expect("data");

    assert_eq!(data[0], JsValue::from(vec![1.0, 2.0]));
    assert_eq!(data[1].get_path("name").and_then(JsValue::as_str), Some("Chrome"));
    assert_eq!(data[2], JsValue::Null);
}

#[test]
fn plot_options_keep_per_type_sections() {
    let plot_options = PlotOptions::default()
        .with_series(SeriesOptions::default().with_stacking("normal"))
        .with_type(
            SeriesType::Column,
            SeriesOptions::default().with_option("point_padding", 0.1),
        );
    let options = Options::new().with_plot_options(plot_options);

    let value = options.to_js_value().expect("lower options");
    assert_eq!(
        value.get_path("plotOptions.series.stacking").and_then(JsValue::as_str),
        Some("normal")
    );
    assert_eq!(
        value
            .get_path("plotOptions.column.pointPadding")
            .and_then(JsValue::as_f64),
        Some(0.1)
    );

    let restored = Options::from_js_value(value).expect("restore options");
    assert!(restored
        .plot_options
        .as_ref()
        .and_then(|plot_options| plot_options.for_type(SeriesType::Column))
        .is_some());
}

#[test]
fn unknown_stacking_mode_is_rejected() {
    let plot_options =
        PlotOptions::default().with_series(SeriesOptions::default().with_stacking("sideways"));
    assert!(Options::new().with_plot_options(plot_options).validate().is_err());
}

#[test]
fn colors_accept_gradients_and_plain_values() {
    let gradient = Gradient::linear(0.0, 0.0, 0.0, 1.0)
        .with_stop(0.0, "#ffffff")
        .with_stop(1.0, "#000000");
    let options = Options::new()
        .with_colors([Color::from("#7cb5ec"), Color::from(gradient), Color::rgba(0, 0, 0, 0.5)])
        .with_chart(ChartOptions::default().with_height(Size::from("60%")));

    let value = options.to_js_value().expect("lower options");
    let colors = value.get_path("colors").and_then(JsValue::as_array).expect("colors");
    assert_eq!(colors[0].as_str(), Some("#7cb5ec"));
    assert_eq!(
        colors[1].get_path("linearGradient.y2").and_then(JsValue::as_f64),
        Some(1.0)
    );
    assert_eq!(
        value.get_path("chart.height").and_then(JsValue::as_str),
        Some("60%")
    );

    let restored = Options::from_js_value(value).expect("restore options");
    assert_eq!(restored, options);
}

#[test]
fn gradient_stops_outside_unit_range_are_rejected() {
    let gradient = Gradient::radial(0.5, 0.5, 0.5).with_stop(1.5, "#fff");
    assert!(Options::new().with_colors([Color::from(gradient)]).validate().is_err());
}

#[test]
fn language_requires_full_calendars() {
    let lang = Language::default().with_months(["Jan", "Feb"]);
    assert!(lang.validate().is_err());
}

#[test]
fn time_offset_is_bounded() {
    let time = Time {
        timezone_offset: Some(900),
        ..Time::default()
    };
    assert!(Options::new().with_time(time).validate().is_err());
}

#[test]
fn exporting_type_uses_mime_names() {
    let options = Options::new().with_exporting(
        Exporting::default()
            .with_format(ExportFormat::Svg)
            .with_filename("report"),
    );
    let value = options.to_js_value().expect("lower options");
    assert_eq!(
        value.get_path("exporting.type").and_then(JsValue::as_str),
        Some("image/svg+xml")
    );

    let short = Options::from_js_literal("{ exporting: { type: 'pdf' } }").expect("alias");
    assert_eq!(
        short.exporting.and_then(|exporting| exporting.format),
        Some(ExportFormat::Pdf)
    );
}

#[test]
fn titles_copy_onto_existing_titles() {
    let source = Title::new("Source").with_offset(0.0, 20.0);
    let target = Title::new("Target").with_floating(true);

    let copied = source
        .copy_into(&target, highcharts_rs::CopyPolicy::default().with_overwrite(false))
        .expect("copy title");
    assert_eq!(copied.text.as_deref(), Some("Target"));
    assert_eq!(copied.y, Some(20.0));
    assert_eq!(copied.floating, Some(true));
}

#[test]
fn quoted_function_text_stays_a_string() {
    let options = Options::from_js_literal(
        "{title: {text: 'T'}, description: 'function() { return 1; }'}",
    )
    .expect("parse options");
    assert_eq!(
        options.extra.get("description"),
        Some(&JsValue::String("function() { return 1; }".to_owned()))
    );

    let literal = options
        .to_js_literal_with(JsLiteralFormat::default())
        .expect("render options");
    assert!(literal.contains("description: 'function() { return 1; }'"));
    assert_eq!(Options::from_js_literal(&literal).expect("reparse"), options);
}

#[test]
fn quoted_function_text_in_points_stays_a_string() {
    let options = Options::from_js_literal(
        "{series: [{type: 'line', data: [{y: 1, note: 'class A {}'}]}]}",
    )
    .expect("parse options");
    let series = options.series.as_ref().expect("series");
    let Some(DataPoint::Object(point)) = series[0].data.as_ref().and_then(|data| data.first())
    else {
        panic!("expected an object point");
    };
    assert_eq!(point.get("note"), Some(&JsValue::String("class A {}".to_owned())));
}

#[test]
fn untyped_functions_survive_a_literal_round_trip() {
    let options = Options::from_js_literal("{events: {load: function() { this.redraw(); }}}")
        .expect("parse options");
    assert!(matches!(
        options.extra.get("events").and_then(|events| events.get_path("load")),
        Some(JsValue::Function(_))
    ));
}
