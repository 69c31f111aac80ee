use highcharts_rs::core::{CallbackFunction, JsLiteralFormat};
use highcharts_rs::options::{ChartOptions, Options, Series, SeriesType};
use highcharts_rs::{Chart, ChartConstructor, ChartError};

fn literal(chart: &Chart) -> String {
    chart
        .to_js_literal_with(JsLiteralFormat::default())
        .expect("render chart")
}

#[test]
fn chart_renders_as_constructor_call() {
    let chart = Chart::new()
        .with_container("container")
        .with_variable_name("myChart")
        .expect("variable name")
        .with_options(Options::new().with_title("Hi"));

    assert_eq!(
        literal(&chart),
        "var myChart = Highcharts.chart('container', {\n  title: {\n    text: 'Hi'\n  }\n});"
    );
}

#[test]
fn callback_is_the_last_argument() {
    let callback = CallbackFunction::new(["chart"], "chart.redraw();").expect("callback");
    let chart = Chart::new()
        .with_container("box")
        .with_constructor(ChartConstructor::StockChart)
        .with_callback(callback);

    assert_eq!(
        literal(&chart),
        "Highcharts.stockChart('box', {}, function(chart) {\n  chart.redraw();\n});"
    );
}

#[test]
fn render_to_stands_in_for_a_container() {
    let chart = Chart::from_options(
        Options::new().with_chart(ChartOptions::default().with_render_to("target")),
    );
    assert_eq!(
        literal(&chart),
        "Highcharts.chart({\n  chart: {\n    renderTo: 'target'\n  }\n});"
    );
}

#[test]
fn chart_without_container_cannot_render() {
    let error = Chart::from_options(Options::new().with_title("Lost"))
        .to_js_literal_with(JsLiteralFormat::default())
        .expect_err("no container");
    assert!(matches!(error, ChartError::InvalidValue { .. }));
}

#[test]
fn constructor_call_parses_back() {
    let source = r"
        var salesChart = Highcharts.ganttChart('gantt', {
          title: { text: 'Plan' },
          series: [{ type: 'gantt', name: 'Project', data: [] }]
        }, function (chart) {
          console.log(chart);
        });
    ";
    let chart = Chart::from_js_literal(source).expect("parse chart");

    assert_eq!(chart.container(), Some("gantt"));
    assert_eq!(chart.variable_name(), Some("salesChart"));
    assert_eq!(chart.constructor(), ChartConstructor::GanttChart);
    assert_eq!(
        chart.callback().map(CallbackFunction::body),
        Some("console.log(chart);")
    );
    let options = chart.options().expect("options");
    assert_eq!(
        options.title.as_ref().and_then(|title| title.text.as_deref()),
        Some("Plan")
    );
    assert_eq!(
        options.series.as_ref().and_then(|series| series[0].series_type),
        Some(SeriesType::Gantt)
    );
}

#[test]
fn rendered_chart_parses_back_unchanged() {
    let chart = Chart::new()
        .with_container("container")
        .with_variable_name("chart1")
        .expect("variable name")
        .with_constructor(ChartConstructor::MapChart)
        .with_options(
            Options::new()
                .with_title("Population")
                .with_series(Series::new(SeriesType::Map).with_name("Countries")),
        )
        .with_callback(CallbackFunction::new(Vec::<String>::new(), "return 1;").expect("callback"));

    let reparsed = Chart::from_js_literal(&literal(&chart)).expect("reparse chart");
    assert_eq!(reparsed, chart);
}

#[test]
fn object_form_is_accepted() {
    let chart = Chart::from_js_literal(
        "{ container: 'root', variableName: 'c', constructor: 'stockChart', options: { title: { text: 'T' } } }",
    )
    .expect("parse object form");

    assert_eq!(chart.container(), Some("root"));
    assert_eq!(chart.variable_name(), Some("c"));
    assert_eq!(chart.constructor(), ChartConstructor::StockChart);
}

#[test]
fn object_form_rejects_unknown_keys() {
    let error = Chart::from_js_literal("{ container: 'root', colour: 'red' }").expect_err("unknown key");
    assert!(error.to_string().contains("colour"));
}

#[test]
fn non_highcharts_calls_are_rejected() {
    assert!(Chart::from_js_literal("var c = Chart.create('x', {});").is_err());
    assert!(Chart::from_js_literal("Highcharts.pieChart('x', {});").is_err());
    assert!(Chart::from_js_literal("Highcharts.chart('x', {}, null, 4);").is_err());
}

#[test]
fn reserved_variable_name_is_rejected_on_parse() {
    assert!(Chart::from_js_literal("var new = Highcharts.chart('x', {});").is_err());
}

#[test]
fn json_carries_only_the_options() {
    let chart = Chart::new()
        .with_container("x")
        .with_options(Options::new().with_title("Json"));
    let json = chart.to_json().expect("to json");
    assert_eq!(json, r#"{"title":{"text":"Json"}}"#);

    let restored = Chart::from_json(&json).expect("from json");
    assert_eq!(restored.options(), chart.options());
    assert_eq!(restored.container(), None);
}

#[test]
fn series_are_added_to_the_options() {
    let mut chart = Chart::new().with_container("x");
    chart.add_series(Series::new(SeriesType::Line).with_id("a"));
    chart.add_series(Series::new(SeriesType::Line).with_id("b"));

    let series = chart
        .options()
        .and_then(|options| options.series.as_ref())
        .expect("series");
    assert_eq!(series.len(), 2);
    assert!(chart.validate().is_ok());
}
