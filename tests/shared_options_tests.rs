use highcharts_rs::core::JsLiteralFormat;
use highcharts_rs::options::{Credits, Language, Options};
use highcharts_rs::{ChartError, SharedOptions};

#[test]
fn shared_options_render_as_set_options_call() {
    let shared = SharedOptions::new(Options::new().with_title("Default"))
        .with_lang(Language::default().with_separators(",", "."));

    let literal = shared
        .to_js_literal_with(JsLiteralFormat::default())
        .expect("render shared options");
    assert_eq!(
        literal,
        "Highcharts.setOptions({\n  lang: {\n    decimalPoint: ',',\n    thousandsSep: '.'\n  },\n  title: {\n    text: 'Default'\n  }\n});"
    );
}

#[test]
fn call_and_bare_object_forms_parse() {
    let from_call = SharedOptions::from_js_literal(
        "Highcharts.setOptions({ lang: { thousandsSep: ' ' }, credits: { enabled: false } });",
    )
    .expect("call form");
    let from_object =
        SharedOptions::from_js_literal("{ lang: { thousandsSep: ' ' }, credits: { enabled: false } }")
            .expect("object form");

    assert_eq!(from_call, from_object);
    assert_eq!(
        from_call.lang.and_then(|lang| lang.thousands_sep).as_deref(),
        Some(" ")
    );
    assert_eq!(from_object.defaults.credits, Some(Credits::disabled()));
}

#[test]
fn rendered_shared_options_parse_back() {
    let shared = SharedOptions::new(Options::new().with_credits(Credits::disabled()))
        .with_lang(Language::default().with_option("reset_zoom_title", "Reset"));
    let literal = shared
        .to_js_literal_with(JsLiteralFormat::default())
        .expect("render shared options");

    assert_eq!(
        SharedOptions::from_js_literal(&literal).expect("reparse"),
        shared
    );
}

#[test]
fn other_calls_are_rejected() {
    let error = SharedOptions::from_js_literal("Highcharts.chart('x', {});").expect_err("wrong call");
    assert!(matches!(error, ChartError::InvalidData(_)));
    assert!(SharedOptions::from_js_literal("Highcharts.setOptions({}, {});").is_err());
}

#[test]
fn series_cannot_be_shared() {
    let error = SharedOptions::from_js_literal("{ series: [{ type: 'line' }] }").expect_err("series");
    assert!(matches!(error, ChartError::InvalidValue { .. }));
}
