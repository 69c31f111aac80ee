use highcharts_rs::core::{JsValue, parse_js_call, parse_js_literal};
use highcharts_rs::ChartError;

#[test]
fn parses_relaxed_object_syntax() {
    let value = parse_js_literal(
        r#"
        // chart settings
        var options = {
            title: { text: "Tokyo", },   /* trailing comma */
            'stroke-width': 0x1F,
            scale: .5,
            flags: [true, false, null,],
            label: `plain`,
        };
        "#,
    )
    .expect("parse literal");

    assert_eq!(
        value.get_path("title.text").and_then(JsValue::as_str),
        Some("Tokyo")
    );
    assert_eq!(
        value.get_path("stroke-width").and_then(JsValue::as_f64),
        Some(31.0)
    );
    assert_eq!(value.get_path("scale").and_then(JsValue::as_f64), Some(0.5));
    assert_eq!(
        value.get_path("flags"),
        Some(&JsValue::from(vec![
            JsValue::Bool(true),
            JsValue::Bool(false),
            JsValue::Null,
        ]))
    );
    assert_eq!(value.get_path("label").and_then(JsValue::as_str), Some("plain"));
}

#[test]
fn undefined_members_are_dropped() {
    let value = parse_js_literal("{ a: undefined, b: 1 }").expect("parse literal");
    let members = value.as_object().expect("object");
    assert!(!members.contains_key("a"));
    assert_eq!(members.len(), 1);
}

#[test]
fn empty_input_is_an_empty_object() {
    assert_eq!(parse_js_literal("  // nothing\n").expect("parse"), JsValue::object());
}

#[test]
fn function_bodies_are_captured_as_source() {
    let value = parse_js_literal(
        "{ formatter: function (value) {\n      if (value > 0) { return '+' + value; }\n      return '' + value;\n    } }",
    )
    .expect("parse literal");

    let JsValue::Function(function) = value.get_path("formatter").expect("formatter") else {
        panic!("formatter should be a function");
    };
    assert_eq!(function.arguments(), ["value".to_owned()]);
    assert_eq!(
        function.body(),
        "if (value > 0) { return '+' + value; }\nreturn '' + value;"
    );
}

#[test]
fn arrow_expression_bodies_become_returns() {
    let value = parse_js_literal("{ a: x => x * 2, b: (x, y) => { return x + y; } }")
        .expect("parse literal");

    let JsValue::Function(single) = value.get_path("a").expect("a") else {
        panic!("a should be a function");
    };
    assert_eq!(single.arguments(), ["x".to_owned()]);
    assert_eq!(single.body(), "return x * 2;");

    let JsValue::Function(block) = value.get_path("b").expect("b") else {
        panic!("b should be a function");
    };
    assert_eq!(block.arguments().len(), 2);
    assert_eq!(block.body(), "return x + y;");
}

#[test]
fn method_shorthand_is_a_function() {
    let value = parse_js_literal("{ events: { load() { this.redraw(); } } }").expect("parse");
    assert!(matches!(
        value.get_path("events.load"),
        Some(JsValue::Function(_))
    ));
}

#[test]
fn braces_inside_strings_do_not_end_a_body() {
    let value = parse_js_literal("{ f: function () { return '}'; } }").expect("parse literal");
    let JsValue::Function(function) = value.get_path("f").expect("f") else {
        panic!("f should be a function");
    };
    assert_eq!(function.body(), "return '}';");
}

#[test]
fn classes_parse_with_their_methods() {
    let value = parse_js_literal(
        "{ plugin: class Marker { constructor(chart) { this.chart = chart; } draw() { return 1; } } }",
    )
    .expect("parse literal");

    let JsValue::Class(class) = value.get_path("plugin").expect("plugin") else {
        panic!("plugin should be a class");
    };
    assert_eq!(class.class_name(), "Marker");
    assert_eq!(class.methods().len(), 2);
    assert_eq!(
        class.constructor().map(|method| method.body()),
        Some("this.chart = chart;")
    );
}

#[test]
fn multiple_statements_are_rejected() {
    let error = parse_js_literal("var a = {}; var b = {};").expect_err("two statements");
    assert!(matches!(error, ChartError::Parse { .. }));
}

#[test]
fn scalar_top_level_values_are_rejected() {
    assert!(parse_js_literal("42").is_err());
    assert!(parse_js_literal("'text'").is_err());
}

#[test]
fn unterminated_object_reports_an_offset() {
    let error = parse_js_literal("{ a: 1, b: [1, 2 }").expect_err("broken literal");
    match error {
        ChartError::Parse { offset, .. } => assert!(offset > 0),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn template_interpolation_is_rejected() {
    assert!(parse_js_literal("{ a: `value ${x}` }").is_err());
}

#[test]
fn calls_capture_variable_callee_and_arguments() {
    let call = parse_js_call("const chart = Highcharts.stockChart('box', { title: { text: 'A' } });")
        .expect("parse call");

    assert_eq!(call.variable_name.as_deref(), Some("chart"));
    assert_eq!(call.callee, "Highcharts.stockChart");
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(call.arguments[0].as_str(), Some("box"));
    assert_eq!(
        call.arguments[1].get_path("title.text").and_then(JsValue::as_str),
        Some("A")
    );
}

#[test]
fn deeply_nested_input_is_a_parse_error() {
    let input = format!("{}{}", "[".repeat(50_000), "]".repeat(50_000));
    match parse_js_literal(&input).expect_err("too deep") {
        ChartError::Parse { message, .. } => assert_eq!(message, "nesting too deep"),
        other => panic!("unexpected error: {other:?}"),
    }

    let objects = format!("{}{}", "{a:".repeat(50_000), "}".repeat(50_000));
    assert!(matches!(
        parse_js_literal(&objects),
        Err(ChartError::Parse { .. })
    ));
}

#[test]
fn moderate_nesting_still_parses() {
    let input = format!("{}1{}", "[".repeat(100), "]".repeat(100));
    let mut value = parse_js_literal(&input).expect("nested arrays");
    for _ in 0..99 {
        let JsValue::Array(mut items) = value else {
            panic!("expected an array");
        };
        value = items.remove(0);
    }
    assert_eq!(value, JsValue::Array(vec![JsValue::number(1.0)]));
}
