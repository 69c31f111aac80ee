use highcharts_rs::core::{CallbackFunction, JavaScriptClass};
use highcharts_rs::ChartError;

#[test]
fn anonymous_function_source() {
    let function = CallbackFunction::new(["value"], "return value * 2;").expect("callback");
    assert_eq!(
        function.to_js_source(),
        "function(value) {\n  return value * 2;\n}"
    );
    assert_eq!(function.function_name(), None);
}

#[test]
fn named_function_source_keeps_argument_order() {
    let function =
        CallbackFunction::named("sum", ["a", "b"], "return a + b;").expect("named callback");
    assert_eq!(function.to_js_source(), "function sum(a, b) {\n  return a + b;\n}");
}

#[test]
fn empty_body_renders_compactly() {
    let function = CallbackFunction::new(Vec::<String>::new(), "   ").expect("callback");
    assert_eq!(function.to_js_source(), "function() {}");
}

#[test]
fn multi_line_bodies_are_dedented() {
    let function = CallbackFunction::new(
        ["x"],
        "\n        if (x) {\n          return 1;\n        }\n        return 0;\n    ",
    )
    .expect("callback");
    assert_eq!(function.body(), "if (x) {\n  return 1;\n}\nreturn 0;");
}

#[test]
fn invalid_names_are_rejected() {
    assert!(matches!(
        CallbackFunction::named("return", Vec::<String>::new(), ""),
        Err(ChartError::InvalidValue { .. })
    ));
    assert!(CallbackFunction::new(["1st"], "").is_err());
    assert!(CallbackFunction::new(["$value", "_index"], "").is_ok());
}

#[test]
fn source_text_parses_back() {
    let function: CallbackFunction = "function label(point) { return point.name; }"
        .parse()
        .expect("parse function");
    assert_eq!(function.function_name(), Some("label"));
    assert_eq!(function.arguments(), ["point".to_owned()]);
    assert_eq!(function.body(), "return point.name;");

    let reparsed: CallbackFunction = function.to_js_source().parse().expect("reparse");
    assert_eq!(reparsed, function);
}

#[test]
fn arrow_source_parses_to_a_function() {
    let function: CallbackFunction = "(a, b) => a - b".parse().expect("parse arrow");
    assert_eq!(function.to_js_source(), "function(a, b) {\n  return a - b;\n}");
}

#[test]
fn class_source_indents_methods() {
    let constructor =
        CallbackFunction::named("constructor", ["chart"], "this.chart = chart;").expect("method");
    let render = CallbackFunction::named("render", Vec::<String>::new(), "").expect("method");
    let class = JavaScriptClass::new("Annotation", vec![constructor, render]).expect("class");

    assert_eq!(
        class.to_js_source(),
        "class Annotation {\n  constructor(chart) {\n    this.chart = chart;\n  }\n  render() {}\n}"
    );

    let reparsed: JavaScriptClass = class.to_js_source().parse().expect("reparse class");
    assert_eq!(reparsed, class);
}

#[test]
fn classes_need_exactly_one_constructor() {
    let method = CallbackFunction::named("draw", Vec::<String>::new(), "").expect("method");
    assert!(matches!(
        JavaScriptClass::new("Widget", vec![method.clone()]),
        Err(ChartError::JavaScript(_))
    ));

    let constructor =
        CallbackFunction::named("constructor", Vec::<String>::new(), "").expect("constructor");
    assert!(JavaScriptClass::new("Widget", vec![constructor.clone(), constructor.clone()]).is_err());
    assert!(JavaScriptClass::new("Widget", vec![constructor, method]).is_ok());
}

#[test]
fn class_methods_need_names() {
    let constructor =
        CallbackFunction::named("constructor", Vec::<String>::new(), "").expect("constructor");
    let anonymous = CallbackFunction::new(Vec::<String>::new(), "").expect("anonymous");
    assert!(JavaScriptClass::new("Widget", vec![constructor, anonymous]).is_err());
}
