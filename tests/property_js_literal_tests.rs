use highcharts_rs::core::validators::is_valid_variable_name;
use highcharts_rs::core::{
    CallbackFunction, CopyPolicy, JsLiteralFormat, JsObject, JsValue, copy_tree, parse_js_literal,
    render_js_literal,
};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_$][a-zA-Z0-9_ -]{0,8}"
}

fn leaf_strategy() -> impl Strategy<Value = JsValue> {
    prop_oneof![
        Just(JsValue::Null),
        any::<bool>().prop_map(JsValue::Bool),
        (-1.0e9f64..1.0e9).prop_map(JsValue::number),
        (-1_000_000i64..1_000_000).prop_map(|value| JsValue::number(value as f64)),
        "[a-zA-Z0-9 '\"\\\\\n\t{}éß]{0,12}".prop_map(JsValue::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = JsValue> {
    leaf_strategy().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(JsValue::Array),
            prop::collection::vec((key_strategy(), inner), 0..5)
                .prop_map(|members| JsValue::Object(members.into_iter().collect::<JsObject>())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = JsValue> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..6)
        .prop_map(|members| JsValue::Object(members.into_iter().collect::<JsObject>()))
}

proptest! {
    #[test]
    fn rendered_literals_parse_back(value in object_strategy(), indent in 0usize..6) {
        let value = value.trimmed();
        let literal = render_js_literal(&value, JsLiteralFormat::default().with_indent(indent));
        let parsed = parse_js_literal(&literal).expect("rendered literal parses");
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn callbacks_survive_rendering_inside_objects(
        arguments in prop::collection::vec("[a-z][a-zA-Z0-9]{0,6}", 0..4),
        offset in -100i32..100,
        key in "[a-z][a-zA-Z]{0,8}"
    ) {
        let arguments: Vec<String> = arguments
            .into_iter()
            .filter(|name| is_valid_variable_name(name))
            .collect();
        let body = format!("var total = {offset};\nreturn total;");
        let function = CallbackFunction::new(arguments, &body).expect("callback");

        let mut members = JsObject::new();
        members.insert(key.clone(), JsValue::Function(function.clone()));
        let literal = render_js_literal(&JsValue::Object(members), JsLiteralFormat::default());
        let parsed = parse_js_literal(&literal).expect("rendered literal parses");

        prop_assert_eq!(parsed.get_path(&key), Some(&JsValue::Function(function)));
    }

    #[test]
    fn copying_into_an_empty_object_reproduces_the_source(value in object_strategy()) {
        let policy = CopyPolicy::default().with_preserve_data(false);
        prop_assert_eq!(copy_tree(&value, &JsValue::object(), policy), value);
    }

    #[test]
    fn copy_without_overwrite_keeps_target_scalars(
        source in object_strategy(),
        target_key in key_strategy(),
        target_value in leaf_strategy()
    ) {
        let mut target = JsValue::object();
        if let Some(members) = target.as_object_mut() {
            members.insert(target_key.clone(), target_value.clone());
        }
        let policy = CopyPolicy::default()
            .with_overwrite(false)
            .with_preserve_data(false);

        let merged = copy_tree(&source, &target, policy);
        prop_assert_eq!(merged.get_path(&target_key), Some(&target_value));
    }
}
