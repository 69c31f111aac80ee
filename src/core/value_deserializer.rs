//! `serde::Deserializer` that reads typed values straight out of a [`JsValue`].
//!
//! Strings always stay strings. Functions and classes reach visitors as a
//! newtype struct wrapping their source text; `JsValue` and the callback
//! types turn that back into code, other types see the source string.

use std::fmt;

use serde::de::value::{MapAccessDeserializer, MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, Deserialize, DeserializeOwned, Deserializer, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::core::callback::{CallbackFunction, JavaScriptClass};
use crate::core::value::{JsObject, JsValue, MAX_SAFE_INTEGER};
use crate::error::{ChartError, ChartResult};

/// Deserializes `T` from a value tree without a JSON detour.
pub fn from_js_value<T: DeserializeOwned>(value: JsValue) -> ChartResult<T> {
    T::deserialize(value)
        .map_err(|err| ChartError::InvalidData(format!("failed to parse config: {err}")))
}

#[derive(Debug)]
pub struct DeserializeError(String);

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DeserializeError {}

impl de::Error for DeserializeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

impl<'de> IntoDeserializer<'de, DeserializeError> for JsValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

fn source_deserializer(source: String) -> StringDeserializer<DeserializeError> {
    source.into_deserializer()
}

fn visit_number<'de, V: Visitor<'de>>(value: f64, visitor: V) -> Result<V::Value, DeserializeError> {
    if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        if value >= 0.0 {
            visitor.visit_u64(value as u64)
        } else {
            visitor.visit_i64(value as i64)
        }
    } else {
        visitor.visit_f64(value)
    }
}

fn visit_object<'de, V: Visitor<'de>>(
    members: JsObject,
    visitor: V,
) -> Result<V::Value, DeserializeError> {
    let mut map = MapDeserializer::<_, DeserializeError>::new(members.into_iter());
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

impl<'de> Deserializer<'de> for JsValue {
    type Error = DeserializeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeserializeError> {
        match self {
            Self::Null => visitor.visit_unit(),
            Self::Bool(value) => visitor.visit_bool(value),
            Self::Number(value) => visit_number(value.0, visitor),
            Self::String(value) => visitor.visit_string(value),
            Self::Array(items) => {
                let mut seq = SeqDeserializer::<_, DeserializeError>::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Self::Object(members) => visit_object(members, visitor),
            Self::Function(function) => {
                visitor.visit_newtype_struct(source_deserializer(function.to_js_source()))
            }
            Self::Class(class) => visitor.visit_newtype_struct(source_deserializer(class.to_js_source())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeserializeError> {
        match self {
            Self::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeserializeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeserializeError> {
        match self {
            Self::Function(function) => visitor.visit_string(function.to_js_source()),
            Self::Class(class) => visitor.visit_string(class.to_js_source()),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeserializeError> {
        match self {
            code @ (Self::Function(_) | Self::Class(_)) => code.deserialize_any(visitor),
            other => visitor.visit_newtype_struct(other),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeserializeError> {
        match self {
            Self::String(variant) => visitor.visit_enum(source_deserializer(variant)),
            Self::Object(members) if members.len() == 1 => visitor.visit_enum(
                MapAccessDeserializer::new(MapDeserializer::<_, DeserializeError>::new(
                    members.into_iter(),
                )),
            ),
            other => Err(de::Error::custom(format!(
                "expected a variant name or a single-key object, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char bytes byte_buf
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

impl JsValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Number(_) => "a number",
            Self::String(_) => "a string",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
            Self::Function(_) => "a function",
            Self::Class(_) => "a class",
        }
    }
}

struct JsValueVisitor;

impl<'de> Visitor<'de> for JsValueVisitor {
    type Value = JsValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JavaScript value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<JsValue, E> {
        Ok(JsValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<JsValue, E> {
        Ok(JsValue::number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<JsValue, E> {
        Ok(JsValue::number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<JsValue, E> {
        Ok(JsValue::number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<JsValue, E> {
        Ok(JsValue::String(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<JsValue, E> {
        Ok(JsValue::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsValue, E> {
        Ok(JsValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsValue, E> {
        Ok(JsValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsValue, D::Error> {
        JsValue::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<JsValue, D::Error> {
        let source = String::deserialize(deserializer)?;
        if source.trim_start().starts_with("class") {
            source
                .parse::<JavaScriptClass>()
                .map(JsValue::Class)
                .map_err(de::Error::custom)
        } else {
            source
                .parse::<CallbackFunction>()
                .map(JsValue::Function)
                .map_err(de::Error::custom)
        }
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<JsValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<JsValue>()? {
            items.push(item);
        }
        Ok(JsValue::Array(items))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<JsValue, A::Error> {
        let mut members = JsObject::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, JsValue>()? {
            members.insert(key, value);
        }
        Ok(JsValue::Object(members))
    }
}

/// Strings stay strings under every deserializer. Code values come back only
/// from a [`JsValue`] tree, or through [`JsValue::from_json_value`].
impl<'de> Deserialize<'de> for JsValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_js_literal;
    use indexmap::IndexMap;

    #[test]
    fn quoted_code_stays_a_string() {
        let value = parse_js_literal("{ note: 'function() { return 1; }' }").expect("literal");
        let members: IndexMap<String, JsValue> = from_js_value(value).expect("members");
        assert_eq!(
            members.get("note"),
            Some(&JsValue::String("function() { return 1; }".to_owned()))
        );
    }

    #[test]
    fn functions_survive_untyped_members() {
        let value = parse_js_literal("{ onLoad: function() { return 1; } }").expect("literal");
        let members: IndexMap<String, JsValue> = from_js_value(value).expect("members");
        assert!(matches!(members.get("onLoad"), Some(JsValue::Function(_))));
    }

    #[test]
    fn functions_fill_string_fields_with_their_source() {
        let function = CallbackFunction::new(["x"], "return x;").expect("callback");
        let text: String = from_js_value(JsValue::Function(function)).expect("source");
        assert_eq!(text, "function(x) {\n  return x;\n}");
    }

    #[test]
    fn integral_numbers_fill_integer_fields() {
        let width: u32 = from_js_value(JsValue::number(640.0)).expect("width");
        assert_eq!(width, 640);
        assert!(from_js_value::<u32>(JsValue::number(-1.0)).is_err());
        let ratio: f64 = from_js_value(JsValue::number(1.5)).expect("ratio");
        assert!((ratio - 1.5).abs() < f64::EPSILON);
    }
}
