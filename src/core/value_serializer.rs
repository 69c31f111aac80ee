//! `serde::Serializer` that lowers any serializable value into a [`JsValue`].
//!
//! Callback functions and classes serialize as newtype structs carrying their
//! source text. This serializer recognizes their newtype names and produces
//! code values, while JSON serializers emit the plain source string.

use std::fmt;

use serde::ser::{self, Serialize};

use crate::core::callback::{
    CALLBACK_FUNCTION_TOKEN, CallbackFunction, JAVASCRIPT_CLASS_TOKEN, JavaScriptClass,
};
use crate::core::value::{JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

/// Serializes `value` into a [`JsValue`] tree.
pub fn to_js_value<T: Serialize + ?Sized>(value: &T) -> ChartResult<JsValue> {
    value
        .serialize(JsValueSerializer)
        .map_err(|err| ChartError::Serialization(err.0))
}

#[derive(Debug)]
pub struct SerializeError(String);

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SerializeError {}

impl ser::Error for SerializeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsValueSerializer;

impl ser::Serializer for JsValueSerializer {
    type Ok = JsValue;
    type Error = SerializeError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<JsValue, SerializeError> {
        Ok(JsValue::number(v))
    }

    fn serialize_char(self, v: char) -> Result<JsValue, SerializeError> {
        Ok(JsValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsValue, SerializeError> {
        Ok(JsValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Array(
            v.iter().map(|byte| JsValue::number(f64::from(*byte))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<JsValue, SerializeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsValue, SerializeError> {
        Ok(JsValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<JsValue, SerializeError> {
        match name {
            CALLBACK_FUNCTION_TOKEN => {
                let source = source_text(value.serialize(self)?, name)?;
                source
                    .parse::<CallbackFunction>()
                    .map(JsValue::Function)
                    .map_err(|err| SerializeError(err.to_string()))
            }
            JAVASCRIPT_CLASS_TOKEN => {
                let source = source_text(value.serialize(self)?, name)?;
                source
                    .parse::<JavaScriptClass>()
                    .map(JsValue::Class)
                    .map_err(|err| SerializeError(err.to_string()))
            }
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsValue, SerializeError> {
        let mut members = JsObject::with_capacity(1);
        members.insert(variant.to_owned(), value.serialize(self)?);
        Ok(JsValue::Object(members))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, SerializeError> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, SerializeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, SerializeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, SerializeError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeObject, SerializeError> {
        Ok(SerializeObject {
            members: JsObject::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeObject, SerializeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, SerializeError> {
        Ok(SerializeStructVariant {
            variant,
            members: JsObject::with_capacity(len),
        })
    }
}

fn source_text(value: JsValue, name: &str) -> Result<String, SerializeError> {
    match value {
        JsValue::String(source) => Ok(source),
        _ => Err(SerializeError(format!(
            "`{name}` must serialize its JavaScript source as a string"
        ))),
    }
}

fn object_key(key: JsValue) -> Result<String, SerializeError> {
    match key {
        JsValue::String(key) => Ok(key),
        JsValue::Number(number) if number.0.fract() == 0.0 && number.0.is_finite() => {
            Ok(format!("{}", number.0 as i64))
        }
        JsValue::Number(number) => Ok(number.0.to_string()),
        JsValue::Bool(value) => Ok(value.to_string()),
        _ => Err(SerializeError(
            "object keys must serialize as strings or numbers".to_owned(),
        )),
    }
}

pub struct SerializeVec {
    items: Vec<JsValue>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        self.items.push(value.serialize(JsValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<JsValue>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        self.items.push(value.serialize(JsValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        let mut members = JsObject::with_capacity(1);
        members.insert(self.variant.to_owned(), JsValue::Array(self.items));
        Ok(JsValue::Object(members))
    }
}

pub struct SerializeObject {
    members: JsObject,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), SerializeError> {
        self.next_key = Some(object_key(key.serialize(JsValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| SerializeError("serialize_value called before serialize_key".to_owned()))?;
        self.members.insert(key, value.serialize(JsValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Object(self.members))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerializeError> {
        self.members
            .insert(key.to_owned(), value.serialize(JsValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        Ok(JsValue::Object(self.members))
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    members: JsObject,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = JsValue;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerializeError> {
        self.members
            .insert(key.to_owned(), value.serialize(JsValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsValue, SerializeError> {
        let mut members = JsObject::with_capacity(1);
        members.insert(self.variant.to_owned(), JsValue::Object(self.members));
        Ok(JsValue::Object(members))
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde::Serialize;

    use super::to_js_value;
    use crate::core::{CallbackFunction, JsValue};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        point_start: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        skipped: Option<bool>,
        enforced: Option<bool>,
        formatter: CallbackFunction,
    }

    #[test]
    fn struct_fields_become_object_members_in_order() {
        let formatter = CallbackFunction::new(Vec::<String>::new(), "return this.y;")
            .expect("valid callback");
        let value = to_js_value(&Sample {
            point_start: 3,
            skipped: None,
            enforced: None,
            formatter: formatter.clone(),
        })
        .expect("serializable");

        let members = value.as_object().expect("object");
        let keys: Vec<&str> = members.keys().map(String::as_str).collect();
        assert_eq!(keys, ["pointStart", "enforced", "formatter"]);
        assert_eq!(members["pointStart"], JsValue::number(3.0));
        assert_eq!(members["enforced"], JsValue::Null);
        assert_eq!(members["formatter"], JsValue::Function(formatter));
    }

    #[test]
    fn callback_serializes_as_plain_string_in_json() {
        let formatter =
            CallbackFunction::new(["value"], "return value * 2;").expect("valid callback");
        let json = serde_json::to_value(&formatter).expect("json");
        assert_eq!(
            json,
            serde_json::Value::String("function(value) {\n  return value * 2;\n}".to_owned())
        );
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let mut map = IndexMap::new();
        map.insert(1_u32, "one");
        let value = to_js_value(&map).expect("serializable");
        assert_eq!(value.get_path("1"), Some(&JsValue::from("one")));
    }
}
