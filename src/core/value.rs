use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::core::callback::{CallbackFunction, JavaScriptClass};
use crate::core::primitives::{datetime_to_epoch_millis, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

pub type JsObject = IndexMap<String, JsValue>;

/// Dynamic tree mirroring a JavaScript object-literal value.
///
/// Every typed configuration object lowers to this tree before it is rendered
/// as a JS literal or JSON, and the deep-copy routine operates on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsValue {
    /// An explicit `null` that must survive serialization.
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
    Array(Vec<JsValue>),
    Object(JsObject),
    Function(CallbackFunction),
    Class(JavaScriptClass),
}

impl JsValue {
    #[must_use]
    pub fn object() -> Self {
        Self::Object(JsObject::new())
    }

    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value.0),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<JsValue>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&JsObject> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsObject> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Returns `true` for empty objects and arrays, which trimming removes.
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::Array(items) => items.is_empty(),
            Self::Object(members) => members.is_empty(),
            _ => false,
        }
    }

    /// Scalars render inline inside arrays.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }

    /// Drops object members holding empty objects or arrays, recursively.
    ///
    /// Array elements are kept as-is (after trimming their own members), so
    /// positional data such as `[x, y]` tuples never shifts.
    #[must_use]
    pub fn trimmed(self) -> Self {
        match self {
            Self::Object(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key, value.trimmed()))
                    .filter(|(_, value)| !value.is_empty_container())
                    .collect(),
            ),
            Self::Array(items) => Self::Array(items.into_iter().map(Self::trimmed).collect()),
            other => other,
        }
    }

    /// Reads a nested member using a dotted path such as `chart.type`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&JsValue> {
        path.split('.').try_fold(self, |current, segment| {
            current.as_object().and_then(|members| members.get(segment))
        })
    }

    /// Writes a nested member, creating intermediate objects as needed.
    pub fn set_path(&mut self, path: &str, value: JsValue) -> ChartResult<()> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ChartError::InvalidData(format!(
                "invalid option path `{path}`"
            )));
        }

        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ChartError::InvalidData("empty option path".to_owned()))?;

        let mut current = self;
        for segment in parents {
            let members = current.as_object_mut().ok_or_else(|| {
                ChartError::InvalidData(format!(
                    "option path `{path}` crosses a non-object value at `{segment}`"
                ))
            })?;
            current = members
                .entry((*segment).to_owned())
                .or_insert_with(JsValue::object);
        }

        let members = current.as_object_mut().ok_or_else(|| {
            ChartError::InvalidData(format!(
                "option path `{path}` crosses a non-object value at `{last}`"
            ))
        })?;
        members.insert((*last).to_owned(), value);
        Ok(())
    }

    /// Maps to JSON. Code values become their source text and non-finite
    /// numbers become `null`, since JSON cannot carry either.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Number(value) => json_number(value.0),
            Self::String(value) => serde_json::Value::String(value.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json_value).collect())
            }
            Self::Object(members) => serde_json::Value::Object(
                members
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json_value()))
                    .collect(),
            ),
            Self::Function(function) => serde_json::Value::String(function.to_js_source()),
            Self::Class(class) => serde_json::Value::String(class.to_js_source()),
        }
    }

    #[must_use]
    pub fn from_json_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => {
                Self::number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(value) => Self::from_json_string(value),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json_value).collect())
            }
            serde_json::Value::Object(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_json_value(value)))
                    .collect(),
            ),
        }
    }
}

impl JsValue {
    /// JSON carries code as its source text; recover it when it parses.
    fn from_json_string(text: String) -> Self {
        let head = text.trim_start();
        if head.starts_with("function") {
            if let Ok(function) = text.parse::<CallbackFunction>() {
                return Self::Function(function);
            }
        } else if head.starts_with("class ") {
            if let Ok(class) = text.parse::<JavaScriptClass>() {
                return Self::Class(class);
            }
        }
        Self::String(text)
    }
}

fn json_number(value: f64) -> serde_json::Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        // Integral values stay integers so `1` does not become `1.0`.
        return serde_json::Value::from(value as i64);
    }
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// 2^53, the largest magnitude at which every integer is exactly representable.
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Default for JsValue {
    fn default() -> Self {
        Self::object()
    }
}

impl Serialize for JsValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => {
                let value = value.0;
                if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
                    serializer.serialize_i64(value as i64)
                } else {
                    serializer.serialize_f64(value)
                }
            }
            Self::String(value) => serializer.serialize_str(value),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Function(function) => function.serialize(serializer),
            Self::Class(class) => class.serialize(serializer),
        }
    }
}

impl From<bool> for JsValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for JsValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<f32> for JsValue {
    fn from(value: f32) -> Self {
        Self::number(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for JsValue {
                fn from(value: $ty) -> Self {
                    Self::number(value as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<&str> for JsValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for JsValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<CallbackFunction> for JsValue {
    fn from(value: CallbackFunction) -> Self {
        Self::Function(value)
    }
}

impl From<JavaScriptClass> for JsValue {
    fn from(value: JavaScriptClass) -> Self {
        Self::Class(value)
    }
}

impl From<JsObject> for JsValue {
    fn from(value: JsObject) -> Self {
        Self::Object(value)
    }
}

impl From<DateTime<Utc>> for JsValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::number(datetime_to_epoch_millis(value))
    }
}

impl TryFrom<Decimal> for JsValue {
    type Error = ChartError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        decimal_to_f64(value, "decimal value").map(Self::number)
    }
}

impl<T: Into<JsValue>> From<Vec<T>> for JsValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<JsValue>> From<Option<T>> for JsValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for JsValue {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json_value(value)
    }
}
