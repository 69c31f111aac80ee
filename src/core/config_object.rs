use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::core::js_literal::{JsLiteralFormat, render_js_literal};
use crate::core::merge::{CopyPolicy, copy_tree};
use crate::core::parser::parse_js_literal;
use crate::core::value::JsValue;
use crate::core::value_deserializer;
use crate::core::value_serializer::to_js_value;
use crate::error::{ChartError, ChartResult};

/// Shared behavior of every configuration object.
///
/// Implementors only describe their fields through serde and may override
/// [`ConfigObject::validate`]; conversion to JS literals, JSON and the deep
/// copy are provided here.
pub trait ConfigObject: Serialize + DeserializeOwned + Sized {
    fn validate(&self) -> ChartResult<()> {
        Ok(())
    }

    /// Lowers the object to a value tree with empty containers trimmed.
    fn to_js_value(&self) -> ChartResult<JsValue> {
        self.validate()?;
        Ok(to_js_value(self)?.trimmed())
    }

    /// Renders a JS object literal using the indentation from the environment.
    fn to_js_literal(&self) -> ChartResult<String> {
        self.to_js_literal_with(JsLiteralFormat::from_env())
    }

    fn to_js_literal_with(&self, format: JsLiteralFormat) -> ChartResult<String> {
        let value = self.to_js_value()?;
        let literal = render_js_literal(&value, format);
        trace!(bytes = literal.len(), "rendered js literal");
        Ok(literal)
    }

    fn write_js_literal(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let path = path.as_ref();
        let literal = self.to_js_literal()?;
        fs::write(path, literal)?;
        debug!(path = %path.display(), "wrote js literal");
        Ok(())
    }

    /// Compact JSON. Callbacks become their source text.
    fn to_json(&self) -> ChartResult<String> {
        let value = self.to_js_value()?.to_json_value();
        Ok(serde_json::to_string(&value)?)
    }

    fn to_json_pretty(&self) -> ChartResult<String> {
        let value = self.to_js_value()?.to_json_value();
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn from_js_value(value: JsValue) -> ChartResult<Self> {
        let parsed: Self = value_deserializer::from_js_value(value)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parses JSON. Strings holding a complete function or class come back as code.
    fn from_json(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        Self::from_js_value(JsValue::from_json_value(value))
    }

    /// Parses a JS object literal, optionally wrapped in a variable declaration.
    fn from_js_literal(input: &str) -> ChartResult<Self> {
        Self::from_js_value(parse_js_literal(input)?)
    }

    fn from_js_literal_file(path: impl AsRef<Path>) -> ChartResult<Self> {
        let input = fs::read_to_string(path)?;
        Self::from_js_literal(&input)
    }

    /// Returns `other` updated with this object's settings.
    fn copy_into(&self, other: &Self, policy: CopyPolicy) -> ChartResult<Self> {
        let merged = copy_tree(&self.to_js_value()?, &other.to_js_value()?, policy);
        Self::from_js_value(merged)
    }
}
