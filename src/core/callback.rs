use std::fmt;
use std::str::FromStr;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::parser;
use crate::core::validators::validate_variable_name;
use crate::error::{ChartError, ChartResult};

/// Newtype name that marks a serialized callback for the `JsValue` serializer.
///
/// Other serializers see a plain string holding the function source.
pub(crate) const CALLBACK_FUNCTION_TOKEN: &str = "$highcharts_rs::CallbackFunction";
pub(crate) const JAVASCRIPT_CLASS_TOKEN: &str = "$highcharts_rs::JavaScriptClass";

/// Source code of a JavaScript function embedded in a chart configuration.
///
/// Bodies are stored without surrounding braces and with their common
/// indentation removed, so rendering and re-parsing yields the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackFunction {
    function_name: Option<String>,
    arguments: Vec<String>,
    body: String,
}

impl CallbackFunction {
    /// Creates an anonymous function.
    pub fn new<I, S>(arguments: I, body: impl AsRef<str>) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(None, arguments, body)
    }

    /// Creates a named function.
    pub fn named<I, S>(
        function_name: impl Into<String>,
        arguments: I,
        body: impl AsRef<str>,
    ) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(Some(function_name.into()), arguments, body)
    }

    fn build<I, S>(
        function_name: Option<String>,
        arguments: I,
        body: impl AsRef<str>,
    ) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let function = Self {
            function_name,
            arguments: arguments.into_iter().map(Into::into).collect(),
            body: normalize_body(body.as_ref()),
        };
        function.validate()?;
        Ok(function)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(name) = &self.function_name {
            validate_variable_name("function_name", name)?;
        }
        for argument in &self.arguments {
            validate_variable_name("arguments", argument)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders `function name(a, b) {\n  body\n}`.
    #[must_use]
    pub fn to_js_source(&self) -> String {
        let mut source = String::from("function");
        if let Some(name) = &self.function_name {
            source.push(' ');
            source.push_str(name);
        }
        push_signature_and_body(&mut source, &self.arguments, &self.body);
        source
    }
}

impl fmt::Display for CallbackFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_source())
    }
}

impl FromStr for CallbackFunction {
    type Err = ChartError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let function = parser::parse_callback_source(source)?;
        function.validate()?;
        Ok(function)
    }
}

impl Serialize for CallbackFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(CALLBACK_FUNCTION_TOKEN, &self.to_js_source())
    }
}

#[derive(Deserialize)]
struct CallbackParts {
    #[serde(default, alias = "functionName")]
    function_name: Option<String>,
    #[serde(default)]
    arguments: Vec<String>,
    #[serde(default)]
    body: String,
}

/// Accepts the function source, a code value, or its parts as a map.
struct CallbackVisitor;

impl<'de> Visitor<'de> for CallbackVisitor {
    type Value = CallbackFunction;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JavaScript function source")
    }

    fn visit_str<E: de::Error>(self, source: &str) -> Result<CallbackFunction, E> {
        source.parse().map_err(E::custom)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<CallbackFunction, D::Error> {
        let source = String::deserialize(deserializer)?;
        source.parse().map_err(de::Error::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<CallbackFunction, A::Error> {
        let parts = CallbackParts::deserialize(MapAccessDeserializer::new(map))?;
        CallbackFunction::build(parts.function_name, parts.arguments, parts.body)
            .map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for CallbackFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CallbackVisitor)
    }
}

/// A JavaScript class definition, made of named methods.
///
/// Exactly one method must be the `constructor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaScriptClass {
    class_name: String,
    methods: Vec<CallbackFunction>,
}

impl JavaScriptClass {
    pub fn new(class_name: impl Into<String>, methods: Vec<CallbackFunction>) -> ChartResult<Self> {
        let class = Self {
            class_name: class_name.into(),
            methods,
        };
        class.validate()?;
        Ok(class)
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_variable_name("class_name", &self.class_name)?;

        let mut constructors = 0usize;
        for method in &self.methods {
            method.validate()?;
            match method.function_name() {
                None => {
                    return Err(ChartError::JavaScript(
                        "all JavaScriptClass methods require a function name".to_owned(),
                    ));
                }
                Some("constructor") => constructors += 1,
                Some(_) => {}
            }
        }

        match constructors {
            1 => Ok(()),
            0 => Err(ChartError::JavaScript(format!(
                "class `{}` requires a `constructor` method",
                self.class_name
            ))),
            _ => Err(ChartError::JavaScript(format!(
                "class `{}` defines more than one constructor",
                self.class_name
            ))),
        }
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn methods(&self) -> &[CallbackFunction] {
        &self.methods
    }

    #[must_use]
    pub fn constructor(&self) -> Option<&CallbackFunction> {
        self.methods
            .iter()
            .find(|method| method.function_name() == Some("constructor"))
    }

    #[must_use]
    pub fn to_js_source(&self) -> String {
        let mut source = format!("class {} {{", self.class_name);
        for method in &self.methods {
            let mut method_source = method.function_name().unwrap_or_default().to_owned();
            push_signature_and_body(&mut method_source, method.arguments(), method.body());
            source.push('\n');
            source.push_str(&indent_lines(&method_source, "  "));
        }
        if !self.methods.is_empty() {
            source.push('\n');
        }
        source.push('}');
        source
    }
}

impl fmt::Display for JavaScriptClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_source())
    }
}

impl FromStr for JavaScriptClass {
    type Err = ChartError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let class = parser::parse_class_source(source)?;
        class.validate()?;
        Ok(class)
    }
}

impl Serialize for JavaScriptClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(JAVASCRIPT_CLASS_TOKEN, &self.to_js_source())
    }
}

struct ClassVisitor;

impl<'de> Visitor<'de> for ClassVisitor {
    type Value = JavaScriptClass;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JavaScript class source")
    }

    fn visit_str<E: de::Error>(self, source: &str) -> Result<JavaScriptClass, E> {
        source.parse().map_err(E::custom)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<JavaScriptClass, D::Error> {
        let source = String::deserialize(deserializer)?;
        source.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for JavaScriptClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ClassVisitor)
    }
}

/// Builds a callback from already-parsed pieces without re-validating names.
pub(crate) fn callback_from_parts(
    function_name: Option<String>,
    arguments: Vec<String>,
    body: &str,
) -> CallbackFunction {
    CallbackFunction {
        function_name,
        arguments,
        body: normalize_body(body),
    }
}

pub(crate) fn class_from_parts(class_name: String, methods: Vec<CallbackFunction>) -> JavaScriptClass {
    JavaScriptClass {
        class_name,
        methods,
    }
}

fn push_signature_and_body(source: &mut String, arguments: &[String], body: &str) {
    source.push('(');
    source.push_str(&arguments.join(", "));
    source.push_str(") {");
    if body.is_empty() {
        source.push('}');
        return;
    }
    source.push('\n');
    source.push_str(&indent_lines(body, "  "));
    source.push_str("\n}");
}

/// Prefixes every non-empty line with `indent`.
pub(crate) fn indent_lines(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trims blank leading/trailing lines, trailing whitespace and common indentation.
fn normalize_body(body: &str) -> String {
    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .unwrap_or(start);
    let lines = &lines[start..=end];

    let common_indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(common_indent..).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{indent_lines, normalize_body};

    #[test]
    fn normalize_body_strips_common_indentation() {
        let body = "\n      var x = 1;\n        return x;\n\n";
        assert_eq!(normalize_body(body), "var x = 1;\n  return x;");
        assert_eq!(normalize_body("   \n  "), "");
    }

    #[test]
    fn indent_lines_skips_blank_lines() {
        assert_eq!(indent_lines("a\n\nb", "  "), "  a\n\n  b");
    }
}
