use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::validators::is_identifier;
use crate::core::value::{JsValue, MAX_SAFE_INTEGER};

/// Environment variable overriding the indentation width of rendered literals.
pub const INDENT_ENV_VAR: &str = "JAVASCRIPT_INDENT_SPACES";

const DEFAULT_INDENT: usize = 2;
const MAX_INDENT: usize = 8;

/// Layout options for rendered JavaScript literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsLiteralFormat {
    pub indent: usize,
}

impl Default for JsLiteralFormat {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl JsLiteralFormat {
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.min(MAX_INDENT);
        self
    }

    /// Reads `JAVASCRIPT_INDENT_SPACES`, falling back to the default width.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(INDENT_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(indent) => Self::default().with_indent(indent),
                Err(_) => {
                    warn!(value = %raw, "ignoring invalid {INDENT_ENV_VAR}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn pad(self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }
}

/// Renders `value` as JavaScript source.
#[must_use]
pub fn render_js_literal(value: &JsValue, format: JsLiteralFormat) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, format);
    out
}

fn write_value(out: &mut String, value: &JsValue, depth: usize, format: JsLiteralFormat) {
    match value {
        JsValue::Null => out.push_str("null"),
        JsValue::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        JsValue::Number(number) => out.push_str(&format_number(number.0)),
        JsValue::String(text) => out.push_str(&quote_string(text)),
        JsValue::Array(items) => write_array(out, items, depth, format),
        JsValue::Object(members) => {
            if members.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            let last = members.len() - 1;
            for (index, (key, member)) in members.iter().enumerate() {
                out.push_str(&format.pad(depth + 1));
                out.push_str(&format_key(key));
                out.push_str(": ");
                write_value(out, member, depth + 1, format);
                if index != last {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&format.pad(depth));
            out.push('}');
        }
        JsValue::Function(function) => {
            out.push_str(&reindent_code(&function.to_js_source(), depth, format));
        }
        JsValue::Class(class) => {
            out.push_str(&reindent_code(&class.to_js_source(), depth, format));
        }
    }
}

fn write_array(out: &mut String, items: &[JsValue], depth: usize, format: JsLiteralFormat) {
    if items.iter().all(JsValue::is_scalar) {
        out.push('[');
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            write_value(out, item, depth, format);
        }
        out.push(']');
        return;
    }

    out.push_str("[\n");
    let last = items.len() - 1;
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format.pad(depth + 1));
        write_value(out, item, depth + 1, format);
        if index != last {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&format.pad(depth));
    out.push(']');
}

/// Integral values print without a fraction; non-finite values use JS globals.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
        return format!("{}", value as i64);
    }
    format!("{value}")
}

fn format_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_owned()
    } else {
        quote_string(key)
    }
}

/// Wraps `text` in single quotes, escaping characters JS forbids in literals.
#[must_use]
pub fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Code is rendered at two-space indentation; shift it to the current depth.
fn reindent_code(source: &str, depth: usize, format: JsLiteralFormat) -> String {
    let pad = format.pad(depth);
    source
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 || line.is_empty() {
                line.to_owned()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
