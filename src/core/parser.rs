//! Parser for the subset of JavaScript used by chart configuration literals.
//!
//! Supported: object and array literals, strings (including backtick strings
//! without `${}` interpolation), numbers, `true`/`false`/`null`/`undefined`,
//! `NaN`/`Infinity`, comments, trailing commas, `function` expressions, arrow
//! functions, method shorthand and `class` expressions. Function bodies are
//! captured as source text by brace matching. Regex literals inside bodies are
//! not recognised, so a body whose regex contains an unbalanced brace fails.

use tracing::trace;

use crate::core::callback::{
    CallbackFunction, JavaScriptClass, callback_from_parts, class_from_parts,
};
use crate::core::value::{JsObject, JsValue, MAX_SAFE_INTEGER};
use crate::error::{ChartError, ChartResult};

/// A parsed call expression such as `var c = Highcharts.chart('id', {...});`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsCall {
    pub variable_name: Option<String>,
    pub callee: String,
    pub arguments: Vec<JsValue>,
}

/// Parses a single object or array literal.
///
/// The literal may be wrapped in `var|let|const name = ...;`. Empty input
/// yields an empty object.
pub fn parse_js_literal(input: &str) -> ChartResult<JsValue> {
    let mut cursor = Cursor::new(input);
    cursor.skip_trivia()?;
    if cursor.eof() {
        return Ok(JsValue::object());
    }

    cursor.parse_declaration_prefix()?;
    let start = cursor.pos;
    let value = match cursor.parse_value()? {
        Some(value @ (JsValue::Object(_) | JsValue::Array(_))) => value,
        Some(_) | None => {
            return Err(ChartError::parse(
                start,
                "expected an object or array literal",
            ));
        }
    };
    cursor.finish_statement()?;
    trace!(bytes = input.len(), "parsed JavaScript literal");
    Ok(value)
}

/// Parses `[var name =] [new] callee.path(arg, ...);`.
pub fn parse_js_call(input: &str) -> ChartResult<JsCall> {
    let mut cursor = Cursor::new(input);
    cursor.skip_trivia()?;
    let variable_name = cursor.parse_declaration_prefix()?;

    if cursor.eat_keyword("new") {
        cursor.skip_trivia()?;
    }

    let mut callee = String::new();
    loop {
        let segment = cursor
            .parse_identifier()
            .ok_or_else(|| cursor.error("expected a callee identifier"))?;
        callee.push_str(segment);
        cursor.skip_trivia()?;
        if cursor.eat(b'.') {
            callee.push('.');
            cursor.skip_trivia()?;
            continue;
        }
        break;
    }

    cursor.expect(b'(')?;
    let mut arguments = Vec::new();
    loop {
        cursor.skip_trivia()?;
        if cursor.eat(b')') {
            break;
        }
        arguments.push(cursor.parse_value()?.unwrap_or(JsValue::Null));
        cursor.skip_trivia()?;
        if cursor.eat(b',') {
            continue;
        }
        cursor.expect(b')')?;
        break;
    }

    cursor.finish_statement()?;
    Ok(JsCall {
        variable_name,
        callee,
        arguments,
    })
}

pub(crate) fn parse_callback_source(source: &str) -> ChartResult<CallbackFunction> {
    let mut cursor = Cursor::new(source);
    cursor.skip_trivia()?;
    let start = cursor.pos;
    let function = match cursor.parse_value()? {
        Some(JsValue::Function(function)) => function,
        _ => {
            return Err(ChartError::parse(
                start,
                "expected a function expression",
            ));
        }
    };
    cursor.finish_statement()?;
    Ok(function)
}

pub(crate) fn parse_class_source(source: &str) -> ChartResult<JavaScriptClass> {
    let mut cursor = Cursor::new(source);
    cursor.skip_trivia()?;
    let start = cursor.pos;
    let class = match cursor.parse_value()? {
        Some(JsValue::Class(class)) => class,
        _ => return Err(ChartError::parse(start, "expected a class expression")),
    };
    cursor.finish_statement()?;
    Ok(class)
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Deepest object/array nesting accepted before parsing fails.
const MAX_NESTING_DEPTH: usize = 256;

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn error(&self, message: impl Into<String>) -> ChartError {
        ChartError::parse(self.pos, message)
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> ChartResult<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", byte as char)))
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        self.bytes[self.pos..].starts_with(text.as_bytes())
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.starts_with(keyword)
            && !self
                .bytes
                .get(self.pos + keyword.len())
                .copied()
                .is_some_and(is_ident_continue)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) -> ChartResult<()> {
        loop {
            match self.peek() {
                Some(byte) if byte.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(byte) = self.peek() {
                        if byte == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.eof() {
                            return Err(ChartError::parse(start, "unterminated block comment"));
                        }
                        if self.starts_with("*/") {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        self.pos += 1;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        Some(&self.src[start..self.pos])
    }

    /// Consumes `var|let|const name =` when present and returns the name.
    fn parse_declaration_prefix(&mut self) -> ChartResult<Option<String>> {
        if !(self.eat_keyword("var") || self.eat_keyword("let") || self.eat_keyword("const")) {
            return Ok(None);
        }
        self.skip_trivia()?;
        let name = self
            .parse_identifier()
            .ok_or_else(|| self.error("expected a variable name"))?
            .to_owned();
        self.skip_trivia()?;
        self.expect(b'=')?;
        self.skip_trivia()?;
        Ok(Some(name))
    }

    fn finish_statement(&mut self) -> ChartResult<()> {
        self.skip_trivia()?;
        if self.peek() == Some(b',') {
            return Err(self.error("expected exactly one declaration"));
        }
        self.eat(b';');
        self.skip_trivia()?;
        if !self.eof() {
            return Err(self.error("unexpected trailing content"));
        }
        Ok(())
    }

    /// Returns `None` for `undefined`.
    fn parse_value(&mut self) -> ChartResult<Option<JsValue>> {
        self.skip_trivia()?;
        let Some(byte) = self.peek() else {
            return Err(self.error("unexpected end of input"));
        };

        match byte {
            b'{' => self.nested(Self::parse_object).map(Some),
            b'[' => self.nested(Self::parse_array).map(Some),
            b'\'' | b'"' | b'`' => self.parse_string().map(|text| Some(JsValue::String(text))),
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.parse_number().map(|n| Some(JsValue::number(n))),
            b'(' => self
                .parse_arrow_function()
                .map(|function| Some(JsValue::Function(function))),
            byte if is_ident_start(byte) => self.parse_word_value(),
            other => Err(self.error(format!("unexpected character `{}`", other as char))),
        }
    }

    fn parse_word_value(&mut self) -> ChartResult<Option<JsValue>> {
        let start = self.pos;
        if self.eat_keyword("function") {
            return self
                .parse_function_after_keyword()
                .map(|function| Some(JsValue::Function(function)));
        }
        if self.eat_keyword("class") {
            return self
                .parse_class_after_keyword()
                .map(|class| Some(JsValue::Class(class)));
        }

        let word = self
            .parse_identifier()
            .ok_or_else(|| self.error("expected an identifier"))?;
        match word {
            "true" => return Ok(Some(JsValue::Bool(true))),
            "false" => return Ok(Some(JsValue::Bool(false))),
            "null" => return Ok(Some(JsValue::Null)),
            "undefined" => return Ok(None),
            "NaN" => return Ok(Some(JsValue::number(f64::NAN))),
            "Infinity" => return Ok(Some(JsValue::number(f64::INFINITY))),
            _ => {}
        }

        let parameter = word.to_owned();
        self.skip_trivia()?;
        if self.starts_with("=>") {
            self.pos += 2;
            let body = self.parse_arrow_body()?;
            return self
                .finish_function(None, vec![parameter], &body)
                .map(|function| Some(JsValue::Function(function)));
        }

        Err(ChartError::parse(
            start,
            format!("unsupported expression starting with `{word}`"),
        ))
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ChartResult<JsValue>,
    ) -> ChartResult<JsValue> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let parsed = parse(self);
        self.depth -= 1;
        parsed
    }

    fn parse_object(&mut self) -> ChartResult<JsValue> {
        self.expect(b'{')?;
        let mut members = JsObject::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b'}') {
                break;
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;

            if self.peek() == Some(b'(') {
                let arguments = self.parse_parameters()?;
                self.skip_trivia()?;
                let body = self.parse_block_body()?;
                let function = self.finish_function(None, arguments, body)?;
                members.insert(key, JsValue::Function(function));
            } else {
                self.expect(b':')?;
                if let Some(value) = self.parse_value()? {
                    members.insert(key, value);
                }
            }

            self.skip_trivia()?;
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                break;
            }
            return Err(self.error("expected `,` or `}` in object literal"));
        }
        Ok(JsValue::Object(members))
    }

    fn parse_key(&mut self) -> ChartResult<String> {
        match self.peek() {
            Some(b'\'' | b'"' | b'`') => self.parse_string(),
            Some(b'0'..=b'9' | b'.') => {
                let number = self.parse_number()?;
                Ok(format_numeric_key(number))
            }
            Some(byte) if is_ident_start(byte) => self
                .parse_identifier()
                .map(str::to_owned)
                .ok_or_else(|| self.error("expected a property key")),
            _ => Err(self.error("expected a property key")),
        }
    }

    fn parse_array(&mut self) -> ChartResult<JsValue> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b']') {
                break;
            }
            if self.peek() == Some(b',') {
                // Array hole.
                self.pos += 1;
                items.push(JsValue::Null);
                continue;
            }

            items.push(self.parse_value()?.unwrap_or(JsValue::Null));

            self.skip_trivia()?;
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                break;
            }
            return Err(self.error("expected `,` or `]` in array literal"));
        }
        Ok(JsValue::Array(items))
    }

    fn parse_string(&mut self) -> ChartResult<String> {
        let start = self.pos;
        let quote = self
            .peek()
            .ok_or_else(|| self.error("expected a string"))?;
        self.pos += 1;

        let mut text = String::new();
        loop {
            let Some(ch) = self.src[self.pos..].chars().next() else {
                return Err(ChartError::parse(start, "unterminated string literal"));
            };
            self.pos += ch.len_utf8();

            match ch {
                c if c == quote as char => return Ok(text),
                '\n' | '\r' if quote != b'`' => {
                    return Err(ChartError::parse(start, "unterminated string literal"));
                }
                '$' if quote == b'`' && self.peek() == Some(b'{') => {
                    return Err(self.error("template literal interpolation is not supported"));
                }
                '\\' => self.parse_escape(&mut text)?,
                c => text.push(c),
            }
        }
    }

    fn parse_escape(&mut self, text: &mut String) -> ChartResult<()> {
        let Some(ch) = self.src[self.pos..].chars().next() else {
            return Err(self.error("unterminated escape sequence"));
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            't' => text.push('\t'),
            'b' => text.push('\u{8}'),
            'f' => text.push('\u{c}'),
            'v' => text.push('\u{b}'),
            '0' => text.push('\0'),
            '\r' => {
                self.eat(b'\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let code = self.parse_hex_digits(2)?;
                text.push(self.char_from_code(code)?);
            }
            'u' => {
                let code = if self.eat(b'{') {
                    let start = self.pos;
                    while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let code = u32::from_str_radix(&self.src[start..self.pos], 16)
                        .map_err(|_| self.error("invalid unicode escape"))?;
                    self.expect(b'}')?;
                    code
                } else {
                    let high = self.parse_hex_digits(4)?;
                    if (0xD800..0xDC00).contains(&high) && self.starts_with("\\u") {
                        self.pos += 2;
                        let low = self.parse_hex_digits(4)?;
                        0x10000 + ((high - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF)
                    } else {
                        high
                    }
                };
                text.push(self.char_from_code(code)?);
            }
            other => text.push(other),
        }
        Ok(())
    }

    fn parse_hex_digits(&mut self, count: usize) -> ChartResult<u32> {
        let end = self.pos + count;
        let digits = self
            .src
            .get(self.pos..end)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hexadecimal escape"))?;
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hexadecimal escape"))?;
        self.pos = end;
        Ok(code)
    }

    fn char_from_code(&self, code: u32) -> ChartResult<char> {
        char::from_u32(code).ok_or_else(|| self.error("escape is not a valid unicode scalar"))
    }

    fn parse_number(&mut self) -> ChartResult<f64> {
        let start = self.pos;
        let negative = if self.eat(b'-') {
            true
        } else {
            self.eat(b'+');
            false
        };
        let sign = if negative { -1.0 } else { 1.0 };

        if self.eat_keyword("Infinity") {
            return Ok(sign * f64::INFINITY);
        }

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let value = u64::from_str_radix(&self.src[digits_start..self.pos], 16)
                .map_err(|_| ChartError::parse(start, "invalid hexadecimal number"))?;
            return Ok(sign * value as f64);
        }

        let digits_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let literal = &self.src[digits_start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| ChartError::parse(start, format!("invalid number `{literal}`")))?;
        Ok(sign * value)
    }

    fn parse_parameters(&mut self) -> ChartResult<Vec<String>> {
        self.expect(b'(')?;
        let mut parameters = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b')') {
                break;
            }
            let name = self
                .parse_identifier()
                .ok_or_else(|| self.error("only plain identifier parameters are supported"))?;
            parameters.push(name.to_owned());
            self.skip_trivia()?;
            if self.eat(b',') {
                continue;
            }
            self.expect(b')')?;
            break;
        }
        Ok(parameters)
    }

    fn parse_function_after_keyword(&mut self) -> ChartResult<CallbackFunction> {
        self.skip_trivia()?;
        if self.peek() == Some(b'*') {
            return Err(self.error("generator functions are not supported"));
        }
        let name = self.parse_identifier().map(str::to_owned);
        self.skip_trivia()?;
        let arguments = self.parse_parameters()?;
        self.skip_trivia()?;
        let body = self.parse_block_body()?;
        self.finish_function(name, arguments, body)
    }

    /// Tries `(a, b) => ...`; the cursor must sit on `(`.
    fn parse_arrow_function(&mut self) -> ChartResult<CallbackFunction> {
        let start = self.pos;
        let arguments = self
            .parse_parameters()
            .map_err(|_| ChartError::parse(start, "parenthesized expressions are not supported"))?;
        self.skip_trivia()?;
        if !self.starts_with("=>") {
            return Err(ChartError::parse(start, "expected an arrow function"));
        }
        self.pos += 2;
        let body = self.parse_arrow_body()?;
        self.finish_function(None, arguments, &body)
    }

    /// Block bodies are kept verbatim; expression bodies become `return <expr>;`.
    fn parse_arrow_body(&mut self) -> ChartResult<String> {
        self.skip_trivia()?;
        if self.peek() == Some(b'{') {
            return self.parse_block_body().map(str::to_owned);
        }

        let start = self.pos;
        let mut depth = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'\'' | b'"' | b'`' => {
                    self.skip_raw_string(byte)?;
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' if depth == 0 => break,
                b')' | b']' | b'}' => depth -= 1,
                b',' | b';' if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }

        let expression = self.src[start..self.pos].trim();
        if expression.is_empty() {
            return Err(ChartError::parse(start, "arrow function body is empty"));
        }
        Ok(format!("return {expression};"))
    }

    fn finish_function(
        &self,
        name: Option<String>,
        arguments: Vec<String>,
        body: &str,
    ) -> ChartResult<CallbackFunction> {
        let function = callback_from_parts(name, arguments, body);
        function.validate()?;
        Ok(function)
    }

    fn parse_class_after_keyword(&mut self) -> ChartResult<JavaScriptClass> {
        self.skip_trivia()?;
        let name = self
            .parse_identifier()
            .ok_or_else(|| self.error("classes must be named"))?
            .to_owned();
        self.skip_trivia()?;
        if self.at_keyword("extends") {
            return Err(self.error("class inheritance is not supported"));
        }
        self.expect(b'{')?;

        let mut methods = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(b'}') {
                break;
            }
            if self.eat(b';') {
                continue;
            }
            let method_name = self
                .parse_identifier()
                .ok_or_else(|| self.error("expected a method name"))?
                .to_owned();
            self.skip_trivia()?;
            let arguments = self.parse_parameters()?;
            self.skip_trivia()?;
            let body = self.parse_block_body()?;
            methods.push(callback_from_parts(Some(method_name), arguments, body));
        }

        let class = class_from_parts(name, methods);
        class.validate()?;
        Ok(class)
    }

    /// Consumes `{ ... }` and returns the text between the braces.
    fn parse_block_body(&mut self) -> ChartResult<&'a str> {
        let open = self.pos;
        self.expect(b'{')?;
        self.skip_balanced(open)?;
        Ok(&self.src[open + 1..self.pos - 1])
    }

    /// Advances past the `}` matching an already consumed `{` at `open`.
    fn skip_balanced(&mut self, open: usize) -> ChartResult<()> {
        let mut depth = 1usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'\'' | b'"' | b'`' => {
                    self.skip_raw_string(byte)?;
                    continue;
                }
                b'/' if matches!(self.peek_at(1), Some(b'/' | b'*')) => {
                    self.skip_trivia()?;
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(ChartError::parse(open, "unterminated block"))
    }

    /// Skips a string without decoding it, including `${...}` template parts.
    fn skip_raw_string(&mut self, quote: u8) -> ChartResult<()> {
        let start = self.pos;
        self.pos += 1;
        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => self.pos += 2,
                b'$' if quote == b'`' && self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    self.skip_balanced(self.pos - 1)?;
                }
                byte if byte == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ChartError::parse(start, "unterminated string literal"))
    }
}

fn format_numeric_key(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < MAX_SAFE_INTEGER {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cursor, format_numeric_key};

    #[test]
    fn skip_balanced_ignores_braces_in_strings_and_comments() {
        let source = "{ var s = '}'; /* } */ // }\n var t = `${ {a: 1}.a }`; }";
        let mut cursor = Cursor::new(source);
        let body = cursor.parse_block_body().expect("balanced body");
        assert!(body.contains("var t"));
        assert!(cursor.eof());
    }

    #[test]
    fn numeric_keys_render_without_fraction() {
        assert_eq!(format_numeric_key(3.0), "3");
        assert_eq!(format_numeric_key(1.5), "1.5");
    }
}
