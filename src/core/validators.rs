use crate::error::{ChartError, ChartResult};

const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "arguments",
    "await",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "double",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "function",
    "goto",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "int",
    "interface",
    "let",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "volatile",
    "while",
    "with",
    "yield",
];

/// Returns `true` when `name` matches the ASCII JS identifier grammar.
///
/// Reserved words are accepted here because object keys may use them.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[must_use]
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.binary_search(&name).is_ok()
}

/// Returns `true` when `name` can be used as a variable, function or argument name.
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    is_identifier(name) && !is_reserved_word(name)
}

pub fn validate_variable_name(field: &str, name: &str) -> ChartResult<()> {
    if name.is_empty() {
        return Err(ChartError::invalid_value(field, "must not be empty"));
    }
    if !is_identifier(name) {
        return Err(ChartError::invalid_value(
            field,
            format!("`{name}` is not a valid JavaScript identifier"),
        ));
    }
    if is_reserved_word(name) {
        return Err(ChartError::invalid_value(
            field,
            format!("`{name}` is a reserved JavaScript word"),
        ));
    }
    Ok(())
}

pub fn ensure_finite(field: &str, value: f64) -> ChartResult<f64> {
    if !value.is_finite() {
        return Err(ChartError::invalid_value(field, "must be finite"));
    }
    Ok(value)
}

pub fn ensure_non_negative(field: &str, value: f64) -> ChartResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ChartError::invalid_value(field, "must be finite and >= 0"));
    }
    Ok(value)
}

pub fn ensure_positive(field: &str, value: f64) -> ChartResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ChartError::invalid_value(field, "must be finite and > 0"));
    }
    Ok(value)
}

pub fn ensure_in_range(field: &str, value: f64, min: f64, max: f64) -> ChartResult<f64> {
    if !value.is_finite() || value < min || value > max {
        return Err(ChartError::invalid_value(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(value)
}

/// Converts a snake_case option name into the camelCase key Highcharts expects.
///
/// Keys without an underscore are returned unchanged. A handful of keys carry
/// upper-cased acronyms or irregular spellings in the JS API.
#[must_use]
pub fn to_camel_case(snake_case: &str) -> String {
    if !snake_case.contains('_') {
        return snake_case.to_owned();
    }

    match snake_case {
        "drillup_text" => return "drillUpText".to_owned(),
        "drillup_button" => return "drillUpButton".to_owned(),
        "thousands_separator" => return "thousandsSep".to_owned(),
        "measure_xy" => return "measureXY".to_owned(),
        "use_gpu_translations" => return "useGPUTranslations".to_owned(),
        "label_rank" => return "labelrank".to_owned(),
        "use_html" => return "useHTML".to_owned(),
        _ => {}
    }

    let adjusted = if snake_case.contains("url") {
        snake_case.replace("url", "URL")
    } else if snake_case.contains("utc") {
        snake_case.replace("utc", "UTC")
    } else if let Some(acronym) = ["csv", "jpeg", "pdf", "png", "svg", "xls", "atr", "hlc", "ohlc"]
        .into_iter()
        .find(|acronym| snake_case.contains(&format!("_{acronym}")))
    {
        snake_case.replace(acronym, &acronym.to_ascii_uppercase())
    } else if snake_case.contains("_xy") {
        snake_case.replace("xy", "XY")
    } else if snake_case.contains("_di_line") {
        snake_case.replace("_di_line", "_DILine")
    } else if let Some(stem) = snake_case.strip_suffix("_x") {
        format!("{stem}_X")
    } else if let Some(stem) = snake_case.strip_suffix("_y") {
        format!("{stem}_Y")
    } else if let Some(stem) = snake_case.strip_suffix("_id") {
        format!("{stem}_ID")
    } else {
        snake_case.to_owned()
    };

    let mut camel_case = String::with_capacity(adjusted.len());
    let mut upper_next = false;
    for character in adjusted.chars() {
        if character == '_' {
            upper_next = !camel_case.is_empty();
            continue;
        }
        if upper_next {
            camel_case.extend(character.to_uppercase());
            upper_next = false;
        } else {
            camel_case.push(character);
        }
    }
    camel_case
}
