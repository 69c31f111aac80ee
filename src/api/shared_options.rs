use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::js_literal::{JsLiteralFormat, render_js_literal};
use crate::core::{ConfigObject, parse_js_call, parse_js_literal};
use crate::error::{ChartError, ChartResult};
use crate::options::{Language, Options};

const SET_OPTIONS_CALLEE: &str = "Highcharts.setOptions";

/// Global defaults applied to every chart through `Highcharts.setOptions`.
///
/// Takes every `Options` section except `series`, plus `lang`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<Language>,
    #[serde(flatten)]
    pub defaults: Options,
}

impl SharedOptions {
    #[must_use]
    pub fn new(defaults: Options) -> Self {
        Self {
            lang: None,
            defaults,
        }
    }

    #[must_use]
    pub fn with_lang(mut self, lang: Language) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.defaults.series.is_some() {
            return Err(ChartError::invalid_value(
                "series",
                "series cannot be set as a shared option",
            ));
        }
        if let Some(lang) = &self.lang {
            lang.validate()?;
        }
        self.defaults.validate()
    }

    /// Renders `Highcharts.setOptions({...});`.
    pub fn to_js_literal(&self) -> ChartResult<String> {
        self.to_js_literal_with(JsLiteralFormat::from_env())
    }

    pub fn to_js_literal_with(&self, format: JsLiteralFormat) -> ChartResult<String> {
        let value = ConfigObject::to_js_value(self)?;
        Ok(format!(
            "{SET_OPTIONS_CALLEE}({});",
            render_js_literal(&value, format)
        ))
    }

    /// Parses either a `Highcharts.setOptions({...})` call or a bare object literal.
    pub fn from_js_literal(input: &str) -> ChartResult<Self> {
        let value = match parse_js_call(input) {
            Ok(call) => {
                if call.callee != SET_OPTIONS_CALLEE {
                    return Err(ChartError::InvalidData(format!(
                        "expected a `{SET_OPTIONS_CALLEE}` call, found `{}`",
                        call.callee
                    )));
                }
                let mut arguments = call.arguments.into_iter();
                match (arguments.next(), arguments.next()) {
                    (Some(options), None) => options,
                    _ => {
                        return Err(ChartError::InvalidData(format!(
                            "`{SET_OPTIONS_CALLEE}` takes exactly one argument"
                        )));
                    }
                }
            }
            Err(call_error) => parse_js_literal(input).map_err(|literal_error| {
                if input.contains(SET_OPTIONS_CALLEE) {
                    call_error
                } else {
                    literal_error
                }
            })?,
        };
        debug!("parsed shared options");
        <Self as ConfigObject>::from_js_value(value)
    }
}

impl ConfigObject for SharedOptions {
    fn validate(&self) -> ChartResult<()> {
        SharedOptions::validate(self)
    }
}
