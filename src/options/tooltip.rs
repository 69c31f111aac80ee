use serde::{Deserialize, Serialize};

use crate::core::validators::ensure_non_negative;
use crate::core::{CallbackFunction, JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

use super::style::{Color, validate_color};

/// Largest `valueDecimals` the number formatter accepts.
const MAX_VALUE_DECIMALS: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_formatter: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_pointer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outside: Option<bool>,
    #[serde(rename = "useHTML", skip_serializing_if = "Option::is_none")]
    pub use_html: Option<bool>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Tooltip {
    #[must_use]
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    #[must_use]
    pub fn with_value_decimals(mut self, decimals: u32) -> Self {
        self.value_decimals = Some(decimals);
        self
    }

    #[must_use]
    pub fn with_value_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.value_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: CallbackFunction) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_point_format(mut self, format: impl Into<String>) -> Self {
        self.point_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(decimals) = self.value_decimals {
            if decimals > MAX_VALUE_DECIMALS {
                return Err(ChartError::invalid_value(
                    "tooltip.valueDecimals",
                    format!("must be at most {MAX_VALUE_DECIMALS}"),
                ));
            }
        }
        if let Some(radius) = self.border_radius {
            ensure_non_negative("tooltip.borderRadius", radius)?;
        }
        validate_color(self.background_color.as_ref())
    }
}
