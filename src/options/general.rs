//! Smaller top-level sections: loading, time, accessibility and language.

use serde::{Deserialize, Serialize};

use crate::core::validators::ensure_non_negative;
use crate::core::{JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

use super::style::CssObject;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Loading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_style: Option<CssObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Loading {
    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("loading.hideDuration", self.hide_duration),
            ("loading.showDuration", self.show_duration),
        ] {
            if let Some(value) = value {
                ensure_non_negative(name, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Time {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Minutes west of UTC, like `Date.getTimezoneOffset()`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
    #[serde(rename = "useUTC", skip_serializing_if = "Option::is_none")]
    pub use_utc: Option<bool>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Time {
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn with_use_utc(mut self, use_utc: bool) -> Self {
        self.use_utc = Some(use_utc);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(offset) = self.timezone_offset {
            if offset.abs() > 14 * 60 {
                return Err(ChartError::invalid_value(
                    "time.timezoneOffset",
                    "offset must be within 14 hours of UTC",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardNavigation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: JsObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Accessibility {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_navigation: Option<KeyboardNavigation>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Accessibility {
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `lang`: localized strings, only honored through `Highcharts.setOptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thousands_sep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_months: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_zoom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_data: Option<String>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Language {
    #[must_use]
    pub fn with_separators(
        mut self,
        decimal_point: impl Into<String>,
        thousands_sep: impl Into<String>,
    ) -> Self {
        self.decimal_point = Some(decimal_point.into());
        self.thousands_sep = Some(thousands_sep.into());
        self
    }

    #[must_use]
    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.months = Some(months.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_weekdays<I, S>(mut self, weekdays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weekdays = Some(weekdays.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, values, expected) in [
            ("lang.months", &self.months, 12),
            ("lang.shortMonths", &self.short_months, 12),
            ("lang.weekdays", &self.weekdays, 7),
        ] {
            if let Some(values) = values {
                if values.len() != expected {
                    return Err(ChartError::invalid_value(
                        name,
                        format!("expected {expected} entries, got {}", values.len()),
                    ));
                }
            }
        }
        Ok(())
    }
}
