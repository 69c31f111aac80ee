use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::validators::{ensure_finite, ensure_non_negative};
use crate::core::{CallbackFunction, JsObject, JsValue};
use crate::error::ChartResult;

use super::style::{Align, Color, CssObject, VerticalAlign, validate_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendLayout {
    Horizontal,
    Vertical,
    Proximate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LegendLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<CssObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_formatter: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Legend {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LegendLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    #[must_use]
    pub fn with_position(mut self, align: Align, vertical_align: VerticalAlign) -> Self {
        self.align = Some(align);
        self.vertical_align = Some(vertical_align);
        self
    }

    #[must_use]
    pub fn with_label_formatter(mut self, formatter: CallbackFunction) -> Self {
        self.label_formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_color(self.background_color.as_ref())?;
        validate_color(self.border_color.as_ref())?;
        if let Some(width) = self.border_width {
            ensure_non_negative("legend.borderWidth", width)?;
        }
        for (name, value) in [("legend.x", self.x), ("legend.y", self.y)] {
            if let Some(value) = value {
                ensure_finite(name, value)?;
            }
        }
        if self.label_format.is_some() && self.label_formatter.is_some() {
            warn!("legend.labelFormat is ignored when labelFormatter is set");
        }
        Ok(())
    }
}
