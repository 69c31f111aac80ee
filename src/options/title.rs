use serde::{Deserialize, Serialize};

use crate::core::validators::ensure_finite;
use crate::core::{JsObject, JsValue};
use crate::error::ChartResult;

use super::style::{Align, CssObject, VerticalAlign};

/// Text block shown above or below the plot area.
///
/// Shared by `title`, `subtitle` and `caption`; the three sections take the
/// same settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Title {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(rename = "useHTML", skip_serializing_if = "Option::is_none")]
    pub use_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_adjust: Option<f64>,
    #[serde(flatten)]
    pub extra: JsObject,
}

pub type Subtitle = Title;
pub type Caption = Title;

impl Title {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    #[must_use]
    pub fn with_vertical_align(mut self, vertical_align: VerticalAlign) -> Self {
        self.vertical_align = Some(vertical_align);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = Some(floating);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: CssObject) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("title.x", self.x),
            ("title.y", self.y),
            ("title.margin", self.margin),
            ("title.widthAdjust", self.width_adjust),
        ] {
            if let Some(value) = value {
                ensure_finite(name, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditsPosition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// The credits label in the lower right corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Credits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<CreditsPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Credits {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(position) = &self.position {
            for (name, value) in [("credits.position.x", position.x), ("credits.position.y", position.y)] {
                if let Some(value) = value {
                    ensure_finite(name, value)?;
                }
            }
        }
        Ok(())
    }
}
