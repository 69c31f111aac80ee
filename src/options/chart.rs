use serde::{Deserialize, Serialize};

use crate::core::nullable::{self, Nullable};
use crate::core::validators::{ensure_finite, ensure_non_negative};
use crate::core::{CallbackFunction, JsObject, JsValue};
use crate::error::ChartResult;

use super::series::SeriesType;
use super::style::{Animation, Color, CssObject, Size, validate_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomType {
    X,
    Y,
    Xy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Zooming {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub zoom_type: Option<ZoomType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_touch: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Panning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub pan_type: Option<ZoomType>,
}

/// Chart-level event handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartEvents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redraw: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<CallbackFunction>,
    #[serde(flatten)]
    pub extra: JsObject,
}

/// `options.chart`: general chart area settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub series_type: Option<SeriesType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_option"
    )]
    pub height: Option<Nullable<Size>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_option"
    )]
    pub width: Option<Nullable<Size>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zooming: Option<Zooming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_type: Option<ZoomType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panning: Option<Panning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styled_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<ChartEvents>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl ChartOptions {
    #[must_use]
    pub fn with_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = Some(series_type);
        self
    }

    #[must_use]
    pub fn with_render_to(mut self, container: impl Into<String>) -> Self {
        self.render_to = Some(container.into());
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, color: impl Into<Color>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: impl Into<Size>) -> Self {
        self.height = Some(Nullable::Value(height.into()));
        self
    }

    /// Emits an explicit `height: null`, restoring the container-driven height.
    #[must_use]
    pub fn with_null_height(mut self) -> Self {
        self.height = Some(Nullable::Null);
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: impl Into<Size>) -> Self {
        self.width = Some(Nullable::Value(width.into()));
        self
    }

    #[must_use]
    pub fn with_zoom_type(mut self, zoom_type: ZoomType) -> Self {
        self.zoom_type = Some(zoom_type);
        self
    }

    #[must_use]
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = Some(inverted);
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: impl Into<Animation>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    #[must_use]
    pub fn with_load_event(mut self, handler: CallbackFunction) -> Self {
        self.events.get_or_insert_with(ChartEvents::default).load = Some(handler);
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
        for (name, value) in [
            ("chart.borderRadius", self.border_radius),
            ("chart.borderWidth", self.border_width),
        ] {
            if let Some(value) = value {
                ensure_non_negative(name, value)?;
            }
        }
        for (name, value) in [
            ("chart.marginTop", self.margin_top),
            ("chart.marginRight", self.margin_right),
            ("chart.marginBottom", self.margin_bottom),
            ("chart.marginLeft", self.margin_left),
        ] {
            if let Some(value) = value {
                ensure_finite(name, value)?;
            }
        }
        for (name, values) in [("chart.margin", &self.margin), ("chart.spacing", &self.spacing)] {
            for value in values.iter().flatten() {
                ensure_finite(name, *value)?;
            }
        }
        if let Some(Nullable::Value(height)) = &self.height {
            height.validate("chart.height")?;
        }
        if let Some(Nullable::Value(width)) = &self.width {
            width.validate("chart.width")?;
        }
        if let Some(animation) = &self.animation {
            animation.validate()?;
        }
        Ok(())
    }
}
