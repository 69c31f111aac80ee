use serde::{Deserialize, Serialize};

use crate::core::JsObject;
use crate::core::validators::{ensure_finite, ensure_in_range, ensure_non_negative, ensure_positive};
use crate::error::{ChartError, ChartResult};

/// Free-form CSS declarations, e.g. `{fontSize: '12px'}`.
pub type CssObject = JsObject;

/// A color: a CSS color string, a gradient, or a fill pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Gradient(Gradient),
    Pattern(Pattern),
    Value(String),
}

impl Color {
    /// `rgba(r, g, b, a)` with 0-255 channels and alpha in [0, 1].
    #[must_use]
    pub fn rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self::Value(format!("rgba({red}, {green}, {blue}, {alpha})"))
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Value(value) if value.trim().is_empty() => Err(ChartError::invalid_value(
                "color",
                "color string must not be empty",
            )),
            Self::Value(_) => Ok(()),
            Self::Gradient(gradient) => gradient.validate(),
            Self::Pattern(pattern) => pattern.validate(),
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<Gradient> for Color {
    fn from(value: Gradient) -> Self {
        Self::Gradient(value)
    }
}

impl From<Pattern> for Color {
    fn from(value: Pattern) -> Self {
        Self::Pattern(value)
    }
}

/// Gradient direction in relative coordinates (0 to 1 of the shape's box).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// Linear or radial gradient fill. `stops` are `[offset, color]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_gradient: Option<LinearGradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial_gradient: Option<RadialGradient>,
    pub stops: Vec<(f64, String)>,
}

impl Gradient {
    #[must_use]
    pub fn linear(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            linear_gradient: Some(LinearGradient { x1, y1, x2, y2 }),
            radial_gradient: None,
            stops: Vec::new(),
        }
    }

    #[must_use]
    pub fn radial(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            linear_gradient: None,
            radial_gradient: Some(RadialGradient { cx, cy, r }),
            stops: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stop(mut self, offset: f64, color: impl Into<String>) -> Self {
        self.stops.push((offset, color.into()));
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        match (&self.linear_gradient, &self.radial_gradient) {
            (Some(_), Some(_)) => {
                return Err(ChartError::invalid_value(
                    "gradient",
                    "a gradient is either linear or radial, not both",
                ));
            }
            (None, None) => {
                return Err(ChartError::invalid_value(
                    "gradient",
                    "linearGradient or radialGradient is required",
                ));
            }
            (Some(linear), None) => {
                for (name, value) in [
                    ("linearGradient.x1", linear.x1),
                    ("linearGradient.y1", linear.y1),
                    ("linearGradient.x2", linear.x2),
                    ("linearGradient.y2", linear.y2),
                ] {
                    ensure_finite(name, value)?;
                }
            }
            (None, Some(radial)) => {
                ensure_finite("radialGradient.cx", radial.cx)?;
                ensure_finite("radialGradient.cy", radial.cy)?;
                ensure_positive("radialGradient.r", radial.r)?;
            }
        }

        for (offset, _) in &self.stops {
            ensure_in_range("gradient.stops", *offset, 0.0, 1.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Fill pattern from the pattern-fill module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub pattern_options: PatternOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<u32>,
}

impl Pattern {
    pub fn validate(&self) -> ChartResult<()> {
        let options = &self.pattern_options;
        if let Some(width) = options.width {
            ensure_positive("patternOptions.width", width)?;
        }
        if let Some(height) = options.height {
            ensure_positive("patternOptions.height", height)?;
        }
        if let Some(opacity) = options.opacity {
            ensure_in_range("patternOptions.opacity", opacity, 0.0, 1.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Stroke dash patterns understood by the SVG renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashStyle {
    Solid,
    ShortDash,
    ShortDot,
    ShortDashDot,
    ShortDashDotDot,
    Dot,
    Dash,
    LongDash,
    DashDot,
    LongDashDot,
    LongDashDotDot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

/// `true`/`false`, or explicit animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Animation {
    Enabled(bool),
    Settings(AnimationSettings),
}

impl Animation {
    #[must_use]
    pub fn duration(duration_ms: f64) -> Self {
        Self::Settings(AnimationSettings {
            duration: Some(duration_ms),
            ..AnimationSettings::default()
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Self::Settings(settings) = self {
            if let Some(duration) = settings.duration {
                ensure_non_negative("animation.duration", duration)?;
            }
            if let Some(defer) = settings.defer {
                ensure_non_negative("animation.defer", defer)?;
            }
        }
        Ok(())
    }
}

impl From<bool> for Animation {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}

/// Pixel size, or a percentage string such as `'60%'`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Size {
    Pixels(f64),
    Relative(String),
}

impl Size {
    pub fn validate(&self, field: &str) -> ChartResult<()> {
        match self {
            Self::Pixels(value) => ensure_positive(field, *value).map(|_| ()),
            Self::Relative(value) => {
                let valid = value
                    .strip_suffix('%')
                    .and_then(|number| number.trim().parse::<f64>().ok())
                    .is_some_and(|number| number.is_finite() && number > 0.0);
                if valid {
                    Ok(())
                } else {
                    Err(ChartError::invalid_value(
                        field,
                        format!("`{value}` is neither a pixel size nor a percentage"),
                    ))
                }
            }
        }
    }
}

impl From<f64> for Size {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<&str> for Size {
    fn from(value: &str) -> Self {
        Self::Relative(value.to_owned())
    }
}

pub(crate) fn validate_color(color: Option<&Color>) -> ChartResult<()> {
    color.map_or(Ok(()), Color::validate)
}
