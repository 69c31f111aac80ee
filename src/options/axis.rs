use serde::{Deserialize, Deserializer, Serialize};

use crate::core::nullable::{self, Nullable};
use crate::core::validators::{ensure_finite, ensure_non_negative, ensure_positive};
use crate::core::{CallbackFunction, JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

use super::style::{Align, Color, CssObject, DashStyle, validate_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Linear,
    Logarithmic,
    Datetime,
    Category,
    Treegrid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisTitle {
    /// `Some(Nullable::Null)` hides the title.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_option"
    )]
    pub text: Option<Nullable<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<AxisTitleAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisTitleAlign {
    Low,
    Middle,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

/// A line drawn across the plot area at a given axis value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_style: Option<DashStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<JsObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

/// A colored band between two axis values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotBand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<JsObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

/// One x or y axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<AxisType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_option"
    )]
    pub min: Option<Nullable<f64>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize_option"
    )]
    pub max: Option<Nullable<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opposite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_line_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<AxisLabels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_lines: Option<Vec<PlotLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bands: Option<Vec<PlotBand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosshair: Option<JsValue>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Axis {
    #[must_use]
    pub fn new(axis_type: AxisType) -> Self {
        Self {
            axis_type: Some(axis_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title.get_or_insert_with(AxisTitle::default).text =
            Some(Nullable::Value(text.into()));
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(Nullable::Value(min));
        self.max = Some(Nullable::Value(max));
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: f64) -> Self {
        self.tick_interval = Some(tick_interval);
        self
    }

    #[must_use]
    pub fn with_opposite(mut self, opposite: bool) -> Self {
        self.opposite = Some(opposite);
        self
    }

    #[must_use]
    pub fn with_labels_formatter(mut self, formatter: CallbackFunction) -> Self {
        self.labels.get_or_insert_with(AxisLabels::default).formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_plot_line(mut self, plot_line: PlotLine) -> Self {
        self.plot_lines.get_or_insert_with(Vec::new).push(plot_line);
        self
    }

    #[must_use]
    pub fn with_plot_band(mut self, plot_band: PlotBand) -> Self {
        self.plot_bands.get_or_insert_with(Vec::new).push(plot_band);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let min = self.min.as_ref().and_then(Nullable::as_value).copied();
        let max = self.max.as_ref().and_then(Nullable::as_value).copied();
        if let Some(min) = min {
            ensure_finite("axis.min", min)?;
        }
        if let Some(max) = max {
            ensure_finite("axis.max", max)?;
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ChartError::invalid_value(
                    "axis.min",
                    format!("min ({min}) must not exceed max ({max})"),
                ));
            }
        }
        if let Some(tick_interval) = self.tick_interval {
            ensure_positive("axis.tickInterval", tick_interval)?;
        }
        if let Some(width) = self.grid_line_width {
            ensure_non_negative("axis.gridLineWidth", width)?;
        }
        validate_color(self.grid_line_color.as_ref())?;
        if self.categories.is_some()
            && !matches!(self.axis_type, None | Some(AxisType::Category))
        {
            return Err(ChartError::invalid_value(
                "axis.categories",
                "categories require a category axis",
            ));
        }
        if let Some(rotation) = self.labels.as_ref().and_then(|labels| labels.rotation) {
            ensure_finite("axis.labels.rotation", rotation)?;
        }
        for plot_line in self.plot_lines.iter().flatten() {
            if let Some(value) = plot_line.value {
                ensure_finite("axis.plotLines.value", value)?;
            }
            if let Some(width) = plot_line.width {
                ensure_non_negative("axis.plotLines.width", width)?;
            }
            validate_color(plot_line.color.as_ref())?;
        }
        for plot_band in self.plot_bands.iter().flatten() {
            for (name, value) in [("axis.plotBands.from", plot_band.from), ("axis.plotBands.to", plot_band.to)] {
                if let Some(value) = value {
                    ensure_finite(name, value)?;
                }
            }
            validate_color(plot_band.color.as_ref())?;
        }
        Ok(())
    }
}

/// Accepts `xAxis: {...}` as well as `xAxis: [{...}, ...]`.
pub(crate) fn deserialize_axes<'de, D>(deserializer: D) -> Result<Option<Vec<Axis>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Axis>),
        One(Box<Axis>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|axes| match axes {
        OneOrMany::Many(axes) => axes,
        OneOrMany::One(axis) => vec![*axis],
    }))
}
