//! Typed chart configuration.
//!
//! Each section mirrors one key of the Highcharts options tree. Keys the
//! typed model does not cover are kept in the section's `extra` map, so any
//! valid configuration survives a parse/render cycle.

pub mod axis;
pub mod chart;
pub mod exporting;
pub mod general;
pub mod legend;
pub mod series;
pub mod style;
pub mod title;
pub mod tooltip;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::validators::to_camel_case;
use crate::core::{ConfigObject, JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

pub use axis::{Axis, AxisLabels, AxisTitle, AxisType, PlotBand, PlotLine};
pub use chart::{ChartEvents, ChartOptions, ZoomType};
pub use exporting::{ExportCsv, ExportFormat, Exporting};
pub use general::{Accessibility, Language, Loading, Time};
pub use legend::{Legend, LegendLayout};
pub use series::{
    AxisRef, DataLabels, DataPoint, Marker, PlotOptions, Series, SeriesEvents, SeriesOptions,
    SeriesType,
};
pub use style::{Align, Animation, Color, CssObject, DashStyle, Gradient, Pattern, Size, VerticalAlign};
pub use title::{Caption, Credits, Subtitle, Title};
pub use tooltip::Tooltip;

/// Stores `value` under the camelCase form of `key`.
pub(crate) fn insert_option(extra: &mut JsObject, key: &str, value: JsValue) {
    extra.insert(to_camel_case(key), value);
}

/// The user options passed to a chart constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Caption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Color>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exporting: Option<Exporting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<Loading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_options: Option<PlotOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<Series>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Subtitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "axis::deserialize_axes"
    )]
    pub x_axis: Option<Vec<Axis>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "axis::deserialize_axes"
    )]
    pub y_axis: Option<Vec<Axis>>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chart(mut self, chart: ChartOptions) -> Self {
        self.chart = Some(chart);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Title::new(title));
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(Subtitle::new(subtitle));
        self
    }

    #[must_use]
    pub fn with_colors<I, C>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_credits(mut self, credits: Credits) -> Self {
        self.credits = Some(credits);
        self
    }

    #[must_use]
    pub fn with_exporting(mut self, exporting: Exporting) -> Self {
        self.exporting = Some(exporting);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    #[must_use]
    pub fn with_plot_options(mut self, plot_options: PlotOptions) -> Self {
        self.plot_options = Some(plot_options);
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: Time) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: Axis) -> Self {
        self.x_axis.get_or_insert_with(Vec::new).push(axis);
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: Axis) -> Self {
        self.y_axis.get_or_insert_with(Vec::new).push(axis);
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.add_series(series);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn add_series(&mut self, series: Series) {
        let series_list = self.series.get_or_insert_with(Vec::new);
        series_list.push(series);
        debug!(series_count = series_list.len(), "added series");
    }

    #[must_use]
    pub fn series_by_id(&self, id: &str) -> Option<&Series> {
        self.series
            .iter()
            .flatten()
            .find(|series| series.id.as_deref() == Some(id))
    }

    pub fn series_by_id_mut(&mut self, id: &str) -> Option<&mut Series> {
        self.series
            .iter_mut()
            .flatten()
            .find(|series| series.id.as_deref() == Some(id))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(accessibility) = &self.accessibility {
            if let Some(description) = &accessibility.description {
                if description.trim().is_empty() {
                    return Err(ChartError::invalid_value(
                        "accessibility.description",
                        "description must not be blank",
                    ));
                }
            }
        }
        if let Some(chart) = &self.chart {
            chart.validate()?;
        }
        for title in [&self.title, &self.subtitle, &self.caption].into_iter().flatten() {
            title.validate()?;
        }
        for color in self.colors.iter().flatten() {
            color.validate()?;
        }
        if let Some(credits) = &self.credits {
            credits.validate()?;
        }
        if let Some(exporting) = &self.exporting {
            exporting.validate()?;
        }
        if let Some(legend) = &self.legend {
            legend.validate()?;
        }
        if let Some(loading) = &self.loading {
            loading.validate()?;
        }
        if let Some(plot_options) = &self.plot_options {
            plot_options.validate()?;
        }
        if let Some(time) = &self.time {
            time.validate()?;
        }
        if let Some(tooltip) = &self.tooltip {
            tooltip.validate()?;
        }
        for axis in self.x_axis.iter().chain(self.y_axis.iter()).flatten() {
            axis.validate()?;
        }

        let mut seen_ids = HashSet::new();
        for series in self.series.iter().flatten() {
            series.validate()?;
            if let Some(id) = series.id.as_deref() {
                if !seen_ids.insert(id) {
                    return Err(ChartError::invalid_value(
                        "series.id",
                        format!("duplicate series id `{id}`"),
                    ));
                }
            }
        }
        Ok(())
    }
}

macro_rules! impl_config_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigObject for $ty {
                fn validate(&self) -> ChartResult<()> {
                    <$ty>::validate(self)
                }
            }
        )*
    };
}

impl_config_object!(
    Options,
    ChartOptions,
    Title,
    Credits,
    Legend,
    Tooltip,
    Axis,
    Series,
    SeriesOptions,
    PlotOptions,
    Exporting,
    Loading,
    Time,
    Language,
);

impl ConfigObject for Accessibility {}
