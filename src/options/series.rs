use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::validators::{ensure_finite, ensure_non_negative, ensure_positive};
use crate::core::{CallbackFunction, JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

use super::style::{Animation, Color, CssObject, DashStyle, validate_color};
use super::tooltip::Tooltip;

macro_rules! series_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Series type names understood by Highcharts and its modules.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SeriesType {
            $(#[serde(rename = $name)] $variant,)*
        }

        impl SeriesType {
            pub const ALL: &'static [SeriesType] = &[$(SeriesType::$variant),*];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(SeriesType::$variant => $name,)*
                }
            }
        }
    };
}

series_types! {
    Line => "line",
    Spline => "spline",
    Area => "area",
    AreaSpline => "areaspline",
    AreaRange => "arearange",
    AreaSplineRange => "areasplinerange",
    Column => "column",
    ColumnRange => "columnrange",
    ColumnPyramid => "columnpyramid",
    Bar => "bar",
    Pie => "pie",
    VariablePie => "variablepie",
    Scatter => "scatter",
    Scatter3d => "scatter3d",
    Bubble => "bubble",
    BoxPlot => "boxplot",
    ErrorBar => "errorbar",
    Funnel => "funnel",
    Pyramid => "pyramid",
    Gauge => "gauge",
    SolidGauge => "solidgauge",
    Heatmap => "heatmap",
    Tilemap => "tilemap",
    Treemap => "treemap",
    Sunburst => "sunburst",
    Sankey => "sankey",
    DependencyWheel => "dependencywheel",
    NetworkGraph => "networkgraph",
    PackedBubble => "packedbubble",
    Polygon => "polygon",
    Waterfall => "waterfall",
    WordCloud => "wordcloud",
    Streamgraph => "streamgraph",
    Timeline => "timeline",
    Variwide => "variwide",
    Venn => "venn",
    Vector => "vector",
    WindBarb => "windbarb",
    XRange => "xrange",
    Item => "item",
    Organization => "organization",
    Histogram => "histogram",
    BellCurve => "bellcurve",
    Pareto => "pareto",
    Dumbbell => "dumbbell",
    Lollipop => "lollipop",
    Candlestick => "candlestick",
    Ohlc => "ohlc",
    Hlc => "hlc",
    Flags => "flags",
    Map => "map",
    MapLine => "mapline",
    MapPoint => "mappoint",
    MapBubble => "mapbubble",
    Gantt => "gantt",
}

/// Stacking modes accepted by `stacking`.
const STACKING_MODES: [&str; 4] = ["normal", "percent", "stream", "overlap"];

/// One entry of a series' `data` array.
///
/// Highcharts accepts a bare y value, an `[x, y, ...]` tuple, or a point
/// object; `null` leaves a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    Null,
    Number(f64),
    Tuple(Vec<JsValue>),
    Object(JsObject),
}

impl DataPoint {
    #[must_use]
    pub fn xy(x: impl Into<JsValue>, y: f64) -> Self {
        Self::Tuple(vec![x.into(), JsValue::number(y)])
    }

    #[must_use]
    pub fn named(name: impl Into<String>, y: f64) -> Self {
        let mut point = JsObject::new();
        point.insert("name".to_owned(), JsValue::String(name.into()));
        point.insert("y".to_owned(), JsValue::number(y));
        Self::Object(point)
    }

    fn validate(&self, index: usize) -> ChartResult<()> {
        let numbers: Vec<f64> = match self {
            Self::Null => Vec::new(),
            Self::Number(value) => vec![*value],
            Self::Tuple(values) => values.iter().filter_map(JsValue::as_f64).collect(),
            Self::Object(members) => members.values().filter_map(JsValue::as_f64).collect(),
        };
        if numbers.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "data point {index} holds a non-finite number"
            )));
        }
        Ok(())
    }
}

impl From<f64> for DataPoint {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for DataPoint {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::xy(x, y)
    }
}

impl From<JsObject> for DataPoint {
    fn from(value: JsObject) -> Self {
        Self::Object(value)
    }
}

/// Reference to an axis by position or by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisRef {
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(flatten)]
    pub extra: JsObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CssObject>,
    #[serde(flatten)]
    pub extra: JsObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesEvents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_item_click: Option<CallbackFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_animate: Option<CallbackFunction>,
    #[serde(flatten)]
    pub extra: JsObject,
}

/// Settings shared by a series and its `plotOptions` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_style: Option<DashStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_in_legend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_labels: Option<DataLabels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<SeriesEvents>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl SeriesOptions {
    #[must_use]
    pub fn with_stacking(mut self, stacking: impl Into<String>) -> Self {
        self.stacking = Some(stacking.into());
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    #[must_use]
    pub fn with_data_labels(mut self, data_labels: DataLabels) -> Self {
        self.data_labels = Some(data_labels);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_color(self.color.as_ref())?;
        if let Some(stacking) = self.stacking.as_deref() {
            if !STACKING_MODES.contains(&stacking) {
                return Err(ChartError::invalid_value(
                    "series.stacking",
                    format!("unknown stacking mode `{stacking}`"),
                ));
            }
        }
        if let Some(width) = self.line_width {
            ensure_non_negative("series.lineWidth", width)?;
        }
        if let Some(start) = self.point_start {
            ensure_finite("series.pointStart", start)?;
        }
        if let Some(interval) = self.point_interval {
            ensure_positive("series.pointInterval", interval)?;
        }
        if let Some(marker) = &self.marker {
            if let Some(radius) = marker.radius {
                ensure_non_negative("series.marker.radius", radius)?;
            }
            validate_color(marker.fill_color.as_ref())?;
            validate_color(marker.line_color.as_ref())?;
        }
        if let Some(tooltip) = &self.tooltip {
            tooltip.validate()?;
        }
        if let Some(animation) = &self.animation {
            animation.validate()?;
        }
        Ok(())
    }
}

/// One entry of `options.series`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Series {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub series_type: Option<SeriesType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<DataPoint>>,
    #[serde(flatten)]
    pub options: SeriesOptions,
}

impl Series {
    #[must_use]
    pub fn new(series_type: SeriesType) -> Self {
        Self {
            series_type: Some(series_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_data<I, P>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        self.data = Some(data.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.options.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisRef) -> Self {
        self.x_axis = Some(axis);
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisRef) -> Self {
        self.y_axis = Some(axis);
        self
    }

    #[must_use]
    pub fn with_series_options(mut self, options: SeriesOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.options.extra, key, value.into());
        self
    }

    pub fn push_point(&mut self, point: impl Into<DataPoint>) {
        self.data.get_or_insert_with(Vec::new).push(point.into());
    }

    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.options.validate()?;
        for (index, point) in self.data.iter().flatten().enumerate() {
            point.validate(index)?;
        }
        trace!(
            id = self.id.as_deref().unwrap_or(""),
            points = self.data_len(),
            "validated series"
        );
        Ok(())
    }
}

/// `plotOptions`: defaults for all series and per series type.
///
/// Per-type entries are keyed by the type name (`line`, `column`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesOptions>,
    #[serde(flatten)]
    pub by_type: IndexMap<String, SeriesOptions>,
}

impl PlotOptions {
    #[must_use]
    pub fn with_series(mut self, options: SeriesOptions) -> Self {
        self.series = Some(options);
        self
    }

    #[must_use]
    pub fn with_type(mut self, series_type: SeriesType, options: SeriesOptions) -> Self {
        self.by_type.insert(series_type.as_str().to_owned(), options);
        self
    }

    #[must_use]
    pub fn for_type(&self, series_type: SeriesType) -> Option<&SeriesOptions> {
        self.by_type.get(series_type.as_str())
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(series) = &self.series {
            series.validate()?;
        }
        for (name, options) in &self.by_type {
            if !SeriesType::ALL.iter().any(|series_type| series_type.as_str() == name) {
                trace!(series_type = %name, "plotOptions entry for an unlisted series type");
            }
            options.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DataPoint, Series, SeriesOptions, SeriesType};

    #[test]
    fn unknown_stacking_is_rejected() {
        let series = Series::new(SeriesType::Column)
            .with_series_options(SeriesOptions::default().with_stacking("sideways"));
        assert!(series.validate().is_err());
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let series = Series::new(SeriesType::Line).with_data([1.0, f64::INFINITY]);
        assert!(series.validate().is_err());
    }

    #[test]
    fn data_points_deserialize_every_shape() {
        let points: Vec<DataPoint> =
            serde_json::from_str(r#"[1, null, [0, 2], {"name": "a", "y": 3}]"#).expect("points");
        assert_eq!(points[0], DataPoint::Number(1.0));
        assert_eq!(points[1], DataPoint::Null);
        assert!(matches!(points[2], DataPoint::Tuple(_)));
        assert_eq!(points[3], DataPoint::named("a", 3.0));
    }
}
