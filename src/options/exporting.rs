use serde::{Deserialize, Serialize};

use crate::core::validators::ensure_positive;
use crate::core::{JsObject, JsValue};
use crate::error::{ChartError, ChartResult};

use super::Options;

/// Image formats produced by the export server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "image/png", alias = "png")]
    Png,
    #[serde(rename = "image/jpeg", alias = "jpeg", alias = "jpg")]
    Jpeg,
    #[serde(rename = "application/pdf", alias = "pdf")]
    Pdf,
    #[serde(rename = "image/svg+xml", alias = "svg")]
    Svg,
}

impl ExportFormat {
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Short name used as the `type` of an export request and as file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }

    pub fn from_extension(extension: &str) -> ChartResult<Self> {
        match extension.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "pdf" | "application/pdf" => Ok(Self::Pdf),
            "svg" | "image/svg+xml" => Ok(Self::Svg),
            other => Err(ChartError::invalid_value(
                "exporting.type",
                format!("unsupported export format `{other}`"),
            )),
        }
    }
}

/// `exporting.csv`: options of the CSV/XLS data export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportCsv {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_delimiter: Option<String>,
    #[serde(flatten)]
    pub extra: JsObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Exporting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_to_export_server: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<JsObject>,
    /// Options merged into the chart only when it is exported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_options: Option<Box<Options>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<ExportCsv>,
    #[serde(flatten)]
    pub extra: JsObject,
}

impl Exporting {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_chart_options(mut self, options: Options) -> Self {
        self.chart_options = Some(Box::new(options));
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<JsValue>) -> Self {
        super::insert_option(&mut self.extra, key, value.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("exporting.scale", self.scale),
            ("exporting.width", self.width),
            ("exporting.sourceWidth", self.source_width),
            ("exporting.sourceHeight", self.source_height),
        ] {
            if let Some(value) = value {
                ensure_positive(name, value)?;
            }
        }
        if let Some(options) = &self.chart_options {
            options.validate()?;
        }
        Ok(())
    }
}
