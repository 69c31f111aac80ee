use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{ChartConstructor, SharedOptions};
use crate::core::validators::{ensure_in_range, ensure_positive};
use crate::core::{CallbackFunction, ConfigObject};
use crate::error::{ChartError, ChartResult};
use crate::options::{ExportFormat, Options};

/// Largest `scale` the export server accepts.
const MAX_SCALE: f64 = 5.0;

/// Extra scripts, styles and files loaded before the chart is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// One chart to render on the export server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRequest {
    pub options: Options,
    pub format: ExportFormat,
    pub scale: Option<f64>,
    pub width: Option<f64>,
    pub callback: Option<CallbackFunction>,
    pub constructor: ChartConstructor,
    /// Ask for a base64 body instead of raw bytes.
    pub use_base64: bool,
    pub no_download: bool,
    /// The server answers with a path to fetch the image from.
    pub async_rendering: bool,
    pub global_options: Option<SharedOptions>,
    pub custom_code: Option<CallbackFunction>,
    pub resources: Option<ExportResources>,
    /// Where to store the rendered chart.
    pub filename: Option<PathBuf>,
}

impl ExportRequest {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: CallbackFunction) -> Self {
        self.callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: ChartConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    #[must_use]
    pub fn with_base64(mut self, use_base64: bool) -> Self {
        self.use_base64 = use_base64;
        self
    }

    #[must_use]
    pub fn with_no_download(mut self, no_download: bool) -> Self {
        self.no_download = no_download;
        self
    }

    #[must_use]
    pub fn with_async_rendering(mut self, async_rendering: bool) -> Self {
        self.async_rendering = async_rendering;
        self
    }

    #[must_use]
    pub fn with_global_options(mut self, global_options: SharedOptions) -> Self {
        self.global_options = Some(global_options);
        self
    }

    #[must_use]
    pub fn with_custom_code(mut self, custom_code: CallbackFunction) -> Self {
        self.custom_code = Some(custom_code);
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: ExportResources) -> Self {
        self.resources = Some(resources);
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(scale) = self.scale {
            if scale <= 0.0 {
                return Err(ChartError::invalid_value("scale", "must be > 0"));
            }
            ensure_in_range("scale", scale, 0.0, MAX_SCALE)?;
        }
        if let Some(width) = self.width {
            ensure_positive("width", width)?;
        }
        if let Some(callback) = &self.callback {
            callback.validate()?;
        }
        if let Some(custom_code) = &self.custom_code {
            custom_code.validate()?;
        }
        if let Some(global_options) = &self.global_options {
            global_options.validate()?;
        }
        self.options.validate()
    }

    /// JSON body posted to the export server. Unset fields are left out.
    pub fn payload(&self) -> ChartResult<Value> {
        self.validate()?;

        let mut payload = Map::new();
        payload.insert(
            "infile".to_owned(),
            self.options.to_js_value()?.to_json_value(),
        );
        payload.insert("type".to_owned(), Value::from(self.format.extension()));
        if let Some(scale) = self.scale {
            payload.insert("scale".to_owned(), Value::from(scale));
        }
        if let Some(width) = self.width {
            payload.insert("width".to_owned(), Value::from(width));
        }
        if let Some(callback) = &self.callback {
            payload.insert("callback".to_owned(), Value::from(callback.to_js_source()));
        }
        payload.insert("constr".to_owned(), Value::from(self.constructor.js_name()));
        for (key, enabled) in [
            ("b64", self.use_base64),
            ("noDownload", self.no_download),
            ("async", self.async_rendering),
        ] {
            if enabled {
                payload.insert(key.to_owned(), Value::Bool(true));
            }
        }
        if let Some(global_options) = &self.global_options {
            payload.insert(
                "globalOptions".to_owned(),
                global_options.to_js_value()?.to_json_value(),
            );
        }
        if let Some(custom_code) = &self.custom_code {
            payload.insert("customCode".to_owned(), Value::from(custom_code.to_js_source()));
        }
        if let Some(resources) = &self.resources {
            payload.insert("resources".to_owned(), serde_json::to_value(resources)?);
        }
        Ok(Value::Object(payload))
    }
}
