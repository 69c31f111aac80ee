use std::fs;
use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ChartError, ChartResult};
use crate::options::ExportFormat;

use super::config::ExportServerConfig;
use super::request::ExportRequest;

/// A rendered chart returned by the export server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedChart {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedChart {
    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let path = path.as_ref();
        fs::write(path, &self.bytes)?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "saved exported chart");
        Ok(())
    }
}

/// Blocking client for a Highcharts export server.
#[derive(Debug, Clone)]
pub struct ExportServer {
    config: ExportServerConfig,
    url: Url,
    client: Client,
}

impl ExportServer {
    pub fn new(config: ExportServerConfig) -> ChartResult<Self> {
        let url = config.url()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ChartError::Http(format!("failed to build http client: {e}")))?;
        Ok(Self {
            config,
            url,
            client,
        })
    }

    /// One-shot export using a server configured from the environment.
    pub fn get_chart(request: &ExportRequest) -> ChartResult<ExportedChart> {
        Self::new(ExportServerConfig::from_env())?.request_chart(request)
    }

    #[must_use]
    pub fn config(&self) -> &ExportServerConfig {
        &self.config
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request_chart(&self, request: &ExportRequest) -> ChartResult<ExportedChart> {
        let payload = request.payload()?;
        debug!(
            url = %self.url,
            format = request.format.extension(),
            async_rendering = request.async_rendering,
            "requesting chart export"
        );

        let response = self
            .authorize(self.client.post(self.url.clone()).json(&payload))
            .send()
            .map_err(transport_error)?;
        let mut body = read_success(response)?;

        if request.async_rendering {
            let location = String::from_utf8(body).map_err(|_| {
                ChartError::InvalidData("export server returned a non-text location".to_owned())
            })?;
            let image_url = self.location_url(location.trim())?;
            debug!(url = %image_url, "fetching asynchronously rendered chart");
            let response = self
                .authorize(self.client.get(image_url))
                .send()
                .map_err(transport_error)?;
            body = read_success(response)?;
        }

        let bytes = if request.use_base64 {
            let text = String::from_utf8(body).map_err(|_| {
                ChartError::InvalidData("base64 response is not valid text".to_owned())
            })?;
            STANDARD
                .decode(text.trim())
                .map_err(|e| ChartError::InvalidData(format!("invalid base64 response: {e}")))?
        } else {
            body
        };

        let chart = ExportedChart {
            format: request.format,
            bytes,
        };
        if let Some(filename) = &request.filename {
            chart.save(filename)?;
        }
        Ok(chart)
    }

    /// Resolves an async location below the configured path, not beside it.
    fn location_url(&self, location: &str) -> ChartResult<Url> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(location.trim_start_matches('/')).map_err(|e| {
            ChartError::InvalidData(format!(
                "export server returned an invalid location `{location}`: {e}"
            ))
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.config.referer {
            Some(referer) => builder
                .header(header::REFERER, referer)
                .header(header::ORIGIN, referer),
            None => builder,
        };
        match &self.config.auth_user {
            Some(user) => builder.basic_auth(user, self.config.auth_password.as_ref()),
            None => builder,
        }
    }
}

fn read_success(response: Response) -> ChartResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        warn!(status = status.as_u16(), "export server rejected the request");
        return Err(ChartError::ExportServer {
            status: status.as_u16(),
            message,
        });
    }
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(transport_error)
}

fn transport_error(error: reqwest::Error) -> ChartError {
    if error.is_timeout() {
        ChartError::Http(format!("export server timed out: {error}"))
    } else {
        ChartError::Http(format!("export server request failed: {error}"))
    }
}
