use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{ChartError, ChartResult};

pub const DOMAIN_ENV_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_DOMAIN";
pub const PATH_ENV_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_PATH";
pub const PORT_ENV_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_PORT";
pub const USE_SSL_ENV_VAR: &str = "HIGHCHARTS_EXPORT_SERVER_USE_SSL";

const DEFAULT_DOMAIN: &str = "export.highcharts.com";
const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// Connection settings of a Highcharts export server.
///
/// Serializable so hosts can persist the server they talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportServerConfig {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub auth_user: Option<String>,
    #[serde(default)]
    pub auth_password: Option<String>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ExportServerConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            domain: default_domain(),
            port: None,
            path: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auth_user: None,
            auth_password: None,
            referer: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ExportServerConfig {
    /// Reads the `HIGHCHARTS_EXPORT_SERVER_*` variables over the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(domain) = env_value(DOMAIN_ENV_VAR) {
            config.domain = domain;
        }
        config.path = env_value(PATH_ENV_VAR);
        if let Some(port) = env_value(PORT_ENV_VAR) {
            match port.parse::<u16>() {
                Ok(port) => config.port = Some(port),
                Err(_) => warn!(value = %port, "ignoring invalid {PORT_ENV_VAR}"),
            }
        }
        if let Some(use_ssl) = env_value(USE_SSL_ENV_VAR) {
            match use_ssl.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => config.protocol = "https".to_owned(),
                "false" | "0" | "no" => config.protocol = "http".to_owned(),
                _ => warn!(value = %use_ssl, "ignoring invalid {USE_SSL_ENV_VAR}"),
            }
        }
        config
    }

    /// A plain-HTTP server on `localhost:<port>`.
    #[must_use]
    pub fn local(port: u16) -> Self {
        Self {
            protocol: "http".to_owned(),
            domain: "127.0.0.1".to_owned(),
            port: Some(port),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_use_ssl(mut self, use_ssl: bool) -> Self {
        self.protocol = if use_ssl { "https" } else { "http" }.to_owned();
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_user = Some(user.into());
        self.auth_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Endpoint that receives export requests.
    pub fn url(&self) -> ChartResult<Url> {
        if !matches!(self.protocol.as_str(), "http" | "https") {
            return Err(ChartError::invalid_value(
                "protocol",
                format!("unsupported protocol `{}`", self.protocol),
            ));
        }
        if self.domain.trim().is_empty() {
            return Err(ChartError::invalid_value("domain", "domain must not be empty"));
        }

        let mut url = Url::parse(&format!("{}://{}", self.protocol, self.domain.trim()))
            .map_err(|e| ChartError::invalid_value("domain", format!("invalid server url: {e}")))?;
        if url.set_port(self.port).is_err() {
            return Err(ChartError::invalid_value(
                "port",
                "the server url cannot carry a port",
            ));
        }
        if let Some(path) = self.path.as_deref().map(str::trim).filter(|path| !path.is_empty()) {
            url.set_path(path);
        }
        Ok(url)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn default_protocol() -> String {
    "https".to_owned()
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_owned()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("highcharts-rs/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::ExportServerConfig;

    #[test]
    fn url_includes_port_and_path() {
        let config = ExportServerConfig::default()
            .with_domain("charts.example.com")
            .with_port(7801)
            .with_path("/export");
        assert_eq!(
            config.url().expect("valid url").as_str(),
            "https://charts.example.com:7801/export"
        );
    }

    #[test]
    fn default_url_points_at_public_server() {
        assert_eq!(
            ExportServerConfig::default().url().expect("valid url").as_str(),
            "https://export.highcharts.com/"
        );
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let config = ExportServerConfig {
            protocol: "ftp".to_owned(),
            ..ExportServerConfig::default()
        };
        assert!(config.url().is_err());
    }
}
