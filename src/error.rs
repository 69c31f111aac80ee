use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to parse JavaScript literal at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("invalid JavaScript code: {0}")]
    JavaScript(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("export server responded with status {status}: {message}")]
    ExportServer { status: u16, message: String },

    #[error("export server request failed: {0}")]
    Http(String),
}

impl ChartError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
