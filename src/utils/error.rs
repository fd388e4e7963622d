use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProoferError {
    /// 重試次數用盡後仍失敗的暫時性傳輸錯誤 (逾時或連線失敗)
    #[error("{message}")]
    TransportTimeout { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Unexpected status code in response: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("{reason}")]
    SoapFault { reason: String },

    #[error("Response is missing attributes: {}", .missing.join(", "))]
    MissingAttributes { missing: Vec<String> },

    #[error("Malformed verification response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to build verification request: {message}")]
    RequestBuild { message: String },

    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl ProoferError {
    /// 由遠端驗證服務回應所造成的錯誤
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            ProoferError::UnexpectedStatus { .. }
                | ProoferError::SoapFault { .. }
                | ProoferError::MissingAttributes { .. }
                | ProoferError::MalformedResponse { .. }
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProoferError::ConfigError { .. }
                | ProoferError::InvalidConfigValueError { .. }
                | ProoferError::ValidationError { .. }
                | ProoferError::IoError(_)
                | ProoferError::SerializationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProoferError>;
