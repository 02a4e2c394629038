use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keyword table parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid dataset: {message}")]
    InvalidDataset { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Storage,
    Data,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingConfig { .. }
            | EtlError::InvalidConfigValue { .. }
            | EtlError::Toml(_) => ErrorCategory::Configuration,
            EtlError::Http(_) => ErrorCategory::Network,
            EtlError::Io(_) => ErrorCategory::Storage,
            EtlError::Csv(_) | EtlError::Serialization(_) | EtlError::InvalidDataset { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfig { field } => {
                format!("Missing environment variable: {}", field)
            }
            EtlError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            EtlError::Io(e) => format!("File operation failed: {}", e),
            other => other.to_string(),
        }
    }

    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
