use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the responder
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown serializer '{serializer}'. Registered serializers: {available}")]
    UnknownSerializer {
        serializer: String,
        available: String,
    },

    #[error("{status} is not a valid success HTTP status code")]
    InvalidSuccessStatus { status: u16 },

    #[error("{status} is not a valid error HTTP status code")]
    InvalidErrorStatus { status: u16 },

    #[error("Service not found: {key}")]
    ServiceNotFound { key: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("File already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl ResponderError {
    /// Create a new unknown serializer error
    pub fn unknown_serializer(serializer: impl Into<String>, available: &[String]) -> Self {
        Self::UnknownSerializer {
            serializer: serializer.into(),
            available: available.join(", "),
        }
    }

    /// Create a new service not found error
    pub fn service_not_found(key: impl Into<String>) -> Self {
        Self::ServiceNotFound { key: key.into() }
    }

    /// Create a new template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Check if the error comes from an invalid status code
    pub fn is_invalid_status(&self) -> bool {
        matches!(
            self,
            Self::InvalidSuccessStatus { .. } | Self::InvalidErrorStatus { .. }
        )
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownSerializer { .. })
    }
}

/// Result alias used throughout the crate
pub type ResponderResult<T> = Result<T, ResponderError>;
