use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Parsing error in {origin}: {message}")]
    ParsingError { origin: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a parsing error for a named origin (file path, env var, ...)
    pub fn parsing(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::ParsingError {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}

/// Parse a boolean the way environment variables usually spell it
pub fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(
            field,
            value,
            "true, false, 1, 0, yes, no, on or off",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("flag", "TRUE").unwrap());
        assert!(parse_bool("flag", " yes ").unwrap());
        assert!(!parse_bool("flag", "0").unwrap());
        assert!(!parse_bool("flag", "off").unwrap());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let error = parse_bool("include_status_code", "maybe").unwrap_err();
        match error {
            ConfigError::InvalidValue { field, value, .. } => {
                assert_eq!(field, "include_status_code");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
