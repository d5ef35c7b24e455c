//! Error types for bookweb-config

use thiserror::Error;

/// Error codes for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    FileNotFound,
    InvalidYaml,
    MissingField,
    InvalidValue,
    IoError,
    ValidationError,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ConfigErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::MissingField => "MISSING_FIELD",
            ConfigErrorCode::InvalidValue => "INVALID_VALUE",
            ConfigErrorCode::IoError => "IO_ERROR",
            ConfigErrorCode::ValidationError => "VALIDATION_ERROR",
        };
        f.write_str(code)
    }
}

/// Startup report for a config that could not be used
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    pub field: Option<String>,
    pub hints: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, "\n  field: {}", field)?;
        }
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cannot read {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::MissingField { .. } => ConfigErrorCode::MissingField,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
            ConfigError::ValidationError { .. } => ConfigErrorCode::ValidationError,
        }
    }

    /// Code, message, offending field and what to do about it
    pub fn to_details(&self) -> ConfigErrorDetails {
        let (field, hints) = match self {
            ConfigError::FileNotFound { .. } => (
                None,
                vec![
                    "Point --config at an existing file".to_string(),
                    "Run with --print-default-config for a starting point".to_string(),
                ],
            ),
            ConfigError::InvalidYaml { .. } => (None, vec!["Check indentation and quoting".to_string()]),
            ConfigError::MissingField { field } => {
                (Some(field.clone()), vec![format!("Add '{}' to the config file", field)])
            }
            ConfigError::InvalidValue { field, reason } => (Some(field.clone()), vec![reason.clone()]),
            ConfigError::IoError { .. } => (None, vec!["Check the file permissions".to_string()]),
            ConfigError::ValidationError { .. } => (None, Vec::new()),
        };
        ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field,
            hints,
        }
    }
}
