//! Error types for bookweb-core
//!
//! Every failure a page can run into (network, backend-reported, local
//! input) is a `CoreError`. Controllers never let one escape; they turn it
//! into a single inline message with [`CoreError::user_message`].

use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request never got a response
    Transport,
    /// Backend answered with a non-success status
    Server,
    /// Response body did not have the expected shape
    Decode,
    /// Local validation failure
    ValidationError,
    /// A single form field could not be used
    InvalidInput,
    /// Token storage failure
    Session,
    /// Configuration error
    ConfigError,
    /// Operation not offered by the backend
    NotSupported,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Transport => write!(f, "TRANSPORT"),
            ErrorCode::Server => write!(f, "SERVER"),
            ErrorCode::Decode => write!(f, "DECODE"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorCode::Session => write!(f, "SESSION"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::NotSupported => write!(f, "NOT_SUPPORTED"),
        }
    }
}

/// Error severity levels, mapped onto log levels when a failure is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl ErrorSeverity {
    pub fn log_level(self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

/// Main error type for bookweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Network error: {message}")]
    Transport { message: String },

    #[error("Server returned {status}{}", server_suffix(.message))]
    Server { status: u16, message: Option<String> },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Session storage error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Transport { .. } => ErrorCode::Transport,
            CoreError::Server { .. } => ErrorCode::Server,
            CoreError::Decode { .. } => ErrorCode::Decode,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidInput { .. } => ErrorCode::InvalidInput,
            CoreError::Session { .. } => ErrorCode::Session,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::NotSupported { .. } => ErrorCode::NotSupported,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Transport { .. } => ErrorSeverity::Error,
            CoreError::Server { status, .. } if *status >= 500 => ErrorSeverity::Error,
            CoreError::Server { .. } => ErrorSeverity::Warning,
            CoreError::Decode { .. } => ErrorSeverity::Error,
            CoreError::ValidationError { .. } => ErrorSeverity::Info,
            CoreError::InvalidInput { .. } => ErrorSeverity::Info,
            CoreError::Session { .. } => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::NotSupported { .. } => ErrorSeverity::Warning,
        }
    }

    /// True for failures detected before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(self, CoreError::ValidationError { .. } | CoreError::InvalidInput { .. })
    }

    /// HTTP status reported by the backend, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable status line for the page.
    ///
    /// Prefers the message the backend put in its body, then the transport
    /// error text, then `fallback`. Local validation errors carry their own
    /// text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Server { message: Some(message), .. } if !message.trim().is_empty() => {
                message.trim().to_string()
            }
            CoreError::Transport { message } if !message.trim().is_empty() => message.clone(),
            CoreError::ValidationError { message } => message.clone(),
            CoreError::InvalidInput { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

fn server_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CoreError::Decode { message: error.to_string() }
        } else if let Some(status) = error.status() {
            CoreError::Server { status: status.as_u16(), message: None }
        } else {
            CoreError::Transport { message: error.to_string() }
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Decode { message: error.to_string() }
    }
}

// ==================== Tests ====================
