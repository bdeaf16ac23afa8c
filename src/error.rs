use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(kalenteri::validation))]
    Validation(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(kalenteri::not_found))]
    NotFound(String),

    #[error("Persistence error: {0}")]
    #[diagnostic(code(kalenteri::persistence))]
    Persistence(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(kalenteri::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kalenteri::config))]
    Config(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(kalenteri::http))]
    Http(String),

    #[error(transparent)]
    #[diagnostic(code(kalenteri::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kalenteri::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(kalenteri::other))]
    Other(String),
}

impl Error {
    /// The message without the variant prefix, as shown to API callers
    pub fn message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Persistence(msg)
            | Error::Environment(msg)
            | Error::Config(msg)
            | Error::Http(msg)
            | Error::Serialization(msg)
            | Error::Other(msg) => msg.clone(),
            Error::Io(err) => err.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found_error(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create persistence errors
pub fn persistence_error(message: &str) -> Error {
    Error::Persistence(message.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing or invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create HTTP errors
pub fn http_error(message: &str) -> Error {
    Error::Http(message.to_string())
}
