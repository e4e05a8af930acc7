//! Error types for Moodline

/// Result type alias using Moodline's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Moodline operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single model-acquisition tier failed. Absorbed by the resolver
    /// (the cascade falls through to the next tier) and never surfaced
    /// to callers.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Every acquisition tier failed. Fatal: the service must not start.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// A request is missing required input. Client error, no model call.
    #[error("validation error: {0}")]
    Validation(String),

    /// A resolved model failed while processing a well-formed request.
    /// Server error; the process stays alive.
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a new initialization error
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error aborts service startup rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Initialization(_))
    }
}
