//! Error types for the generation domain

use thiserror::Error;

/// Errors that can occur while emitting or synthesizing a file
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Controller '{0}' must reference at least one service")]
    MissingServices(String),

    #[error("Controller '{controller}' uses service '{service}' with no module at {expected}")]
    UnknownService {
        controller: String,
        service: String,
        expected: String,
    },

    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid package manifest: {0}")]
    InvalidManifest(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<tera::Error> for GenerationError {
    fn from(e: tera::Error) -> Self {
        // tera nests the useful message in its source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::RenderError(message)
    }
}
