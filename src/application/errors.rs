//! Application layer error types

use thiserror::Error;

/// Errors raised while executing a generation request.
///
/// None of these escape the driver: each one is logged and the offending
/// request is skipped.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Request error: {0}")]
    RequestError(#[from] RequestError),

    #[error("Generation error: {0}")]
    GenerationError(#[from] crate::generation::GenerationError),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors turning a `(name, args)` call into a [`crate::application::GenerationRequest`]
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    #[error("Invalid arguments for {request}: {reason}")]
    InvalidArguments { request: String, reason: String },

    #[error(transparent)]
    Invalid(#[from] crate::generation::GenerationError),
}

impl RequestError {
    pub fn invalid_arguments(request: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidArguments {
            request: request.to_string(),
            reason: reason.to_string(),
        }
    }
}
