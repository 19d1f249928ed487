//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! The three user-facing kinds (`Validation`, `Read`, `Inference`) display
//! their message verbatim so the page can show it as-is.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Bad file type or size. The user corrects the selection and retries.
    #[error("{0}")]
    Validation(String),

    /// File or asset read failure.
    #[error("{0}")]
    Read(String),

    /// The inference call failed or returned unusable content.
    #[error("{0}")]
    Inference(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
