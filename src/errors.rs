/*!
 * Error types for the subsweep application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling the translation endpoint
///
/// These are per-caption failures: the pipeline catches them at the smallest
/// scope, keeps the original text for that caption and continues with the rest
/// of the document.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error when making the HTTP request fails
    #[error("translation request failed: {0}")]
    RequestFailed(String),

    /// Error when decoding the endpoint response fails
    #[error("failed to parse translation response: {0}")]
    ParseError(String),

    /// Error returned by the endpoint itself
    #[error("translation endpoint responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the endpoint
        message: String,
    },

    /// Error when the endpoint rejects the target language
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),
}

/// Fatal errors raised by the pipeline orchestrator
///
/// Anything in here aborts the run and surfaces as the terminal `Failed` event.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The run was cancelled between translation calls
    #[error("processing cancelled")]
    Cancelled,

    /// The orchestrator was constructed with inconsistent options
    #[error("invalid pipeline options: {0}")]
    InvalidOptions(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The source document is unreadable or absent
    #[error("input error: {0}")]
    Input(String),

    /// Error from the pipeline
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from translation
    #[error("translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Input(error.to_string())
    }
}
