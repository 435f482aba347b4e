//! Error types for the menu OCR client.

use thiserror::Error;

/// Errors that can occur when talking to the OCR service.
#[derive(Debug, Error)]
pub enum OcrError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("OCR service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or status reason.
        message: String,
    },

    /// Failed to parse the response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// Failed to read the image file.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The upload URL could not be built from the configured base.
    #[error("invalid OCR URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
