//! Error types for the PDF processing service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for the PDF processing service
pub type Result<T> = std::result::Result<T, Error>;

/// Request-level error types
#[derive(Error, Debug)]
pub enum Error {
    /// Upload is not a PDF (rejected before extraction)
    #[error("Unsupported input type: {filename}")]
    UnsupportedInputType { filename: String },

    /// Multipart body could not be read or carried no file
    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },

    /// Byte stream is not a parseable PDF container
    #[error("Invalid PDF document: {reason}")]
    InvalidDocument { reason: String },

    /// PDFium could not be bound or failed outside document parsing
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Any other unexpected failure in the pipeline
    #[error("Processing failed: {reason}")]
    ProcessingFailure { reason: String },
}

/// Failure to extract the text of a single page.
///
/// Never converted into [`Error`]: the extractor records it on the page's
/// section and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("page {page}: {reason}")]
pub struct PageExtractionError {
    /// Page number (1-indexed)
    pub page: u32,
    pub reason: String,
}

impl PageExtractionError {
    pub fn new(page: u32, reason: impl Into<String>) -> Self {
        Self {
            page,
            reason: reason.into(),
        }
    }
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (library errors) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::UnsupportedInputType { .. } => "Only PDF files are supported".to_string(),
            Error::InvalidUpload { reason } => format!("Invalid upload: {}", reason),
            Error::InvalidDocument { reason } => {
                format!("Failed to extract text from PDF: {}", reason)
            }
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::ProcessingFailure { .. } => "Processing failed".to_string(),
        }
    }

    /// HTTP status and machine-readable kind for this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Error::UnsupportedInputType { .. } => {
                (StatusCode::BAD_REQUEST, "unsupported_input_type")
            }
            Error::InvalidUpload { .. } => (StatusCode::BAD_REQUEST, "invalid_upload"),
            Error::InvalidDocument { .. } => (StatusCode::BAD_REQUEST, "invalid_document"),
            Error::Pdfium { .. } | Error::ProcessingFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "processing_failure")
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: kind,
            detail: self.client_message(),
        });

        (status, body).into_response()
    }
}
