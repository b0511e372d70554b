//! PDF Processing Service Library
//!
//! This crate provides an HTTP service for PDF documents:
//! - `extract-text`: Extract per-page text and metadata from an uploaded PDF
//! - `analyze-document`: Extraction plus basic word/sentence/paragraph statistics

pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod pdf;
pub mod server;

pub use config::ServiceConfig;
pub use document::{AnalysisResult, BasicStats, Document, DocumentMetadata, Section};
pub use error::{Error, PageExtractionError, Result};
pub use extractor::{extract, extract_from, DocumentLabel, PageSource};
pub use server::{router, run_server, PdfService, Upload};
