//! PDF processing layer
//!
//! This module provides the PDFium-backed page source used by the extractor.
//! All PDFium work runs on one process-wide worker thread.

mod date;
mod reader;
mod worker;

pub use date::normalize_pdf_date;
pub use reader::{PdfMetadataInfo, PdfReader};
pub use worker::pdfium_available;
