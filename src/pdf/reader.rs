//! PDF reader wrapper for PDFium

use crate::error::{Error, PageExtractionError, Result};
use crate::extractor::PageSource;
use crate::pdf::date::normalize_pdf_date;
use crate::pdf::worker::with_pdfium;
use pdfium_render::prelude::*;

/// Check the `%PDF` magic header before handing bytes to PDFium
fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidDocument {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}

/// PDF metadata as read from the document info dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfMetadataInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
}

/// PDF reader using PDFium.
///
/// Everything is read up front on the PDFium worker: a `PdfDocument` borrows
/// the shared `Pdfium` binding and must not outlive the job that opened it.
#[derive(Debug)]
pub struct PdfReader {
    page_count: u32,
    metadata: PdfMetadataInfo,
    page_texts: Vec<std::result::Result<String, PageExtractionError>>,
}

impl PdfReader {
    /// Open a PDF from bytes.
    ///
    /// Container-level failures are returned as `Error::InvalidDocument`.
    /// Page-level failures are kept per page and surface through
    /// [`PageSource::page_text`].
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_header(data)?;

        let data = data.to_vec();
        let reader = with_pdfium(move |pdfium| {
            let document = pdfium
                .load_pdf_from_byte_slice(&data, None)
                .map_err(Self::map_pdfium_error)?;

            Ok(Self {
                page_count: document.pages().len() as u32,
                metadata: Self::extract_metadata(&document),
                page_texts: Self::extract_page_texts(&document),
            })
        })?;

        tracing::debug!(
            page_count = reader.page_count,
            failed_pages = reader.page_texts.iter().filter(|t| t.is_err()).count(),
            "PDF loaded"
        );

        Ok(reader)
    }

    fn extract_metadata(document: &PdfDocument) -> PdfMetadataInfo {
        let meta = document.metadata();
        let tag = |tag_type: PdfDocumentMetadataTagType| {
            meta.get(tag_type).map(|t| t.value().to_string())
        };

        PdfMetadataInfo {
            title: tag(PdfDocumentMetadataTagType::Title),
            author: tag(PdfDocumentMetadataTagType::Author),
            subject: tag(PdfDocumentMetadataTagType::Subject),
            creator: tag(PdfDocumentMetadataTagType::Creator),
            producer: tag(PdfDocumentMetadataTagType::Producer),
            creation_date: tag(PdfDocumentMetadataTagType::CreationDate)
                .map(|d| normalize_pdf_date(&d)),
            modification_date: tag(PdfDocumentMetadataTagType::ModificationDate)
                .map(|d| normalize_pdf_date(&d)),
        }
    }

    fn extract_page_texts(
        document: &PdfDocument,
    ) -> Vec<std::result::Result<String, PageExtractionError>> {
        let pages = document.pages();

        (0..pages.len())
            .map(|index| -> std::result::Result<String, PageExtractionError> {
                let page_number = index as u32 + 1;
                let page = pages.get(index).map_err(|e| {
                    PageExtractionError::new(page_number, format!("Failed to load page: {}", e))
                })?;
                let text = page.text().map_err(|e| {
                    PageExtractionError::new(
                        page_number,
                        format!("Failed to read text layer: {}", e),
                    )
                })?;
                Ok(text.all())
            })
            .collect()
    }

    /// Map PDFium load errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::InvalidDocument {
                    reason: "PDF is password protected".to_string(),
                }
            }
            _ => Error::InvalidDocument {
                reason: format!("{}", err),
            },
        }
    }
}

impl PageSource for PdfReader {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn metadata(&self) -> &PdfMetadataInfo {
        &self.metadata
    }

    fn page_text(&self, page_number: u32) -> std::result::Result<String, PageExtractionError> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.page_texts.get(index as usize))
            .cloned()
            .unwrap_or_else(|| {
                Err(PageExtractionError::new(
                    page_number,
                    format!("Page out of bounds (total: {})", self.page_count),
                ))
            })
    }
}
