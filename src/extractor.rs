//! Text extraction: turns a PDF into a [`Document`] of per-page sections

use crate::document::{word_count, Document, DocumentMetadata, Section};
use crate::error::{PageExtractionError, Result};
use crate::pdf::{PdfMetadataInfo, PdfReader};

/// Separator appended after each successfully extracted page
const PAGE_SEPARATOR: &str = "\n\n";

/// A parsed PDF whose pages can be read one at a time
pub trait PageSource {
    /// Total number of pages, including ones whose text can't be read
    fn page_count(&self) -> u32;

    fn metadata(&self) -> &PdfMetadataInfo;

    /// Raw text of a page (1-indexed)
    fn page_text(&self, page_number: u32) -> std::result::Result<String, PageExtractionError>;
}

/// Identity of the uploaded file a document is extracted from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLabel {
    pub document_id: String,
    pub filename: String,
}

/// Parse PDF bytes and extract a [`Document`].
///
/// Fails with `Error::InvalidDocument` when the bytes are not a parseable PDF;
/// individual page failures are recorded on their sections instead.
pub fn extract(data: &[u8], label: DocumentLabel) -> Result<Document> {
    let reader = PdfReader::open_bytes(data)?;
    Ok(extract_from(&reader, label))
}

/// Walk every page of `source` and assemble the document
pub fn extract_from<S: PageSource + ?Sized>(source: &S, label: DocumentLabel) -> Document {
    let page_count = source.page_count();
    let mut full_text = String::new();
    let mut sections = Vec::with_capacity(page_count as usize);

    for page_number in 1..=page_count {
        let section = match source.page_text(page_number) {
            Ok(text) => {
                let section = Section::from_text(page_number, &text);
                full_text.push_str(&text);
                full_text.push_str(PAGE_SEPARATOR);
                section
            }
            Err(err) => {
                tracing::warn!(
                    page = page_number,
                    error = %err.reason,
                    "Error extracting text from page"
                );
                Section::failed(&err)
            }
        };
        sections.push(section);
    }

    let text_content = full_text.trim().to_string();
    let word_count = word_count(&text_content);

    tracing::info!(
        document_id = %label.document_id,
        page_count,
        word_count,
        failed_pages = sections.iter().filter(|s| s.is_failed()).count(),
        "Extracted text"
    );

    Document {
        document_id: label.document_id,
        filename: label.filename,
        text_content,
        page_count,
        word_count,
        metadata: DocumentMetadata::from(source.metadata()),
        sections,
    }
}
