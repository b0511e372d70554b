//! Request-scoped result types returned by the extractor and analyzer

use crate::error::PageExtractionError;
use crate::pdf::PdfMetadataInfo;
use serde::Serialize;

/// Content recorded for a page whose text could not be extracted
pub const PAGE_ERROR_PLACEHOLDER: &str = "[Error extracting text from this page]";

/// Document metadata with every field resolved to a string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
}

impl From<&PdfMetadataInfo> for DocumentMetadata {
    fn from(info: &PdfMetadataInfo) -> Self {
        let resolve = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            title: resolve(&info.title),
            author: resolve(&info.author),
            subject: resolve(&info.subject),
            creator: resolve(&info.creator),
            producer: resolve(&info.producer),
            creation_date: resolve(&info.creation_date),
            modification_date: resolve(&info.modification_date),
        }
    }
}

/// Section type tag; pages are the only kind produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Page,
}

/// Extracted text for a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Page number (1-indexed)
    pub page_number: u32,
    pub content: String,
    pub word_count: usize,
    pub char_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Section {
    /// Build a section from successfully extracted page text
    pub fn from_text(page_number: u32, text: &str) -> Self {
        let content = text.trim();
        Self {
            kind: SectionKind::Page,
            page_number,
            content: content.to_string(),
            word_count: word_count(content),
            char_count: content.chars().count(),
            error: None,
        }
    }

    /// Build the degraded section recorded for a failed page
    pub fn failed(err: &PageExtractionError) -> Self {
        Self {
            kind: SectionKind::Page,
            page_number: err.page,
            content: PAGE_ERROR_PLACEHOLDER.to_string(),
            word_count: 0,
            char_count: 0,
            error: Some(err.reason.clone()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate extraction result for one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub document_id: String,
    pub filename: String,
    pub text_content: String,
    pub page_count: u32,
    pub word_count: usize,
    pub metadata: DocumentMetadata,
    pub sections: Vec<Section>,
}

/// Coarse statistics derived from a document's text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub page_count: u32,
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_page: f64,
}

/// Document plus derived statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub document: Document,
    pub basic_stats: BasicStats,
    /// Milliseconds since the Unix epoch
    pub analysis_timestamp: i64,
}

/// Number of whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
