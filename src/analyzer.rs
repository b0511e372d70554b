//! Coarse document statistics by delimiter-based splitting

use crate::document::{AnalysisResult, BasicStats, Document};

/// Analyze a document, stamping the result with the current time
pub fn analyze(document: Document) -> AnalysisResult {
    analyze_at(document, chrono::Utc::now().timestamp_millis())
}

/// Analyze a document with an explicit timestamp (milliseconds since epoch)
pub fn analyze_at(document: Document, timestamp_ms: i64) -> AnalysisResult {
    let basic_stats = BasicStats {
        page_count: document.page_count,
        word_count: document.word_count,
        sentence_count: sentence_count(&document.text_content),
        paragraph_count: paragraph_count(&document.text_content),
        avg_words_per_page: avg_words_per_page(document.word_count, document.page_count),
    };

    AnalysisResult {
        document,
        basic_stats,
        analysis_timestamp: timestamp_ms,
    }
}

/// Non-empty pieces between literal `.` characters.
///
/// Abbreviations, decimals and ellipses all count as sentence breaks.
pub fn sentence_count(text: &str) -> usize {
    count_pieces(text, ".")
}

/// Non-empty pieces between blank lines
pub fn paragraph_count(text: &str) -> usize {
    count_pieces(text, "\n\n")
}

pub fn avg_words_per_page(word_count: usize, page_count: u32) -> f64 {
    if page_count == 0 {
        return 0.0;
    }
    word_count as f64 / page_count as f64
}

fn count_pieces(text: &str, delimiter: &str) -> usize {
    text.split(delimiter)
        .filter(|piece| !piece.trim().is_empty())
        .count()
}
