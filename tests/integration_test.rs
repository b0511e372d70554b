//! Integration tests for the PDF processing HTTP API

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use pdf_processor::pdf::pdfium_available;
use pdf_processor::{extract, router, DocumentLabel, Error, PdfService, ServiceConfig};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::PathBuf;
use tower::ServiceExt;

const BOUNDARY: &str = "----pdf-processor-test-boundary";

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("Failed to read fixture")
}

/// Fixture tests need the PDFium shared library; skip where it can't be bound
fn require_pdfium() -> bool {
    let available = pdfium_available();
    if !available {
        eprintln!("skipping: PDFium library not available");
    }
    available
}

fn label(document_id: &str) -> DocumentLabel {
    DocumentLabel {
        document_id: document_id.to_string(),
        filename: "three-pages.pdf".to_string(),
    }
}

fn app() -> Router {
    router(PdfService::default())
}

/// Build a multipart body with a single field
fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_root_reports_service() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "PDF Processing Service");
    assert_eq!(json["status"], "running");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, json) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "pdf-processor");
    assert_eq!(
        json["capabilities"],
        serde_json::json!(["text_extraction", "metadata_extraction", "page_analysis"])
    );
}

#[tokio::test]
async fn test_extract_rejects_non_pdf_upload() {
    let body = multipart_body("file", "report.txt", "text/plain", b"just some notes");
    let (status, json) = send(app(), upload_request("/extract-text", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "unsupported_input_type");
    assert_eq!(json["detail"], "Only PDF files are supported");
}

#[tokio::test]
async fn test_analyze_rejects_non_pdf_upload() {
    let body = multipart_body("file", "slides.pptx", "application/octet-stream", b"PK\x03\x04");
    let (status, json) = send(app(), upload_request("/analyze-document", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "unsupported_input_type");
}

#[tokio::test]
async fn test_extract_malformed_pdf_is_client_error() {
    let body = multipart_body("file", "broken.pdf", "application/pdf", b"not really a pdf");
    let (status, json) = send(
        app(),
        upload_request("/extract-text?document_id=doc_123", body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_document");
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to extract text from PDF"));
}

#[tokio::test]
async fn test_analyze_malformed_pdf_is_client_error() {
    let body = multipart_body("file", "EMPTY.PDF", "application/pdf", b"");
    let (status, json) = send(app(), upload_request("/analyze-document", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_document");
}

#[tokio::test]
async fn test_missing_file_field() {
    let body = multipart_body("attachment", "report.pdf", "application/pdf", b"%PDF-1.4");
    let (status, json) = send(app(), upload_request("/extract-text", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_upload");
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let config = ServiceConfig {
        max_upload_bytes: 64,
        ..ServiceConfig::default()
    };
    let app = router(PdfService::new(config));
    let body = multipart_body("file", "large.pdf", "application/pdf", &[b'x'; 4096]);
    let (status, _) = send(app, upload_request("/extract-text", body)).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/extract-text")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

// ============================================================================
// PDFium-backed fixture tests
// ============================================================================

#[test]
fn test_extract_three_page_fixture() {
    if !require_pdfium() {
        return;
    }
    let doc = extract(&load_fixture("three-pages.pdf"), label("doc_fixture"))
        .expect("Failed to extract three-pages.pdf");

    assert_eq!(doc.page_count, 3);
    assert_eq!(doc.sections.len(), doc.page_count as usize);
    assert_eq!(
        doc.sections.iter().map(|s| s.word_count).collect::<Vec<_>>(),
        vec![2, 3, 0]
    );
    assert_eq!(
        doc.sections.iter().map(|s| s.page_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(doc.sections.iter().all(|s| s.error.is_none()));
    assert_eq!(doc.sections[0].content, "Hello world.");
    assert_eq!(doc.sections[1].content, "Foo bar baz.");
    assert_eq!(doc.sections[2].content, "");
    assert_eq!(doc.word_count, 5);
    assert_eq!(
        doc.word_count,
        doc.text_content.split_whitespace().count()
    );
    assert!(doc.text_content.starts_with("Hello world."));
    assert!(doc.text_content.ends_with("Foo bar baz."));
}

#[test]
fn test_fixture_metadata_and_dates() {
    if !require_pdfium() {
        return;
    }
    let doc = extract(&load_fixture("three-pages.pdf"), label("doc_meta")).unwrap();

    assert_eq!(doc.metadata.title, "Three Page Sample");
    assert_eq!(doc.metadata.author, "Jane Doe");
    assert_eq!(doc.metadata.subject, "Extraction fixture");
    assert_eq!(doc.metadata.creator, "fixture generator");
    assert_eq!(doc.metadata.producer, "hand-written PDF");
    assert_eq!(doc.metadata.creation_date, "2024-01-31 15:45:00+01:00");
    assert_eq!(doc.metadata.modification_date, "2024-02-01 09:00:00+00:00");
}

#[test]
fn test_corrupt_pdf_body_is_invalid_document() {
    if !require_pdfium() {
        return;
    }
    let data = load_fixture("corrupt.pdf");
    assert!(data.starts_with(b"%PDF"));

    let result = extract(&data, label("doc_corrupt"));
    assert!(matches!(result, Err(Error::InvalidDocument { .. })));
}

#[test]
fn test_parallel_extraction_shares_one_pdfium() {
    if !require_pdfium() {
        return;
    }
    let data = load_fixture("three-pages.pdf");
    let expected = extract(&data, label("doc_parallel")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let data = data.clone();
            std::thread::spawn(move || {
                (0..4)
                    .map(|_| extract(&data, label("doc_parallel")).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for doc in handle.join().expect("extraction thread panicked") {
            assert_eq!(doc, expected);
        }
    }
}

#[tokio::test]
async fn test_extract_text_route_with_fixture() {
    if !require_pdfium() {
        return;
    }
    let body = multipart_body(
        "file",
        "three-pages.pdf",
        "application/pdf",
        &load_fixture("three-pages.pdf"),
    );
    let (status, json) = send(
        app(),
        upload_request("/extract-text?document_id=doc_http", body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["document_id"], "doc_http");
    assert_eq!(json["filename"], "three-pages.pdf");
    assert_eq!(json["page_count"], 3);
    assert_eq!(json["word_count"], 5);
    assert_eq!(json["sections"].as_array().unwrap().len(), 3);
    assert_eq!(json["sections"][0]["type"], "page");
    assert_eq!(json["sections"][1]["word_count"], 3);
    assert!(json["sections"][2].get("error").is_none());
    assert_eq!(json["metadata"]["title"], "Three Page Sample");
}

#[tokio::test]
async fn test_analyze_document_route_with_fixture() {
    if !require_pdfium() {
        return;
    }
    let body = multipart_body(
        "file",
        "three-pages.pdf",
        "application/pdf",
        &load_fixture("three-pages.pdf"),
    );
    let (status, json) = send(app(), upload_request("/analyze-document", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["document_id"].as_str().unwrap().starts_with("doc_"));
    assert_eq!(json["page_count"], 3);
    assert_eq!(json["basic_stats"]["page_count"], 3);
    assert_eq!(json["basic_stats"]["word_count"], 5);
    assert_eq!(json["basic_stats"]["sentence_count"], 2);
    assert_eq!(json["basic_stats"]["paragraph_count"], 2);
    assert_eq!(json["basic_stats"]["avg_words_per_page"], 5.0 / 3.0);
    assert!(json["analysis_timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_concurrent_uploads() {
    if !require_pdfium() {
        return;
    }
    let data = load_fixture("three-pages.pdf");
    let app = app();

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let body = multipart_body("file", "three-pages.pdf", "application/pdf", &data);
            let uri = format!("/extract-text?document_id=doc_{}", i);
            tokio::spawn(async move { send(app, upload_request(&uri, body)).await })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let (status, json) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["document_id"], format!("doc_{}", i));
        assert_eq!(json["word_count"], 5);
    }
}
