//! HTTP server implementation using axum

use crate::analyzer;
use crate::config::ServiceConfig;
use crate::document::{AnalysisResult, Document};
use crate::error::{Error, Result};
use crate::extractor::{self, DocumentLabel};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Multipart field carrying the uploaded document
const UPLOAD_FIELD: &str = "file";

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// PDF processing service.
///
/// Holds only immutable configuration; every call is independent.
#[derive(Debug, Clone)]
pub struct PdfService {
    config: Arc<ServiceConfig>,
}

impl PdfService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Reject anything that isn't named like a PDF
    pub fn check_input_type(filename: Option<&str>) -> Result<&str> {
        match filename {
            Some(name) if name.to_lowercase().ends_with(".pdf") => Ok(name),
            other => Err(Error::UnsupportedInputType {
                filename: other.unwrap_or_default().to_string(),
            }),
        }
    }

    /// Caller-supplied id, or one derived from the current time
    fn document_id(requested: Option<String>) -> String {
        requested
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("doc_{}", chrono::Utc::now().timestamp()))
    }

    /// Extract text and metadata from an uploaded PDF
    pub async fn extract_text(
        &self,
        upload: Upload,
        document_id: Option<String>,
    ) -> Result<Document> {
        let filename = Self::check_input_type(upload.filename.as_deref())?.to_string();
        let label = DocumentLabel {
            document_id: Self::document_id(document_id),
            filename,
        };

        tracing::debug!(
            document_id = %label.document_id,
            filename = %label.filename,
            bytes = upload.data.len(),
            "Extracting text"
        );

        // Move CPU-heavy PDF work to blocking thread pool
        let data = upload.data;
        tokio::task::spawn_blocking(move || extractor::extract(&data, label))
            .await
            .map_err(|e| Error::ProcessingFailure {
                reason: format!("Task join error: {}", e),
            })?
    }

    /// Extract text and derive basic statistics
    pub async fn analyze_document(
        &self,
        upload: Upload,
        document_id: Option<String>,
    ) -> Result<AnalysisResult> {
        let document = self.extract_text(upload, document_id).await?;
        Ok(analyzer::analyze(document))
    }
}

impl Default for PdfService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Identifier to attach to the document (generated when absent)
    #[serde(default)]
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub capabilities: [&'static str; 3],
}

// ============================================================================
// Handlers
// ============================================================================

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "PDF Processing Service",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdf-processor",
        capabilities: ["text_extraction", "metadata_extraction", "page_analysis"],
    })
}

async fn extract_text(
    State(service): State<PdfService>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<Json<Document>> {
    let upload = read_upload(multipart).await?;
    let document = service.extract_text(upload, query.document_id).await?;
    Ok(Json(document))
}

async fn analyze_document(
    State(service): State<PdfService>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>> {
    let upload = read_upload(multipart).await?;
    let analysis = service.analyze_document(upload, query.document_id).await?;
    Ok(Json(analysis))
}

/// Pull the `file` field out of a multipart body
async fn read_upload(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        Error::InvalidUpload {
            reason: "failed to read multipart body".to_string(),
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read file data: {}", e);
            Error::InvalidUpload {
                reason: "failed to read file data".to_string(),
            }
        })?;

        return Ok(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    Err(Error::InvalidUpload {
        reason: format!("no '{}' field in upload", UPLOAD_FIELD),
    })
}

// ============================================================================
// Router and server
// ============================================================================

/// CORS for the configured origins, with credentials.
/// Invalid origins and the `*` wildcard are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                tracing::warn!("Ignoring wildcard CORS origin: not allowed with credentials");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the application router
pub fn router(service: PdfService) -> Router {
    let cors = cors_layer(&service.config().cors_origins);
    let body_limit = service.config().max_upload_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/extract-text", post(extract_text))
        .route("/analyze-document", post(analyze_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let app = router(PdfService::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("PDF Processing Service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
