//! # API REST
//!
//! REST API implementation for Carevault.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (multipart decoding, JSON serialisation, CORS, request tracing)
//!
//! Uses `api-shared` for wire types and `cv-core` for the content store.

#![warn(rust_2018_idioms)]

use api_shared::{HealthRes, HealthService, ProcessRes, ProcessedRecord, UploadForm, UploadRes};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use cv_core::ContentStore;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Application state for the REST API server
///
/// Holds the content store shared by all upload requests. The store is immutable once built, so
/// no locking is needed.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, upload_file, process_fhir),
    components(schemas(HealthRes, UploadForm, UploadRes, ProcessRes, ProcessedRecord))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// `upload_limit_bytes` caps request bodies; `None` removes axum's default cap entirely so
/// uploads of any length are accepted.
pub fn router(state: AppState, upload_limit_bytes: Option<usize>) -> Router {
    let body_limit = match upload_limit_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload_file))
        .route("/fhir/process", post(process_fhir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadRes),
        (status = 400, description = "Malformed multipart body"),
        (status = 422, description = "No `file` field in the form"),
        (status = 500, description = "Storage backend failed")
    )
)]
/// Store an uploaded file in the content store
///
/// Reads the whole `file` field into memory and hands it to the configured store. Other form
/// fields are skipped.
///
/// # Returns
/// * `Ok(Json<UploadRes>)` - Identifier assigned by the store
/// * `Err((StatusCode, &str))` - Client or server error
///
/// # Errors
/// Returns:
/// - the multipart rejection status (usually `400`, `413` past the body cap) for malformed forms,
/// - `422 Unprocessable Entity` if no `file` field is present,
/// - `500 Internal Server Error` if the store fails.
#[axum::debug_handler]
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadRes>, (StatusCode, &'static str)> {
    let mut content = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed multipart body: {:?}", e);
                return Err((e.status(), "Malformed multipart body"));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        match field.bytes().await {
            Ok(bytes) => {
                content = Some(Vec::from(bytes));
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read upload field: {:?}", e);
                return Err((e.status(), "Malformed multipart body"));
            }
        }
    }

    let Some(content) = content else {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "Missing file field"));
    };

    match state.store.store(content).await {
        Ok(blob) => Ok(Json(UploadRes {
            ipfs_hash: blob.cid.to_string(),
        })),
        Err(e) => {
            tracing::error!(backend = state.store.backend(), "Store upload error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/fhir/process",
    responses(
        (status = 200, description = "Extracted fields", body = ProcessRes),
        (status = 400, description = "Malformed JSON"),
        (status = 415, description = "Content type is set and is not JSON"),
        (status = 422, description = "JSON body is not an object")
    )
)]
/// Extract the patient identifier and birth date from a record
///
/// The body is passed unmodified to [`fhir::extract_summary`]; no FHIR validation is done.
/// A request without a `Content-Type` header is parsed as JSON. An explicit non-JSON type is
/// rejected with `415`; JSON syntax and shape errors keep axum's `Json` rejection statuses.
#[axum::debug_handler]
async fn process_fhir(headers: HeaderMap, body: Bytes) -> Result<Json<ProcessRes>, Response> {
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        if !is_json_content_type(content_type.to_str().unwrap_or_default()) {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected request with `Content-Type: application/json`",
            )
                .into_response());
        }
    }

    let Json(record) = Json::<fhir::Record>::from_bytes(&body).map_err(|rejection| {
        tracing::debug!("Rejected record body: {}", rejection.body_text());
        rejection.into_response()
    })?;

    let summary = fhir::extract_summary(&record);
    tracing::debug!(complete = summary.is_complete(), "Processed record");

    Ok(Json(ProcessRes {
        processed: summary.into(),
    }))
}

/// `application/json` or any `application/<subtype>+json`, parameters ignored.
fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };

    kind.eq_ignore_ascii_case("application")
        && (subtype.eq_ignore_ascii_case("json")
            || subtype.to_ascii_lowercase().ends_with("+json"))
}
