//! HTTP surface of the blob proxy.
//!
//! - `OPTIONS *` answers 204 with the CORS headers
//! - `GET /{key}` streams a stored object back
//! - `POST /upload` stores the first file of a multipart form
//!
//! Every response carries the CORS headers.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::store::{BlobStore, sanitize_file_name};

/// Default upload size limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Shared state for the blob routes.
#[derive(Clone)]
pub struct BlobState {
    store: Arc<dyn BlobStore>,
    public_base_url: String,
}

impl BlobState {
    /// `public_base_url` prefixes the key in upload responses.
    pub fn new(store: Arc<dyn BlobStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            public_base_url,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Builds the router.
pub fn router(state: BlobState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(get_object).fallback(not_found))
        .route("/upload", post(upload).fallback(not_found))
        .route("/{*key}", get(get_object).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// The key is the raw request path without its leading slash.
async fn get_object(State(state): State<BlobState>, uri: Uri) -> Response {
    let key = uri.path().strip_prefix('/').unwrap_or(uri.path());
    if key.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing key").into_response();
    }

    match state.store.get(key).await {
        Ok(Some(object)) => {
            info!(key, size = object.bytes.len(), "serving object");
            let content_type = object
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            ([(header::CONTENT_TYPE, content_type)], object.bytes).into_response()
        }
        Ok(None) => {
            warn!(key, "object not found");
            not_found().await
        }
        Err(e) => {
            error!(key, error = %e, "failed to read object");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn upload(
    State(state): State<BlobState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return json_error(rejection.status(), rejection.body_text()),
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return json_error(e.status(), e.body_text()),
        };

        // Plain form values have no file name; an empty name is an unused
        // file input.
        let Some(file_name) = field.file_name().filter(|n| !n.is_empty()) else {
            continue;
        };
        let key = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );
        let content_type = field.content_type().map(str::to_string);

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return json_error(e.status(), e.body_text()),
        };

        if let Err(e) = state.store.put(&key, bytes, content_type.as_deref()).await {
            error!(key = %key, error = %e, "failed to store upload");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }

        info!(key = %key, content_type = ?content_type, "upload stored");
        return Json(json!({
            "url": state.object_url(&key),
            "message": "Upload received.",
        }))
        .into_response();
    }

    json_error(StatusCode::BAD_REQUEST, "No file found in form data.")
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
