use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::report::{self, ReportLimits};
use crate::core::resolver::FlacReader;
use crate::error::ParseError;
use crate::models::Report;

/// Multipart field carrying the playback log.
const UPLOAD_FIELD: &str = "wrappedUpload";
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

static INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared by every request.
#[derive(Debug, Clone, Copy)]
struct AppState {
    limits: ReportLimits,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    filename: String,
    results: Report,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// JSON error body with `success: false`.
fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

/// Router for the upload page. `limits` sizes the rankings of every report.
pub fn make_app(limits: ReportLimits) -> Router {
    Router::new()
        .route("/", get(index).post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { limits })
}

/// GET / - the upload form
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST / - multipart upload of a playback log, answered with the JSON report
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return failure(StatusCode::BAD_REQUEST, "Failed to read uploaded file");
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, bytes.to_vec())),
            Err(e) => {
                warn!("Failed to read upload: {}", e);
                return failure(StatusCode::BAD_REQUEST, "Failed to read uploaded file");
            }
        }
    }

    let Some((filename, data)) = upload else {
        return failure(StatusCode::BAD_REQUEST, "No file part in the request");
    };
    if filename.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "No file selected");
    }
    if !filename.ends_with(".xml") {
        return failure(StatusCode::BAD_REQUEST, "Please upload an XML file");
    }

    info!("Processing upload {} ({} bytes)", filename, data.len());
    let limits = state.limits;
    let outcome = tokio::task::spawn_blocking(move || {
        report::generate_from_bytes(&data, &FlacReader, limits)
    })
    .await;

    match outcome {
        Ok(Ok(results)) => Json(UploadResponse {
            success: true,
            filename,
            results,
        })
        .into_response(),
        Ok(Err(e @ (ParseError::MalformedDocument(_) | ParseError::UnsupportedEncoding))) => {
            warn!("{}: {}", filename, e);
            failure(StatusCode::BAD_REQUEST, "Invalid XML file format")
        }
        Ok(Err(e)) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Processing error: {e}"),
        ),
        Err(e) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Processing error: {e}"),
        ),
    }
}
