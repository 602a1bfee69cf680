//! HTTP surface: the upload form, the conversion endpoint, and the
//! artifact routes.
//!
//! The handlers stay thin; the whole document pipeline is synchronous
//! (lopdf, docx-rs, calamine, and plotters all block) and runs inside
//! `spawn_blocking` so a large upload never stalls the runtime's I/O
//! threads.
//!
//! ## Routes
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | upload form |
//! | `POST /upload` | multipart `file` + `column_name`, returns the HTML report |
//! | `GET /artifacts/{id}/{filename}` | chart/workbook served inline for the report page |
//! | `GET /download/{id}/{filename}` | same file as an attachment |
//!
//! Artifact lookups go through [`ReportStore::artifact_path`], which
//! only resolves UUID report ids and the four fixed artifact names.

use crate::bucket;
use crate::config::ServerConfig;
use crate::dataset;
use crate::error::Doc2ChartError;
use crate::extract::{self, DocumentFormat};
use crate::report::{self, html, Report};
use crate::store::ReportStore;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::io::Write;
use std::net::SocketAddr;
use tracing::{debug, error, info};

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    store: ReportStore,
}

/// Build the router. Separate from [`serve`] so tests can drive it
/// without binding a socket.
pub fn app(config: ServerConfig) -> Router {
    let max_upload = config.max_upload_bytes;
    let state = AppState {
        store: ReportStore::new(&config),
    };
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/artifacts/{id}/{filename}", get(artifact))
        .route("/download/{id}/{filename}", get(download))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(addr: SocketAddr, config: ServerConfig) -> Result<(), Doc2ChartError> {
    let router = app(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Doc2ChartError::Internal(format!("bind {addr}: {e}")))?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router)
        .await
        .map_err(|e| Doc2ChartError::Internal(format!("server: {e}")))
}

async fn index() -> Html<String> {
    Html(html::index_page())
}

/// One parsed upload request.
struct UploadRequest {
    filename: String,
    bytes: Vec<u8>,
    column: String,
}

async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let request = match read_multipart(multipart).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || run_pipeline(&store, request)).await;

    match result {
        Ok(Ok(report)) => Html(report.page).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(join_err) => {
            error!("Pipeline task panicked: {join_err}");
            error_response(Doc2ChartError::Internal("pipeline task failed".into()))
        }
    }
}

/// Pull `file` and `column_name` out of the multipart body. Transport
/// errors (oversized body, truncated stream) map straight to a 400.
async fn read_multipart(mut multipart: Multipart) -> Result<UploadRequest, Response> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut column: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(
                    (StatusCode::BAD_REQUEST, format!("Invalid upload body: {e}")).into_response()
                )
            }
        };
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            format!("Invalid upload body: {e}"),
                        )
                            .into_response())
                    }
                }
            }
            Some("column_name") => match field.text().await {
                Ok(text) => column = Some(text),
                Err(e) => {
                    return Err(
                        (StatusCode::BAD_REQUEST, format!("Invalid upload body: {e}"))
                            .into_response(),
                    )
                }
            },
            _ => {}
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(error_response(Doc2ChartError::MissingFilePart));
    };
    let Some(column) = column.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) else {
        return Err(error_response(Doc2ChartError::MissingColumnName));
    };

    Ok(UploadRequest {
        filename,
        bytes,
        column,
    })
}

/// The full conversion pipeline for one upload. Synchronous by design;
/// always called from `spawn_blocking`.
fn run_pipeline(store: &ReportStore, request: UploadRequest) -> Result<Report, Doc2ChartError> {
    // ── Step 0: Expire old reports ───────────────────────────────────────
    let swept = store.sweep_expired();
    if swept > 0 {
        info!("Swept {swept} expired report(s)");
    }

    // ── Step 1: Validate the request ─────────────────────────────────────
    if request.filename.is_empty() {
        return Err(Doc2ChartError::EmptyFilename);
    }
    let format = DocumentFormat::from_filename(&request.filename)?;
    info!(
        "Upload '{}' ({} bytes) as {:?}, column '{}'",
        request.filename,
        request.bytes.len(),
        format,
        request.column
    );

    // ── Step 2: Materialise the upload for the parsers ───────────────────
    // The temp file is deleted on drop whichever way this function exits.
    let mut tmp = tempfile::Builder::new()
        .suffix(format.suffix())
        .tempfile()
        .map_err(|e| Doc2ChartError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(&request.bytes)
        .map_err(|e| Doc2ChartError::Internal(format!("tempfile write: {e}")))?;

    // ── Step 3: Extract and merge tables ─────────────────────────────────
    let tables = extract::extract_tables(tmp.path(), format)?;
    debug!("Extracted {} table(s)", tables.len());
    let merged = dataset::merge(tables).ok_or(Doc2ChartError::NoTablesFound {
        kind: format.kind(),
    })?;

    // ── Step 4: Bucketize the chosen column ──────────────────────────────
    let analysis = bucket::bucketize(merged, &request.column)?;

    // ── Step 5: Render the report ────────────────────────────────────────
    let (id, dir) = store.create_report_dir()?;
    report::generate(&dir, &id, &request.filename, &analysis)
}

async fn artifact(
    State(state): State<AppState>,
    Path((id, filename)): Path<(String, String)>,
) -> Response {
    serve_artifact(&state, &id, &filename, false).await
}

async fn download(
    State(state): State<AppState>,
    Path((id, filename)): Path<(String, String)>,
) -> Response {
    serve_artifact(&state, &id, &filename, true).await
}

async fn serve_artifact(state: &AppState, id: &str, filename: &str, attachment: bool) -> Response {
    let Some(path) = state.store.artifact_path(id, filename) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Cannot read artifact {}: {e}", path.display());
            return (StatusCode::INTERNAL_SERVER_ERROR, "Artifact unreadable").into_response();
        }
    };

    let content_type = if filename.ends_with(".png") {
        "image/png"
    } else {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    };
    let mut response = ([(header::CONTENT_TYPE, content_type)], bytes).into_response();
    if attachment {
        // Filenames come from the fixed manifest, so no quoting worries.
        let disposition = format!("attachment; filename=\"{filename}\"");
        if let Ok(value) = disposition.parse() {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

/// Map a pipeline error onto a plain-text HTTP response.
fn error_response(err: Doc2ChartError) -> Response {
    if err.is_bad_request() {
        info!("Rejected request: {err}");
        (StatusCode::BAD_REQUEST, err.to_string()).into_response()
    } else {
        error!("Request failed: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
    }
}
