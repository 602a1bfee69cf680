//! HTTP-level tests driving the axum router directly with
//! `tower::ServiceExt::oneshot` — no sockets, no running server.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use doc2chart::{server, ServerConfig};
use http_body_util::BodyExt;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "doc2chart-test-boundary";

// ── Helpers ──────────────────────────────────────────────────────────────

/// App with its own throwaway output root; the TempDir keeps the root
/// alive for the duration of the test.
fn test_app(root: &Path) -> Router {
    let config = ServerConfig::builder()
        .output_root(root)
        .retention(Duration::from_secs(3600))
        .build()
        .unwrap();
    server::app(config)
}

fn score_sheet_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "name").unwrap();
    sheet.write_string(0, 1, "score").unwrap();
    let scores = [5.0, 29.0, 31.0, 45.0, 55.0, 65.0, 75.0, 85.0, 95.0, 100.0];
    for (r, score) in scores.iter().enumerate() {
        sheet.write_string(r as u32 + 1, 0, format!("row{r}")).unwrap();
        sheet.write_number(r as u32 + 1, 1, *score).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Hand-built multipart body with a file part and a column_name part.
fn multipart_body(filename: &str, file_bytes: &[u8], column: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    if let Some(column) = column {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"column_name\"\r\n\r\n\
                 {column}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Pull the report UUID out of the first `/artifacts/<id>/` link.
fn report_id_from(page: &str) -> String {
    let start = page.find("/artifacts/").expect("page links artifacts") + "/artifacts/".len();
    page[start..start + 36].to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_serves_upload_form() {
    let root = tempfile::tempdir().unwrap();
    let response = test_app(root.path())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("column_name"));
    assert!(page.contains("multipart/form-data"));
}

#[tokio::test]
async fn txt_upload_rejected_without_artifacts() {
    let root = tempfile::tempdir().unwrap();
    let body = multipart_body("notes.txt", b"not a table", Some("score"));
    let response = test_app(root.path())
        .oneshot(upload_request(body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("Unsupported file type"));

    // No report directory may be left behind.
    let entries = std::fs::read_dir(root.path())
        .map(|it| it.count())
        .unwrap_or(0);
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn missing_file_part_rejected() {
    let root = tempfile::tempdir().unwrap();
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"column_name\"\r\n\r\n\
             score\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    let response = test_app(root.path())
        .oneshot(upload_request(body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("No file part"));
}

#[tokio::test]
async fn empty_filename_rejected() {
    let root = tempfile::tempdir().unwrap();
    let body = multipart_body("", b"bytes", Some("score"));
    let response = test_app(root.path())
        .oneshot(upload_request(body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("No selected file"));
}

#[tokio::test]
async fn missing_column_name_rejected() {
    let root = tempfile::tempdir().unwrap();
    let body = multipart_body("grades.xlsx", &score_sheet_bytes(), None);
    let response = test_app(root.path())
        .oneshot(upload_request(body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("No column name"));
}

#[tokio::test]
async fn unknown_column_rejected() {
    let root = tempfile::tempdir().unwrap();
    let body = multipart_body("grades.xlsx", &score_sheet_bytes(), Some("grade"));
    let response = test_app(root.path())
        .oneshot(upload_request(body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_string(response).await;
    assert!(page.contains("'grade'"));
    assert!(page.contains("score"), "message should list real columns");
}

#[tokio::test]
async fn end_to_end_spreadsheet_report() {
    let root = tempfile::tempdir().unwrap();
    let app = test_app(root.path());

    let body = multipart_body("grades.xlsx", &score_sheet_bytes(), Some("score"));
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;

    // All ten data rows survive coercion and appear in the preview.
    assert_eq!(page.matches("<td>").count(), 10 * 2);
    let id = report_id_from(&page);

    // Inline chart route.
    let chart = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/artifacts/{id}/pie_chart.png"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(chart.status(), StatusCode::OK);
    assert_eq!(chart.headers()[header::CONTENT_TYPE], "image/png");

    // Download route with attachment disposition.
    let download = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/download/{id}/data.xlsx"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(download.status(), StatusCode::OK);
    let disposition = download.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("data.xlsx"));

    // Bucket counts in the sidecar sum to the row count.
    let summary: serde_json::Value = serde_json::from_slice(
        &std::fs::read(root.path().join(&id).join("summary.json")).unwrap(),
    )
    .unwrap();
    let total: u64 = summary["bucket_counts"]["counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(total, 10);
}

#[tokio::test]
async fn artifact_lookups_are_manifest_restricted() {
    let root = tempfile::tempdir().unwrap();
    let app = test_app(root.path());

    let body = multipart_body("grades.xlsx", &score_sheet_bytes(), Some("score"));
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    let page = body_string(response).await;
    let id = report_id_from(&page);

    // summary.json exists on disk but is not in the download manifest.
    for uri in [
        format!("/download/{id}/summary.json"),
        format!("/download/not-a-uuid/data.xlsx"),
        format!("/artifacts/{id}/other.png"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri.clone()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
