use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use promptsheet_core::{
    model_set, ContentModel, Evaluation, ModelError, Pipeline, ProviderKind, PublishedSheet,
    ReportSink, ReportTable, SinkError,
};
use promptsheet_server::{router, AppState};
use tower::ServiceExt;

struct StubModel;

#[async_trait::async_trait]
impl ContentModel for StubModel {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(
        &self,
        _prompt: &str,
        topics: &[&str],
        _style: Option<&str>,
    ) -> Result<String, ModelError> {
        Ok(format!("generated: {}", topics.join(", ")))
    }

    async fn evaluate(&self, _output: &str) -> Result<Evaluation, ModelError> {
        Ok(Evaluation::new("plausible", "9"))
    }
}

#[derive(Default)]
struct RecordingSink {
    published_row_counts: Mutex<Vec<usize>>,
}

#[async_trait::async_trait]
impl ReportSink for RecordingSink {
    async fn publish(&self, table: &ReportTable) -> Result<PublishedSheet, SinkError> {
        self.published_row_counts
            .lock()
            .unwrap()
            .push(table.to_grid().len());
        Ok(PublishedSheet {
            spreadsheet_id: "abc123".to_string(),
            url: "https://docs.google.com/spreadsheets/d/abc123".to_string(),
            title: "LLM_Output_test".to_string(),
        })
    }
}

struct FailingSink;

#[async_trait::async_trait]
impl ReportSink for FailingSink {
    async fn publish(&self, _table: &ReportTable) -> Result<PublishedSheet, SinkError> {
        Err(SinkError::Api {
            status: 403,
            message: "The caller does not have permission".to_string(),
        })
    }
}

fn state_with(sink: Option<Arc<dyn ReportSink>>, folder: Option<&str>) -> AppState {
    AppState {
        pipeline: Arc::new(Pipeline::new(model_set(Arc::new(StubModel)))),
        sink,
        drive_folder_id: folder.map(str::to_string),
    }
}

const BOUNDARY: &str = "XPROMPTSHEETBOUNDARY";

fn file_part(name: &str, filename: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
    )
}

fn multipart_request(parts: &[String]) -> Request<Body> {
    let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
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
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_serves_the_upload_form() {
    let app = router(state_with(Some(Arc::new(RecordingSink::default())), None));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("promptFile"));
    assert!(body.contains("topicsFile"));
}

#[tokio::test]
async fn upload_processes_topics_and_publishes_once() {
    let sink = Arc::new(RecordingSink::default());
    let app = router(state_with(Some(sink.clone()), None));

    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "Explain {X}"),
        file_part("topicsFile", "topics.txt", "Budgeting\n\nSaving\n"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Output Generated!"));
    assert!(body.contains("LLM_Output_test"));
    // Header plus one row per non-blank topic, published exactly once.
    assert_eq!(*sink.published_row_counts.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn success_page_links_to_the_destination_folder_when_configured() {
    let app = router(state_with(
        Some(Arc::new(RecordingSink::default())),
        Some("folder9"),
    ));
    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "p"),
        file_part("topicsFile", "topics.txt", "a\n"),
    ]);
    let response = app.oneshot(request).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("https://drive.google.com/drive/folders/folder9"));
}

#[tokio::test]
async fn missing_prompt_file_names_both_required_fields() {
    let app = router(state_with(Some(Arc::new(RecordingSink::default())), None));
    let request = multipart_request(&[file_part("topicsFile", "topics.txt", "a\n")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("prompt and topics files"));
}

#[tokio::test]
async fn blank_topics_file_is_rejected_before_any_work() {
    let sink = Arc::new(RecordingSink::default());
    let app = router(state_with(Some(sink.clone()), None));
    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "p"),
        file_part("topicsFile", "topics.txt", "\n  \n"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sink.published_row_counts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unconfigured_sink_is_a_server_configuration_error() {
    let app = router(state_with(None, None));
    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "p"),
        file_part("topicsFile", "topics.txt", "a\n"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("configuration"));
}

#[tokio::test]
async fn sink_failure_status_is_mirrored_to_the_caller() {
    let app = router(state_with(Some(Arc::new(FailingSink)), None));
    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "p"),
        file_part("topicsFile", "topics.txt", "a\n"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_string(response).await;
    assert!(body.contains("permission"));
}

#[tokio::test]
async fn extra_files_per_field_are_ignored() {
    let sink = Arc::new(RecordingSink::default());
    let app = router(state_with(Some(sink.clone()), None));
    let request = multipart_request(&[
        file_part("promptFile", "prompt.txt", "first prompt"),
        file_part("promptFile", "extra.txt", "second prompt ignored"),
        file_part("topicsFile", "topics.txt", "a\n"),
    ]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*sink.published_row_counts.lock().unwrap(), vec![2]);
}
