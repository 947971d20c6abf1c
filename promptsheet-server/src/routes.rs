use axum::extract::{Multipart, State};
use axum::response::Html;
use promptsheet_core::{PublishedSheet, TopicList};

use crate::error::ApiError;
use crate::server::AppState;

const UPLOAD_FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Generate Output</title>
</head>
<body>
  <h1>Generate LLM output</h1>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <p><label>Prompt file: <input type="file" name="promptFile" required /></label></p>
    <p><label>Topics file: <input type="file" name="topicsFile" required /></label></p>
    <p><button type="submit">Generate</button></p>
  </form>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let mut prompt_text: Option<String> = None;
    let mut topics_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadUpload(err.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            // First file per field wins; extras are ignored.
            Some("promptFile") if prompt_text.is_none() => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::BadUpload(err.to_string()))?;
                prompt_text = Some(text);
            }
            Some("topicsFile") if topics_text.is_none() => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::BadUpload(err.to_string()))?;
                topics_text = Some(text);
            }
            _ => {}
        }
    }

    let (Some(prompt_text), Some(topics_text)) = (prompt_text, topics_text) else {
        return Err(ApiError::MissingUpload);
    };
    let topics = TopicList::parse(&topics_text)?;

    let sink = state.sink.as_ref().ok_or(ApiError::SinkNotConfigured)?;

    let table = state.pipeline.run(&prompt_text, &topics).await;
    let published = sink.publish(&table).await?;
    tracing::info!(title = %published.title, url = %published.url, "report published");

    Ok(Html(success_page(
        &published,
        state.drive_folder_id.as_deref(),
    )))
}

fn success_page(published: &PublishedSheet, folder_id: Option<&str>) -> String {
    let (href, label) = match folder_id {
        Some(folder_id) => (
            format!("https://drive.google.com/drive/folders/{folder_id}"),
            "Go to Destination Folder",
        ),
        None => (published.url.clone(), "Open Spreadsheet"),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Output Generated</title>
</head>
<body>
  <h1>Output Generated!</h1>
  <p>Your output file has been successfully generated.</p>
  <p>File Name: <strong>{title}</strong></p>
  <p><a href="{href}" target="_blank">{label}</a></p>
  <p><a href="/">Upload Files Again</a></p>
</body>
</html>
"#,
        title = published.title,
    )
}
