use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use promptsheet_core::{PublishedSheet, ReportSink, ReportTable, SinkError};
use reqwest::Method;
use serde_json::{json, Value};

use crate::auth::TokenProvider;
use crate::client::SheetsHttpClient;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const DRIVE_BASE_URL: &str = "https://www.googleapis.com";
const SHEET_NAME: &str = "Output";

/// Publishes a report as a freshly created Google spreadsheet, optionally
/// relocated into a destination Drive folder.
pub struct SheetsPublisher {
    client: SheetsHttpClient,
    sheets_base_url: String,
    drive_base_url: String,
    folder_id: Option<String>,
}

impl SheetsPublisher {
    pub fn new(token: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: SheetsHttpClient::new(token),
            sheets_base_url: SHEETS_BASE_URL.to_string(),
            drive_base_url: DRIVE_BASE_URL.to_string(),
            folder_id: None,
        }
    }

    pub fn with_sheets_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.sheets_base_url = base_url.into();
        self
    }

    pub fn with_drive_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.drive_base_url = base_url.into();
        self
    }

    pub fn with_folder(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = folder_id;
        self
    }

    fn title_now() -> String {
        let stamp = Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("LLM_Output_{stamp}")
    }

    async fn create_spreadsheet(&self, title: &str) -> Result<String, SinkError> {
        let url = format!(
            "{}/v4/spreadsheets",
            self.sheets_base_url.trim_end_matches('/')
        );
        let body = json!({
            "properties": {"title": title},
            "sheets": [{"properties": {"title": SHEET_NAME}}]
        });
        let response = self
            .client
            .send(Method::POST, &url, &[], Some(&body))
            .await?;
        response
            .get("spreadsheetId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SinkError::Malformed("create response missing spreadsheetId".into()))
    }

    async fn write_grid(&self, spreadsheet_id: &str, grid: Vec<Vec<String>>) -> Result<(), SinkError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1",
            self.sheets_base_url.trim_end_matches('/'),
            spreadsheet_id,
            SHEET_NAME
        );
        // USER_ENTERED lets the remote coerce cell types, so a rating
        // like "7" lands as a number.
        self.client
            .send(
                Method::PUT,
                &url,
                &[("valueInputOption", "USER_ENTERED")],
                Some(&json!({"values": grid})),
            )
            .await?;
        Ok(())
    }

    /// The drive api has no atomic move: parents must be read first, then
    /// swapped in one update. The fetched parent list is transient state.
    async fn move_to_folder(&self, spreadsheet_id: &str, folder_id: &str) -> Result<(), SinkError> {
        let file_url = format!(
            "{}/drive/v3/files/{}",
            self.drive_base_url.trim_end_matches('/'),
            spreadsheet_id
        );
        let response = self
            .client
            .send(Method::GET, &file_url, &[("fields", "parents")], None)
            .await?;
        let parents: Vec<String> = response
            .get("parents")
            .and_then(Value::as_array)
            .map(|parents| {
                parents
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if parents.len() == 1 && parents[0] == folder_id {
            tracing::debug!(spreadsheet_id, folder_id, "already in destination folder");
            return Ok(());
        }

        let previous = parents.join(",");
        self.client
            .send(
                Method::PATCH,
                &file_url,
                &[
                    ("addParents", folder_id),
                    ("removeParents", previous.as_str()),
                    ("fields", "id,parents"),
                ],
                Some(&json!({})),
            )
            .await?;
        tracing::info!(spreadsheet_id, folder_id, "moved spreadsheet");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReportSink for SheetsPublisher {
    async fn publish(&self, table: &ReportTable) -> Result<PublishedSheet, SinkError> {
        let title = Self::title_now();
        let spreadsheet_id = self.create_spreadsheet(&title).await?;
        tracing::info!(%spreadsheet_id, %title, "created spreadsheet");

        self.write_grid(&spreadsheet_id, table.to_grid()).await?;

        if let Some(folder_id) = &self.folder_id {
            self.move_to_folder(&spreadsheet_id, folder_id).await?;
        }

        Ok(PublishedSheet {
            url: format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}"),
            spreadsheet_id,
            title,
        })
    }
}
