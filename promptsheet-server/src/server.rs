use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use promptsheet_core::{model_set, Pipeline, ReportSink};
use promptsheet_gemini::GeminiClient;
use promptsheet_sheets::{ServiceAccountAuth, ServiceAccountKey, SheetsPublisher};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// None when the credential blob was missing or invalid at startup;
    /// every upload then fails fast with a configuration error.
    pub sink: Option<Arc<dyn ReportSink>>,
    pub drive_folder_id: Option<String>,
}

/// Wire process-wide handles once at startup. A bad credential blob is an
/// error; an absent one only disables the sink.
pub fn build_state(config: &AppConfig) -> Result<AppState, promptsheet_core::SinkError> {
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; generation will report not configured");
    }

    let gemini = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    let pipeline = Arc::new(Pipeline::new(model_set(gemini)));

    let sink: Option<Arc<dyn ReportSink>> = match &config.service_account_blob {
        Some(blob) => {
            let key = ServiceAccountKey::from_json(blob)?;
            let auth = Arc::new(ServiceAccountAuth::new(key));
            let publisher =
                SheetsPublisher::new(auth).with_folder(config.drive_folder_id.clone());
            Some(Arc::new(publisher))
        }
        None => {
            tracing::error!(
                "GOOGLE_APPLICATION_CREDENTIALS not set; spreadsheet publishing disabled"
            );
            None
        }
    };

    Ok(AppState {
        pipeline,
        sink,
        drive_folder_id: config.drive_folder_id.clone(),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(state)).await
}
