use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use promptsheet_core::{PipelineError, SinkError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Please upload both prompt and topics files.")]
    MissingUpload,

    #[error("could not read upload: {0}")]
    BadUpload(String),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Server configuration error: spreadsheet access is not configured.")]
    SinkNotConfigured,

    #[error("{0}")]
    Sink(#[from] SinkError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUpload | ApiError::BadUpload(_) | ApiError::Pipeline(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::SinkNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            // Mirror the remote status when the sink carried one.
            ApiError::Sink(err) => err
                .status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let body = ErrorBody {
            message: self.to_string(),
        };
        (code, Json(body)).into_response()
    }
}
