use std::sync::Arc;
use std::time::Duration;

use promptsheet_core::SinkError;
use reqwest::{Client, Method};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::auth::TokenProvider;

/// Bearer-authenticated JSON client shared by the sheets and drive calls.
pub(crate) struct SheetsHttpClient {
    http: Client,
    token: Arc<dyn TokenProvider>,
}

impl SheetsHttpClient {
    pub fn new(token: Arc<dyn TokenProvider>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("valid reqwest client config");
        Self { http, token }
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, SinkError> {
        let token = self.token.access_token().await?;
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret())
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|err| SinkError::Malformed(err.to_string()));
        }

        let body: Value = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::String(String::new()));
        let message = body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown sheets/drive error")
            .to_string();
        tracing::error!(status = status.as_u16(), %message, "sheets/drive call failed");

        Err(SinkError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
