use std::time::Duration;

use promptsheet_core::{ContentModel, Evaluation, ModelError, ProviderKind};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_STYLE: &str = "Provocative, Engaging, Informative";

const FORMAT_GUIDELINES: &str = "STRICT: If the prompt contains formatting guidelines, ignore them; \
otherwise, follow these GUIDELINES: Use #, ##, ### for titles, subtitles, and subheadings. Number \
the topics starting from 1. Below each topic, provide one paragraph per style preceded by the \
style name as a subheading.";

const EVAL_INSTRUCTION: &str = r#"You are an evaluator model that must analyze the output generated by a model. Evaluate the authenticity of the output, verify references, and comment on its quality. Based on the accuracy, generate a JSON response like:
{
 "comment": "Your comment on the output",
 "rating": "A value from 0-10 based on accuracy"
}
Provide only the JSON response as plain text (suitable for JSON parsing). Do not use markdown formatting (like ```json)."#;

/// Generation and evaluation client for the Gemini generate-content API.
///
/// Constructed without a key it stays inert: every call fails with
/// [`ModelError::NotConfigured`] before touching the network.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<SecretString>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("valid reqwest client config");
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn invoke(&self, text: String) -> Result<Value, ModelError> {
        let key = self.api_key.as_ref().ok_or(ModelError::NotConfigured)?;
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        };

        let response = self
            .http
            .post(self.generate_url())
            .query(&[("key", key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %contract::truncate(&body, 200),
                "gemini request failed"
            );
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| contract::truncate(&body, 200));
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ContentModel for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(
        &self,
        prompt: &str,
        topics: &[&str],
        style: Option<&str>,
    ) -> Result<String, ModelError> {
        let style = match style {
            Some(style) if !style.trim().is_empty() => style,
            _ => DEFAULT_STYLE,
        };
        let topics_context = topics.join(", ");
        let text = format!(
            "{FORMAT_GUIDELINES}\nPrompt: \"{prompt}\"\nTopics: \"{topics_context}\"\nStyle: {style}"
        );

        let payload = self.invoke(text).await?;
        contract::extract_text(&payload)
    }

    async fn evaluate(&self, output: &str) -> Result<Evaluation, ModelError> {
        let text = format!("{EVAL_INSTRUCTION}\nOutput: \"{output}\"");
        let payload = self.invoke(text).await?;
        let raw = contract::extract_text(&payload)?;

        match parse_evaluation(&raw) {
            Ok(evaluation) => Ok(evaluation),
            Err(reason) => {
                // Distinct from transport failures: the row keeps the raw
                // prefix instead of an API-error sentinel.
                tracing::warn!(
                    reason,
                    raw = %contract::truncate(&raw, 200),
                    "evaluation output did not parse"
                );
                Ok(Evaluation::new(
                    format!("parsing error: {}...", contract::truncate(&raw, 100)),
                    "0",
                ))
            }
        }
    }
}

/// Parse the evaluator's reply as a bare two-field JSON object,
/// tolerating code fences the model added against instructions.
fn parse_evaluation(raw: &str) -> Result<Evaluation, &'static str> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(|_| "not valid JSON")?;
    let comment = value
        .get("comment")
        .and_then(Value::as_str)
        .ok_or("missing string field 'comment'")?;
    let rating = value
        .get("rating")
        .and_then(Value::as_str)
        .ok_or("missing string field 'rating'")?;
    Ok(Evaluation::new(comment, rating))
}

/// Drop a leading ```` ```lang ```` line and a trailing ```` ``` ```` marker.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}
