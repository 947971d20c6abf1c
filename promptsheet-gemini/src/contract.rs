use promptsheet_core::ModelError;
use serde_json::Value;

/// How much of an offending structure makes it into diagnostics.
const DUMP_LIMIT: usize = 200;

/// Walk the generate-content response envelope and pull out the first
/// candidate's text, naming the first missing link on failure.
///
/// The expected nesting is `candidates[0].content.parts[0].text`; any
/// deviation is a [`ModelError::MalformedResponse`] carrying the absent
/// path and a truncated dump of the structure it was missing from.
pub fn extract_text(payload: &Value) -> Result<String, ModelError> {
    let candidates = payload
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("candidates", payload))?;
    let candidate = candidates
        .first()
        .ok_or_else(|| malformed("candidates[0]", payload))?;
    let content = candidate
        .get("content")
        .ok_or_else(|| malformed("candidates[0].content", candidate))?;
    let parts = content
        .get("parts")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("candidates[0].content.parts", content))?;
    let part = parts
        .first()
        .ok_or_else(|| malformed("candidates[0].content.parts[0]", content))?;
    let text = part
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("candidates[0].content.parts[0].text", part))?;
    Ok(text.to_string())
}

fn malformed(path: &str, found: &Value) -> ModelError {
    ModelError::MalformedResponse(format!(
        "missing {path} in {}",
        truncate(&found.to_string(), DUMP_LIMIT)
    ))
}

/// Char-boundary-safe prefix for logs and fallback comments.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
