use std::sync::Arc;

use crate::ModelError;

/// The four provider slots every report carries, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Perplexity,
    Claude,
    ChatGpt,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Gemini,
        ProviderKind::Perplexity,
        ProviderKind::Claude,
        ProviderKind::ChatGpt,
    ];

    /// Column label as it appears in the report header.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Perplexity => "Perplexity",
            ProviderKind::Claude => "Claude",
            ProviderKind::ChatGpt => "ChatGPT",
        }
    }

    /// Lowercase key used in the evaluator comment/rating column names.
    pub fn key(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Claude => "claude",
            ProviderKind::ChatGpt => "chatgpt",
        }
    }
}

/// Normalized judgment of one generated output.
///
/// `rating` stays a string so whatever the upstream model returned is
/// preserved verbatim; failed or skipped evaluations carry rating `"0"`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Evaluation {
    pub comment: String,
    pub rating: String,
}

impl Evaluation {
    pub fn new(comment: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            rating: rating.into(),
        }
    }

    /// Placeholder cells for a provider that was never run.
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Evaluation suppressed because generation already failed.
    pub fn skipped_invalid_input() -> Self {
        Self::new("skipped: invalid input", "0")
    }

    /// Fold an evaluate-call failure into reason-bearing cells.
    pub fn from_model_error(err: &ModelError) -> Self {
        let comment = match err {
            ModelError::NotConfigured => "not configured".to_string(),
            ModelError::NotImplemented => String::new(),
            ModelError::Api { status, .. } => format!("[API Error: {status}]"),
            ModelError::Transport(_) => "[API Call Failed]".to_string(),
            ModelError::MalformedResponse(_) => {
                "[API Error: unexpected response structure]".to_string()
            }
        };
        Self::new(comment, "0")
    }
}

/// A provider that can produce content for topics and judge prior output.
#[async_trait::async_trait]
pub trait ContentModel: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Produce content for `topics` under `prompt`. Implementations that
    /// are not configured must fail without touching the network.
    async fn generate(
        &self,
        prompt: &str,
        topics: &[&str],
        style: Option<&str>,
    ) -> Result<String, ModelError>;

    /// Judge previously generated output. Callers are expected to skip
    /// this entirely when generation already failed.
    async fn evaluate(&self, output: &str) -> Result<Evaluation, ModelError>;
}

/// Reserved provider slot with no implementation behind it.
///
/// Invoking it returns [`ModelError::NotImplemented`] instead of faulting,
/// and the pipeline renders that as empty cells.
pub struct UnimplementedModel {
    kind: ProviderKind,
}

impl UnimplementedModel {
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind }
    }
}

#[async_trait::async_trait]
impl ContentModel for UnimplementedModel {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate(
        &self,
        _prompt: &str,
        _topics: &[&str],
        _style: Option<&str>,
    ) -> Result<String, ModelError> {
        Err(ModelError::NotImplemented)
    }

    async fn evaluate(&self, _output: &str) -> Result<Evaluation, ModelError> {
        Err(ModelError::NotImplemented)
    }
}

/// Build the closed provider set in column order around the one
/// implemented provider.
pub fn model_set(primary: Arc<dyn ContentModel>) -> Vec<Arc<dyn ContentModel>> {
    let mut models: Vec<Arc<dyn ContentModel>> = Vec::with_capacity(ProviderKind::ALL.len());
    for kind in ProviderKind::ALL {
        if kind == primary.kind() {
            models.push(primary.clone());
        } else {
            models.push(Arc::new(UnimplementedModel::new(kind)));
        }
    }
    models
}
