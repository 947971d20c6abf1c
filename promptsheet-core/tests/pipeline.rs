use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use promptsheet_core::{
    model_set, ContentModel, Evaluation, Generation, ModelError, Pipeline, ProviderKind,
    ReportTable, TopicList,
};

/// Scripted provider that records how often each operation runs.
struct ScriptedModel {
    generate_result: Box<dyn Fn() -> Result<String, ModelError> + Send + Sync>,
    generate_calls: AtomicUsize,
    evaluate_calls: AtomicUsize,
}

impl ScriptedModel {
    fn ok(text: &'static str) -> Self {
        Self::new(Box::new(move || Ok(text.to_string())))
    }

    fn failing(err: fn() -> ModelError) -> Self {
        Self::new(Box::new(move || Err(err())))
    }

    fn new(generate_result: Box<dyn Fn() -> Result<String, ModelError> + Send + Sync>) -> Self {
        Self {
            generate_result,
            generate_calls: AtomicUsize::new(0),
            evaluate_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl ContentModel for ScriptedModel {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(
        &self,
        _prompt: &str,
        topics: &[&str],
        _style: Option<&str>,
    ) -> Result<String, ModelError> {
        assert_eq!(topics.len(), 1, "pipeline must pass singleton topic lists");
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        (self.generate_result)()
    }

    async fn evaluate(&self, _output: &str) -> Result<Evaluation, ModelError> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Evaluation::new("plausible", "8"))
    }
}

fn topics(raw: &str) -> TopicList {
    TopicList::parse(raw).unwrap()
}

#[tokio::test]
async fn produces_one_row_per_topic_with_fixed_width() {
    let model = Arc::new(ScriptedModel::ok("generated"));
    let pipeline = Pipeline::new(model_set(model.clone()));

    let table = pipeline.run("Explain {X}", &topics("Budgeting\n\nSaving\n")).await;

    assert_eq!(table.row_count(), 2);
    let grid = table.to_grid();
    assert_eq!(grid.len(), 3);
    for row in &grid {
        assert_eq!(row.len(), ReportTable::column_count());
    }
    assert_eq!(model.generate_calls.load(Ordering::SeqCst), 2);
    assert_eq!(model.evaluate_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unconfigured_provider_fills_sentinel_cells_without_evaluation() {
    let model = Arc::new(ScriptedModel::failing(|| ModelError::NotConfigured));
    let pipeline = Pipeline::new(model_set(model.clone()));

    let table = pipeline.run("p", &topics("a\nb\nc\n")).await;

    let grid = table.to_grid();
    for row in &grid[1..] {
        assert_eq!(row[1], "[not configured]");
        assert_eq!(row[2], "skipped: invalid input");
        assert_eq!(row[3], "0");
    }
    assert_eq!(model.evaluate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transport_failure_also_suppresses_evaluation() {
    let model = Arc::new(ScriptedModel::failing(|| {
        ModelError::Transport("connection reset".to_string())
    }));
    let pipeline = Pipeline::new(model_set(model.clone()));

    let table = pipeline.run("p", &topics("a\n")).await;

    assert_eq!(model.evaluate_calls.load(Ordering::SeqCst), 0);
    let row = &table.rows()[0];
    assert!(matches!(row.cells[0].generation, Generation::Failed(_)));
    assert_eq!(row.cells[0].evaluation.rating, "0");
    // The transport detail stays in the logs; the cell keeps a generic
    // reason.
    assert_eq!(table.to_grid()[1][1], "[API call failed]");
}

#[tokio::test]
async fn unimplemented_providers_contribute_empty_triples() {
    let model = Arc::new(ScriptedModel::ok("generated"));
    let pipeline = Pipeline::new(model_set(model));

    let table = pipeline.run("p", &topics("a\n")).await;

    let row = &table.rows()[0];
    for cells in &row.cells[1..] {
        assert_eq!(cells.generation, Generation::NotRun);
        assert_eq!(cells.evaluation, Evaluation::empty());
    }
    let grid = table.to_grid();
    assert_eq!(&grid[1][4..], &["", "", "", "", "", "", "", "", ""]);
}

#[tokio::test]
async fn evaluation_api_failure_folds_into_rating_zero() {
    struct EvalFails;

    #[async_trait::async_trait]
    impl ContentModel for EvalFails {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        async fn generate(
            &self,
            _prompt: &str,
            _topics: &[&str],
            _style: Option<&str>,
        ) -> Result<String, ModelError> {
            Ok("text".to_string())
        }

        async fn evaluate(&self, _output: &str) -> Result<Evaluation, ModelError> {
            Err(ModelError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    let pipeline = Pipeline::new(model_set(Arc::new(EvalFails)));
    let table = pipeline.run("p", &topics("a\n")).await;

    let evaluation = &table.rows()[0].cells[0].evaluation;
    assert_eq!(evaluation.comment, "[API Error: 503]");
    assert_eq!(evaluation.rating, "0");
}
