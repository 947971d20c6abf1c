use std::sync::Arc;

use crate::model::{ContentModel, Evaluation};
use crate::report::{Generation, OutputRow, ProviderCells, ReportTable};
use crate::topics::TopicList;
use crate::ModelError;

/// Sequential per-topic orchestrator.
///
/// Topics run one at a time; within a topic, generation and evaluation run
/// back to back per provider. No retries and no batching; a failed call
/// produces a sentinel cell, never an aborted run.
pub struct Pipeline {
    models: Vec<Arc<dyn ContentModel>>,
}

impl Pipeline {
    pub fn new(models: Vec<Arc<dyn ContentModel>>) -> Self {
        Self { models }
    }

    pub async fn run(&self, prompt: &str, topics: &TopicList) -> ReportTable {
        let mut table = ReportTable::new();
        tracing::info!(topics = topics.len(), "processing topics");

        for topic in topics.iter() {
            tracing::debug!(topic, "processing topic");
            let mut cells = Vec::with_capacity(self.models.len());
            for model in &self.models {
                cells.push(self.run_provider(model.as_ref(), prompt, topic).await);
            }
            table.push(OutputRow {
                topic: topic.to_string(),
                cells,
            });
        }

        table
    }

    async fn run_provider(
        &self,
        model: &dyn ContentModel,
        prompt: &str,
        topic: &str,
    ) -> ProviderCells {
        let provider = model.kind().label();

        let text = match model.generate(prompt, &[topic], None).await {
            Ok(text) => text,
            Err(ModelError::NotImplemented) => {
                return ProviderCells {
                    generation: Generation::NotRun,
                    evaluation: Evaluation::empty(),
                };
            }
            Err(err) => {
                tracing::warn!(topic, provider, stage = "generate", error = %err, "generation failed");
                return ProviderCells {
                    generation: Generation::Failed(err.public_reason()),
                    // Judging failed output is meaningless; no evaluate
                    // call is made.
                    evaluation: Evaluation::skipped_invalid_input(),
                };
            }
        };

        let evaluation = match model.evaluate(&text).await {
            Ok(evaluation) => evaluation,
            Err(err) => {
                tracing::warn!(topic, provider, stage = "evaluate", error = %err, "evaluation failed");
                Evaluation::from_model_error(&err)
            }
        };

        ProviderCells {
            generation: Generation::Text(text),
            evaluation,
        }
    }
}
