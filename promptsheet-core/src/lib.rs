mod error;
mod model;
mod pipeline;
mod report;
mod sink;
mod topics;

pub use error::{ModelError, PipelineError, SinkError};
pub use model::{model_set, ContentModel, Evaluation, ProviderKind, UnimplementedModel};
pub use pipeline::Pipeline;
pub use report::{Generation, OutputRow, ProviderCells, ReportTable};
pub use sink::{PublishedSheet, ReportSink};
pub use topics::TopicList;
