use crate::report::ReportTable;
use crate::SinkError;

/// Location of a published report.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PublishedSheet {
    pub spreadsheet_id: String,
    pub url: String,
    pub title: String,
}

/// Destination for a finished [`ReportTable`].
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, table: &ReportTable) -> Result<PublishedSheet, SinkError>;
}
