use crate::model::{Evaluation, ProviderKind};

/// Outcome of one generation call, as it lands in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generation {
    /// Extracted model text, unchanged.
    Text(String),
    /// Generation failed; the reason renders as a bracketed cell value.
    Failed(String),
    /// Provider slot reserved but not implemented; renders empty.
    NotRun,
}

impl Generation {
    fn render(&self) -> String {
        match self {
            Generation::Text(text) => text.clone(),
            Generation::Failed(reason) => format!("[{reason}]"),
            Generation::NotRun => String::new(),
        }
    }
}

/// One provider's contribution to a row: output plus its evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderCells {
    pub generation: Generation,
    pub evaluation: Evaluation,
}

/// One topic's worth of results across every provider slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub topic: String,
    pub cells: Vec<ProviderCells>,
}

/// Header + rows for one pipeline run. Built once per request, handed to
/// the sink, then dropped; nothing is persisted locally.
#[derive(Debug, Default)]
pub struct ReportTable {
    rows: Vec<OutputRow>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed header row; column order never varies.
    pub fn header() -> Vec<String> {
        let mut header = vec!["Topic".to_string()];
        for kind in ProviderKind::ALL {
            header.push(kind.label().to_string());
            header.push(format!("Gemini_comment_{}", kind.key()));
            header.push(format!("Gemini_rate_{}", kind.key()));
        }
        header
    }

    pub fn column_count() -> usize {
        1 + ProviderKind::ALL.len() * 3
    }

    pub fn push(&mut self, row: OutputRow) {
        debug_assert_eq!(row.cells.len(), ProviderKind::ALL.len());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render header + rows as the 2-D string grid the sink writes.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(Self::header());
        for row in &self.rows {
            let mut cells = Vec::with_capacity(Self::column_count());
            cells.push(row.topic.clone());
            for provider in &row.cells {
                cells.push(provider.generation.render());
                cells.push(provider.evaluation.comment.clone());
                cells.push(provider.evaluation.rating.clone());
            }
            grid.push(cells);
        }
        grid
    }
}
