use crate::PipelineError;

/// Ordered, non-empty list of topics parsed from an uploaded topics file.
///
/// Topics keep their input order and duplicates are preserved; only
/// surrounding whitespace and blank lines are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicList(Vec<String>);

impl TopicList {
    /// Split raw file content on `\r?\n`, trim each line, and drop blanks.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let topics: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if topics.is_empty() {
            return Err(PipelineError::EmptyTopicList);
        }
        Ok(Self(topics))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
