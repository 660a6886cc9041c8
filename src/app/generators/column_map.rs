use crate::domain::model::RawRecord;
use crate::domain::ports::MessageGenerator;
use crate::utils::error::{FeedError, Result};
use serde_json::{Map, Value};

/// Builds a JSON object that names each field after the configured column.
#[derive(Debug, Clone)]
pub struct ColumnMapGenerator {
    work_mode: String,
    columns: Vec<String>,
}

impl ColumnMapGenerator {
    pub fn new(work_mode: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            work_mode: work_mode.into(),
            columns,
        }
    }
}

impl MessageGenerator for ColumnMapGenerator {
    type Message = Map<String, Value>;

    fn work_mode(&self) -> &str {
        &self.work_mode
    }

    fn generate(&self, index: usize, record: &RawRecord) -> Result<Self::Message> {
        if record.fields.len() < self.columns.len() {
            return Err(FeedError::GenerateError {
                index,
                message: format!(
                    "expected {} columns, record has {}",
                    self.columns.len(),
                    record.fields.len()
                ),
            });
        }

        if record.fields.len() > self.columns.len() {
            tracing::debug!(
                "Record {} has {} unnamed trailing fields",
                index,
                record.fields.len() - self.columns.len()
            );
        }

        Ok(self
            .columns
            .iter()
            .zip(&record.fields)
            .map(|(column, field)| (column.clone(), Value::String(field.clone())))
            .collect())
    }
}
