use crate::domain::model::RawRecord;
use crate::domain::ports::MessageGenerator;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldListMessage {
    pub index: usize,
    pub work_mode: String,
    pub fields: Vec<String>,
}

/// Wraps the record's fields as-is, tagged with the index and work mode.
#[derive(Debug, Clone)]
pub struct FieldListGenerator {
    work_mode: String,
}

impl FieldListGenerator {
    pub fn new(work_mode: impl Into<String>) -> Self {
        Self {
            work_mode: work_mode.into(),
        }
    }
}

impl MessageGenerator for FieldListGenerator {
    type Message = FieldListMessage;

    fn work_mode(&self) -> &str {
        &self.work_mode
    }

    fn generate(&self, index: usize, record: &RawRecord) -> Result<FieldListMessage> {
        Ok(FieldListMessage {
            index,
            work_mode: self.work_mode.clone(),
            fields: record.fields.clone(),
        })
    }
}
