pub mod column_map;
pub mod field_list;

pub use column_map::ColumnMapGenerator;
pub use field_list::FieldListGenerator;

use crate::config::PublishConfig;
use crate::domain::model::RawRecord;
use crate::domain::ports::MessageGenerator;
use crate::utils::error::Result;
use serde_json::Value;

/// Generator chosen from configuration for the command-line tool.
#[derive(Debug, Clone)]
pub enum BuiltinGenerator {
    FieldList(FieldListGenerator),
    ColumnMap(ColumnMapGenerator),
}

impl BuiltinGenerator {
    /// Column map when `columns` is configured, field list otherwise.
    pub fn from_config(config: &PublishConfig) -> Self {
        match &config.columns {
            Some(columns) => BuiltinGenerator::ColumnMap(ColumnMapGenerator::new(
                config.work_mode.clone(),
                columns.clone(),
            )),
            None => BuiltinGenerator::FieldList(FieldListGenerator::new(config.work_mode.clone())),
        }
    }
}

impl MessageGenerator for BuiltinGenerator {
    type Message = Value;

    fn work_mode(&self) -> &str {
        match self {
            BuiltinGenerator::FieldList(g) => g.work_mode(),
            BuiltinGenerator::ColumnMap(g) => g.work_mode(),
        }
    }

    fn generate(&self, index: usize, record: &RawRecord) -> Result<Value> {
        match self {
            BuiltinGenerator::FieldList(g) => Ok(serde_json::to_value(g.generate(index, record)?)?),
            BuiltinGenerator::ColumnMap(g) => Ok(Value::Object(g.generate(index, record)?)),
        }
    }
}
