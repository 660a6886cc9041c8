use crate::config::PublishConfig;
use crate::domain::model::{RawRecord, ReaderMode, Verdict, COMMENT_MARKER};
use crate::utils::error::{FeedError, Result};

/// Per-record checks applied before a record reaches the generator.
///
/// Lines whose first field starts with `!` are skipped in every mode. In raw
/// split mode a record must also have more than `min_len` fields and start
/// with the work mode tag; violations end the run. Strict CSV leaves shape
/// checks to the parser.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    work_mode: String,
    min_len: usize,
    structural: bool,
}

impl RecordFilter {
    /// Filter for raw split sources.
    pub fn new(work_mode: impl Into<String>, min_len: usize) -> Self {
        Self {
            work_mode: work_mode.into(),
            min_len,
            structural: true,
        }
    }

    /// Filter that only skips comment lines.
    pub fn comments_only() -> Self {
        Self {
            work_mode: String::new(),
            min_len: 0,
            structural: false,
        }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        match config.reader_mode() {
            ReaderMode::RawSplit(_) => Self::new(config.work_mode.clone(), config.record_len()),
            ReaderMode::Strict => Self::comments_only(),
        }
    }

    pub fn check(&self, record: &RawRecord) -> Result<Verdict> {
        if self.structural && record.fields.len() <= self.min_len {
            return Err(FeedError::RecordTooShort {
                len: record.fields.len(),
                min_len: self.min_len,
                record: record.fields.clone(),
            });
        }

        let first = record.first().unwrap_or_default();

        if first.starts_with(COMMENT_MARKER) {
            tracing::info!("⏭️ Skip {:?}", record.fields);
            return Ok(Verdict::Skip);
        }

        if self.structural && first != self.work_mode {
            return Err(FeedError::WorkModeMismatch {
                expected: self.work_mode.clone(),
                found: first.to_string(),
            });
        }

        Ok(Verdict::Accept)
    }
}
