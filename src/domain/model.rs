use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix marking a deactivated line in the source.
pub const COMMENT_MARKER: &str = "!";

/// Delimiter that selects the quote-aware CSV reader.
pub const DEFAULT_DELIMITER: char = ',';

/// One line (or CSV row) of the source, split into fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn first(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }
}

impl From<Vec<&str>> for RawRecord {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderMode {
    /// Quote-aware CSV parsing.
    Strict,
    /// Plain line splitting on every occurrence of the delimiter.
    RawSplit(char),
}

impl ReaderMode {
    pub fn for_delimiter(delimiter: char) -> Self {
        if delimiter == DEFAULT_DELIMITER {
            ReaderMode::Strict
        } else {
            ReaderMode::RawSplit(delimiter)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NackPolicy {
    /// Log the rejected delivery and keep publishing.
    #[default]
    Continue,
    /// End the run on the first rejected delivery.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Ack { delivery_tag: u64 },
    Nack { delivery_tag: u64 },
}

impl ConfirmationOutcome {
    pub fn is_ack(&self) -> bool {
        matches!(self, ConfirmationOutcome::Ack { .. })
    }

    pub fn delivery_tag(&self) -> u64 {
        match self {
            ConfirmationOutcome::Ack { delivery_tag } | ConfirmationOutcome::Nack { delivery_tag } => {
                *delivery_tag
            }
        }
    }
}

/// What the filter decided for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Source exhausted.
    Completed,
    /// Operator did not confirm the preview.
    Declined,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub termination: Termination,
    pub records_read: usize,
    pub accepted: usize,
    pub skipped_comments: usize,
    pub skipped_transform: usize,
    pub published: usize,
    pub acked: usize,
    pub nacked: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            termination: Termination::Completed,
            records_read: 0,
            accepted: 0,
            skipped_comments: 0,
            skipped_transform: 0,
            published: 0,
            acked: 0,
            nacked: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn finish(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self.finished_at = Utc::now();
        self
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
