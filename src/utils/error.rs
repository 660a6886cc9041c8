use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Broker error: {0}")]
    AmqpError(#[from] lapin::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Work mode mismatch: expected '{expected}', found '{found}'")]
    WorkModeMismatch { expected: String, found: String },

    #[error("Record too short: {len} fields, need more than {min_len}: {record:?}")]
    RecordTooShort {
        len: usize,
        min_len: usize,
        record: Vec<String>,
    },

    #[error("Message generation failed at index {index}: {message}")]
    GenerateError { index: usize, message: String },

    #[error("Broker rejected delivery {delivery_tag}")]
    NegativeAcknowledgement { delivery_tag: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Connection,
    Source,
    Transform,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FeedError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FeedError::ConfigError { .. }
            | FeedError::ConfigValidationError { .. }
            | FeedError::InvalidConfigValueError { .. }
            | FeedError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FeedError::AmqpError(_) => ErrorCategory::Connection,
            FeedError::CsvError(_)
            | FeedError::WorkModeMismatch { .. }
            | FeedError::RecordTooShort { .. } => ErrorCategory::Source,
            FeedError::GenerateError { .. } | FeedError::SerializationError(_) => {
                ErrorCategory::Transform
            }
            FeedError::NegativeAcknowledgement { .. } => ErrorCategory::Delivery,
            FeedError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Transform => ErrorSeverity::Low,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Source => ErrorSeverity::High,
            ErrorCategory::Connection | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FeedError::AmqpError(_) => {
                "Check that the broker is reachable and the amqp URI credentials are correct"
                    .to_string()
            }
            FeedError::CsvError(_) => {
                "Fix the malformed row (unbalanced quotes or inconsistent field count)".to_string()
            }
            FeedError::IoError(_) => "Check that the file exists and is readable".to_string(),
            FeedError::SerializationError(_) => {
                "Check the generated message for values that cannot be encoded as JSON".to_string()
            }
            FeedError::ConfigError { .. } | FeedError::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            FeedError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration file", field)
            }
            FeedError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            FeedError::WorkModeMismatch { expected, .. } => format!(
                "Make sure workMode and every record's first field are '{}'",
                expected
            ),
            FeedError::RecordTooShort { min_len, .. } => format!(
                "Every record needs more than {} fields; check the delimiter and recordLen",
                min_len
            ),
            FeedError::GenerateError { .. } => {
                "Inspect the skipped record; the rest of the source is still published".to_string()
            }
            FeedError::NegativeAcknowledgement { .. } => {
                "Check the broker logs for the rejected delivery before re-sending".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Connection => format!("Could not talk to the broker: {}", self),
            ErrorCategory::Source => format!("Source file rejected: {}", self),
            ErrorCategory::Transform => format!("Record could not be converted: {}", self),
            ErrorCategory::Delivery => format!("Delivery failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_source_errors_are_fatal() {
        let err = FeedError::WorkModeMismatch {
            expected: "A".to_string(),
            found: "B".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Source);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn test_generate_error_is_low_severity() {
        let err = FeedError::GenerateError {
            index: 3,
            message: "bad field".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Transform);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_record_too_short_mentions_record() {
        let err = FeedError::RecordTooShort {
            len: 1,
            min_len: 2,
            record: vec!["A".to_string()],
        };
        assert!(err.to_string().contains("[\"A\"]"));
        assert!(err.recovery_suggestion().contains("more than 2"));
    }
}
