use crate::domain::model::{NackPolicy, ReaderMode, DEFAULT_DELIMITER};
use crate::utils::error::{FeedError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConfig {
    pub amqp: String,
    pub exchange_type: String,
    pub exchange: String,
    pub work_mode: String,
    #[serde(default)]
    pub priority: u8,
    pub delim: Option<String>,
    pub record_len: Option<usize>,
    pub nack_policy: Option<NackPolicy>,
    /// Field names for the column-map generator.
    pub columns: Option<Vec<String>>,
}

impl PublishConfig {
    /// Loads a JSON config, or TOML when the file ends in `.toml`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(FeedError::IoError)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        serde_json::from_str(&processed_content).map_err(|e| FeedError::ConfigValidationError {
            field: "json_parsing".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FeedError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FeedError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_amqp_url("amqp", &self.amqp)?;
        validation::validate_non_empty_string("exchange", &self.exchange)?;
        validation::validate_non_empty_string("exchangeType", &self.exchange_type)?;
        validation::validate_non_empty_string("workMode", &self.work_mode)?;
        validation::validate_range("priority", self.priority, 0, 9)?;

        if let Some(delim) = self.delim.as_deref().filter(|d| !d.is_empty()) {
            validation::validate_single_char("delim", delim)?;
        }

        if let Some(columns) = &self.columns {
            if columns.is_empty() {
                return Err(FeedError::InvalidConfigValueError {
                    field: "columns".to_string(),
                    value: "[]".to_string(),
                    reason: "Column list cannot be empty; remove the key instead".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Configured delimiter, `,` when unset or empty.
    pub fn delimiter(&self) -> char {
        self.delim
            .as_deref()
            .and_then(|d| d.chars().next())
            .unwrap_or(DEFAULT_DELIMITER)
    }

    /// Records must have more fields than this.
    pub fn record_len(&self) -> usize {
        self.record_len.unwrap_or(0)
    }

    pub fn nack_policy(&self) -> NackPolicy {
        self.nack_policy.unwrap_or_default()
    }

    pub fn reader_mode(&self) -> ReaderMode {
        ReaderMode::for_delimiter(self.delimiter())
    }
}

impl Validate for PublishConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
