use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "csv2mq")]
#[command(about = "Publish the records of a delimited file to an AMQP exchange")]
pub struct CliConfig {
    /// Path to the JSON (or .toml) configuration file
    #[arg(long)]
    pub cfg: String,

    /// Path to the source file
    #[arg(long)]
    pub src: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    /// Read, filter and convert the whole source without touching the broker
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Parses the process arguments, accepting the single-dash `-cfg` and `-src` forms.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args()))
    }
}

/// Rewrites `-cfg`/`-src` (and their `=value` forms) to the double-dash spelling.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            for flag in ["-cfg", "-src"] {
                if arg == flag || arg.starts_with(&format!("{}=", flag)) {
                    return format!("-{}", arg);
                }
            }
            arg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_dash_flags_are_accepted() {
        let normalized = normalize_args(args(&["csv2mq", "-cfg", "c.json", "-src=data.txt"]));
        assert_eq!(normalized, args(&["csv2mq", "--cfg", "c.json", "--src=data.txt"]));

        let config = CliConfig::parse_from(normalized);
        assert_eq!(config.cfg, "c.json");
        assert_eq!(config.src, "data.txt");
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_src_is_rejected() {
        let result = CliConfig::try_parse_from(args(&["csv2mq", "--cfg", "c.json"]));
        assert!(result.is_err());
    }
}
