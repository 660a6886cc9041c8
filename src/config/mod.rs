#[cfg(feature = "cli")]
pub mod cli;
pub mod publish_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use publish_config::PublishConfig;
