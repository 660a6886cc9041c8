pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::PublishConfig;

pub use crate::core::{engine::PublishEngine, pipeline::PublishPipeline};
pub use domain::ports::{Broker, MessageGenerator, Operator};
pub use utils::error::{FeedError, Result};
