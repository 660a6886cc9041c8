use crate::config::PublishConfig;
use crate::core::pipeline::PublishPipeline;
use crate::core::reader::RecordSource;
use crate::domain::model::RunReport;
use crate::domain::ports::{Broker, MessageGenerator, Operator};
use crate::utils::error::{FeedError, Result};
use std::path::PathBuf;

/// Owns the validated configuration, the source path and the generator for one run.
pub struct PublishEngine<G: MessageGenerator> {
    config: PublishConfig,
    source: PathBuf,
    generator: G,
}

impl<G: MessageGenerator> PublishEngine<G> {
    /// Fails when the generator was written for a different work mode.
    pub fn new(config: PublishConfig, source: impl Into<PathBuf>, generator: G) -> Result<Self> {
        if generator.work_mode() != config.work_mode {
            return Err(FeedError::WorkModeMismatch {
                expected: config.work_mode.clone(),
                found: generator.work_mode().to_string(),
            });
        }

        Ok(Self {
            config,
            source: source.into(),
            generator,
        })
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub fn source(&self) -> &std::path::Path {
        &self.source
    }

    /// Runs the pipeline over the source file with an already connected broker.
    ///
    /// The broker is closed before returning, including when the source cannot be opened.
    pub async fn run<B: Broker, O: Operator>(self, mut broker: B, operator: O) -> Result<RunReport> {
        tracing::info!("🚀 Publishing {} to exchange '{}'", self.source.display(), self.config.exchange);

        let source = match RecordSource::open(&self.source, self.config.reader_mode()) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("❌ Cannot open source {}: {}", self.source.display(), e);
                if let Err(close_err) = broker.close().await {
                    tracing::warn!("⚠️ Broker teardown failed: {}", close_err);
                }
                return Err(e);
            }
        };
        tracing::debug!("Reader mode: {:?}", source.mode());

        let label = self.source.display().to_string();
        PublishPipeline::new(&self.config, label, self.generator, broker, operator)
            .run(source)
            .await
    }
}
