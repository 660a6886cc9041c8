use crate::domain::model::ConfirmationOutcome;
use crate::domain::ports::{Broker, Operator};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Acknowledges every body without sending it anywhere.
#[derive(Debug)]
pub struct DryRunBroker {
    next_delivery_tag: u64,
}

impl DryRunBroker {
    pub fn new() -> Self {
        Self {
            next_delivery_tag: 1,
        }
    }

    pub fn delivered(&self) -> u64 {
        self.next_delivery_tag - 1
    }
}

impl Default for DryRunBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broker for DryRunBroker {
    async fn publish(&mut self, body: &[u8]) -> Result<ConfirmationOutcome> {
        let delivery_tag = self.next_delivery_tag;
        self.next_delivery_tag += 1;
        tracing::debug!("[dry-run] #{} {}", delivery_tag, String::from_utf8_lossy(body));
        Ok(ConfirmationOutcome::Ack { delivery_tag })
    }

    async fn close(&mut self) -> Result<()> {
        tracing::info!("🔍 Dry run finished, {} messages prepared", self.delivered());
        Ok(())
    }
}

/// Logs the preview and answers yes.
#[derive(Debug, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Operator for AutoConfirm {
    async fn ask(&mut self, preview: &str, _question: &str) -> Result<String> {
        tracing::info!("🔍 First message preview:\n{}", preview);
        Ok("Y".to_string())
    }
}
