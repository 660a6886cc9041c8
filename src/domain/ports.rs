use crate::domain::model::{ConfirmationOutcome, RawRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Turns accepted records into messages. Each work mode has its own implementation.
pub trait MessageGenerator: Send + Sync {
    type Message: Serialize;

    fn work_mode(&self) -> &str;

    /// `index` is the position of the record among accepted records, starting at 0.
    fn generate(&self, index: usize, record: &RawRecord) -> Result<Self::Message>;
}

/// A broker channel in confirm mode.
///
/// `publish` takes `&mut self` so only one delivery can be in flight: it sends
/// the body and waits for the confirmation of that delivery before returning.
#[async_trait]
pub trait Broker: Send {
    async fn publish(&mut self, body: &[u8]) -> Result<ConfirmationOutcome>;

    async fn close(&mut self) -> Result<()>;
}

/// Whoever answers the go/no-go prompt.
#[async_trait]
pub trait Operator: Send {
    /// Shows `preview`, asks `question` and returns the raw answer line.
    async fn ask(&mut self, preview: &str, question: &str) -> Result<String>;
}
