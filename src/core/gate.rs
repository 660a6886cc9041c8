use crate::config::PublishConfig;
use crate::domain::model::RawRecord;
use crate::domain::ports::Operator;
use crate::utils::error::Result;
use serde::Serialize;

pub const CONFIRM_QUESTION: &str = "continue (Y/N): ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Declined,
}

/// Asks the operator once, before the first publish, whether to send the batch.
#[derive(Debug, Default)]
pub struct InteractiveGate {
    opened: bool,
}

impl InteractiveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the operator has confirmed; no further prompts are shown.
    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub async fn check<O: Operator>(&mut self, operator: &mut O, preview: &str) -> Result<GateDecision> {
        if self.opened {
            return Ok(GateDecision::Proceed);
        }

        let answer = operator.ask(preview, CONFIRM_QUESTION).await?;
        if is_affirmative(&answer) {
            tracing::info!("▶️ Start Sending");
            self.opened = true;
            Ok(GateDecision::Proceed)
        } else {
            tracing::warn!("⛔ Stop Sending (answer: {:?})", answer.trim_end());
            Ok(GateDecision::Declined)
        }
    }
}

/// Only an answer whose first character is `Y` counts. Empty input declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.starts_with('Y')
}

/// Re-renders a JSON body with four-space indentation.
pub fn pretty_json(body: &[u8]) -> Result<String> {
    let value: serde_json::Value = serde_json::from_slice(body)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn render_preview(
    config: &PublishConfig,
    source: &str,
    record: &RawRecord,
    body: &[u8],
) -> Result<String> {
    let mut preview = String::new();
    preview.push_str(&format!("mq : {}\n", config.amqp));
    preview.push_str(&format!("     {} , {}\n", config.exchange, config.exchange_type));
    preview.push_str(&format!("source : {}\n", source));
    preview.push_str(&format!("record : {:?}\n", record.fields));
    preview.push_str(&pretty_json(body)?);
    preview.push('\n');
    Ok(preview)
}
