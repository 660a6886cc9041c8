use crate::domain::model::ConfirmationOutcome;
use crate::domain::ports::Broker;
use crate::utils::error::Result;
use serde::Serialize;
use std::borrow::Cow;

const ESCAPED_AMPERSAND: &str = "\\u0026";

/// Serializes a message to the JSON body sent to the broker.
pub fn encode_body<M: Serialize>(message: &M) -> Result<Vec<u8>> {
    let json = serde_json::to_string(message)?;
    Ok(unescape_ampersand(&json).into_owned().into_bytes())
}

/// Turns `\u0026` escapes back into `&`.
///
/// Works on escape pairs so an escaped backslash followed by `u0026` text is
/// left alone.
pub fn unescape_ampersand(json: &str) -> Cow<'_, str> {
    if !json.contains(ESCAPED_AMPERSAND) {
        return Cow::Borrowed(json);
    }

    let mut out = String::with_capacity(json.len());
    let mut rest = json;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with(ESCAPED_AMPERSAND) {
            out.push('&');
            rest = &tail[ESCAPED_AMPERSAND.len()..];
        } else {
            let end = tail
                .char_indices()
                .nth(1)
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(tail.len());
            out.push_str(&tail[..end]);
            rest = &tail[end..];
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Publishes one body at a time and waits for its confirmation.
pub struct ConfirmedPublisher<B: Broker> {
    broker: B,
}

impl<B: Broker> ConfirmedPublisher<B> {
    pub fn new(broker: B) -> Self {
        Self { broker }
    }

    pub async fn send(&mut self, body: &[u8]) -> Result<ConfirmationOutcome> {
        let outcome = self.broker.publish(body).await?;

        match outcome {
            ConfirmationOutcome::Ack { delivery_tag } => {
                tracing::info!("✅ confirmed delivery with delivery tag: {}", delivery_tag);
            }
            ConfirmationOutcome::Nack { delivery_tag } => {
                tracing::error!("❌ failed delivery of delivery tag: {}", delivery_tag);
            }
        }

        Ok(outcome)
    }

    pub async fn close(&mut self) -> Result<()> {
        self.broker.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_ampersand_survives_encoding() {
        let body = encode_body(&json!({"q": "a&b"})).unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), r#"{"q":"a&b"}"#);
    }

    #[test]
    fn test_unescape_html_escaped_ampersand() {
        assert_eq!(unescape_ampersand(r#"{"q":"a\u0026b"}"#), r#"{"q":"a&b"}"#);
        assert_eq!(
            unescape_ampersand(r#"["\u0026\u0026","x\u0026"]"#),
            r#"["&&","x&"]"#
        );
    }

    #[test]
    fn test_escaped_backslash_is_not_mistaken_for_escape() {
        let input = r#"{"path":"C:\\u0026dir","other":"\n"}"#;
        assert_eq!(unescape_ampersand(input), input);

        let value: serde_json::Value = serde_json::from_str(&unescape_ampersand(input)).unwrap();
        assert_eq!(value["path"], "C:\\u0026dir");
    }

    #[test]
    fn test_unescape_without_escapes_borrows() {
        assert!(matches!(unescape_ampersand(r#"{"a":1}"#), Cow::Borrowed(_)));
    }
}
