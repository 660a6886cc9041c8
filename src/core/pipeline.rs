use crate::config::PublishConfig;
use crate::core::filter::RecordFilter;
use crate::core::gate::{render_preview, GateDecision, InteractiveGate};
use crate::core::publisher::{encode_body, ConfirmedPublisher};
use crate::core::reader::RecordSource;
use crate::domain::model::{NackPolicy, RunReport, Termination, Verdict};
use crate::domain::ports::{Broker, MessageGenerator, Operator};
use crate::utils::error::{FeedError, Result};
use std::io::Read;

/// Drives records from a source through filter, generator, gate and broker.
///
/// Records are handled strictly one after another: the next record is read
/// only after the previous delivery was confirmed. The broker is closed when
/// `run` returns, whatever the outcome.
pub struct PublishPipeline<'a, G, B, O>
where
    G: MessageGenerator,
    B: Broker,
    O: Operator,
{
    config: &'a PublishConfig,
    source_label: String,
    generator: G,
    publisher: ConfirmedPublisher<B>,
    operator: O,
    gate: InteractiveGate,
}

impl<'a, G, B, O> PublishPipeline<'a, G, B, O>
where
    G: MessageGenerator,
    B: Broker,
    O: Operator,
{
    pub fn new(
        config: &'a PublishConfig,
        source_label: impl Into<String>,
        generator: G,
        broker: B,
        operator: O,
    ) -> Self {
        Self {
            config,
            source_label: source_label.into(),
            generator,
            publisher: ConfirmedPublisher::new(broker),
            operator,
            gate: InteractiveGate::new(),
        }
    }

    pub async fn run<R: Read>(mut self, source: RecordSource<R>) -> Result<RunReport> {
        let mut report = RunReport::new();

        let outcome = self.pump(source, &mut report).await;

        if let Err(e) = self.publisher.close().await {
            tracing::warn!("⚠️ Broker teardown failed: {}", e);
        }

        let termination = match outcome {
            Ok(termination) => termination,
            Err(e) => {
                tracing::error!(
                    "❌ Run aborted after {} records ({} published): {}",
                    report.records_read,
                    report.published,
                    e
                );
                return Err(e);
            }
        };

        let report = report.finish(termination);
        tracing::info!(
            "📊 {:?}: read {}, accepted {}, comments {}, transform errors {}, published {} (acked {}, nacked {})",
            report.termination,
            report.records_read,
            report.accepted,
            report.skipped_comments,
            report.skipped_transform,
            report.published,
            report.acked,
            report.nacked
        );
        Ok(report)
    }

    async fn pump<R: Read>(
        &mut self,
        source: RecordSource<R>,
        report: &mut RunReport,
    ) -> Result<Termination> {
        let filter = RecordFilter::from_config(self.config);
        let mut index = 0usize;

        for row in source {
            let record = row.inspect_err(|e| tracing::error!("❌ Malformed source row: {}", e))?;
            report.records_read += 1;

            match filter.check(&record) {
                Ok(Verdict::Accept) => {}
                Ok(Verdict::Skip) => {
                    report.skipped_comments += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("❌ Record rejected: {}", e);
                    return Err(e);
                }
            }

            report.accepted += 1;
            let current = index;
            index += 1;

            let body = match self
                .generator
                .generate(current, &record)
                .and_then(|message| encode_body(&message))
            {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping record {} {:?}: {}", current, record.fields, e);
                    report.skipped_transform += 1;
                    continue;
                }
            };

            if !self.gate.is_open() {
                let preview = render_preview(self.config, &self.source_label, &record, &body)?;
                if self.gate.check(&mut self.operator, &preview).await? == GateDecision::Declined {
                    return Ok(Termination::Declined);
                }
            }

            report.published += 1;
            let outcome = self.publisher.send(&body).await.inspect_err(|e| {
                tracing::error!("❌ Publish of record {} failed: {}", current, e)
            })?;

            if outcome.is_ack() {
                report.acked += 1;
            } else {
                report.nacked += 1;
                if self.config.nack_policy() == NackPolicy::Abort {
                    return Err(FeedError::NegativeAcknowledgement {
                        delivery_tag: outcome.delivery_tag(),
                    });
                }
            }
        }

        Ok(Termination::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ConfirmationOutcome, RawRecord, ReaderMode};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockBroker {
        published: Arc<Mutex<Vec<Vec<u8>>>>,
        nack_all: bool,
        fail_on: Option<usize>,
        closed: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl Broker for MockBroker {
        async fn publish(&mut self, body: &[u8]) -> Result<ConfirmationOutcome> {
            let mut published = self.published.lock().unwrap();
            if self.fail_on == Some(published.len()) {
                return Err(FeedError::IoError(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "channel closed",
                )));
            }
            published.push(body.to_vec());
            let delivery_tag = published.len() as u64;
            Ok(if self.nack_all {
                ConfirmationOutcome::Nack { delivery_tag }
            } else {
                ConfirmationOutcome::Ack { delivery_tag }
            })
        }

        async fn close(&mut self) -> Result<()> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    impl MockBroker {
        fn bodies(&self) -> Vec<Value> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .map(|b| serde_json::from_slice(b).unwrap())
                .collect()
        }

        fn is_closed(&self) -> bool {
            *self.closed.lock().unwrap()
        }
    }

    #[derive(Clone)]
    struct MockOperator {
        answer: String,
        asked: Arc<Mutex<Vec<String>>>,
    }

    impl MockOperator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                asked: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn times_asked(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Operator for MockOperator {
        async fn ask(&mut self, preview: &str, _question: &str) -> Result<String> {
            self.asked.lock().unwrap().push(preview.to_string());
            Ok(self.answer.clone())
        }
    }

    struct IndexGenerator {
        fail_at: Option<usize>,
    }

    impl MessageGenerator for IndexGenerator {
        type Message = Value;

        fn work_mode(&self) -> &str {
            "A"
        }

        fn generate(&self, index: usize, record: &RawRecord) -> Result<Value> {
            if self.fail_at == Some(index) {
                return Err(FeedError::GenerateError {
                    index,
                    message: "rejected by test".to_string(),
                });
            }
            Ok(json!({ "index": index, "fields": record.fields }))
        }
    }

    fn config(extra: &str) -> PublishConfig {
        PublishConfig::from_json_str(&format!(
            r#"{{"amqp":"amqp://localhost","exchangeType":"fanout","exchange":"x","workMode":"A"{}}}"#,
            extra
        ))
        .unwrap()
    }

    async fn run(
        config: &PublishConfig,
        input: &str,
        generator: IndexGenerator,
        broker: MockBroker,
        operator: MockOperator,
    ) -> Result<RunReport> {
        let source = RecordSource::new(input.as_bytes(), config.reader_mode());
        PublishPipeline::new(config, "test.src", generator, broker, operator)
            .run(source)
            .await
    }

    #[tokio::test]
    async fn test_comment_records_are_skipped() {
        let config = config(r#","recordLen":2"#);
        let broker = MockBroker::default();
        let operator = MockOperator::answering("Y\n");

        let report = run(
            &config,
            "A,1,2\nA,3,4\n!A,5,6\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            operator.clone(),
        )
        .await
        .unwrap();

        assert_eq!(report.termination, Termination::Completed);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped_comments, 1);
        assert_eq!(report.published, 2);
        assert_eq!(broker.bodies().len(), 2);
        assert_eq!(operator.times_asked(), 1);
        assert!(broker.is_closed());
    }

    #[tokio::test]
    async fn test_mode_mismatch_on_first_record_publishes_nothing() {
        let config = config(r#","delim":"|""#);
        let broker = MockBroker::default();
        let operator = MockOperator::answering("Y\n");

        let err = run(
            &config,
            "B|1|2\nA|3|4\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            operator.clone(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FeedError::WorkModeMismatch { .. }));
        assert!(broker.bodies().is_empty());
        assert_eq!(operator.times_asked(), 0);
        assert!(broker.is_closed());
    }

    #[tokio::test]
    async fn test_csv_rows_without_mode_tag_are_published() {
        let config = config(r#","recordLen":5"#);
        let broker = MockBroker::default();

        let report = run(
            &config,
            "1001,Alice\n1002,Bob\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap();

        assert_eq!(report.termination, Termination::Completed);
        assert_eq!(report.published, 2);
        assert_eq!(broker.bodies()[1]["fields"][0], "1002");
    }

    #[tokio::test]
    async fn test_short_records_abort_before_publish() {
        let config = config(r#","delim":"|","recordLen":3"#);
        let broker = MockBroker::default();

        let err = run(
            &config,
            "A|1|2\nA|3|4\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FeedError::RecordTooShort { .. }));
        assert!(broker.bodies().is_empty());
    }

    #[tokio::test]
    async fn test_transform_error_skips_only_that_record() {
        let config = config("");
        let broker = MockBroker::default();

        let report = run(
            &config,
            "A,a\nA,b\nA,c\n",
            IndexGenerator { fail_at: Some(1) },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap();

        assert_eq!(report.skipped_transform, 1);
        assert_eq!(report.published, 2);
        let indices: Vec<u64> = broker
            .bodies()
            .iter()
            .map(|b| b["index"].as_u64().unwrap())
            .collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_gate_waits_for_first_successful_message() {
        let config = config("");
        let broker = MockBroker::default();
        let operator = MockOperator::answering("Y\n");

        run(
            &config,
            "A,a\nA,b\nA,c\n",
            IndexGenerator { fail_at: Some(0) },
            broker.clone(),
            operator.clone(),
        )
        .await
        .unwrap();

        assert_eq!(operator.times_asked(), 1);
        let previews = operator.asked.lock().unwrap().clone();
        assert!(previews[0].contains("\"index\": 1"));
        assert_eq!(broker.bodies().len(), 2);
    }

    #[tokio::test]
    async fn test_decline_publishes_nothing() {
        for answer in ["N\n", "", "y\n", " Y\n"] {
            let config = config("");
            let broker = MockBroker::default();

            let report = run(
                &config,
                "A,1\nA,2\n",
                IndexGenerator { fail_at: None },
                broker.clone(),
                MockOperator::answering(answer),
            )
            .await
            .unwrap();

            assert_eq!(report.termination, Termination::Declined, "answer {:?}", answer);
            assert_eq!(report.published, 0);
            assert!(broker.bodies().is_empty());
            assert!(broker.is_closed());
        }
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_run() {
        let config = config("");
        let broker = MockBroker {
            fail_on: Some(1),
            ..MockBroker::default()
        };

        let err = run(
            &config,
            "A,1\nA,2\nA,3\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FeedError::IoError(_)));
        assert_eq!(broker.bodies().len(), 1);
        assert!(broker.is_closed());
    }

    #[tokio::test]
    async fn test_nack_continues_by_default() {
        let config = config("");
        let broker = MockBroker {
            nack_all: true,
            ..MockBroker::default()
        };

        let report = run(
            &config,
            "A,1\nA,2\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap();

        assert_eq!(report.nacked, 2);
        assert_eq!(report.acked, 0);
    }

    #[tokio::test]
    async fn test_nack_aborts_when_configured() {
        let config = config(r#","nackPolicy":"abort""#);
        let broker = MockBroker {
            nack_all: true,
            ..MockBroker::default()
        };

        let err = run(
            &config,
            "A,1\nA,2\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            FeedError::NegativeAcknowledgement { delivery_tag: 1 }
        ));
        assert_eq!(broker.bodies().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_csv_row_aborts() {
        let config = config("");
        let broker = MockBroker::default();

        let err = run(
            &config,
            "A,1,2\nA,3\n",
            IndexGenerator { fail_at: None },
            broker.clone(),
            MockOperator::answering("Y\n"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FeedError::CsvError(_)));
        assert_eq!(broker.bodies().len(), 1);
        assert_eq!(config.reader_mode(), ReaderMode::Strict);
    }
}
