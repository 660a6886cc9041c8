use crate::config::PublishConfig;
use crate::domain::model::ConfirmationOutcome;
use crate::domain::ports::Broker;
use crate::utils::error::{FeedError, Result};
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions};
use lapin::publisher_confirm::Confirmation;
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};

const CONTENT_TYPE: &str = "application/json";
const PERSISTENT: u8 = 2;
const REPLY_SUCCESS: u16 = 200;

/// Channel in confirm mode on a dedicated connection.
pub struct AmqpBroker {
    connection: Connection,
    channel: Channel,
    exchange: String,
    priority: u8,
    next_delivery_tag: u64,
    closed: bool,
}

impl AmqpBroker {
    /// Dials the broker, declares the exchange and enables publisher confirms.
    pub async fn connect(config: &PublishConfig) -> Result<Self> {
        tracing::info!("🔌 Connecting to {}", config.amqp);
        let connection = Connection::connect(&config.amqp, ConnectionProperties::default()).await?;

        let channel = match Self::open_channel(&connection, config).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = connection.close(REPLY_SUCCESS, "setup failed").await {
                    tracing::warn!("⚠️ Connection close failed: {}", close_err);
                }
                return Err(e);
            }
        };

        tracing::info!(
            "✅ Exchange '{}' ({}) ready, publisher confirms enabled",
            config.exchange,
            config.exchange_type
        );

        Ok(Self {
            connection,
            channel,
            exchange: config.exchange.clone(),
            priority: config.priority,
            next_delivery_tag: 1,
            closed: false,
        })
    }

    async fn open_channel(connection: &Connection, config: &PublishConfig) -> Result<Channel> {
        let channel = connection.create_channel().await?;

        channel
            .exchange_declare(
                &config.exchange,
                exchange_kind(&config.exchange_type),
                declare_options(),
                FieldTable::default(),
            )
            .await?;

        channel.confirm_select(ConfirmSelectOptions::default()).await?;
        Ok(channel)
    }
}

#[async_trait]
impl Broker for AmqpBroker {
    async fn publish(&mut self, body: &[u8]) -> Result<ConfirmationOutcome> {
        let delivery_tag = self.next_delivery_tag;

        let confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                "",
                BasicPublishOptions::default(),
                body,
                publish_properties(self.priority),
            )
            .await?;
        self.next_delivery_tag += 1;

        match confirm.await? {
            Confirmation::Ack(_) => Ok(ConfirmationOutcome::Ack { delivery_tag }),
            Confirmation::Nack(_) => Ok(ConfirmationOutcome::Nack { delivery_tag }),
            Confirmation::NotRequested => Err(FeedError::ConfigError {
                message: "Channel is not in confirm mode".to_string(),
            }),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let channel_result = self.channel.close(REPLY_SUCCESS, "done").await;
        let connection_result = self.connection.close(REPLY_SUCCESS, "done").await;
        tracing::debug!("Broker connection closed");

        channel_result?;
        connection_result?;
        Ok(())
    }
}

/// Maps the configured exchange type onto the broker's native kinds.
pub fn exchange_kind(exchange_type: &str) -> ExchangeKind {
    match exchange_type {
        "direct" => ExchangeKind::Direct,
        "fanout" => ExchangeKind::Fanout,
        "topic" => ExchangeKind::Topic,
        "headers" => ExchangeKind::Headers,
        other => ExchangeKind::Custom(other.to_string()),
    }
}

/// Durable, non-internal exchange that survives publisher disconnects.
pub fn declare_options() -> ExchangeDeclareOptions {
    ExchangeDeclareOptions {
        durable: true,
        auto_delete: false,
        internal: false,
        nowait: false,
        passive: false,
    }
}

/// Persistent JSON message at the configured priority.
pub fn publish_properties(priority: u8) -> BasicProperties {
    BasicProperties::default()
        .with_content_type(CONTENT_TYPE.into())
        .with_delivery_mode(PERSISTENT)
        .with_priority(priority)
}
