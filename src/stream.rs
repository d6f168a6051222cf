//! Message-stream seam — JetStream-backed record source.
//!
//! The poller only sees the [`RecordStream`] trait; production runs on a
//! JetStream durable pull consumer that acknowledges each record on
//! receipt (at-most-once, failed dispatches are never redelivered).

use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{AckPolicy, DeliverPolicy, PullConsumer},
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::error::StreamError;

/// One record pulled from the stream: an opaque payload plus the stream
/// metadata the core never interprets.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub payload: Bytes,
    pub subject: String,
    pub stream_sequence: u64,
}

/// Poll-based record source.
#[async_trait]
pub trait RecordStream: Send {
    /// Wait up to `timeout` for the next record. `Ok(None)` means the wait
    /// elapsed with nothing available — not an error.
    async fn poll(&mut self, timeout: Duration) -> Result<Option<RawRecord>, StreamError>;

    /// Release the subscription. Called exactly once, on every exit path.
    async fn close(&mut self);
}

/// JetStream record source.
pub struct JetStreamSource {
    client: async_nats::Client,
    consumer: PullConsumer,
}

impl JetStreamSource {
    /// Connect and create (or re-attach to) the durable consumer.
    ///
    /// `DeliverPolicy::New` mirrors a latest-offset reset: a fresh consumer
    /// group starts from the tail of the stream.
    pub async fn connect(
        url: &str,
        stream_name: &str,
        subject: &str,
        consumer_group: &str,
    ) -> Result<Self, StreamError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;
        let jetstream = jetstream::new(client.clone());

        let consumer = jetstream
            .create_consumer_on_stream(
                jetstream::consumer::pull::Config {
                    durable_name: Some(consumer_group.to_string()),
                    filter_subject: subject.to_string(),
                    deliver_policy: DeliverPolicy::New,
                    ack_policy: AckPolicy::Explicit,
                    ..Default::default()
                },
                stream_name,
            )
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;

        info!(
            stream = stream_name,
            subject, consumer = consumer_group, "Subscribed to ticket stream"
        );

        Ok(Self { client, consumer })
    }
}

#[async_trait]
impl RecordStream for JetStreamSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<RawRecord>, StreamError> {
        let mut batch = self
            .consumer
            .fetch()
            .max_messages(1)
            .expires(timeout)
            .messages()
            .await
            .map_err(|e| StreamError::Broker(e.to_string()))?;

        let Some(next) = batch.next().await else {
            return Ok(None);
        };
        let message = next.map_err(|e| StreamError::Broker(e.to_string()))?;

        let stream_sequence = message.info().map(|i| i.stream_sequence).unwrap_or(0);

        // Acknowledge before handing the record to the pipeline: a record
        // is consumed at most once regardless of what dispatch does.
        if let Err(e) = message.ack().await {
            warn!(error = %e, stream_sequence, "Failed to acknowledge record");
        }

        Ok(Some(RawRecord {
            payload: message.payload.clone(),
            subject: message.subject.to_string(),
            stream_sequence,
        }))
    }

    async fn close(&mut self) {
        match self.client.drain().await {
            Ok(()) => debug!("Stream connection drained"),
            Err(e) => warn!(error = %e, "Error draining stream connection"),
        }
    }
}
