//! Stream poller — the orchestrator driving decode → format → dispatch.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::mailer::{MailSender, SUBJECT};
use crate::notification::{decode, format_body};
use crate::stream::{RawRecord, RecordStream};

/// Drains the stream one record at a time until cancelled.
///
/// Per-record failures (decode, dispatch) are logged and skipped; only
/// cancellation or a fatal stream error stops the loop, and the stream
/// subscription is released on every exit path. At most one notification
/// is in flight at a time — the next poll waits for the current dispatch.
pub struct Poller<S, M> {
    stream: S,
    mailer: M,
    poll_timeout: Duration,
}

impl<S: RecordStream, M: MailSender> Poller<S, M> {
    pub fn new(stream: S, mailer: M, poll_timeout: Duration) -> Self {
        Self {
            stream,
            mailer,
            poll_timeout,
        }
    }

    /// Run until the token is cancelled or the stream dies.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            poll_timeout_ms = self.poll_timeout.as_millis() as u64,
            "Poller started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received, stopping poller");
                    break;
                }
                polled = self.stream.poll(self.poll_timeout) => match polled {
                    Ok(None) => continue,
                    Ok(Some(record)) => self.handle_record(record).await,
                    Err(e) if e.is_transient() => {
                        warn!(error = %e, "Stream poll error");
                    }
                    Err(e) => {
                        error!(error = %e, "Stream failed, stopping poller");
                        break;
                    }
                }
            }
        }

        self.stream.close().await;
        info!("Poller stopped");
    }

    /// Route one record through decode → format → dispatch. Never fails.
    async fn handle_record(&self, record: RawRecord) {
        debug!(
            subject = %record.subject,
            sequence = record.stream_sequence,
            "Record received"
        );

        let notification = match decode(&record.payload) {
            Ok(n) => n,
            Err(e) => {
                warn!(
                    sequence = record.stream_sequence,
                    error = %e,
                    "Dropping undecodable record"
                );
                return;
            }
        };

        let body = format_body(&notification);
        self.dispatch(&notification.recipient, &body).await;
    }

    /// Hand a formatted body to the mail transport. Transport failures are
    /// logged with the recipient and swallowed; the loop moves on.
    async fn dispatch(&self, recipient: &str, body: &str) {
        match self.mailer.send(recipient, SUBJECT, body).await {
            Ok(()) => info!(recipient = %recipient, "Notification sent"),
            Err(e) => error!(recipient = %recipient, error = %e, "Failed to send notification"),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
