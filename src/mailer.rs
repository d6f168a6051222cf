//! Outbound mail — blocking SMTP via lettre behind the [`MailSender`] seam.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use crate::error::DispatchError;

/// Subject line for every notification. Not configurable at runtime.
pub const SUBJECT: &str = "Информация по билету";

/// Outbound mail sink.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError>;
}

/// SMTP mail sender — STARTTLS relay with credentials applied once at
/// construction, shared for the process lifetime.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        from_address: &str,
        password: &SecretString,
    ) -> Result<Self, DispatchError> {
        let from: Mailbox = from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| DispatchError::InvalidAddress {
                address: from_address.to_string(),
                reason: e.to_string(),
            })?;

        let creds = Credentials::new(
            from_address.to_string(),
            password.expose_secret().to_string(),
        );
        let transport = SmtpTransport::starttls_relay(host)
            .map_err(|e| DispatchError::Transport(e.to_string()))?
            .port(port)
            .credentials(creds)
            .build();

        Ok(Self { transport, from })
    }

    /// Build the MIME multipart message: fixed From, given To, UTF-8
    /// plain-text body.
    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, DispatchError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| DispatchError::InvalidAddress {
                address: to.to_string(),
                reason: e.to_string(),
            })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body.to_string()),
                ),
            )
            .map_err(|e| DispatchError::Message(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        let message = self.build_message(to, subject, body)?;
        let transport = self.transport.clone();
        // Blocking SMTP I/O runs on the blocking pool; the caller still
        // awaits completion before polling the next record.
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| DispatchError::Transport(format!("send task failed: {e}")))?
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
