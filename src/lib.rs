//! Ticket Notifier — stream-to-mail notification bridge.
//!
//! Consumes ticket-price events from a JetStream subject and mails each
//! recipient a formatted route summary. Best-effort, at-most-once: a
//! record that fails to decode or dispatch is logged and dropped.

pub mod config;
pub mod error;
pub mod mailer;
pub mod notification;
pub mod poller;
pub mod stream;
