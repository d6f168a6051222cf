//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default bounded wait for one stream poll, in seconds. A tunable
/// constant, not a protocol requirement.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 1;

/// Bridge configuration, built from environment variables.
///
/// Everything except the poll timeout is required; a missing or
/// unparsable variable is startup-fatal.
#[derive(Debug)]
pub struct NotifierConfig {
    /// NATS server URL, e.g. "nats://localhost:4222".
    pub stream_url: String,
    /// JetStream stream holding ticket-price events.
    pub stream_name: String,
    /// Subject filter within the stream.
    pub subject: String,
    /// Durable consumer name — the consumer-group equivalent.
    pub consumer_group: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender identity; doubles as the SMTP login.
    pub from_address: String,
    pub smtp_password: SecretString,
    /// Bounded wait for one poll.
    pub poll_timeout: Duration,
}

impl NotifierConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            stream_url: require("NOTIFIER_STREAM_URL")?,
            stream_name: require("NOTIFIER_STREAM_NAME")?,
            subject: require("NOTIFIER_STREAM_SUBJECT")?,
            consumer_group: require("NOTIFIER_CONSUMER_GROUP")?,
            smtp_host: require("NOTIFIER_SMTP_HOST")?,
            smtp_port: parse_var("NOTIFIER_SMTP_PORT")?,
            from_address: require("NOTIFIER_FROM_ADDRESS")?,
            smtp_password: SecretString::from(require("NOTIFIER_SMTP_PASSWORD")?),
            poll_timeout: Duration::from_secs(parse_var_or(
                "NOTIFIER_POLL_TIMEOUT_SECS",
                DEFAULT_POLL_TIMEOUT_SECS,
            )?),
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_var<T>(key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse(key, &require(key)?)
}

fn parse_var_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so concurrent tests never race on the process env.
    #[test]
    fn from_env_requires_every_variable() {
        let vars = [
            ("NOTIFIER_STREAM_URL", "nats://localhost:4222"),
            ("NOTIFIER_STREAM_NAME", "TICKETS"),
            ("NOTIFIER_STREAM_SUBJECT", "tickets.price"),
            ("NOTIFIER_CONSUMER_GROUP", "ticket-notifier"),
            ("NOTIFIER_SMTP_HOST", "smtp.test.com"),
            ("NOTIFIER_SMTP_PORT", "587"),
            ("NOTIFIER_FROM_ADDRESS", "bot@test.com"),
            ("NOTIFIER_SMTP_PASSWORD", "secret"),
        ];
        // SAFETY: this is the only test touching these variables.
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }

        let config = NotifierConfig::from_env().unwrap();
        assert_eq!(config.stream_name, "TICKETS");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(
            config.poll_timeout,
            Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS)
        );

        unsafe { std::env::set_var("NOTIFIER_POLL_TIMEOUT_SECS", "5") };
        let config = NotifierConfig::from_env().unwrap();
        assert_eq!(config.poll_timeout, Duration::from_secs(5));

        unsafe { std::env::set_var("NOTIFIER_SMTP_PORT", "not-a-port") };
        assert!(matches!(
            NotifierConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));
        unsafe { std::env::set_var("NOTIFIER_SMTP_PORT", "587") };

        unsafe { std::env::remove_var("NOTIFIER_STREAM_URL") };
        assert!(matches!(
            NotifierConfig::from_env(),
            Err(ConfigError::MissingEnvVar(key)) if key == "NOTIFIER_STREAM_URL"
        ));
    }
}
