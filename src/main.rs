use anyhow::Context;
use ticket_notifier::config::NotifierConfig;
use ticket_notifier::mailer::SmtpMailer;
use ticket_notifier::poller::Poller;
use ticket_notifier::stream::JetStreamSource;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = NotifierConfig::from_env().context("Failed to load configuration")?;

    eprintln!("✉️  Ticket Notifier v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Stream: {} ({} / {})",
        config.stream_url, config.stream_name, config.subject
    );
    eprintln!("   Group:  {}", config.consumer_group);
    eprintln!(
        "   SMTP:   {}:{} as {}\n",
        config.smtp_host, config.smtp_port, config.from_address
    );

    let stream = JetStreamSource::connect(
        &config.stream_url,
        &config.stream_name,
        &config.subject,
        &config.consumer_group,
    )
    .await
    .context("Failed to subscribe to ticket stream")?;

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        &config.from_address,
        &config.smtp_password,
    )
    .context("Failed to construct SMTP transport")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
            signal_token.cancel();
        }
    });

    Poller::new(stream, mailer, config.poll_timeout)
        .run(shutdown)
        .await;

    Ok(())
}
