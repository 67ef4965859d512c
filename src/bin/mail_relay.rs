use anyhow::Context;
use rusty_library_ledger::{
    adapters::smtp::SmtpMailProvider,
    api::{mail::MailRelayState, router::create_mail_router},
    config::AppConfig,
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    let mail_provider =
        SmtpMailProvider::new(&config.smtp).context("Failed to configure SMTP provider")?;
    tracing::info!(
        sender = %mail_provider.sender(),
        smtp_host = %config.smtp.host,
        "Mail provider configured"
    );

    let app = create_mail_router(Arc::new(MailRelayState {
        mail_provider: Arc::new(mail_provider),
    }));

    let addr = config.mail_relay.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Mail relay listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
