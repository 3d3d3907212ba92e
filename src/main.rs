//! tonemark - Entry point for the inbox sentiment labeler

use std::sync::Arc;

use anyhow::{Context, Result};

use tonemark::config::Settings;
use tonemark::providers::email::{GmailMailbox, Mailbox};
use tonemark::services::{SampleSeeder, SentimentClassifier, SentimentPipeline};
use tonemark::storage::KeychainAccess;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting tonemark");

    if let Err(e) = run().await {
        tracing::error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mode = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "analyze".to_string());

    let keychain = KeychainAccess::new();
    let settings = Settings::load(&keychain).await?;

    let credentials = settings.gmail.clone().context(
        "Gmail credentials not configured; set GMAIL_CLIENT_ID, GMAIL_CLIENT_SECRET and \
         GMAIL_REFRESH_TOKEN or store them in the keychain",
    )?;

    let mut gmail = GmailMailbox::new(credentials);
    gmail.connect().await?;
    let mailbox: Arc<dyn Mailbox> = Arc::new(gmail);

    match mode.as_str() {
        "analyze" => {
            let classifier = SentimentClassifier::from_settings(&settings.classifier);
            let pipeline = SentimentPipeline::new(mailbox, classifier);

            let summary = pipeline.run().await?;
            tracing::info!(
                messages = summary.messages,
                "Successfully completed sentiment analysis"
            );
        }
        "seed" => {
            let seeder = SampleSeeder::new(mailbox);

            let count = seeder.seed().await?;
            tracing::info!(count, "Successfully generated sample emails");
        }
        other => {
            anyhow::bail!("unknown command '{}'; expected 'analyze' or 'seed'", other);
        }
    }

    Ok(())
}
