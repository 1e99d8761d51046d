mod config;
mod crawler;
mod parser;
mod telegram;

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use config::{Cli, Config, TOKEN_VAR};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    // Must run before clap reads its env fallbacks.
    config::load_env_file(Path::new(".env"));
    let config = Config::from_cli(Cli::parse(), std::env::var(TOKEN_VAR).ok())?;

    let keywords: Vec<_> = config.keywords.iter().map(|k| k.text.as_str()).collect();
    info!("Announcement URL: {}", config.url);
    info!("Location keywords: {}", keywords.join(","));
    if keywords.is_empty() {
        warn!("No location keywords configured, nothing can match");
    }

    let client = crawler::build_client(config.timeout)?;

    // Collect first, deliver after the page has been fully processed.
    let mut messages = Vec::new();
    crawler::crawl(&client, &config.url, &config.keywords, |m| {
        info!("Matched keyword {}", m.keyword);
        messages.push(m);
    })
    .await
    .context("Failed to crawl outage announcements")?;

    if !messages.is_empty() {
        let summary = telegram::deliver_all(
            &client,
            &config.telegram,
            messages.iter().map(|m| m.body.as_str()),
        )
        .await;
        info!(
            "Delivered {} of {} notifications ({} failed)",
            summary.sent,
            messages.len(),
            summary.failed
        );
    }

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}
