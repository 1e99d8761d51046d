use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::info;

use crate::parser;
use crate::parser::keywords::{Keyword, NotificationMessage};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/114.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch announcement page")]
    Fetch(#[from] reqwest::Error),
    #[error("announcement page responded with HTTP {0}")]
    Status(StatusCode),
    #[error("announcement page body has no HTML content")]
    Parse,
}

/// Shared HTTP client for the page fetch and every delivery.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CrawlError> {
    info!("Fetching announcement page: {}", url);
    let res = client.get(url).send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(CrawlError::Status(status));
    }

    // Decodes per the charset header; invalid bytes become U+FFFD.
    let body = res.text().await?;
    if body.trim().is_empty() {
        return Err(CrawlError::Parse);
    }
    Ok(body)
}

/// Fetch the page once and report every keyword hit through `on_match`,
/// in document order. Returns the number of hits.
pub async fn crawl(
    client: &Client,
    url: &str,
    keywords: &[Keyword],
    on_match: impl FnMut(NotificationMessage),
) -> Result<usize, CrawlError> {
    let html = fetch_page(client, url).await?;
    let found = parser::scan(&html, keywords, Local::now(), on_match);

    if found == 0 {
        info!("No outage announcements matched the configured keywords");
    } else {
        info!("Found {} matching outage announcements", found);
    }
    Ok(found)
}
