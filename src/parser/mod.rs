pub mod dates;
pub mod keywords;
pub mod numerals;
pub mod tables;

use chrono::{DateTime, Local};
use scraper::Html;
use tracing::debug;

use keywords::{Keyword, NotificationMessage};

/// Pipeline: html → dated tables in window → rows → keyword hits.
/// Calls `on_match` once per hit in document order and returns the count.
pub fn scan(
    html: &str,
    keywords: &[Keyword],
    now: DateTime<Local>,
    mut on_match: impl FnMut(NotificationMessage),
) -> usize {
    let document = Html::parse_document(html);
    let mut found = 0;

    for table in tables::extract(&document, now) {
        debug!(
            "Scanning {} rows dated {}",
            table.rows.len(),
            table.date.format("%Y-%m-%d")
        );
        for row in &table.rows {
            for msg in keywords::match_row(&table.caption, row, keywords) {
                on_match(msg);
                found += 1;
            }
        }
    }

    found
}
