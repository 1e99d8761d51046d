use std::sync::LazyLock;

use chrono::{DateTime, Local};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::dates;
use super::numerals::to_half_width;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static CAPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("caption").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// One `<table>` whose caption resolved to a date inside the window.
#[derive(Debug, Clone)]
pub struct AnnouncementTable {
    /// Raw caption text, untrimmed.
    pub caption: String,
    pub date: DateTime<Local>,
    pub rows: Vec<RowCandidate>,
}

/// A `(time range, area)` pair taken from the first two cells of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCandidate {
    pub time_text: String,
    pub area_text: String,
    /// `area_text` with full-width digits folded to ASCII.
    pub area_half: String,
}

impl RowCandidate {
    pub fn new(time_text: impl Into<String>, area_text: impl Into<String>) -> Self {
        let area_text = area_text.into();
        let area_half = to_half_width(&area_text);
        Self {
            time_text: time_text.into(),
            area_text,
            area_half,
        }
    }
}

/// Walk every table in document order and keep those dated within the
/// notification window relative to `now`. Skipped tables are logged.
pub fn extract(document: &Html, now: DateTime<Local>) -> Vec<AnnouncementTable> {
    document
        .select(&TABLE)
        .filter_map(|table| {
            let caption = caption_text(table);
            let trimmed = caption.trim();

            let date = match dates::resolve(trimmed) {
                Ok(Some(date)) => date,
                Ok(None) => {
                    debug!("Skipping table without a caption date");
                    return None;
                }
                Err(e) => {
                    warn!("Skipping table: {}", e);
                    return None;
                }
            };

            if !dates::in_window(date, now) {
                info!("Outside notification window: {}", trimmed);
                return None;
            }

            Some(AnnouncementTable {
                rows: rows(table),
                caption,
                date,
            })
        })
        .collect()
}

fn caption_text(table: ElementRef) -> String {
    table
        .select(&CAPTION)
        .flat_map(|c| c.text())
        .collect()
}

fn rows(table: ElementRef) -> Vec<RowCandidate> {
    table
        .select(&ROW)
        .filter_map(|tr| {
            let mut cells = tr.select(&CELL).map(|td| td.text().collect::<String>());
            let time = cells.next()?;
            let area = cells.next()?;
            Some(RowCandidate::new(time, area))
        })
        .collect()
}
