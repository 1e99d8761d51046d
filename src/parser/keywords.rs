use std::fmt;

use super::numerals::to_half_width;
use super::tables::RowCandidate;

/// A location substring to look for in an announcement's area text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: String,
    pub half: String,
}

impl Keyword {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let half = to_half_width(&text);
        Self { text, half }
    }

    /// Split a comma-separated list, dropping blank entries.
    pub fn parse_list(raw: &str) -> Vec<Keyword> {
        raw.split(',')
            .map(Keyword::new)
            .filter(|k| !k.half.is_empty())
            .collect()
    }
}

/// A formatted outage notice for one keyword hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub keyword: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(keyword: &Keyword, caption: &str, row: &RowCandidate) -> Self {
        let body = format!(
            "[停電預告] {}\n{}\n停電時段：{}\n停電地區：{}",
            keyword.text,
            caption.trim(),
            row.time_text.trim(),
            row.area_text.trim(),
        );
        Self {
            keyword: keyword.text.clone(),
            body,
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

/// One message per keyword found in the row's area, in keyword order.
pub fn match_row(
    caption: &str,
    row: &RowCandidate,
    keywords: &[Keyword],
) -> Vec<NotificationMessage> {
    keywords
        .iter()
        .filter(|k| !k.half.is_empty() && row.area_half.contains(&k.half))
        .map(|k| NotificationMessage::new(k, caption, row))
        .collect()
}
