use std::sync::LazyLock;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

/// Caption label used by the announcement page, e.g.
/// `工作停電日期 ( 非限電 )：114 年 5 月 2 日`.
static MINGUO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"工作停電日期 \( 非限電 \)：([0-9]+) 年 ([0-9]+) 月 ([0-9]+) 日").unwrap()
});

/// Zero-padded `YYYY/MM/DD` or `YYYY-MM-DD`; chrono alone would also take
/// `2025/5/2` and a signed year.
static GREGORIAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}[/-][0-9]{2}[/-][0-9]{2}$").unwrap());

const MINGUO_MARKER: char = '年';
const MINGUO_OFFSET: i32 = 1911;
const GREGORIAN_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];
const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised date caption: {0:?}")]
pub struct DateParseError(pub String);

/// Resolve a trimmed table caption into a local-midnight date.
///
/// `Ok(None)` means there was no caption at all; the table is skipped
/// without being treated as an error.
pub fn resolve(caption: &str) -> Result<Option<DateTime<Local>>, DateParseError> {
    if caption.is_empty() {
        return Ok(None);
    }

    let date = if caption.contains(MINGUO_MARKER) {
        parse_minguo(caption)
    } else if GREGORIAN_RE.is_match(caption) {
        GREGORIAN_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(caption, fmt).ok())
    } else {
        None
    };

    date.and_then(local_midnight)
        .map(Some)
        .ok_or_else(|| DateParseError(caption.to_string()))
}

fn parse_minguo(caption: &str) -> Option<NaiveDate> {
    let caps = MINGUO_RE.captures(caption)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    // Month 13 or Feb 30 is an error, never rolled over into a later date.
    NaiveDate::from_ymd_opt(year.checked_add(MINGUO_OFFSET)?, month, day)
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
}

/// True when `date` lies between `now` and seven calendar days later,
/// both ends inclusive.
///
/// `date` is a midnight while `now` carries the time of day, so a table
/// dated today compares as already past once the day has started.
pub fn in_window(date: DateTime<Local>, now: DateTime<Local>) -> bool {
    let Some(week_later) = now.checked_add_days(Days::new(WINDOW_DAYS)) else {
        return false;
    };
    date >= now && date <= week_later
}
