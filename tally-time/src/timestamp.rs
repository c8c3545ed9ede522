//! Epoch seconds ↔ calendar date-time

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;
use tracing::debug;
use tally_core::TallyError;

/// Rendering used for human-readable results
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Accepted wall-clock layouts, tried in order
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("'{0}' is not a whole number of seconds")]
    InvalidTimestamp(String),

    #[error("{0} seconds is outside the representable date range")]
    OutOfRange(i64),

    #[error("'{0}' is not a recognised date-time")]
    InvalidDate(String),

    #[error("'{0}' does not exist in the selected time zone")]
    NonexistentLocalTime(String),

    #[error("unknown time zone '{0}', expected local, utc or an offset like +05:30")]
    UnknownZone(String),
}

impl From<TimestampError> for TallyError {
    fn from(e: TimestampError) -> Self {
        match e {
            TimestampError::InvalidTimestamp(_) | TimestampError::OutOfRange(_) => {
                TallyError::invalid_timestamp(e.to_string())
            }
            TimestampError::UnknownZone(_) => TallyError::invalid_input(e.to_string()),
            _ => TallyError::invalid_date(e.to_string()),
        }
    }
}

/// Time zone used to render or interpret wall-clock times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl FromStr for Zone {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "" => Ok(Zone::Local),
            "utc" | "z" | "gmt" => Ok(Zone::Utc),
            _ => s.trim().parse::<FixedOffset>()
                .map(Zone::Fixed)
                .map_err(|_| TimestampError::UnknownZone(s.to_string())),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Utc => f.write_str("utc"),
            Zone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Parse user text as whole epoch seconds
pub fn parse_epoch_seconds(text: &str) -> Result<i64, TimestampError> {
    text.trim().parse::<i64>()
        .map_err(|_| TimestampError::InvalidTimestamp(text.to_string()))
}

pub fn epoch_seconds_to_datetime<Tz: TimeZone>(seconds: i64, tz: &Tz) -> Result<DateTime<Tz>, TimestampError> {
    DateTime::from_timestamp(seconds, 0)
        .map(|utc| utc.with_timezone(tz))
        .ok_or(TimestampError::OutOfRange(seconds))
}

/// Render epoch seconds in `tz` using `DISPLAY_FORMAT`
pub fn format_epoch_seconds_in<Tz: TimeZone>(seconds: i64, tz: &Tz) -> Result<String, TimestampError>
where
    Tz::Offset: fmt::Display,
{
    let dt = epoch_seconds_to_datetime(seconds, tz)?;
    Ok(dt.format(DISPLAY_FORMAT).to_string())
}

/// Render epoch seconds in the machine's local time zone
pub fn epoch_seconds_to_local(seconds: i64) -> Result<String, TimestampError> {
    format_epoch_seconds_in(seconds, &Local)
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Epoch seconds for a date-time. RFC 3339 text carries its own offset;
/// wall-clock text is read in `tz`, taking the earlier instant when ambiguous.
pub fn datetime_to_epoch_seconds_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<i64, TimestampError> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.timestamp());
    }
    let naive = parse_naive(trimmed)
        .ok_or_else(|| TimestampError::InvalidDate(text.to_string()))?;
    let seconds = tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| TimestampError::NonexistentLocalTime(text.to_string()))?;
    debug!(input = trimmed, seconds, "date-time parsed");
    Ok(seconds)
}

/// Epoch seconds for a wall-clock time in the local time zone
pub fn local_to_epoch_seconds(text: &str) -> Result<i64, TimestampError> {
    datetime_to_epoch_seconds_in(text, &Local)
}

pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Rendered forms of an instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInstant {
    pub seconds: i64,
    pub display: String,
    pub iso: String,
}

/// Render `seconds` in a `Zone`
pub fn render_in(seconds: i64, zone: Zone) -> Result<RenderedInstant, TimestampError> {
    fn render<Tz: TimeZone>(seconds: i64, tz: &Tz) -> Result<RenderedInstant, TimestampError>
    where
        Tz::Offset: fmt::Display,
    {
        let dt = epoch_seconds_to_datetime(seconds, tz)?;
        Ok(RenderedInstant {
            seconds,
            display: dt.format(DISPLAY_FORMAT).to_string(),
            iso: dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
    match zone {
        Zone::Local => render(seconds, &Local),
        Zone::Utc => render(seconds, &Utc),
        Zone::Fixed(offset) => render(seconds, &offset),
    }
}

/// Epoch seconds for text read in a `Zone`
pub fn parse_in(text: &str, zone: Zone) -> Result<i64, TimestampError> {
    match zone {
        Zone::Local => datetime_to_epoch_seconds_in(text, &Local),
        Zone::Utc => datetime_to_epoch_seconds_in(text, &Utc),
        Zone::Fixed(offset) => datetime_to_epoch_seconds_in(text, &offset),
    }
}
