//! Time parsing and formatting for calendar events.
//!
//! This module covers the three time concerns of the calendar tools:
//!
//! - [`parse_datetime`] turns loosely formatted, human-entered strings into a
//!   [`NaiveDateTime`] by trying a fixed, ordered list of formats.
//! - [`format_event_time`] renders a provider event time (an instant or an
//!   all-day date) for display.
//! - [`EventTime`] and [`TimeWindow`] are the canonical forms used for
//!   ordering events and bounding queries.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Formats accepted by [`parse_datetime`], tried top to bottom.
///
/// The first format that parses wins, so the ISO-like layouts shadow the
/// US-ordered ones for strings both could accept.
pub const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y",
];

/// The only format accepted for the start date of an event listing.
pub const LIST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display layout for timed events.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Returned by [`format_event_time`] when the input carries no time at all.
pub const UNKNOWN_TIME_FORMAT: &str = "Unknown time format";

/// Parses a human-entered date/time string.
///
/// Returns `None` when no candidate format matches. Date-only formats yield
/// midnight on that date. Month names must be spelled out in full
/// (`December`, any case); chrono alone would also take `Dec`.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS.iter().find_map(|fmt| {
        let parsed = if has_time_component(fmt) {
            NaiveDateTime::parse_from_str(text, fmt).ok()
        } else {
            NaiveDate::parse_from_str(text, fmt)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }?;

        if fmt.starts_with("%B") && !spells_full_month(text, parsed) {
            return None;
        }
        Some(parsed)
    })
}

fn spells_full_month(text: &str, parsed: NaiveDateTime) -> bool {
    let month = parsed.format("%B").to_string();
    text.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case(&month))
}

/// Parses a listing start date, accepting only `YYYY-MM-DD`.
pub fn parse_list_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, LIST_DATE_FORMAT).ok()
}

fn has_time_component(fmt: &str) -> bool {
    fmt.contains("%H") || fmt.contains("%I")
}

/// Parses a provider `dateTime` value.
///
/// RFC 3339 values keep their encoded offset. Values without an offset are
/// read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Formats a provider event time for display.
///
/// - An instant renders as `YYYY-MM-DD hh:MM AM/PM` in its own offset; no
///   timezone conversion happens. An instant that cannot be parsed is
///   returned verbatim.
/// - A whole-day date renders as `<date> (All day)`.
/// - Anything else renders as [`UNKNOWN_TIME_FORMAT`].
pub fn format_event_time(date_time: Option<&str>, date: Option<&str>) -> String {
    if let Some(raw) = date_time {
        return match parse_instant(raw) {
            Some(instant) => instant.format(DISPLAY_FORMAT).to_string(),
            None => raw.to_string(),
        };
    }

    if let Some(date) = date {
        return format!("{date} (All day)");
    }

    UNKNOWN_TIME_FORMAT.to_string()
}

/// The canonical start or end of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// A precise instant, keeping the offset the provider sent.
    Instant(DateTime<FixedOffset>),
    /// A whole-day event date.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Builds an event time from the provider's `dateTime`/`date` pair.
    ///
    /// The instant wins when both are present.
    pub fn from_fields(date_time: Option<&str>, date: Option<&str>) -> Option<Self> {
        match (date_time, date) {
            (Some(raw), _) => parse_instant(raw).map(Self::Instant),
            (None, Some(raw)) => parse_list_date(raw).map(Self::AllDay),
            (None, None) => None,
        }
    }

    /// The UTC instant used for chronological ordering.
    ///
    /// All-day events sort at midnight UTC of their date.
    pub fn sort_key(&self) -> DateTime<Utc> {
        match self {
            Self::Instant(dt) => dt.with_timezone(&Utc),
            Self::AllDay(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

/// A half-open query interval `[start, end)` in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window of `days` whole days beginning at `start`.
    ///
    /// A day count below one is treated as one. Returns `None` when the end
    /// of the window is not representable.
    pub fn for_days(start: DateTime<Utc>, days: i64) -> Option<Self> {
        let days = days.max(1);
        let end = start.checked_add_signed(Duration::try_days(days)?)?;
        Some(Self { start, end })
    }

    /// Length of the window in whole days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// The current local time, as reported to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentTime {
    /// `YYYY-MM-DD HH:MM:SS`
    pub current_time: String,
    /// `DD-MM-YYYY`
    pub formatted_date: String,
}

impl CurrentTime {
    /// Describes the given local time.
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            current_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            formatted_date: now.format("%d-%m-%Y").to_string(),
        }
    }

    /// Describes the machine's local time right now.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}
