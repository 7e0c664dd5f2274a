//! Core types: time parsing and formatting, normalized events, tracing

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{EventRecord, UNTITLED_EVENT, sort_chronologically};
pub use time::{
    CurrentTime, EventTime, TimeWindow, UNKNOWN_TIME_FORMAT, format_event_time, parse_datetime,
    parse_instant, parse_list_date,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
