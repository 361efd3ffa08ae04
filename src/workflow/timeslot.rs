//! Start/end instant derivation for scheduling.
//!
//! User-entered dates and clock times are local wall-clock values. They are
//! anchored in the local time zone here, never naively concatenated, so the
//! calendar collaborator always receives unambiguous RFC 3339 instants.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};

/// A resolved event window in the user's local time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeslot {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl Timeslot {
    /// Combine a `YYYY-MM-DD` date and `HH:MM` (or `HH:MM:SS`) time into a
    /// local start instant plus its end `minutes` later. Returns `None` when
    /// either part is missing or unparseable, or when the wall-clock time
    /// does not exist locally (DST gap).
    pub fn resolve(date: &str, time: &str, minutes: u32) -> Option<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        let time = parse_clock(time.trim())?;
        let start = Local.from_local_datetime(&date.and_time(time)).earliest()?;
        let end = start + Duration::minutes(i64::from(minutes));
        Some(Self { start, end })
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

fn parse_clock(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()
}
