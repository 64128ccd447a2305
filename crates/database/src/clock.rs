use chrono::{NaiveDateTime, Utc};

/// Source of "now" for validation and expiry checks.
///
/// Stored timestamps are naive; every node interprets them as UTC.
pub type Clock = fn() -> NaiveDateTime;

pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
