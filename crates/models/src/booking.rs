use chrono::{NaiveDateTime, TimeDelta};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Reasons a booking request is rejected before touching storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("the start time is not earlier than the end time")]
    StartNotBeforeEnd,
    #[error("the reservation must not start earlier than the current time")]
    StartsInPast,
    #[error("minimum reservation time is more than 1 hour")]
    TooShort,
    #[error("at least one seat must be requested")]
    NoSeats,
    #[error("this table only seats {capacity}")]
    TooManySeats { requested: u16, capacity: u16 },
}

/// A validated half-open booking interval `[start, end)`.
///
/// Timestamps are naive wall-clock values; the whole deployment treats them as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl BookingWindow {
    /// The shortest window that can be booked. Windows must be strictly longer.
    pub fn min_duration() -> TimeDelta {
        TimeDelta::hours(1)
    }

    /// Validates a requested window against the current time.
    ///
    /// Checks run in order: ordering, not in the past, then duration.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::StartNotBeforeEnd);
        }

        if start < now {
            return Err(BookingError::StartsInPast);
        }

        if end - start <= Self::min_duration() {
            return Err(BookingError::TooShort);
        }

        Ok(Self { start, end })
    }

    /// Rebuilds a window from stored values without re-validating against `now`
    pub fn from_stored(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Half-open overlap: windows that only touch at a boundary do not overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Display for BookingWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Rejects an empty party
pub fn check_party(requested: u16) -> Result<(), BookingError> {
    if requested == 0 {
        return Err(BookingError::NoSeats);
    }

    Ok(())
}

/// Checks the requested party size against the table's capacity
pub fn check_seats(requested: u16, capacity: u16) -> Result<(), BookingError> {
    check_party(requested)?;

    if requested > capacity {
        return Err(BookingError::TooManySeats {
            requested,
            capacity,
        });
    }

    Ok(())
}
