use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month {0:?}, expected YYYY-MM")]
pub struct ParseMonthError(pub String);

/// A calendar month; the unit of physical partitioning for completed reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveMonth {
    // Always the 1st of the month
    first: NaiveDate,
}

impl ArchiveMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month a timestamp falls into
    pub fn containing(at: NaiveDateTime) -> Self {
        Self {
            first: at.date() - Days::new(u64::from(at.day0())),
        }
    }

    /// The following month, or `None` past the last month chrono can represent
    pub fn next(self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Inclusive lower bound of the month
    pub fn start(&self) -> NaiveDateTime {
        self.first.and_time(NaiveTime::MIN)
    }

    /// Exclusive upper bound, i.e. the start of the next month.
    ///
    /// `None` for the last representable month, which has no upper bound.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.next().map(|next| next.start())
    }

    /// Up to `count` consecutive months starting with this one
    pub fn range(self, count: u32) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |m| m.next()).take(count as usize)
    }

    /// Name of the physical partition holding this month's rows, e.g. `parent_y2026m03`
    pub fn partition_name(&self, parent: &str) -> String {
        format!(
            "{parent}_y{:04}m{:02}",
            self.first.year(),
            self.first.month()
        )
    }
}

impl Display for ArchiveMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:04}-{:02}", self.first.year(), self.first.month())
    }
}

impl FromStr for ArchiveMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;

        Self::new(year, month).ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let month = ArchiveMonth::new(2026, 12).unwrap();
        assert_eq!(month.start().to_string(), "2026-12-01 00:00:00");
        assert_eq!(month.end().unwrap().to_string(), "2027-01-01 00:00:00");
    }

    #[test]
    fn test_last_representable_month_has_no_end() {
        let last = ArchiveMonth::containing(NaiveDateTime::MAX);
        assert_eq!(last.start().date(), NaiveDate::MAX.with_day(1).unwrap());
        assert_eq!(last.next(), None);
        assert_eq!(last.end(), None);
        assert_eq!(last.range(5).count(), 1);

        let before = ArchiveMonth::new(NaiveDate::MAX.year(), 11).unwrap();
        assert_eq!(before.next(), Some(last));
        assert_eq!(before.end(), Some(last.start()));
    }

    #[test]
    fn test_containing_and_partition_name() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let month = ArchiveMonth::containing(at);

        assert_eq!(
            month.partition_name("reservations_completed"),
            "reservations_completed_y2026m03"
        );
        assert!(month.start() <= at && at < month.end().unwrap());
    }

    #[test]
    fn test_range_crosses_year() {
        let months: Vec<String> = ArchiveMonth::new(2025, 11)
            .unwrap()
            .range(3)
            .map(|m| m.to_string())
            .collect();

        assert_eq!(months, vec!["2025-11", "2025-12", "2026-01"]);
    }

    #[test]
    fn test_month_from_str() {
        assert_eq!(
            ArchiveMonth::from_str("2026-07").unwrap(),
            ArchiveMonth::new(2026, 7).unwrap()
        );
        assert!(ArchiveMonth::from_str("2026-13").is_err());
        assert!(ArchiveMonth::from_str("202607").is_err());
        assert!(ArchiveMonth::from_str("abcd-01").is_err());
    }
}
