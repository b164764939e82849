//! Date range helper shared by every range-bounded computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// An inclusive calendar date range with optional bounds.
///
/// An unbounded side means "from the beginning of the books" or "through
/// today" respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// The unbounded range (all time).
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Everything on or before `to`.
    #[must_use]
    pub const fn through(to: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// The inclusive range `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Result<Self, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidRange { from, to });
        }
        Ok(Self {
            from: Some(from),
            to: Some(to),
        })
    }

    /// Validates the bounds without consuming them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when both bounds are present and inverted.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(LedgerError::InvalidRange { from, to });
        }
        Ok(())
    }

    /// Returns true if `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_between_rejects_inverted_bounds() {
        assert!(matches!(
            DateRange::between(date(2026, 2, 1), date(2026, 1, 1)),
            Err(LedgerError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_between_accepts_single_day() {
        let range = DateRange::between(date(2026, 1, 1), date(2026, 1, 1)).unwrap();
        assert!(range.contains(date(2026, 1, 1)));
        assert!(!range.contains(date(2026, 1, 2)));
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let range = DateRange::unbounded();
        assert!(range.contains(NaiveDate::MIN));
        assert!(range.contains(NaiveDate::MAX));
        assert!(range.validate().is_ok());
    }

    #[test]
    fn test_through_is_open_below() {
        let range = DateRange::through(date(2026, 6, 30));
        assert!(range.contains(date(1990, 1, 1)));
        assert!(range.contains(date(2026, 6, 30)));
        assert!(!range.contains(date(2026, 7, 1)));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let range = DateRange {
            from: Some(date(2026, 5, 2)),
            to: Some(date(2026, 5, 1)),
        };
        assert!(matches!(
            range.validate(),
            Err(LedgerError::InvalidRange { .. })
        ));
    }
}
