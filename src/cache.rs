//! Memoized amortization schedules
//!
//! Batch runs frequently repeat the same loan terms with different cost or
//! resale assumptions. The schedule only depends on (principal, rate, term,
//! start date), so it is built once per distinct loan and shared.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::trace;

use crate::error::Result;
use crate::loan::{Loan, ScheduleRow};

/// Exact identity of a loan: floats compared by bit pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LoanKey {
    principal_bits: u64,
    rate_bits: u64,
    years: u32,
    start_date: NaiveDate,
}

impl From<&Loan> for LoanKey {
    fn from(loan: &Loan) -> Self {
        Self {
            principal_bits: loan.principal.to_bits(),
            rate_bits: loan.annual_rate_pct.to_bits(),
            years: loan.years,
            start_date: loan.start_date,
        }
    }
}

/// Schedule cache keyed by loan terms
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<LoanKey, Arc<[ScheduleRow]>>,

    /// Statistics
    pub hits: u64,
    pub misses: u64,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached schedule for `loan`, building it on first use.
    ///
    /// Invalid terms are reported every time and never cached.
    pub fn get_or_build(&mut self, loan: &Loan) -> Result<Arc<[ScheduleRow]>> {
        let key = LoanKey::from(loan);
        if let Some(rows) = self.entries.get(&key) {
            self.hits += 1;
            trace!("Schedule cache hit for {:?}", key);
            return Ok(Arc::clone(rows));
        }

        self.misses += 1;
        let rows: Arc<[ScheduleRow]> = loan.schedule()?.into();
        self.entries.insert(key, Arc::clone(&rows));
        Ok(rows)
    }

    /// Drop all entries and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(principal: f64) -> Loan {
        Loan::new(principal, 6.5, 30, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_repeat_lookup_hits() {
        let mut cache = ScheduleCache::new();
        let first = cache.get_or_build(&loan(240_000.0)).unwrap();
        let second = cache.get_or_build(&loan(240_000.0)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hits, 1);
        assert_eq!(cache.misses, 1);
        assert_eq!(cache.len(), 1);
        assert!((cache.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cached_rows_match_fresh_build() {
        let mut cache = ScheduleCache::new();
        let cached = cache.get_or_build(&loan(180_000.0)).unwrap();
        let fresh = loan(180_000.0).schedule().unwrap();
        assert_eq!(&cached[..], &fresh[..]);
    }

    #[test]
    fn test_distinct_terms_miss() {
        let mut cache = ScheduleCache::new();
        cache.get_or_build(&loan(240_000.0)).unwrap();
        cache.get_or_build(&loan(240_000.01)).unwrap();
        let mut shorter = loan(240_000.0);
        shorter.years = 15;
        cache.get_or_build(&shorter).unwrap();

        assert_eq!(cache.misses, 3);
        assert_eq!(cache.hits, 0);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_invalid_loan_not_cached() {
        let mut cache = ScheduleCache::new();
        assert!(cache.get_or_build(&loan(0.0)).is_err());
        assert!(cache.get_or_build(&loan(0.0)).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.misses, 2);
    }

    #[test]
    fn test_clear_resets_stats() {
        let mut cache = ScheduleCache::new();
        cache.get_or_build(&loan(100_000.0)).unwrap();
        cache.get_or_build(&loan(100_000.0)).unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.hits, 0);
        assert_eq!(cache.misses, 0);
        assert_eq!(cache.hit_rate(), 0.0);
    }
}
