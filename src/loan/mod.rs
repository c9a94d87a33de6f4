//! Fixed-rate loan terms, payment formula and amortization engine

mod payment;
mod schedule;

pub use payment::monthly_payment;
pub use schedule::{
    build_schedule, first_on_or_after, AmortizationEngine, ScheduleRow, ScheduleSummary,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest term accepted, in years
pub const MAX_TERM_YEARS: u32 = 100;

/// Terms of a fixed-rate loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Amount borrowed
    pub principal: f64,

    /// Annual nominal rate in percent (6.5 for 6.5%)
    pub annual_rate_pct: f64,

    /// Term in years
    pub years: u32,

    /// Date of the first payment
    pub start_date: NaiveDate,
}

impl Loan {
    pub fn new(principal: f64, annual_rate_pct: f64, years: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate_pct,
            years,
            start_date,
        }
    }

    /// Nominal number of monthly payments
    pub fn term_months(&self) -> u32 {
        self.years.saturating_mul(12)
    }

    /// Reject terms the payment formula cannot handle
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(EngineError::InvalidLoanTerms {
                reason: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.years == 0 {
            return Err(EngineError::InvalidLoanTerms {
                reason: "term must be at least one year".to_string(),
            });
        }
        if self.years > MAX_TERM_YEARS {
            return Err(EngineError::InvalidLoanTerms {
                reason: format!(
                    "term must be at most {} years, got {}",
                    MAX_TERM_YEARS, self.years
                ),
            });
        }
        if !self.annual_rate_pct.is_finite() || self.annual_rate_pct < 0.0 {
            return Err(EngineError::InvalidLoanTerms {
                reason: format!("rate must be non-negative, got {}", self.annual_rate_pct),
            });
        }
        Ok(())
    }

    /// Unrounded level payment
    pub fn monthly_payment(&self) -> f64 {
        monthly_payment(self.principal, self.annual_rate_pct, self.years)
    }

    /// Full amortization schedule for these terms
    pub fn schedule(&self) -> Result<Vec<ScheduleRow>> {
        Ok(AmortizationEngine::new(*self)?.project())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_loan_schedule_matches_free_function() {
        let loan = Loan::new(275_000.0, 6.875, 30, start());
        let via_loan = loan.schedule().unwrap();
        let via_fn = build_schedule(275_000.0, 6.875, 30, start()).unwrap();
        assert_eq!(via_loan, via_fn);
        assert_eq!(loan.term_months(), 360);
    }

    #[test]
    fn test_validate_labels_invalid_terms() {
        let err = Loan::new(0.0, 6.0, 30, start()).validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidLoanTerms { .. }));
        assert!(err.to_string().contains("principal"));

        let err = Loan::new(10_000.0, 6.0, 0, start()).validate().unwrap_err();
        assert!(err.to_string().contains("term"));

        let err = Loan::new(100_000.0, 6.5, 400_000_000, start()).validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidLoanTerms { .. }));
        assert!(Loan::new(100_000.0, 6.5, 400_000_000, start()).schedule().is_err());
        assert!(Loan::new(100_000.0, 6.5, MAX_TERM_YEARS + 1, start()).validate().is_err());
        assert!(Loan::new(100_000.0, 6.5, MAX_TERM_YEARS, start()).validate().is_ok());
    }
}
