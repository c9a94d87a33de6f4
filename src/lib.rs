//! Mortgage Projection - fixed-rate mortgage analysis engine
//!
//! This library provides:
//! - Level-payment amortization schedules with calendar-correct payment dates
//! - PMI and mortgage-interest tax savings series
//! - Rent-vs-buy, resale equity and refinance comparisons
//! - Scenario configuration, batch loading and schedule memoization

pub mod analysis;
pub mod cache;
pub mod calendar;
pub mod error;
pub mod loan;
pub mod money;
pub mod report;
pub mod scenario;
pub mod series;

// Re-export commonly used types
pub use analysis::{RefiConclusion, RefiResult, RentVsBuyResult, ResaleResult};
pub use cache::ScheduleCache;
pub use error::{EngineError, Result};
pub use loan::{build_schedule, Loan, ScheduleRow};
pub use report::PageSize;
pub use scenario::{ScenarioInputs, ScenarioResult, ScenarioRunner};
