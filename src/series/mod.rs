//! Per-month series derived from an amortization schedule

mod pmi;
mod tax;

pub use pmi::{pmi_schedule, PMI_CANCEL_LTV};
pub use tax::tax_savings;
