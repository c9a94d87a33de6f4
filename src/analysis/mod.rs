//! Alternative-path comparisons: renting, selling and refinancing

mod refinance;
mod rent_vs_buy;
mod resale;

pub use refinance::{compare_refinance, RefiConclusion, RefiResult};
pub use rent_vs_buy::{rent_vs_buy, RentInputs, RentVsBuyResult};
pub use resale::{apply_resale_impact, ResaleResult};
