//! Presentation helpers: schedule paging, annual roll-ups and CSV export

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::loan::ScheduleRow;
use crate::money::round_cents;

/// Rows shown per page of the schedule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageSizeRepr", into = "PageSizeRepr")]
pub enum PageSize {
    Rows(usize),
    /// Whole schedule on one page
    Full,
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Rows(12)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Rows(n) => write!(f, "{}", n),
            PageSize::Full => f.write_str("full"),
        }
    }
}

impl FromStr for PageSize {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("full") {
            return Ok(PageSize::Full);
        }
        match s.parse::<usize>() {
            Ok(0) | Err(_) => Err(EngineError::invalid_input(
                "page_size",
                format!("expected a positive row count or \"full\", got {:?}", s),
            )),
            Ok(n) => Ok(PageSize::Rows(n)),
        }
    }
}

/// Wire form: a number of rows or the keyword "full"
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageSizeRepr {
    Rows(usize),
    Keyword(String),
}

impl TryFrom<PageSizeRepr> for PageSize {
    type Error = EngineError;

    fn try_from(repr: PageSizeRepr) -> Result<Self> {
        match repr {
            PageSizeRepr::Rows(n) => PageSize::from_str(&n.to_string()),
            PageSizeRepr::Keyword(s) => PageSize::from_str(&s),
        }
    }
}

impl From<PageSize> for PageSizeRepr {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Rows(n) => PageSizeRepr::Rows(n),
            PageSize::Full => PageSizeRepr::Keyword("full".to_string()),
        }
    }
}

/// One page of schedule rows plus paging metadata
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePage<'a> {
    /// 1-based page number after clamping
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub rows: &'a [ScheduleRow],
}

/// Slice `schedule` into pages and return the requested one.
///
/// Out-of-range page numbers are clamped to the first or last page.
pub fn paginate(schedule: &[ScheduleRow], page_size: PageSize, page: usize) -> SchedulePage<'_> {
    let total_rows = schedule.len();
    let page_size = match page_size {
        PageSize::Rows(n) => n.max(1),
        PageSize::Full => total_rows.max(1),
    };
    let total_pages = total_rows.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    SchedulePage {
        page,
        total_pages,
        page_size,
        total_rows,
        rows: &schedule[start..end],
    }
}

/// Totals for one loan year (12 payments from the start date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// 1-based loan year
    pub year: u32,
    pub payments: f64,
    pub principal: f64,
    pub interest: f64,
    pub pmi: f64,
    pub tax_savings: f64,
    pub ending_balance: f64,
}

/// Roll the monthly schedule and its aligned series up into loan years
pub fn annual_summary(schedule: &[ScheduleRow], pmi: &[f64], tax_savings: &[f64]) -> Vec<YearSummary> {
    schedule
        .chunks(12)
        .enumerate()
        .map(|(i, rows)| {
            let range = i * 12..i * 12 + rows.len();
            let sum_series = |series: &[f64]| -> f64 {
                series.get(range.clone()).map(|s| s.iter().sum::<f64>()).unwrap_or(0.0)
            };

            YearSummary {
                year: i as u32 + 1,
                payments: round_cents(rows.iter().map(|r| r.payment).sum::<f64>()),
                principal: round_cents(rows.iter().map(|r| r.principal).sum::<f64>()),
                interest: round_cents(rows.iter().map(|r| r.interest).sum::<f64>()),
                pmi: round_cents(sum_series(pmi)),
                tax_savings: round_cents(sum_series(tax_savings)),
                ending_balance: rows.last().map(|r| r.balance).unwrap_or(0.0),
            }
        })
        .collect()
}

/// Write the schedule as CSV with money to two decimals
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &[ScheduleRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Month",
        "Date",
        "Payment",
        "Principal",
        "Interest",
        "CumulativeInterest",
        "Balance",
    ])?;

    for row in schedule {
        csv_writer.write_record([
            row.month.to_string(),
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.payment),
            format!("{:.2}", row.principal),
            format!("{:.2}", row.interest),
            format!("{:.2}", row.cumulative_interest),
            format!("{:.2}", row.balance),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
