//! Mortgage Projection CLI
//!
//! Runs one scenario and prints the dashboard figures

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use mortgage_projection::report::{annual_summary, paginate, write_schedule_csv};
use mortgage_projection::scenario::load_scenario_json;
use mortgage_projection::{PageSize, ScenarioInputs, ScenarioResult, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "mortgage_projection")]
#[command(version, about = "Fixed-rate mortgage projection: amortization, PMI, rent vs buy, resale and refinance")]
struct Args {
    /// Scenario JSON file (dashboard defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First payment date, YYYY-MM-DD (overrides the config; today when neither is given)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Schedule page to print
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page, or "full" (overrides the config)
    #[arg(long)]
    page_size: Option<PageSize>,

    /// Also print loan-year totals
    #[arg(long)]
    annual: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut inputs = match &args.config {
        Some(path) => load_scenario_json(path)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
        None => ScenarioInputs::with_start_date(Local::now().date_naive()),
    };
    if let Some(start) = args.start_date {
        inputs.start_date = start;
    }
    if let Some(size) = args.page_size {
        inputs.page_size = size;
    }

    let result = ScenarioRunner::new()
        .run(&inputs)
        .context("Scenario failed")?;
    info!("Projected {} months", result.schedule.len());

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(BufWriter::new(file), &result.schedule)?;
        info!("Schedule written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_report(&inputs, &result, args.page, args.annual);
    Ok(())
}

fn print_report(inputs: &ScenarioInputs, result: &ScenarioResult, page: usize, annual: bool) {
    let metrics = &result.metrics;
    println!("Mortgage Projection");
    println!("===================\n");
    println!("  Home Price:        ${:.2}", inputs.home_price);
    println!("  Down Payment:      ${:.2} ({}%)", result.down_payment, inputs.down_payment_pct);
    println!("  Loan Amount:       ${:.2}", result.principal);
    println!("  Rate / Term:       {}% / {} years", inputs.annual_rate_pct, inputs.term_years);
    println!();
    println!("  Monthly P&I:       ${:.2}", metrics.monthly_pi);
    println!("  First Month Total: ${:.2}", metrics.first_month_total);
    println!("  Total Interest:    ${:.2}", metrics.total_interest);
    if let Some(savings) = metrics.first_year_tax_savings {
        println!("  Year 1 Tax Saved:  ${:.2}", savings);
    }

    if let Some(resale) = &result.resale {
        println!("\nResale ({}):", inputs.resale_date());
        println!("  Sale Month:        {}", resale.sale_index + 1);
        println!("  Net Proceeds:      ${:.2}", resale.net_proceeds);
        println!("  Loan Balance:      ${:.2}", resale.balance);
        println!("  Equity:            ${:.2}", resale.equity);
    }

    if let Some(refi) = &result.refinance {
        println!("\nRefinance at month {}:", refi.rebase_month());
        println!("  Balance Carried:   ${:.2}", refi.remaining_balance);
        println!("  Current Interest:  ${:.2}", refi.current_interest);
        println!("  Refi Interest:     ${:.2} (incl. closing costs)", refi.refi_interest);
        println!("  Difference:        ${:.2}  {}", refi.difference, refi.conclusion);
    }

    let comparison = &result.rent_vs_buy;
    if let Some((rent, buy)) = comparison.final_totals() {
        println!("\nRent vs Buy over {} months:", comparison.len());
        println!("  Cumulative Rent:   ${:.2}", rent);
        println!("  Cumulative Buy:    ${:.2}", buy);
        match comparison.break_even_month() {
            Some(month) => println!("  Renting costs more from month {}", month),
            None => println!("  Owning costs more throughout"),
        }
    }

    let page = paginate(&result.schedule, inputs.page_size, page);
    println!(
        "\nSchedule page {}/{} ({} rows):",
        page.page, page.total_pages, page.total_rows
    );
    println!(
        "{:>5} {:>10} {:>10} {:>10} {:>10} {:>14} {:>12}",
        "Month", "Date", "Payment", "Principal", "Interest", "CumInterest", "Balance"
    );
    println!("{}", "-".repeat(77));
    for row in page.rows {
        println!(
            "{:>5} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>14.2} {:>12.2}",
            row.month,
            row.date,
            row.payment,
            row.principal,
            row.interest,
            row.cumulative_interest,
            row.balance,
        );
    }

    if annual {
        println!("\nLoan-Year Totals:");
        println!(
            "{:>4} {:>12} {:>12} {:>12} {:>10} {:>10} {:>12}",
            "Year", "Payments", "Principal", "Interest", "PMI", "TaxSaved", "EndBalance"
        );
        for year in annual_summary(&result.schedule, &result.pmi, &result.tax_savings) {
            println!(
                "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>12.2}",
                year.year,
                year.payments,
                year.principal,
                year.interest,
                year.pmi,
                year.tax_savings,
                year.ending_balance,
            );
        }
    }
}
