//! Savings projection command

use anyhow::Result;
use moneykids_core::{future_value, project, CompoundPeriod, ProjectionInput};

use super::format_money;

pub fn cmd_project(principal: f64, monthly: f64, rate: f64, years: u32, json: bool) -> Result<()> {
    let input = ProjectionInput {
        principal,
        monthly_contribution: monthly,
        annual_rate_percent: rate,
        horizon_years: years,
    };
    input.validate()?;

    let series = project(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    let summary = future_value(principal, rate, CompoundPeriod::years(years), monthly)?;

    println!();
    println!(
        "📈 Projection: {} start, {} per month, {}% per year",
        format_money(principal),
        format_money(monthly),
        rate
    );
    println!("   ─────────────────────────────");

    for point in series.points() {
        println!("   Year {:>3} │ {:>14}", point.year, format_money(point.balance));
    }

    println!();
    println!("   Deposited: {}", format_money(summary.total_deposits));
    println!("   Interest:  {}", format_money(summary.total_interest));

    Ok(())
}
