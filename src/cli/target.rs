use super::ui;
use crate::core::report::{ReportStyle, format_currency, format_percentage, format_weight};
use crate::core::sip::ContributionSchedule;
use anyhow::Result;

/// Prints the average price a plan needs to have paid to hit a target CAGR.
pub fn run(
    schedule: &ContributionSchedule,
    current_price: f64,
    target_cagr: f64,
    required_average: f64,
    style: &ReportStyle,
) -> Result<()> {
    println!(
        "\n{}",
        ui::style_text("Target CAGR", ui::StyleType::Title)
    );
    for line in summary_lines(schedule, current_price, target_cagr, required_average, style) {
        println!("{line}");
    }
    Ok(())
}

fn summary_lines(
    schedule: &ContributionSchedule,
    current_price: f64,
    target_cagr: f64,
    required_average: f64,
    style: &ReportStyle,
) -> Vec<String> {
    let money = |amount: f64| format_currency(amount, &style.currency_symbol);
    let total_investment = schedule.monthly_amount * f64::from(schedule.duration_months);
    let grams = total_investment / required_average;

    vec![
        format!(
            "Target: {} per annum over {} months",
            format_percentage(target_cagr),
            schedule.duration_months
        ),
        format!("Current gold price: {}/gram", money(current_price)),
        format!(
            "Required average purchase price: {}/gram",
            money(required_average)
        ),
        format!(
            "Gold needed for {} invested: {}",
            money(total_investment),
            format_weight(grams)
        ),
    ]
}
