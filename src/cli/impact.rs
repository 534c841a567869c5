use super::ui;
use crate::core::report::{ReportStyle, format_currency, format_percentage, format_weight};
use crate::core::sip::AmountScenario;
use anyhow::Result;
use comfy_table::Cell;

/// Compares outcomes for larger and smaller monthly contributions.
pub fn run(scenarios: &[AmountScenario], style: &ReportStyle) -> Result<()> {
    let money = |amount: f64| format_currency(amount, &style.currency_symbol);

    println!(
        "\n{}",
        ui::style_text("Investment Amount Impact", ui::StyleType::Title)
    );
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Scenario"),
        ui::header_cell("Monthly SIP"),
        ui::header_cell("Total Invested"),
        ui::header_cell("Gold"),
        ui::header_cell("Current Value"),
        ui::header_cell("Profit/Loss"),
    ]);
    for scenario in scenarios {
        let base = scenario.multiplier == 1.0;
        let result = &scenario.result;
        table.add_row(vec![
            Cell::new(format!("{}x", scenario.multiplier)),
            ui::highlight_cell(money(scenario.monthly_amount), base),
            ui::highlight_cell(money(result.total_investment), base),
            ui::highlight_cell(format_weight(result.total_units), base),
            ui::highlight_cell(money(result.current_value), base),
            ui::signed_cell(
                result.profit_loss,
                format!(
                    "{} ({})",
                    money(result.profit_loss),
                    format_percentage(result.profit_loss_percentage)
                ),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}
