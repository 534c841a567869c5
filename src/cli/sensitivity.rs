use super::ui;
use crate::core::report::{ReportStyle, format_currency, format_percentage};
use crate::core::sip::SensitivityPoint;
use anyhow::Result;
use comfy_table::Cell;

/// Shows how returns change if the current price moves by each offset.
pub fn run(points: &[SensitivityPoint], style: &ReportStyle) -> Result<()> {
    println!(
        "\n{}",
        ui::style_text("Price Sensitivity Analysis", ui::StyleType::Title)
    );

    let money = |amount: f64| format_currency(amount, &style.currency_symbol);
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Price Change"),
        ui::header_cell("Gold Price"),
        ui::header_cell("Current Value"),
        ui::header_cell("Profit/Loss"),
        ui::header_cell("Returns"),
        ui::header_cell("CAGR"),
    ]);

    for point in points {
        let base = point.offset == 0.0;
        let result = &point.result;
        table.add_row(vec![
            Cell::new(format!("{:+.0}%", point.offset * 100.0)),
            ui::highlight_cell(money(point.current_price), base),
            ui::highlight_cell(money(result.current_value), base),
            ui::signed_cell(result.profit_loss, money(result.profit_loss)),
            ui::signed_cell(
                result.profit_loss_percentage,
                format_percentage(result.profit_loss_percentage),
            ),
            ui::signed_cell(result.cagr, format_percentage(result.cagr)),
        ]);
    }
    println!("{table}");
    Ok(())
}
