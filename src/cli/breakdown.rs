use super::ui;
use crate::core::report::{DATE_FORMAT, ReportStyle, format_currency, format_weight};
use crate::core::sip::PurchaseRow;
use anyhow::Result;
use comfy_table::Cell;

/// Prints a month by month purchase table for a varying price series.
pub fn run(rows: &[PurchaseRow], current_price: f64, style: &ReportStyle) -> Result<()> {
    let money = |amount: f64| format_currency(amount, &style.currency_symbol);

    println!(
        "\n{}",
        ui::style_text("Monthly Purchase Breakdown", ui::StyleType::Title)
    );
    let dated = rows.iter().any(|row| row.month_date.is_some());
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Month")];
    if dated {
        header.push(ui::header_cell("Date"));
    }
    header.extend([
        ui::header_cell("Gold Price"),
        ui::header_cell("Gold Bought"),
        ui::header_cell("Total Gold"),
        ui::header_cell("Invested"),
        ui::header_cell("Value"),
    ]);
    table.set_header(header);
    for row in rows {
        let mut cells = vec![Cell::new(row.month_index)];
        if dated {
            let date = row
                .month_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default();
            cells.push(Cell::new(date));
        }
        cells.extend([
            ui::right_cell(money(row.price)),
            ui::right_cell(format_weight(row.units_bought)),
            ui::right_cell(format_weight(row.cumulative_units)),
            ui::right_cell(money(row.cumulative_investment)),
            ui::signed_cell(
                row.value_at_current_price - row.cumulative_investment,
                money(row.value_at_current_price),
            ),
        ]);
        table.add_row(cells);
    }
    println!("{table}");

    if let Some(last) = rows.last() {
        // Effective average paid across the series.
        let average = last.cumulative_investment / last.cumulative_units;
        println!(
            "{} {}/gram, valued at {}/gram",
            ui::style_text("Average purchase price:", ui::StyleType::TotalLabel),
            money(average),
            money(current_price)
        );
    }
    Ok(())
}
