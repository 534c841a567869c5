use super::ui;
use crate::core::report::{self, ReportStyle, format_confidence, format_currency};
use crate::core::resolver::{PriceResolver, Resolution};
use anyhow::Result;
use comfy_table::{Cell, Color};

pub async fn run(resolver: &PriceResolver, style: &ReportStyle) -> Result<()> {
    if resolver.provider_names().is_empty() {
        println!(
            "{}",
            ui::subtle("No price providers configured. Run `gold-sip setup` to create a config.")
        );
    }

    let resolution = ui::with_spinner(
        "Fetching live gold price...",
        resolver.resolve(resolver.default_timeout()),
    )
    .await;
    display_resolution(&resolution, style);
    Ok(())
}

fn display_resolution(resolution: &Resolution, style: &ReportStyle) {
    let quote = &resolution.quote;

    if !resolution.attempts.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Provider"),
            ui::header_cell("Status"),
            ui::header_cell("Detail"),
        ]);
        for attempt in &resolution.attempts {
            let (status, detail) = match &attempt.outcome {
                Ok(price) => (
                    Cell::new("OK").fg(Color::Green),
                    format!("{}/gram", format_currency(*price, &style.currency_symbol)),
                ),
                Err(e) => (Cell::new(e.reason.to_string()).fg(Color::Red), e.message.clone()),
            };
            table.add_row(vec![Cell::new(&attempt.provider), status, Cell::new(detail)]);
        }
        println!("{table}");
    }

    println!(
        "\n{} {}/gram",
        ui::style_text("Gold price:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format_currency(quote.price, &style.currency_symbol),
            ui::StyleType::TotalValue
        )
    );
    println!(
        "{}",
        ui::subtle(&format!(
            "Source: {} (fetched {})",
            quote.source,
            quote.fetched_at.format("%Y-%m-%d %H:%M UTC")
        ))
    );
    println!(
        "{} {}",
        ui::style_text("Confidence:", ui::StyleType::TotalLabel),
        format_confidence(quote.confidence)
    );
    if let Some(notice) = report::price_notice(quote) {
        println!("{}", ui::style_text(&notice, ui::StyleType::Warning));
    }
}
