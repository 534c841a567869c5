use super::ui;
use crate::core::price::{LivePrice, PriceQuote};
use crate::core::report::{self, Report, ReportStyle, format_confidence};
use crate::core::sip::{SipMetrics, SipResult};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Serialize;

#[derive(Serialize)]
struct CalculateOutput {
    #[serde(flatten)]
    metrics: SipMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<LivePrice>,
}

/// Prints the metrics as JSON, including where the current price came from.
pub fn render_json(result: &SipResult, quote: Option<&PriceQuote>) -> Result<String> {
    let output = CalculateOutput {
        metrics: result.metrics(),
        price: quote.map(LivePrice::from),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize SIP metrics")
}

pub fn run(
    result: &SipResult,
    quote: Option<&PriceQuote>,
    style: &ReportStyle,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", render_json(result, quote)?);
        return Ok(());
    }

    let report = report::format(result, style);
    display_report(&report, result);

    if let Some(notice) = quote.and_then(report::price_notice) {
        println!("\n{}", ui::style_text(&notice, ui::StyleType::Warning));
    } else if let Some(q) = quote {
        let line = format!(
            "Current price from {} at {} (confidence {})",
            q.source,
            q.fetched_at.format("%Y-%m-%d %H:%M UTC"),
            format_confidence(q.confidence)
        );
        println!("\n{}", ui::subtle(&line));
    }
    Ok(())
}

fn display_report(report: &Report, result: &SipResult) {
    println!("\n{}", ui::style_text(&report.title, ui::StyleType::Title));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Section"),
        ui::header_cell("Metric"),
        ui::header_cell("Value"),
    ]);
    for section in &report.sections {
        for (i, (label, value)) in section.lines.iter().enumerate() {
            let section_cell = if i == 0 {
                Cell::new(&section.title)
            } else {
                Cell::new("")
            };
            let value_cell = match signed_value(label, result) {
                Some(sign) => ui::signed_cell(sign, value.as_str()),
                None => ui::right_cell(value.as_str()),
            };
            table.add_row(vec![section_cell, Cell::new(label), value_cell]);
        }
    }
    println!("{table}");

    ui::print_list("Insights", &report.insights, |s| s.to_string());
    ui::print_list("Tips", &report.tips, ui::subtle);
}

/// The metric whose sign colours a report line, for lines that carry one.
fn signed_value(label: &str, result: &SipResult) -> Option<f64> {
    match label {
        "Profit/Loss" => Some(result.profit_loss),
        "CAGR" => Some(result.cagr),
        _ => None,
    }
}
