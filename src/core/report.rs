//! Human readable summaries of SIP results.
//!
//! Everything here is presentation only: number formatting, section layout
//! and qualitative insights keyed off the computed metrics.
use crate::core::price::{PriceQuote, QuoteSource};
use crate::core::sip::SipResult;

/// Months below which a plan is considered short for gold.
pub const SHORT_HORIZON_MONTHS: u32 = 36;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TIPS: [&str; 5] = [
    "Invest the same amount every month regardless of the gold price.",
    "Gold SIPs work best over a horizon of three years or more.",
    "Keep gold to around 5-15% of your overall portfolio.",
    "Gold pays no dividends or interest; returns come only from price changes.",
    "Digital gold avoids making charges and storage concerns of physical gold.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStyle {
    pub currency_symbol: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

/// A titled group of label/value lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
    pub insights: Vec<String>,
    pub tips: Vec<String>,
}

impl Report {
    pub fn to_markdown(&self) -> String {
        let mut out = format!("## {}\n", self.title);
        for section in &self.sections {
            out.push_str(&format!("\n### {}\n", section.title));
            for (label, value) in &section.lines {
                out.push_str(&format!("- {label}: {value}\n"));
            }
        }
        if !self.insights.is_empty() {
            out.push_str("\n### Insights\n");
            for insight in &self.insights {
                out.push_str(&format!("- {insight}\n"));
            }
        }
        if !self.tips.is_empty() {
            out.push_str("\n### Tips\n");
            for tip in &self.tips {
                out.push_str(&format!("- {tip}\n"));
            }
        }
        out
    }
}

/// Builds the full report for a calculation.
pub fn format(result: &SipResult, style: &ReportStyle) -> Report {
    let money = |amount: f64| format_currency(amount, &style.currency_symbol);
    let per_gram = |price: f64| format!("{}/gram", money(price));

    let mut details = vec![
        ("Monthly SIP".to_string(), money(result.schedule.monthly_amount)),
        (
            "Duration".to_string(),
            format!(
                "{} months ({:.1} years)",
                result.schedule.duration_months, result.duration_years
            ),
        ),
    ];
    if let (Some(start), Some(end)) = (result.schedule.start_date, result.schedule.end_date()) {
        details.push(("Start Date".to_string(), start.format(DATE_FORMAT).to_string()));
        details.push(("End Date".to_string(), end.format(DATE_FORMAT).to_string()));
    }
    details.push(("Total Invested".to_string(), money(result.total_investment)));

    let sections = vec![
        Section {
            title: "Investment Details".to_string(),
            lines: details,
        },
        Section {
            title: "Gold Purchase".to_string(),
            lines: vec![
                ("Average Gold Price".to_string(), per_gram(result.average_price)),
                ("Total Gold Purchased".to_string(), format_weight(result.total_units)),
            ],
        },
        Section {
            title: "Current Status".to_string(),
            lines: vec![
                ("Current Gold Price".to_string(), per_gram(result.current_price)),
                ("Current Value".to_string(), money(result.current_value)),
            ],
        },
        Section {
            title: "Returns".to_string(),
            lines: vec![
                (
                    "Profit/Loss".to_string(),
                    format!(
                        "{} ({})",
                        money(result.profit_loss),
                        format_percentage(result.profit_loss_percentage)
                    ),
                ),
                (
                    "CAGR".to_string(),
                    format!("{} per annum", format_percentage(result.cagr)),
                ),
            ],
        },
    ];

    Report {
        title: "Gold SIP Investment Summary".to_string(),
        sections,
        insights: insights(result),
        tips: TIPS.iter().map(|t| t.to_string()).collect(),
    }
}

/// Qualitative observations about a result, most important first.
pub fn insights(result: &SipResult) -> Vec<String> {
    let mut out = Vec::new();

    if result.profit_loss > 0.0 {
        out.push("Congratulations! Your investment is in profit.".to_string());
    } else if result.profit_loss < 0.0 {
        out.push(
            "Your investment is currently at a loss, but gold is a long-term investment."
                .to_string(),
        );
    } else {
        out.push("Your investment is currently at break-even.".to_string());
    }

    out.push(cagr_band(result.cagr).to_string());

    if result.schedule.duration_months < SHORT_HORIZON_MONTHS {
        out.push(format!(
            "A {} month horizon is short for gold; short-term price swings dominate returns. \
             Consider staying invested for at least {} months.",
            result.schedule.duration_months, SHORT_HORIZON_MONTHS
        ));
    }
    out
}

fn cagr_band(cagr: f64) -> &'static str {
    if cagr < 0.0 {
        "Negative annual growth: the current price is below your average purchase price."
    } else if cagr < 8.0 {
        "Modest annual growth, below what gold has historically delivered over long periods."
    } else if cagr < 15.0 {
        "Healthy annual growth, in line with gold's long-term track record."
    } else {
        "Exceptional annual growth; gold rarely sustains this pace over long periods."
    }
}

/// Warning to show next to a result valued with a price that may not be live.
pub fn price_notice(quote: &PriceQuote) -> Option<String> {
    match quote.source {
        QuoteSource::Mock => Some(
            "Live price unavailable, using a built-in indicative price. \
             Results may not reflect current market conditions."
                .to_string(),
        ),
        _ if quote.is_stale => Some(format!(
            "Live price unavailable, using the last known price from {}. \
             Results may not reflect current market conditions.",
            quote.fetched_at.format("%Y-%m-%d %H:%M UTC")
        )),
        _ => None,
    }
}

/// Formats an amount with thousands separators and two decimals, e.g. `₹1,234.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Amounts that round to zero are never shown as negative.
    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{grouped}.{fraction}")
}

pub fn format_weight(grams: f64) -> String {
    format!("{grams:.3} g")
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats a 0 to 1 confidence as a whole percentage, e.g. `95%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}
