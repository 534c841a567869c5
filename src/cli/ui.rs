use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Warning => style(text).yellow().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn right_cell(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// Right aligned cell, green when `value` is non-negative and red otherwise.
pub fn signed_cell(value: f64, text: impl Into<String>) -> Cell {
    let color = if value >= 0.0 { Color::Green } else { Color::Red };
    right_cell(text).fg(color)
}

/// Highlights the row matching the user's own inputs.
pub fn highlight_cell(text: impl Into<String>, highlighted: bool) -> Cell {
    let cell = right_cell(text);
    if highlighted {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

/// Runs `future` while a spinner with `message` is shown on stderr.
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Bullet lines for `items`, each passed through `style_item`.
pub fn list_lines(items: &[String], style_item: impl Fn(&str) -> String) -> Vec<String> {
    items
        .iter()
        .map(|item| format!("  • {}", style_item(item)))
        .collect()
}

/// Prints a bulleted list under a bold heading.
pub fn print_list(heading: &str, items: &[String], style_item: impl Fn(&str) -> String) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", style_text(heading, StyleType::TotalLabel));
    for line in list_lines(items, style_item) {
        println!("{line}");
    }
}

pub fn subtle(text: &str) -> String {
    style_text(text, StyleType::Subtle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_lines_apply_item_style() {
        let items = vec!["buy monthly".to_string(), "hold long".to_string()];

        assert_eq!(
            list_lines(&items, |s| s.to_string()),
            vec!["  • buy monthly", "  • hold long"]
        );
        assert_eq!(
            list_lines(&items, |s| s.to_uppercase()),
            vec!["  • BUY MONTHLY", "  • HOLD LONG"]
        );
        assert!(list_lines(&[], subtle).is_empty());
    }
}
