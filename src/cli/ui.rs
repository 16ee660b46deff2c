use crate::core::ads::{AdPlacement, AdScript, AdSenseConfig, AdSlot, AdSlotState};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
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

/// Right aligned exchange rate with four decimals.
pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Right aligned, bold money amount with two decimals.
pub fn amount_cell(amount: f64) -> Cell {
    Cell::new(format!("{amount:.2}"))
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: f64) -> Cell {
    let text = format!("{change:.2}%");
    if change >= 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    }
}

/// Creates a spinner shown while requests are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A terminal has no ad network to load, so every push fails.
struct TerminalAdScript;

impl AdScript for TerminalAdScript {
    fn is_available(&self) -> bool {
        false
    }

    fn push(&self, _slot_id: &str) -> anyhow::Result<()> {
        anyhow::bail!("No ad network available in a terminal")
    }
}

/// Placeholder text for an ad placement.
pub fn ad_banner(config: &AdSenseConfig, placement: AdPlacement) -> String {
    let script = TerminalAdScript;
    let mut slot = AdSlot::new(config.slot(placement).unwrap_or_default());
    if slot.mount(config, &script) == AdSlotState::Pending {
        slot.timeout_elapsed(&script);
    }

    let text = match slot.state() {
        AdSlotState::Pushed => format!("[ad {}]", slot.slot_id()),
        _ if !config.is_configured() || slot.slot_id().is_empty() => "Ad space".to_string(),
        _ => "Advertisement".to_string(),
    };
    style_text(&text, StyleType::Subtle)
}
