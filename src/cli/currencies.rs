use super::ui;
use crate::core::{CurrencyNameProvider, CurrencyNames};
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(name_provider: &dyn CurrencyNameProvider) -> Result<()> {
    let pb = ui::new_spinner("Fetching currencies...");
    let names = name_provider.currency_names().await;
    pb.finish_and_clear();

    println!("{}", render(&names?));
    Ok(())
}

pub fn render(names: &CurrencyNames) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for (code, name) in names {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }

    format!(
        "{}\n{}",
        table,
        ui::style_text(
            &format!("{} currencies available", names.len()),
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_codes_in_order() {
        let names = CurrencyNames::from([
            ("USD".to_string(), "United States Dollar".to_string()),
            ("EUR".to_string(), "Euro".to_string()),
        ]);
        let output = console::strip_ansi_codes(&render(&names)).to_string();
        assert!(output.find("EUR").unwrap() < output.find("USD").unwrap());
        assert!(output.contains("United States Dollar"));
        assert!(output.ends_with("2 currencies available"));
    }
}
