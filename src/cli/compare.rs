use super::{normalize_code, resolve_base, ui};
use crate::core::{LatestRates, RateProvider};
use crate::core::ads::{AdPlacement, AdSenseConfig};
use crate::core::compare::Comparison;
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::Cell;

pub const DEFAULT_AMOUNT: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub base: Option<String>,
    pub currencies: Vec<String>,
    pub amount: f64,
    /// Currency the amount is given in; the first selected one when unset.
    pub from: Option<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            base: None,
            currencies: Vec::new(),
            amount: DEFAULT_AMOUNT,
            from: None,
        }
    }
}

/// Validates the selection and the source currency before anything is fetched.
fn prepare(options: &CompareOptions, config: &AppConfig) -> Result<(Comparison, String)> {
    let base = resolve_base(options.base.as_deref(), config);
    let selected = options.currencies.iter().map(|c| normalize_code(c)).collect();
    let comparison = Comparison::new(&base, selected)?;

    if !options.amount.is_finite() || options.amount < 0.0 {
        anyhow::bail!("Amount must be a non-negative number, got {}", options.amount);
    }

    let from = match options.from.as_deref() {
        Some(code) => normalize_code(code),
        None => comparison.selected()[0].clone(),
    };
    if !comparison.selected().contains(&from) {
        anyhow::bail!("{} is not one of the compared currencies", from);
    }
    Ok((comparison, from))
}

/// Every selected currency must have a rate against the base.
fn ensure_available(comparison: &Comparison, rates: &LatestRates) -> Result<()> {
    if let Some(missing) = comparison
        .selected()
        .iter()
        .find(|code| rates.rate_for(code).is_none())
    {
        anyhow::bail!(
            "{} is not an available currency. Available: {}",
            missing,
            rates.currencies().join(", ")
        );
    }
    Ok(())
}

pub async fn run(
    options: &CompareOptions,
    config: &AppConfig,
    rate_provider: &dyn RateProvider,
) -> Result<()> {
    let (comparison, from) = prepare(options, config)?;

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = rate_provider.latest_rates(comparison.base()).await;
    pb.finish_and_clear();
    let rates = rates?;
    ensure_available(&comparison, &rates)?;

    println!(
        "{}",
        render(&comparison, &rates, options.amount, &from, &config.adsense)
    );
    Ok(())
}

pub fn render(
    comparison: &Comparison,
    rates: &LatestRates,
    amount: f64,
    from: &str,
    ads: &AdSenseConfig,
) -> String {
    let base = comparison.base();
    let mut output = format!(
        "Comparing {} against {} as of {}\n\n",
        ui::style_text(&comparison.selected().join(", "), ui::StyleType::Title),
        base,
        rates.date
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {base})")),
    ]);
    for currency in comparison.rates(&rates.rates) {
        table.add_row(vec![Cell::new(&currency.code), ui::rate_cell(currency.rate)]);
    }
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{}", ui::ad_banner(ads, AdPlacement::Banner)));

    output.push_str(&format!(
        "\n\n{} {}\n\n",
        ui::style_text("Converting", ui::StyleType::Label),
        ui::style_text(&format!("{amount:.2} {from}"), ui::StyleType::Value)
    ));

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Amount")]);
    for converted in comparison.conversions(amount, from, &rates.rates) {
        table.add_row(vec![
            Cell::new(&converted.currency),
            ui::amount_cell(converted.amount),
        ]);
    }
    output.push_str(&table.to_string());
    output
}
