use super::{normalize_code, resolve_base, ui};
use crate::core::config::AppConfig;
use crate::core::{RateProvider, try_convert};
use anyhow::{Context, Result};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub base: Option<String>,
}

pub async fn run(
    options: &ConvertOptions,
    config: &AppConfig,
    rate_provider: &dyn RateProvider,
) -> Result<()> {
    if !options.amount.is_finite() {
        anyhow::bail!("Amount must be a number, got {}", options.amount);
    }
    let base = resolve_base(options.base.as_deref(), config);
    let from = normalize_code(&options.from);
    let to = normalize_code(&options.to);

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = rate_provider.latest_rates(&base).await;
    pb.finish_and_clear();
    let rates = rates?;

    let converted = try_convert(options.amount, &from, &to, &rates.base, &rates.rates)
        .with_context(|| format!("Cannot convert {from} to {to}"))?;

    println!("{}", render(options.amount, &from, converted, &to, rates.date));
    Ok(())
}

pub fn render(amount: f64, from: &str, converted: f64, to: &str, date: NaiveDate) -> String {
    format!(
        "{} = {}\n{}",
        ui::style_text(&format!("{amount:.2} {from}"), ui::StyleType::Label),
        ui::style_text(&format!("{converted:.2} {to}"), ui::StyleType::Value),
        ui::style_text(&format!("Rates as of {date}"), ui::StyleType::Subtle)
    )
}
