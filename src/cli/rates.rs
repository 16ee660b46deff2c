use super::{resolve_base, ui};
use crate::core::ads::{AdPlacement, AdSenseConfig};
use crate::core::config::AppConfig;
use crate::core::table::{SortDirection, SortState, build_rows};
use crate::core::{CurrencyNameProvider, CurrencyNames, LatestRates, RateProvider};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use futures::future::join;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct RatesOptions {
    pub base: Option<String>,
    pub search: String,
    pub sort: SortState,
    pub watch: bool,
}

pub async fn run(
    options: &RatesOptions,
    config: &AppConfig,
    rate_provider: &dyn RateProvider,
    name_provider: &dyn CurrencyNameProvider,
) -> Result<()> {
    let base = resolve_base(options.base.as_deref(), config);

    if !options.watch {
        let output = fetch_and_render(options, config, &base, rate_provider, name_provider).await?;
        println!("{output}");
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };
    watch(options, config, &base, rate_provider, name_provider, shutdown).await
}

/// Refreshes the table every `interval_secs` until `shutdown` completes.
///
/// A refresh in progress is abandoned as soon as `shutdown` fires.
async fn watch<S>(
    options: &RatesOptions,
    config: &AppConfig,
    base: &str,
    rate_provider: &dyn RateProvider,
    name_provider: &dyn CurrencyNameProvider,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()>,
{
    let every = Duration::from_secs(config.refresh.interval_secs.max(1));
    info!("Refreshing {} rates every {:?}", base, every);
    let mut interval = tokio::time::interval(every);
    let term = console::Term::stdout();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => break,
        }

        let refreshed = tokio::select! {
            result = fetch_and_render(options, config, base, rate_provider, name_provider) => result,
            _ = &mut shutdown => break,
        };
        match refreshed {
            Ok(output) => {
                term.clear_screen()?;
                println!("{output}");
                println!(
                    "\n{}",
                    ui::style_text("Press Ctrl-C to stop", ui::StyleType::Subtle)
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to refresh exchange rates");
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Error loading exchange rates: {e}. Retrying on next refresh."),
                        ui::StyleType::Error
                    )
                );
            }
        }
    }
    debug!("Stopped watching {} rates", base);
    Ok(())
}

async fn fetch_and_render(
    options: &RatesOptions,
    config: &AppConfig,
    base: &str,
    rate_provider: &dyn RateProvider,
    name_provider: &dyn CurrencyNameProvider,
) -> Result<String> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let (rates, names) = join(
        rate_provider.latest_rates(base),
        name_provider.currency_names(),
    )
    .await;
    pb.finish_and_clear();

    let rates = rates?;
    // Names only decorate the table
    let names = names.unwrap_or_else(|e| {
        warn!(error = %e, "Currency names unavailable");
        CurrencyNames::new()
    });

    Ok(render(&rates, &names, options, &config.adsense))
}

/// Renders the rate table for `rates`, filtered and sorted per `options`.
pub fn render(
    rates: &LatestRates,
    names: &CurrencyNames,
    options: &RatesOptions,
    ads: &AdSenseConfig,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n\n", ui::ad_banner(ads, AdPlacement::Top)));

    output.push_str(&format!(
        "Exchange rates for 1 {} as of {}\n\n",
        ui::style_text(&rates.base, ui::StyleType::Title),
        rates.date
    ));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {})", rates.base)),
    ]);

    let rows = build_rows(&rates.rates, names, &options.search, options.sort);
    let shown = rows.len();
    if rows.is_empty() {
        table.add_row(vec![
            Cell::new(format!(
                "No currencies found matching \"{}\"",
                options.search
            ))
            .set_alignment(CellAlignment::Center),
        ]);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.code),
            Cell::new(&row.name),
            ui::rate_cell(row.rate),
        ]);
    }
    output.push_str(&table.to_string());

    let direction = match options.sort.direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    };
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!(
                "Showing {} of {} currencies, sorted by {} ({direction})",
                shown,
                rates.rates.len(),
                options.sort.field
            ),
            ui::StyleType::Subtle
        )
    ));

    output.push_str(&format!("\n\n{}", ui::ad_banner(ads, AdPlacement::Footer)));
    output
}
