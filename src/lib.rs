pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::compare::CompareOptions;
use crate::cli::convert::ConvertOptions;
use crate::cli::history::HistoryOptions;
use crate::cli::rates::RatesOptions;
use crate::core::config::AppConfig;
use crate::providers::frankfurter::{FetchPolicy, FrankfurterProvider};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rates(RatesOptions),
    Compare(CompareOptions),
    Convert(ConvertOptions),
    History(HistoryOptions),
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxview starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = FrankfurterProvider::new(
        config.frankfurter_base_url(),
        FetchPolicy::from(&config.refresh),
    )?;

    match command {
        AppCommand::Rates(options) => cli::rates::run(&options, &config, &provider, &provider).await,
        AppCommand::Compare(options) => cli::compare::run(&options, &config, &provider).await,
        AppCommand::Convert(options) => cli::convert::run(&options, &config, &provider).await,
        AppCommand::History(options) => cli::history::run(&options, &config, &provider).await,
        AppCommand::Currencies => cli::currencies::run(&provider).await,
    }
}
