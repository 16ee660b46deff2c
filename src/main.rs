use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxview::cli::compare::{CompareOptions, DEFAULT_AMOUNT};
use fxview::cli::convert::ConvertOptions;
use fxview::cli::history::HistoryOptions;
use fxview::cli::rates::RatesOptions;
use fxview::core::DateRangePreset;
use fxview::core::log::init_logging;
use fxview::core::table::{SortDirection, SortField, SortState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxview::AppCommand {
    fn from(cmd: Commands) -> fxview::AppCommand {
        match cmd {
            Commands::Rates {
                base,
                search,
                sort,
                desc,
                watch,
            } => fxview::AppCommand::Rates(RatesOptions {
                base,
                search: search.unwrap_or_default(),
                sort: SortState::new(
                    sort,
                    if desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    },
                ),
                watch,
            }),
            Commands::Compare {
                currencies,
                base,
                amount,
                from,
            } => fxview::AppCommand::Compare(CompareOptions {
                base,
                currencies,
                amount,
                from,
            }),
            Commands::Convert {
                amount,
                from,
                to,
                base,
            } => fxview::AppCommand::Convert(ConvertOptions {
                amount,
                from,
                to,
                base,
            }),
            Commands::History {
                target,
                base,
                range,
                output,
            } => fxview::AppCommand::History(HistoryOptions {
                base,
                target,
                range,
                output,
            }),
            Commands::Currencies => fxview::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest exchange rates
    Rates {
        /// Base currency (defaults to the configured one)
        #[arg(short, long)]
        base: Option<String>,
        /// Only show currencies whose code or name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Column to sort by: code, name or rate
        #[arg(long, default_value_t = SortField::Code)]
        sort: SortField,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
        /// Keep refreshing the rates until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Compare two or three currencies side by side
    Compare {
        #[arg(num_args = 1.., required = true)]
        currencies: Vec<String>,
        #[arg(short, long)]
        base: Option<String>,
        /// Amount to convert between the compared currencies
        #[arg(short, long, default_value_t = DEFAULT_AMOUNT)]
        amount: f64,
        /// Currency the amount is given in
        #[arg(short, long)]
        from: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        from: String,
        to: String,
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Display historical rates for a currency pair
    History {
        /// Currency to chart against the base
        target: String,
        #[arg(short, long)]
        base: Option<String>,
        /// Period to display: 7D, 1M, 3M or 1Y
        #[arg(short, long, default_value_t = DateRangePreset::OneMonth)]
        range: DateRangePreset,
        /// Write an SVG chart to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List supported currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxview::cli::setup::setup(),
        Some(cmd) => fxview::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
