use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use balancebook::balances::{BalanceSource, JsonFileBalanceSource};
use balancebook::config::{default_config_path, Config};
use balancebook::duration::format_duration;
use balancebook::format::format_usd_display;
use balancebook::market_data::providers::HttpPriceListSource;
use balancebook::market_data::PriceFeed;
use balancebook::normalize::PriceTable;
use balancebook::swap::SwapRequest;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "balancebook")]
#[command(about = "Normalize wallet balances for display")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(clap::Args)]
struct PriceArgs {
    /// JSON object mapping currency to USD price
    #[arg(long, conflicts_with = "fetch")]
    prices: Option<PathBuf>,

    /// Fetch prices from the configured price list
    #[arg(long)]
    fetch: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Filter, order and enrich a balances file
    Normalize {
        /// JSON array of {currency, amount, chain} records
        #[arg(long)]
        balances: PathBuf,

        #[command(flatten)]
        price_args: PriceArgs,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Fetch the configured price list and print the resulting table
    Prices,
    /// Quote a currency swap
    Swap {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: String,

        #[command(flatten)]
        price_args: PriceArgs,
    },
    /// Show current configuration
    Config,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn price_feed(config: &Config) -> PriceFeed {
    let source = HttpPriceListSource::new().with_url(config.prices.url.clone());
    let feed = PriceFeed::new(Arc::new(source)).with_retry(config.prices.retry.policy());
    match config.prices.staleness {
        Some(staleness) => feed.with_staleness(staleness),
        None => feed,
    }
}

fn read_price_file(path: &Path) -> Result<PriceTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prices file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse prices file: {}", path.display()))
}

/// A failed fetch degrades to an empty table: balances still normalize, just
/// without USD values.
async fn load_prices(config: &Config, args: &PriceArgs) -> Result<PriceTable> {
    if let Some(path) = &args.prices {
        return read_price_file(path);
    }
    if !args.fetch {
        return Ok(PriceTable::new());
    }

    let feed = price_feed(config);
    if let Err(e) = feed.refresh().await {
        warn!(error = %e, "Price fetch failed; continuing without prices");
    }
    Ok(feed.table().await)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)?;

    match cli.command {
        Command::Normalize {
            balances,
            price_args,
            format,
        } => {
            let records = JsonFileBalanceSource::new(balances).balances()?;
            let prices = load_prices(&config, &price_args).await?;
            let enriched = config
                .normalizer()
                .normalize(&records, &prices, &config.priorities)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&enriched)?),
                OutputFormat::Table => {
                    for balance in &enriched {
                        println!(
                            "{:<24} {:>6} {:>18} {:>18}",
                            balance.key().to_string(),
                            balance.priority,
                            balance.formatted_amount,
                            format_usd_display(balance.usd_value, &config.display),
                        );
                    }
                }
            }
        }
        Command::Prices => {
            let feed = price_feed(&config);
            feed.refresh().await?;
            println!("{}", serde_json::to_string_pretty(&feed.table().await)?);
        }
        Command::Swap {
            from,
            to,
            amount,
            price_args,
        } => {
            let prices = load_prices(&config, &price_args).await?;
            let quote = SwapRequest::new(from, to, amount).quote(&prices)?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("Price list: {}", config.prices.url);
            match config.prices.staleness {
                Some(d) => println!("Price staleness: {}", format_duration(d)),
                None => println!("Price staleness: none"),
            }
            let retry = &config.prices.retry;
            println!(
                "Retry: {} attempts, {} initial delay, {} max delay, x{}",
                retry.max_attempts,
                format_duration(retry.initial_delay),
                format_duration(retry.max_delay),
                retry.multiplier
            );
            println!("Amount decimals: {}", config.display.amount_decimals);
            println!("Chain priorities (unlisted: {}):", config.priorities.sentinel());
            for (chain, priority) in config.priorities.iter() {
                println!("  {chain:<16} {priority}");
            }
        }
    }

    Ok(())
}
