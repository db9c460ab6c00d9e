//! Chain Screener Binary
//!
//! Loads the run configuration, acquires one option chain (from a snapshot
//! file or live from Tradier), screens it and prints the ranked results to
//! stdout. Logs go to stderr.
//!
//! # Environment
//!
//! - `SCREENER_CONFIG`: config path (default: `config.json`)
//! - `SCREENER_SNAPSHOT`: snapshot path; when unset the chain is fetched live
//! - `SCREENER_SYMBOL`, `TRADIER_TOKEN`: required for a live fetch
//! - `TRADIER_BASE_URL`: optional API root override
//! - `SCREENER_OUTPUT`: `table` (default) or `json`
//! - `RUST_LOG`: overrides the configured log level

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chain_screener::config::{DEFAULT_CONFIG_PATH, ScreenConfig, load_config};
use chain_screener::feed::{
    ChainFetcher, ChainUniverse, RateLimiter, TradierClient, TradierConfig, load_snapshot,
};
use chain_screener::screening::{StrategyFactory, project, rank, render_table, top};
use chain_screener::telemetry::init_tracing;

/// Where the chain comes from.
#[derive(Debug)]
enum ChainInput {
    Snapshot(PathBuf),
    Live {
        symbol: String,
        token: String,
        base_url: Option<String>,
    },
}

/// Result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path =
        std::env::var("SCREENER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(Some(&config_path))
        .with_context(|| format!("loading config from {config_path}"))?;

    init_tracing(&config.logging).context("initializing tracing")?;

    let input = parse_input()?;
    let output = parse_output()?;
    log_config(&config, &input);

    let as_of = chrono::Local::now().date_naive();
    let universe = acquire(input, as_of).await?;

    let factory = StrategyFactory::new(&universe.options, universe.spot);
    let mut strategies = factory
        .generate(&config.strategy_filter, &config.config_filter)
        .context("screening chain")?;

    let key = config.ranking.rank_key();
    rank(&mut strategies, key);
    let rows = project(top(&strategies, config.ranking.top_n));

    tracing::info!(
        symbol = %universe.symbol,
        candidates = strategies.len(),
        shown = rows.len(),
        rank_key = ?key,
        "Results ready"
    );

    match output {
        OutputFormat::Table => print!("{}", render_table(&rows)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).context("serializing results")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Resolve the chain source from the environment.
fn parse_input() -> anyhow::Result<ChainInput> {
    if let Ok(path) = std::env::var("SCREENER_SNAPSHOT")
        && !path.is_empty()
    {
        return Ok(ChainInput::Snapshot(PathBuf::from(path)));
    }

    let symbol = std::env::var("SCREENER_SYMBOL").unwrap_or_default();
    let token = std::env::var("TRADIER_TOKEN").unwrap_or_default();
    if symbol.trim().is_empty() || token.is_empty() {
        bail!("set SCREENER_SNAPSHOT, or SCREENER_SYMBOL and TRADIER_TOKEN for a live fetch");
    }

    Ok(ChainInput::Live {
        symbol,
        token,
        base_url: std::env::var("TRADIER_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty()),
    })
}

fn parse_output() -> anyhow::Result<OutputFormat> {
    let value = std::env::var("SCREENER_OUTPUT").unwrap_or_default();
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => bail!("SCREENER_OUTPUT must be 'table' or 'json', got '{other}'"),
    }
}

/// Log the parsed configuration.
fn log_config(config: &ScreenConfig, input: &ChainInput) {
    let source = match input {
        ChainInput::Snapshot(path) => path.display().to_string(),
        ChainInput::Live { symbol, .. } => format!("tradier:{symbol}"),
    };
    tracing::info!(
        source = %source,
        single_calls = config.strategy_filter.single_calls,
        iron_condors = config.strategy_filter.iron_condors,
        straddles = config.strategy_filter.straddles,
        strangles = config.strategy_filter.strangles,
        forward_vols = config.strategy_filter.forward_vols,
        rank_key = %config.ranking.key,
        top_n = config.ranking.top_n,
        "Configuration loaded"
    );
}

async fn acquire(input: ChainInput, as_of: chrono::NaiveDate) -> anyhow::Result<ChainUniverse> {
    match input {
        ChainInput::Snapshot(path) => load_snapshot(&path, as_of)
            .with_context(|| format!("loading snapshot {}", path.display())),
        ChainInput::Live {
            symbol,
            token,
            base_url,
        } => {
            let mut tradier = TradierConfig::new(token);
            if let Some(url) = base_url {
                tradier = tradier.with_base_url(url);
            }
            let client = TradierClient::new(tradier).context("building Tradier client")?;
            let fetcher = ChainFetcher::new(Arc::new(client), Arc::new(RateLimiter::default()));

            let snapshot = fetcher
                .fetch_snapshot(&symbol)
                .await
                .with_context(|| format!("fetching chain for {symbol}"))?;
            snapshot
                .into_universe(as_of)
                .with_context(|| format!("building universe for {symbol}"))
        }
    }
}
