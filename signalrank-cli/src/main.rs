//! SignalRank CLI — score prediction batches, inspect symbol resolution.
//!
//! Commands:
//! - `score` — run the full pipeline over a predictions JSON file and write
//!   the ranked artifacts (full_ranked / selected, CSV + JSON)
//! - `resolve` — show how a raw symbol maps to a canonical asset

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use signalrank_core::config::ScoringConfig;
use signalrank_core::data::{
    AssetResolver, FundamentalsProvider, MarketDataProvider, SyntheticMarketData,
};
use signalrank_runner::{
    load_predictions_json, save_outputs, score_batch, CsvMarketData, FixedFundamentals, Providers,
};

#[derive(Parser)]
#[command(
    name = "signalrank",
    about = "SignalRank CLI — prediction reliability scoring and selection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a predictions batch and write ranked outputs.
    Score {
        /// Predictions JSON file (a list, or {"predictions": [...]}).
        #[arg(long)]
        predictions: PathBuf,

        /// Directory of per-asset bar files: {CANONICAL}_1h.csv / {CANONICAL}_1d.csv.
        #[arg(long)]
        market_dir: Option<PathBuf>,

        /// Use deterministic synthetic market data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for synthetic market data.
        #[arg(long, default_value_t = 42)]
        synthetic_seed: u64,

        /// Scoring configuration TOML; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Flat fundamentals score in [0,1] applied to every asset.
        #[arg(long)]
        fundamentals: Option<f64>,

        /// Output directory for the ranked artifacts.
        #[arg(long, default_value = "outputs")]
        output_dir: PathBuf,

        /// How many top rows to print.
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
    /// Resolve a raw symbol to its canonical asset.
    Resolve {
        /// Symbol as it appears in submissions (BTCUSDT, EURUSD=X, ^GSPC, ...).
        symbol: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            predictions,
            market_dir,
            synthetic,
            synthetic_seed,
            config,
            fundamentals,
            output_dir,
            show,
        } => run_score(
            predictions,
            market_dir,
            synthetic,
            synthetic_seed,
            config,
            fundamentals,
            output_dir,
            show,
        ),
        Commands::Resolve { symbol } => run_resolve(&symbol),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_score(
    predictions_path: PathBuf,
    market_dir: Option<PathBuf>,
    synthetic: bool,
    synthetic_seed: u64,
    config_path: Option<PathBuf>,
    fundamentals: Option<f64>,
    output_dir: PathBuf,
    show: usize,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ScoringConfig::from_toml_str(&content)?
        }
        None => ScoringConfig::default(),
    };
    // Surface configuration problems before touching any data.
    config.validate()?;

    let loaded = load_predictions_json(&predictions_path)?;
    println!(
        "Loaded {} predictions ({} rejected at load)",
        loaded.predictions.len(),
        loaded.rejected.len()
    );
    for r in &loaded.rejected {
        eprintln!(
            "  rejected {}: {}",
            r.submission_id.as_deref().unwrap_or("<no id>"),
            r.reason
        );
    }

    let market: Box<dyn MarketDataProvider> = match (&market_dir, synthetic) {
        (Some(_), true) => bail!("--market-dir and --synthetic are mutually exclusive"),
        (Some(dir), false) => Box::new(CsvMarketData::new(dir)),
        (None, true) => Box::new(SyntheticMarketData::new(synthetic_seed)),
        (None, false) => bail!("provide --market-dir or --synthetic"),
    };

    let fundamentals_provider: Option<Box<dyn FundamentalsProvider>> = fundamentals
        .map(|score| Box::new(FixedFundamentals::new(score)) as Box<dyn FundamentalsProvider>);

    let providers = Providers {
        market: market.as_ref(),
        fundamentals: fundamentals_provider.as_deref(),
        depth: None,
    };

    let mut result = score_batch(loaded.predictions, &providers, &config)?;
    result.rejected.extend(loaded.rejected);

    let written = save_outputs(&result, &output_dir)?;

    println!(
        "\nScored {} predictions, {} selected, {} rejected",
        result.rows.len(),
        result.selected_count(),
        result.rejected.len()
    );

    println!("\n=== TOP RANKED ===");
    println!(
        "{:<4} {:<10} {:<10} {:<6} {:>8} {:>8} {:>9}  {}",
        "#", "source", "asset", "dir", "conf", "struct", "final", "selected"
    );
    for (i, row) in result.rows.iter().take(show).enumerate() {
        println!(
            "{:<4} {:<10} {:<10} {:<6} {:>8.3} {:>8.3} {:>9.4}  {}",
            i + 1,
            row.prediction.source,
            row.prediction.asset,
            row.prediction.direction.to_string(),
            row.prediction.confidence,
            row.breakdown.structural_reliability,
            row.breakdown.final_score,
            if row.selected { "yes" } else { "no" },
        );
        if let Some(gate) = &row.gate {
            println!("     gated: {}", gate.reason());
        }
    }

    println!("\nArtifacts:");
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}

fn run_resolve(symbol: &str) -> Result<()> {
    let resolver = AssetResolver::new();
    match resolver.resolve(symbol) {
        Ok(info) => {
            println!("canonical:    {}", info.canonical);
            println!("class:        {:?}", info.class);
            println!("feed_symbol:  {}", info.feed_symbol);
            println!(
                "depth_symbol: {}",
                info.depth_symbol.as_deref().unwrap_or("-")
            );
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}
