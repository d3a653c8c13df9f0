//! featurelab command line
//!
//! Builds ML feature tables from daily OHLCV CSV exports and reports the
//! market regime from index/VIX/breadth histories.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use featurelab::application::features::{FeatureEngineer, build_feature_tables};
use featurelab::application::regime::{MarketRegimeClassifier, RegimeCache};
use featurelab::config::{FeatureConfig, RegimeEnvConfig};
use featurelab::domain::market::feature_table::FeatureTable;
use featurelab::domain::market::history_period::HistoryPeriod;
use featurelab::domain::ports::PriceDataSource;
use featurelab::infrastructure::{CsvDataSource, read_ohlcv_csv, write_csv, write_json};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Technical indicator feature builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the feature table for one OHLCV CSV file
    Features(FeaturesArgs),
    /// Build feature tables for several tickers of a data directory in parallel
    Batch(BatchArgs),
    /// Classify the market regime from index, VIX and breadth histories
    Regime {
        /// Directory with one <TICKER>.csv per ticker (default: REGIME_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Include the market breadth check
        #[arg(long)]
        breadth: bool,
    },
}

#[derive(Args)]
struct FeaturesArgs {
    /// CSV with Date,Open,High,Low,Close,Volume columns
    #[arg(short, long)]
    input: PathBuf,

    /// Ticker symbol (default: input file stem)
    #[arg(long)]
    symbol: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Keep rows with undefined cells
    #[arg(long)]
    keep_undefined: bool,

    /// Number of features to rank by target correlation (0 to skip)
    #[arg(long)]
    top: Option<usize>,

    /// TOML feature configuration (default: environment variables)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Directory with one <TICKER>.csv per ticker
    #[arg(long)]
    data_dir: PathBuf,

    /// Comma-separated list of tickers
    #[arg(short, long, default_value = "SPY,QQQ")]
    tickers: String,

    /// Directory receiving <TICKER>_features.<format>
    #[arg(short, long, default_value = "features")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Keep rows with undefined cells
    #[arg(long)]
    keep_undefined: bool,

    /// TOML feature configuration (default: environment variables)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    fn write<W: Write>(&self, table: &FeatureTable, writer: W) -> Result<()> {
        match self {
            OutputFormat::Csv => write_csv(table, writer).context("Failed to write CSV")?,
            OutputFormat::Json => write_json(table, writer).context("Failed to write JSON")?,
        }
        Ok(())
    }
}

fn load_feature_config(path: Option<&Path>) -> Result<FeatureConfig> {
    match path {
        Some(path) => {
            info!("Loading feature config from: {}", path.display());
            FeatureConfig::from_toml_file(path)
        }
        None => FeatureConfig::from_env(),
    }
}

fn run_features(args: FeaturesArgs) -> Result<()> {
    let config = load_feature_config(args.config.as_deref())?;
    let symbol = match args.symbol {
        Some(symbol) => symbol,
        None => args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .context("Cannot derive a symbol from the input path, pass --symbol")?,
    };

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let ohlcv = read_ohlcv_csv(BufReader::new(file), &symbol)?;
    info!("Loaded {} rows for {}", ohlcv.len(), symbol);

    let engineer = FeatureEngineer::with_config(&ohlcv, config)?.build_all_features()?;
    let top_n = args.top.unwrap_or(engineer.config().top_n);
    let table = engineer.features(!args.keep_undefined);
    info!("Feature table: {} rows x {} columns", table.len(), table.width());

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            args.format.write(&table, BufWriter::new(file))?;
            info!("Features written to {}", path.display());
        }
        None => args.format.write(&table, std::io::stdout().lock())?,
    }

    if top_n > 0 {
        info!("Top {} features by target correlation:", top_n);
        for (rank, item) in engineer.correlation_with_target(top_n)?.iter().enumerate() {
            info!("  {:>2}. {:<24} {:.4}", rank + 1, item.feature, item.correlation);
        }
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let config = load_feature_config(args.config.as_deref())?;
    let source = CsvDataSource::new(&args.data_dir);
    info!("Reading ticker histories from {}", source.dir().display());

    let tables: Vec<_> = args
        .tickers
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|ticker| match source.fetch_history(ticker, HistoryPeriod::Max) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("Skipping {}: {}", ticker, e);
                None
            }
        })
        .collect();

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    for built in build_feature_tables(&tables, &config) {
        let table = match built.result {
            Ok(table) if args.keep_undefined => table,
            Ok(table) => table.drop_undefined_rows(),
            Err(_) => continue,
        };
        let path = args.output_dir.join(format!(
            "{}_features.{}",
            built.symbol,
            args.format.extension()
        ));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        args.format.write(&table, BufWriter::new(file))?;
        info!("{}: {} rows written to {}", built.symbol, table.len(), path.display());
    }
    Ok(())
}

fn run_regime(data_dir: Option<PathBuf>, breadth: bool) -> Result<()> {
    let env = RegimeEnvConfig::from_env().context("Failed to load regime config")?;
    let source = CsvDataSource::new(data_dir.unwrap_or_else(|| env.data_dir.clone()));
    info!("Reading market histories from {}", source.dir().display());

    let classifier = MarketRegimeClassifier::new(Arc::new(source));
    let mut cache = RegimeCache::new(env.cache_ttl());
    debug!("Regime cache TTL: {} minutes", cache.ttl().num_minutes());

    let check_breadth = breadth || env.check_breadth;
    if check_breadth {
        info!(
            "Breadth check over {} tickers",
            classifier.breadth_tickers().len()
        );
    }
    let verdict = classifier.get_regime(&mut cache, check_breadth, Utc::now());

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the exported table, logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Features(args) => run_features(args),
        Commands::Batch(args) => run_batch(args),
        Commands::Regime { data_dir, breadth } => run_regime(data_dir, breadth),
    }
}
