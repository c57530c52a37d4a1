//! Command-line interface: argument parsing and wiring.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use cycle_time_metrics::adapters::export::{
    render_analysis_report, render_extraction_summary, FileMetricsStore,
};
use cycle_time_metrics::adapters::tracker::{
    ExecutorConfig, FailoverIssueSource, NoOpEventCallback, ResilientExecutor, TrackerEndpoints,
};
use cycle_time_metrics::adapters::{ReqwestTransport, ReqwestTransportConfig, SystemClock};
use cycle_time_metrics::application::{
    AnalyzeCycleTimesCommand, AnalyzeCycleTimesError, AnalyzeCycleTimesHandler,
    ExtractMetricsCommand, ExtractMetricsError, ExtractMetricsHandler,
};
use cycle_time_metrics::config::{
    AppConfig, ConfigError, CycleConfig, QueryPreset, ValidationError,
};
use cycle_time_metrics::domain::analysis::{
    OutlierMethod, DEFAULT_PERCENTILE_LOWER, DEFAULT_PERCENTILE_UPPER, DEFAULT_ZSCORE_THRESHOLD,
};
use cycle_time_metrics::domain::replay::ReplayEngine;
use cycle_time_metrics::ports::{MetricsStore, TransportError};

/// Average cycle time (days) above which the summary suggests analysis.
const HIGH_AVERAGE_DAYS: f64 = 15.0;

/// Extract and analyze issue cycle times from the tracker.
#[derive(Debug, Parser)]
#[command(name = "cycle-metrics", version, about)]
pub struct Cli {
    /// More log output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch issues, compute cycle times, and export them
    Extract(ExtractArgs),

    /// Outlier analysis over an exported CSV
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Query to run (overrides --preset)
    #[arg(long)]
    pub query: Option<String>,

    /// Named query built from the configured project
    #[arg(long, value_enum)]
    pub preset: Option<QueryPreset>,

    /// Maximum number of issues to process
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Statuses counted as cycle time (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub statuses: Vec<String>,

    /// Requests per minute
    #[arg(long)]
    pub rate_limit: Option<u32>,

    /// Output CSV path
    #[arg(long, default_value = "metrics.csv")]
    pub output: PathBuf,

    /// Also write detailed JSON next to the CSV
    #[arg(long)]
    pub json: bool,

    /// Run IQR outlier analysis on the export
    #[arg(long)]
    pub analyze: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// CSV produced by `extract`
    pub csv_file: PathBuf,

    #[command(flatten)]
    pub outliers: OutlierArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OutlierArgs {
    /// Outlier removal method
    #[arg(long, value_enum, default_value = "iqr")]
    pub method: MethodArg,

    /// Z-score threshold
    #[arg(long, default_value_t = DEFAULT_ZSCORE_THRESHOLD)]
    pub zscore_threshold: f64,

    /// Lower percentile kept by the percentile method
    #[arg(long, default_value_t = DEFAULT_PERCENTILE_LOWER)]
    pub percentile_lower: f64,

    /// Upper percentile kept by the percentile method
    #[arg(long, default_value_t = DEFAULT_PERCENTILE_UPPER)]
    pub percentile_upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Iqr,
    Zscore,
    Percentile,
    All,
}

impl OutlierArgs {
    pub fn methods(&self) -> Vec<OutlierMethod> {
        let zscore = OutlierMethod::ZScore {
            threshold: self.zscore_threshold,
        };
        let percentile = OutlierMethod::Percentile {
            lower: self.percentile_lower,
            upper: self.percentile_upper,
        };
        match self.method {
            MethodArg::Iqr => vec![OutlierMethod::Iqr],
            MethodArg::Zscore => vec![zscore],
            MethodArg::Percentile => vec![percentile],
            MethodArg::All => vec![OutlierMethod::Iqr, zscore, percentile],
        }
    }
}

impl Default for OutlierArgs {
    fn default() -> Self {
        Self {
            method: MethodArg::Iqr,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            percentile_lower: DEFAULT_PERCENTILE_LOWER,
            percentile_upper: DEFAULT_PERCENTILE_UPPER,
        }
    }
}

/// Anything that ends the program with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Extract(#[from] ExtractMetricsError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeCycleTimesError),
}

/// Runs the parsed command.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Extract(args) => run_extract(args).await,
        Command::Analyze(args) => run_analyze(args.csv_file, &args.outliers).await,
    }
}

async fn run_extract(args: ExtractArgs) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let jql = config
        .query
        .resolve_jql(args.query.as_deref(), args.preset);
    let statuses = config.cycle.status_list();

    tracing::info!("Connecting to: {}", config.tracker.base_url);
    tracing::info!("Query: {}", jql);
    tracing::info!(
        "Rate limit: {} requests/minute, max results: {}",
        config.fetch.requests_per_minute,
        config.fetch.max_results
    );

    let store: Arc<dyn MetricsStore> = Arc::new(FileMetricsStore::new());
    let handler = build_extract_handler(&config, store.clone())?;

    let cmd = ExtractMetricsCommand::new(jql, config.fetch.max_results)
        .with_output(args.output.clone())
        .with_detailed(args.json);
    let result = handler.handle(cmd).await?;

    if result.metrics.is_empty() {
        println!("No issues found matching the query.");
    }
    for path in &result.written {
        println!("Wrote {}", path.display());
    }
    print!("{}", render_extraction_summary(&result.summary, &statuses));
    if result.summary.average_cycle_time_days > HIGH_AVERAGE_DAYS && !args.analyze {
        println!("Tip: a high average suggests outliers; rerun with --analyze.");
    }

    if args.analyze && !result.metrics.is_empty() {
        run_analyze(args.output, &OutlierArgs::default()).await?;
    }
    Ok(())
}

async fn run_analyze(csv_file: PathBuf, outliers: &OutlierArgs) -> Result<(), CliError> {
    let handler = AnalyzeCycleTimesHandler::new(Arc::new(FileMetricsStore::new()));
    let report = handler
        .handle(AnalyzeCycleTimesCommand {
            input: csv_file,
            methods: outliers.methods(),
        })
        .await?;
    print!("{}", render_analysis_report(&report));
    Ok(())
}

/// Folds command-line flags into the loaded configuration.
fn apply_overrides(config: &mut AppConfig, args: &ExtractArgs) {
    if let Some(max_results) = args.max_results {
        config.fetch.max_results = max_results;
    }
    if let Some(rate_limit) = args.rate_limit {
        config.fetch.requests_per_minute = rate_limit;
    }
    if !args.statuses.is_empty() {
        config.cycle = CycleConfig::new(args.statuses.join(","));
    }
}

fn build_extract_handler(
    config: &AppConfig,
    store: Arc<dyn MetricsStore>,
) -> Result<ExtractMetricsHandler, CliError> {
    let transport = ReqwestTransport::new(
        ReqwestTransportConfig::new(
            config.tracker.username.clone(),
            config.tracker.api_token.clone(),
        )
        .with_timeout(config.fetch.timeout()),
    )?;

    let executor_config = ExecutorConfig::default()
        .with_requests_per_minute(config.fetch.requests_per_minute)
        .with_max_retries(config.fetch.max_retries)
        .with_base_backoff(config.fetch.base_backoff());
    let executor = Arc::new(ResilientExecutor::new(
        Arc::new(transport),
        Arc::new(SystemClock),
        executor_config,
    ));

    let source = FailoverIssueSource::for_tracker(
        executor,
        TrackerEndpoints::new(config.tracker.base_url.clone()),
        config.fetch.page_size,
        Arc::new(NoOpEventCallback),
    );
    let engine = ReplayEngine::new(config.cycle.status_set()?);

    Ok(ExtractMetricsHandler::new(Arc::new(source), engine, store))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    }
}
