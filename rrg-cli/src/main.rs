//! RRG CLI: compute relative rotation tails from price files.
//!
//! Commands:
//! - `run`: compute RS-Ratio / RS-Momentum tails and quadrant dividers
//! - `init-config`: write the default TOML configuration
//! - `synth`: write a synthetic price CSV for the configured symbols

mod logging;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use rrg_core::{PairingMode, RrgOutcome, RrgReport};
use rrg_runner::{
    export_json, run_from_source, save_artifacts, synthetic_prices, write_prices_csv, DataSource,
    RrgRun, RunConfig, Timeframe,
};

/// Exit status when no requested symbol has usable prices.
const EXIT_NO_VALID_DATA: i32 = 2;

#[derive(Parser)]
#[command(
    name = "rrg",
    about = "RRG CLI: relative rotation graph tails and quadrants"
)]
struct Cli {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute tails and quadrant dividers.
    Run {
        /// Path to a TOML config file. Defaults to the built-in NSE universe.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Price CSV (wide `date,SYM...` or long `date,symbol,close`).
        #[arg(long, conflicts_with = "synthetic")]
        prices: Option<PathBuf>,

        /// Use synthetic random-walk prices instead of a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Synthetic start date (YYYY-MM-DD). Defaults to two years before --end.
        #[arg(long, requires = "synthetic")]
        start: Option<String>,

        /// Synthetic end date (YYYY-MM-DD). Defaults to today.
        #[arg(long, requires = "synthetic")]
        end: Option<String>,

        /// RS-Ratio smoothing window.
        #[arg(long)]
        smoothing: Option<usize>,

        /// RS-Momentum lag.
        #[arg(long)]
        momentum: Option<usize>,

        /// Points per tail.
        #[arg(long)]
        tail: Option<usize>,

        /// Tail pairing: joint or positional.
        #[arg(long)]
        pairing: Option<PairingMode>,

        /// Sampling: native, weekly or monthly.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Trailing window in months.
        #[arg(long)]
        lookback_months: Option<u32>,

        /// Save report.json, tails.csv and summary.md here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full run as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the default configuration file.
    InitConfig {
        #[arg(long, default_value = "rrg.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Write a synthetic price CSV for the configured symbols.
    Synth {
        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD). Defaults to two years before --end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
}

/// Per-run overrides layered over the TOML config.
struct Overrides {
    smoothing: Option<usize>,
    momentum: Option<usize>,
    tail: Option<usize>,
    pairing: Option<PairingMode>,
    timeframe: Option<Timeframe>,
    lookback_months: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut RunConfig) {
        if let Some(v) = self.smoothing {
            config.params.smoothing_period = v;
        }
        if let Some(v) = self.momentum {
            config.params.momentum_period = v;
        }
        if let Some(v) = self.tail {
            config.params.tail_length = v;
        }
        if let Some(v) = self.pairing {
            config.params.pairing = v;
        }
        if let Some(v) = self.timeframe {
            config.timeframe = v;
        }
        if let Some(v) = self.lookback_months {
            config.lookback_months = Some(v);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run {
            config,
            prices,
            synthetic,
            start,
            end,
            smoothing,
            momentum,
            tail,
            pairing,
            timeframe,
            lookback_months,
            output_dir,
            json,
        } => {
            let overrides = Overrides {
                smoothing,
                momentum,
                tail,
                pairing,
                timeframe,
                lookback_months,
            };
            let source = match (prices, synthetic) {
                (Some(path), false) => DataSource::Csv { path },
                (None, true) => {
                    let (start, end) = date_range(start.as_deref(), end.as_deref())?;
                    DataSource::Synthetic { start, end }
                }
                _ => bail!("one of --prices or --synthetic is required"),
            };
            run_cmd(config, source, overrides, output_dir, json)
        }
        Commands::InitConfig { path, force } => run_init_config(&path, force),
        Commands::Synth {
            output,
            config,
            start,
            end,
        } => run_synth(&output, config, start.as_deref(), end.as_deref()),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    let config = match path {
        Some(path) => RunConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };
    tracing::debug!(
        benchmark = %config.benchmark,
        instruments = config.instruments.len(),
        timeframe = config.timeframe.as_str(),
        "loaded configuration"
    );
    Ok(config)
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Result<(NaiveDate, NaiveDate)> {
    let end_date = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start_date = start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| end_date - chrono::Duration::days(365 * 2));
    if start_date > end_date {
        bail!("start date {start_date} is after end date {end_date}");
    }
    Ok((start_date, end_date))
}

fn run_cmd(
    config_path: Option<PathBuf>,
    source: DataSource,
    overrides: Overrides,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);

    let run = run_from_source(&config, source)?;

    if json {
        println!("{}", export_json(&run)?);
    } else {
        print_summary(&run);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&run, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    if let RrgOutcome::NoValidData { requested } = &run.outcome {
        eprintln!(
            "No valid price data for any requested symbol: {}",
            requested.join(", ")
        );
        std::process::exit(EXIT_NO_VALID_DATA);
    }

    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let toml = RunConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_synth(
    output: &Path,
    config_path: Option<PathBuf>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let (start_date, end_date) = date_range(start, end)?;
    let table = synthetic_prices(&config.symbols(), start_date, end_date)?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    write_prices_csv(&table, file)?;
    println!(
        "Wrote {} rows x {} symbols of SYNTHETIC prices to {}",
        table.len(),
        table.columns().len(),
        output.display()
    );
    Ok(())
}

fn print_summary(run: &RrgRun) {
    let params = &run.config.params;
    println!();
    println!("=== Relative Rotation ===");
    println!("Benchmark:      {}", run.config.benchmark);
    println!("Timeframe:      {}", run.timeframe);
    if let (Some(first), Some(last)) = (run.first_date, run.last_date) {
        println!("Period:         {first} to {last}");
    }
    println!("Rows:           {}", run.rows_used);
    println!(
        "Params:         smoothing {} / momentum {} / tail {} ({})",
        params.smoothing_period,
        params.momentum_period,
        params.tail_length,
        params.pairing.as_str()
    );

    match &run.outcome {
        RrgOutcome::Chart(report) => print_report(report),
        RrgOutcome::InsufficientData {
            benchmark,
            excluded,
            ..
        } => {
            if benchmark.substituted {
                print_substitution(&benchmark.requested, &benchmark.resolved);
            }
            println!();
            println!("Not enough data to plot RRG chart with tails.");
            if !excluded.is_empty() {
                println!("Excluded:       {}", excluded.join(", "));
            }
        }
        RrgOutcome::NoValidData { .. } => {}
    }

    if run.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
}

fn print_substitution(requested: &str, resolved: &str) {
    println!("WARNING: benchmark {requested} has no complete data; using {resolved}");
}

fn print_report(report: &RrgReport) {
    if report.benchmark.substituted {
        print_substitution(&report.benchmark.requested, &report.benchmark.resolved);
    }
    if let Some(as_of) = report.as_of {
        println!("As of:          {as_of}");
    }
    println!();
    println!(
        "{:<28} {:>10} {:>12}  {:<10} {:>7}",
        "Instrument", "RS-Ratio", "RS-Momentum", "Quadrant", "Heading"
    );
    for tail in &report.tails {
        let Some(latest) = tail.latest() else {
            continue;
        };
        let heading = tail
            .direction
            .map(|d| format!("{:.0}", d.heading_degrees()))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<28} {:>10.2} {:>12.4}  {:<10} {:>7}",
            tail.name, latest.rs_ratio, latest.rs_momentum, tail.quadrant.as_str(), heading
        );
    }

    let s = &report.statistics;
    println!();
    println!("--- Dividers ---");
    println!(
        "RS-Ratio:       mean {:.4} (range {:.4} .. {:.4})",
        s.x_mean, s.x_min, s.x_max
    );
    println!(
        "RS-Momentum:    mean {:.4} (range {:.4} .. {:.4})",
        s.y_mean, s.y_min, s.y_max
    );
    for dropped in &report.dropped {
        println!("WARNING: dropped {} ({:?})", dropped.symbol, dropped.reason);
    }
    for name in &report.excluded {
        println!("Excluded:       {name} (not enough history)");
    }
    println!("Run ID:         {}", report.fingerprint);
}
