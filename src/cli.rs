//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvPriceAdapter, CsvSignalAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    parse_optional_date, validate_evaluation_config, validate_pair,
};
use crate::domain::error::PairtraderError;
use crate::domain::evaluation::{self, parse_rates, EvaluationConfig, EvaluationResult};
use crate::domain::performance::default_rate_grid;
use crate::domain::signal::Direction;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;
use crate::ports::signal_port::SignalPort;

const DEFAULT_OUTPUT_DIR: &str = "report";

#[derive(Parser, Debug)]
#[command(name = "pairtrader", about = "Pairs-trading signal evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sequence signals, value the portfolio and sweep risk-free rates
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        leg_a: Option<String>,
        #[arg(long)]
        leg_b: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the configured price file
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            output,
            leg_a,
            leg_b,
            dry_run,
        } => {
            if dry_run {
                run_validate(&config)
            } else {
                run_evaluate(&config, output.as_ref(), leg_a.as_deref(), leg_b.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListTickers { config } => run_list_tickers(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_evaluation_config(
    adapter: &dyn ConfigPort,
) -> Result<EvaluationConfig, PairtraderError> {
    let leg = |key: &str| {
        adapter
            .get_string("pair", key)
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PairtraderError::ConfigMissing {
                section: "pair".into(),
                key: key.into(),
            })
    };

    let rates = match adapter.get_string("performance", "rates") {
        Some(s) => parse_rates(&s).map_err(|reason| PairtraderError::ConfigInvalid {
            section: "performance".into(),
            key: "rates".into(),
            reason,
        })?,
        None => default_rate_grid(),
    };

    Ok(EvaluationConfig {
        leg_a: leg("leg_a")?,
        leg_b: leg("leg_b")?,
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
        drop_coincident_exits: adapter.get_bool("signals", "drop_coincident_exits", true),
        rates,
    })
}

fn data_path(adapter: &dyn ConfigPort, key: &str) -> Result<PathBuf, PairtraderError> {
    adapter
        .get_string("data", key)
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| PairtraderError::ConfigMissing {
            section: "data".into(),
            key: key.into(),
        })
}

fn run_evaluate(
    config_path: &Path,
    output_path: Option<&PathBuf>,
    leg_a: Option<&str>,
    leg_b: Option<&str>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_evaluation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build EvaluationConfig, applying overrides
    let mut config = match build_evaluation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(a) = leg_a {
        config.leg_a = a.to_uppercase();
    }
    if let Some(b) = leg_b {
        config.leg_b = b.to_uppercase();
    }
    if let Err(e) = validate_pair(&config.leg_a, &config.leg_b) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Resolve adapters
    let (prices_path, signals_path) =
        match (data_path(&adapter, "prices"), data_path(&adapter, "signals")) {
            (Ok(p), Ok(s)) => (p, s),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
    let output_dir = output_path.cloned().unwrap_or_else(|| {
        adapter
            .get_string("report", "output_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    });

    run_evaluation_pipeline(
        &CsvPriceAdapter::new(prices_path),
        &CsvSignalAdapter::new(signals_path),
        &CsvReportAdapter,
        &config,
        &output_dir,
    )
}

pub fn run_evaluation_pipeline(
    price_port: &dyn PricePort,
    signal_port: &dyn SignalPort,
    report_port: &dyn ReportPort,
    config: &EvaluationConfig,
    output_dir: &Path,
) -> ExitCode {
    match evaluate_and_report(price_port, signal_port, report_port, config, output_dir) {
        Ok(result) => {
            print_summary(config, &result);
            eprintln!("\nReport written to: {}", output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Fetches prices and signals, runs the evaluation and writes the report.
pub fn evaluate_and_report(
    price_port: &dyn PricePort,
    signal_port: &dyn SignalPort,
    report_port: &dyn ReportPort,
    config: &EvaluationConfig,
    output_dir: &Path,
) -> Result<EvaluationResult, PairtraderError> {
    // Stage 4: Fetch prices and signals
    let prices = price_port.fetch_pair(
        &config.leg_a,
        &config.leg_b,
        config.start_date,
        config.end_date,
    )?;
    if prices.is_empty() {
        return Err(PairtraderError::Data {
            reason: format!("no prices for {} / {}", config.leg_a, config.leg_b),
        });
    }
    let signals = signal_port.fetch_signals()?;

    eprintln!(
        "Evaluating {} / {}: {} dates, {} long entries, {} short entries, {} exits",
        config.leg_a,
        config.leg_b,
        prices.len(),
        signals.entries.long.len(),
        signals.entries.short.len(),
        signals.exits.len(),
    );
    if let Some(max) = signals.max_index() {
        if max >= prices.len() {
            tracing::warn!(max, horizon = prices.len(), "signal index beyond price history");
        }
    }

    // Stage 5: Sequence, simulate, sweep
    let result = evaluation::run_evaluation(&prices, &signals, config)?;

    // Stage 6: Report
    report_port.write(&result, &prices, output_dir)?;
    Ok(result)
}

fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn print_summary(config: &EvaluationConfig, result: &EvaluationResult) {
    let longs = result
        .trades
        .directions
        .iter()
        .filter(|&&d| d == Direction::Long)
        .count();

    eprintln!("\n=== {} / {} ===", config.leg_a, config.leg_b);
    eprintln!("Time Steps:       {}", result.horizon);
    eprintln!(
        "Trades:           {} ({} long, {} short)",
        result.trades.len(),
        longs,
        result.trades.len() - longs
    );
    eprintln!("Total Return:     {:.2}%", result.total_return() * 100.0);

    if !result.performance.is_empty() {
        eprintln!("\n  Rate    Excess   Sharpe  Sortino");
        for sample in &result.performance {
            eprintln!(
                "{:>5.1}% {:>8} {:>8} {:>8}",
                sample.risk_free_rate * 100.0,
                if sample.excess_return.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{:.2}%", sample.excess_return * 100.0)
                },
                format_metric(sample.sharpe),
                format_metric(sample.sortino),
            );
        }
    }
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_evaluation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = match build_evaluation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nPair:");
    eprintln!("  leg_a: {}", config.leg_a);
    eprintln!("  leg_b: {}", config.leg_b);
    if let Some(start) = config.start_date {
        eprintln!("  from:  {}", start);
    }
    if let Some(end) = config.end_date {
        eprintln!("  to:    {}", end);
    }
    eprintln!("\nSignals:");
    eprintln!("  drop_coincident_exits: {}", config.drop_coincident_exits);
    eprintln!("\nRisk-free rates:");
    let rates: Vec<String> = config
        .rates
        .iter()
        .map(|r| format!("{}%", r * 100.0))
        .collect();
    eprintln!("  {}", rates.join(", "));

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let prices_path = match data_path(&adapter, "prices") {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match CsvPriceAdapter::new(prices_path).list_tickers() {
        Ok(tickers) if tickers.is_empty() => {
            eprintln!("No tickers found");
            ExitCode::SUCCESS
        }
        Ok(tickers) => {
            for ticker in &tickers {
                println!("{}", ticker);
            }
            eprintln!("{} tickers found", tickers.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
