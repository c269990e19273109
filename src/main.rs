//! Dashboard-core entry point — CLI wiring around the view pipeline.

use std::path::{Path, PathBuf};
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use load_dash::anomaly::detect_anomalies;
use load_dash::config::DashboardConfig;
use load_dash::error::DashError;
use load_dash::io::export::export_csv;
use load_dash::io::load::load_csv;
use load_dash::metrics::compute_metrics;
use load_dash::pipeline;
use load_dash::seasonality::{MONTH_NAMES, seasonal_buckets};
use load_dash::series::Granularity;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<PathBuf>,
    data_path: Option<String>,
    feeders: Option<Vec<String>>,
    primary: Option<String>,
    start: Option<String>,
    end: Option<String>,
    granularity: Option<String>,
    window: Option<usize>,
    tariff: Option<f64>,
    export_out: Option<PathBuf>,
}

fn print_help() {
    eprintln!("load-dash — energy-load forecast dashboard core");
    eprintln!();
    eprintln!("Usage: load-dash [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load dashboard config from TOML file");
    eprintln!("  --data <path>            Forecast CSV (overrides config)");
    eprintln!("  --feeders <a,b,...>      Selected feeders (default: all)");
    eprintln!("  --primary <name>         Feeder for single-feeder views");
    eprintln!("  --start <YYYY-MM-DD>     First date of the view");
    eprintln!("  --end <YYYY-MM-DD>       Last date of the view");
    eprintln!("  --granularity <g>        hourly | daily | weekly | monthly");
    eprintln!("  --window <n>             Trailing moving-average window (0 = off)");
    eprintln!("  --tariff <rate>          Tariff rate per MWh");
    eprintln!("  --export-out <path>      Write the filtered view to CSV");
    eprintln!("  --help                   Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        data_path: None,
        feeders: None,
        primary: None,
        start: None,
        end: None,
        granularity: None,
        window: None,
        tariff: None,
        export_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                cli.config_path = Some(PathBuf::from(required_value(&args, &mut i, "a path")));
            }
            "--data" => {
                cli.data_path = Some(required_value(&args, &mut i, "a path"));
            }
            "--feeders" => {
                let list = required_value(&args, &mut i, "a comma-separated list");
                cli.feeders = Some(list.split(',').map(|s| s.trim().to_string()).collect());
            }
            "--primary" => {
                cli.primary = Some(required_value(&args, &mut i, "a feeder name"));
            }
            "--start" => {
                cli.start = Some(required_value(&args, &mut i, "a date"));
            }
            "--end" => {
                cli.end = Some(required_value(&args, &mut i, "a date"));
            }
            "--granularity" => {
                cli.granularity = Some(required_value(&args, &mut i, "a granularity"));
            }
            "--window" => {
                let raw = required_value(&args, &mut i, "a non-negative integer");
                match raw.parse::<usize>() {
                    Ok(w) => cli.window = Some(w),
                    Err(_) => {
                        eprintln!("error: --window value \"{raw}\" is not a valid integer");
                        process::exit(1);
                    }
                }
            }
            "--tariff" => {
                let raw = required_value(&args, &mut i, "a number");
                match raw.parse::<f64>() {
                    Ok(t) if t >= 0.0 => cli.tariff = Some(t),
                    _ => {
                        eprintln!("error: --tariff value \"{raw}\" is not a non-negative number");
                        process::exit(1);
                    }
                }
            }
            "--export-out" => {
                cli.export_out = Some(PathBuf::from(required_value(&args, &mut i, "a path")));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn required_value(args: &[String], i: &mut usize, expected: &str) -> String {
    let flag = args[*i].clone();
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {flag} requires {expected} argument");
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_date(raw: &str, flag: &str) -> chrono::NaiveDate {
    match raw.parse() {
        Ok(date) => date,
        Err(_) => {
            eprintln!("error: {flag} value \"{raw}\" is not a valid YYYY-MM-DD date");
            process::exit(1);
        }
    }
}

/// Merges CLI overrides into the TOML/default configuration.
fn build_config(cli: &CliArgs) -> DashboardConfig {
    let mut config = match &cli.config_path {
        Some(path) => match DashboardConfig::from_toml_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    if let Some(path) = &cli.data_path {
        config.dataset.path = path.clone();
    }
    if let Some(feeders) = &cli.feeders {
        config.controls.feeders = feeders.clone();
    }
    if let Some(primary) = &cli.primary {
        config.controls.primary_feeder = Some(primary.clone());
    }
    if let Some(start) = &cli.start {
        config.controls.start_date = Some(parse_date(start, "--start"));
    }
    if let Some(end) = &cli.end {
        config.controls.end_date = Some(parse_date(end, "--end"));
    }
    if let Some(raw) = &cli.granularity {
        match raw.parse::<Granularity>() {
            Ok(g) => config.controls.granularity = g,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }
    if let Some(window) = cli.window {
        config.controls.smoothing_window = window;
    }
    if let Some(tariff) = cli.tariff {
        config.controls.tariff_rate = tariff;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }

    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = parse_args();
    let config = build_config(&cli);

    // Load once; every recomputation below reads the same immutable table.
    let table = match load_csv(Path::new(&config.dataset.path), &config.dataset.timestamp_column) {
        Ok(table) => table,
        Err(e) => {
            error!("startup aborted: {e}");
            process::exit(1);
        }
    };

    let (controls, primary) = match config.controls.resolve(&table) {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let view = match pipeline::apply(&table, &controls) {
        Ok(view) => view,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!(
        rows = view.len(),
        feeders = view.feeders().len(),
        granularity = %controls.granularity,
        window = controls.smoothing_window,
        "view recomputed"
    );

    println!("=== Key Performance Indicators ===");
    for feeder in view.feeders() {
        println!("\n[{feeder}]");
        match compute_metrics(&view, feeder, config.controls.tariff_rate) {
            Ok(metrics) => println!("{metrics}"),
            Err(DashError::EmptySeries { .. }) => println!("no data in the selected view"),
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        }
    }

    println!("\n=== Anomalies ({primary}) ===");
    match detect_anomalies(&view, &primary) {
        Ok(report) if report.is_empty() => println!("none flagged"),
        Ok(report) => {
            for p in &report.points {
                println!("{}  {:.3} MW  (z = {:+.2})", p.timestamp, p.value, p.z_score);
            }
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }

    // Seasonal shape comes from the raw table, not the resampled view.
    println!("\n=== Monthly profile ({primary}) ===");
    match seasonal_buckets(&table, &primary) {
        Ok(buckets) => {
            for (name, values) in MONTH_NAMES.iter().zip(&buckets.by_month) {
                if values.is_empty() {
                    continue;
                }
                let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
                println!("{name:<10} {mean:>8.2} MW  ({} samples)", values.len());
            }
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }

    if let Some(path) = &cli.export_out {
        if let Err(e) = export_csv(&view, path) {
            error!("export failed: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = view.len(), "filtered view exported");
    }
}
