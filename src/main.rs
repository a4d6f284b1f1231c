//! VFL CLI
//!
//! Usage:
//!   vfl [OPTIONS] [FORMAT]
//!
//! Options:
//!   -c, --config <FILE>       Options, metrics and views (TOML format)
//!   -m, --metric <NAME=VALUE> Define a metric (repeatable)
//!       --view <NAME>         Declare a view (repeatable)
//!   -V, --vertical            Vertical orientation when the format has no prefix
//!   -d, --debug               Log tokenizer and synthesizer activity
//!   -h, --help                Print help

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vfl_layout::parser::referenced_views;
use vfl_layout::{parse, tokenize, Config, Orientation, ParseError, Views};

#[derive(Parser)]
#[command(name = "vfl")]
#[command(about = "Translate Visual Format Language strings into layout constraints")]
struct Cli {
    /// Format string (reads one format per line from stdin if not provided)
    format: Option<String>,

    /// Config file with options, metrics and views (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metric definition, NAME=VALUE
    #[arg(short, long = "metric", value_parser = parse_metric)]
    metrics: Vec<(String, f64)>,

    /// View name; when none are declared every bracketed name is accepted
    #[arg(long = "view")]
    views: Vec<String>,

    /// Vertical orientation for formats without an H:/V: prefix
    #[arg(short = 'V', long)]
    vertical: bool,

    /// Debug mode: log tokens and synthesized constraints to stderr
    #[arg(short, long)]
    debug: bool,
}

fn parse_metric(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    Ok((name.trim().to_string(), value))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    config.metrics.extend(cli.metrics.iter().cloned());
    config.views.extend(cli.views.iter().cloned());
    if cli.vertical {
        config.options = config.options.with_orientation(Orientation::Vertical);
    }

    match &cli.format {
        Some(format) => {
            if let Err(report) = run(format, &config, "format") {
                eprintln!("{}", report);
                std::process::exit(1);
            }
        }
        None => {
            for (index, line) in io::stdin().lock().lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("Error reading from stdin: {}", e);
                        std::process::exit(1);
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(report) = run(&line, &config, &format!("stdin:{}", index + 1)) {
                    eprintln!("{}", report);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Parse one format and print its records, or return the rendered error
fn run(format: &str, config: &Config, filename: &str) -> Result<(), String> {
    let views = declared_views(format, config).map_err(|e| e.report(format, filename))?;
    let records = parse(format, &config.options, &config.metrics, &views)
        .map_err(|e| e.report(format, filename))?;

    for record in records {
        println!("{}", record);
    }
    Ok(())
}

/// Views table keyed and valued by name
fn declared_views(format: &str, config: &Config) -> Result<Views<String>, ParseError> {
    let names = if config.views.is_empty() {
        referenced_views(&tokenize(format)?)
    } else {
        config.views.clone()
    };
    Ok(names.into_iter().map(|name| (name.clone(), name)).collect())
}
