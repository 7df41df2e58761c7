//! Binary entrypoint for hero-letterbox.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use hero_letterbox::{Configuration, Job, config, run_batch};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Letterbox images onto a fixed-size canvas
#[derive(Debug, Parser)]
#[command(name = "hero-letterbox", about = "Letterbox images onto a fixed-size canvas")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra job, appended after configured ones (repeatable)
    #[arg(short, long = "job", value_name = "SRC=DST")]
    jobs: Vec<Job>,

    /// Override canvas width (px)
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Override canvas height (px)
    #[arg(long, value_name = "PX")]
    height: Option<u32>,

    /// Override JPEG quality (1-100)
    #[arg(long, value_name = "Q")]
    quality: Option<u8>,

    /// Override background color
    #[arg(long, value_name = "R,G,B", value_parser = parse_rgb)]
    background: Option<[u8; 3]>,

    /// Exit non-zero if any job was missing or failed
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn parse_rgb(raw: &str) -> Result<[u8; 3], String> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[u8; 3]>::try_from(parts).map_err(|_| format!("expected R,G,B, got {raw:?}"))
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hero_letterbox={}", level).parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn load_configuration(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => config::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(width) = cli.width {
        cfg.canvas.width = width;
    }
    if let Some(height) = cli.height {
        cfg.canvas.height = height;
    }
    if let Some(quality) = cli.quality {
        cfg.canvas.quality = quality;
    }
    if let Some(background) = cli.background {
        cfg.canvas.background = background;
    }
    cfg.jobs.extend(cli.jobs.iter().cloned());
    cfg.validate().context("validating configuration")?;
    Ok(cfg)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = load_configuration(&cli)?;
    if cfg.jobs.is_empty() {
        warn!("no jobs configured; pass --config or --job SRC=DST");
        return Ok(ExitCode::SUCCESS);
    }
    info!(jobs = cfg.jobs.len(), "starting batch");

    let report = run_batch(&cfg.jobs, &cfg.canvas);
    if cli.strict && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
