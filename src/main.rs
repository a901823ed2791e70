//! fe: a small terminal file explorer.
//!
//! Usage:
//!   fe [DIR]                 Browse DIR (defaults to the current directory)
//!   fe --config FILE         Use FILE instead of the default config location
//!   fe --log-file FILE       Write diagnostics to FILE

mod app;
mod config;
mod domain;
mod error;
mod infra;
mod terminal;
mod ui;

use crate::app::{Exit, Explorer};
use crate::config::AppConfig;
use crate::domain::Event;
use crate::error::ExplorerError;
use crate::infra::{FsDirectory, ShellCommandRunner};
use crate::terminal::{TerminalDisplay, install_panic_hook};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FE_LOG";

#[derive(Parser)]
#[command(name = "fe", version, about = "Browse directories and run one command")]
struct Cli {
    /// Directory to start in (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Config file to load instead of the default location
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append diagnostics to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(Some(path))?,
        None => match AppConfig::load(None) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("failed to load config, using defaults: {err:#}");
                AppConfig::default()
            }
        },
    };

    if let Some(path) = cli.log_file.as_deref().or(config.log_file.as_deref()) {
        init_logging(path)?;
    }
    for (first, shadowed) in config.keys.conflicts() {
        warn!(
            key = config.keys.label_for(first),
            bound = first.label(),
            shadowed = shadowed.label(),
            "key bound twice"
        );
    }
    for event in Event::ALL
        .into_iter()
        .filter(|event| event.is_reserved() && !config.keys.label_for(*event).is_empty())
    {
        info!(event = event.label(), "binding reserved for a future file operation");
    }

    let start = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let start = fs::canonicalize(&start)
        .with_context(|| format!("failed to resolve {}", start.display()))?;
    info!(start = %start.display(), "starting explorer");

    install_panic_hook();
    let mut display = TerminalDisplay::init()?;

    let mut explorer = Explorer::open(FsDirectory, start, &mut display);
    let run_result = explorer.run(&mut display, &ShellCommandRunner, &config);

    let restored = display.restore();
    info!(
        path = %explorer.current_path().display(),
        selected = explorer.selected_index(),
        entries = explorer.listing().len(),
        "explorer stopped"
    );

    let halted = report_exit(
        restored,
        run_result,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .context("failed to print exit report")?;
    if halted {
        std::process::exit(1);
    }
    Ok(())
}

/// Prints the command output or the halt reason once the screen is gone.
///
/// A failed terminal restore is reported first and never hides the run
/// result. Returns whether the explorer halted on an error.
fn report_exit(
    restored: Result<()>,
    run_result: Result<Exit, ExplorerError>,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> io::Result<bool> {
    if let Err(err) = restored {
        error!(error = %format!("{err:#}"), "failed to restore terminal");
        writeln!(err_out, "failed to restore terminal: {err:#}")?;
    }

    match run_result {
        Ok(Exit::Quit) => Ok(false),
        Ok(Exit::Command(output)) => {
            out.write_all(&output)?;
            out.flush()?;
            Ok(false)
        }
        Err(err) => {
            let location = err.location();
            error!(location, error = %err, "explorer halted");
            writeln!(err_out, "Error at: {location}\n{:#}", anyhow::Error::from(err))?;
            Ok(true)
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
