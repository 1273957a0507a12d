//! Gridcalc - evaluate spreadsheet formulas over a sheet file

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use gridcalc_core::{CellRef, Document, GridcalcError};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gridcalc", version, about = "Evaluate spreadsheet formulas over a .grd sheet")]
struct Cli {
    /// Sheet file to load (.grd, one `CELLREF: input` per line)
    file: Option<PathBuf>,

    /// Print the result of a cell (can be repeated)
    #[arg(long = "cell", value_name = "REF")]
    cells: Vec<String>,

    /// Evaluate a formula against the sheet and print the result
    #[arg(short = 'c', long = "command", value_name = "FORMULA")]
    command: Option<String>,

    /// Load settings from this TOML file instead of the user config dir
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not report circular references (the depth limit still applies)
    #[arg(long)]
    no_cycle_guard: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (mut engine_config, warnings) = config::load_config(cli.config.as_ref());
    for warning in warnings {
        warn!("{}", warning);
    }
    if cli.no_cycle_guard {
        engine_config.detect_cycles = false;
    }

    let mut doc = Document::with_config(engine_config);
    if let Some(path) = &cli.file {
        doc.load_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(formula) = &cli.command {
        writeln!(out, "{}", doc.compute_formula(formula))?;
    }

    for name in &cli.cells {
        let cell_ref =
            CellRef::parse(name).ok_or_else(|| GridcalcError::InvalidCellRef(name.clone()))?;
        writeln!(out, "{}", doc.compute_result(&cell_ref))?;
    }

    if cli.command.is_none() && cli.cells.is_empty() {
        for view in doc.cells_sorted() {
            writeln!(out, "{}\t{}\t{}", view.cell, view.input, view.result)?;
        }
    }

    Ok(())
}
