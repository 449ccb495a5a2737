//! parls - list directory contents
//!
//! Entry point for the CLI application.

mod cli;
mod names;
mod render;

use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;
use crate::names::NameCache;
use crate::render::Renderer;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("parls: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = CliArgs::parse();

    setup_logging()?;

    if args.no_follow {
        debug!("-H accepted; command-line links are only followed with -L");
    }

    let stdout = io::stdout();
    let mut renderer = Renderer::new(
        BufWriter::new(stdout.lock()),
        io::stderr(),
        args.display_options(),
        NameCache::new(),
    );

    let report = parls::list()
        .options(args.list_options())
        .run(&args.files, &mut renderer)
        .context("listing failed")?;

    renderer.flush().context("failed to write output")?;

    debug!(
        sections = report.stats.sections,
        entries = report.stats.entries,
        dirs = report.stats.dirs,
        workers = report.stats.workers,
        rate = report.stats.entries_per_sec,
        "done"
    );

    if report.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn setup_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("PARLS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("parls=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    Ok(())
}
