//! latent-audio CLI entry point.
//!
//! Prints one JSON report. Exits 1 when the backend is missing, the model
//! fails to load, or the operation errors; a missing model is reported
//! with exit 0.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use genvoice_rs::backend::{Availability, create_latent_backend};
use genvoice_rs::cli::LatentArgs;
use genvoice_rs::engine::{EngineError, LatentProcessor};
use genvoice_rs::logging::init_logging;
use genvoice_rs::report::{LatentOutput, Report};
use tracing::error;

fn main() -> Result<ExitCode> {
    let args = LatentArgs::parse();
    init_logging(args.verbose);

    let (report, code) = match run(&args) {
        Ok(report) => (report, ExitCode::SUCCESS),
        Err(e) => {
            error!("{} failed: {e}", args.command);
            (Report::from(e), ExitCode::FAILURE)
        }
    };

    report.emit().context("Failed to write report to stdout")?;
    Ok(code)
}

fn run(args: &LatentArgs) -> Result<Report<LatentOutput>, EngineError> {
    let backend = create_latent_backend(&args.server)?;
    let mut processor = LatentProcessor::from_backend(
        Availability::rave(),
        backend.as_ref(),
        args.model.as_deref(),
        args.seed,
    )?;

    // A missing model outranks argument errors
    if !processor.has_model() {
        return Ok(EngineError::NoModelLoaded.into());
    }

    let request = args.to_request()?;
    processor.dispatch(&request)
}
