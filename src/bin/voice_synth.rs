//! voice-synth CLI entry point.
//!
//! Always prints one JSON report and exits 0, even when generation fails.

use anyhow::{Context, Result};
use clap::Parser;
use genvoice_rs::backend::{Availability, create_speech_backend};
use genvoice_rs::cli::SynthArgs;
use genvoice_rs::engine::VoiceSynthesizer;
use genvoice_rs::logging::init_logging;
use genvoice_rs::report::{Report, SynthesisOutput};

fn main() -> Result<()> {
    let args = SynthArgs::parse();
    init_logging(args.verbose);

    let report = match create_speech_backend(&args.server) {
        Ok(backend) => VoiceSynthesizer::new(backend, Availability::bark()).generate(
            &args.text,
            &args.voice,
            &args.output,
        ),
        Err(e) => Report::<SynthesisOutput>::failure(e),
    };

    report.emit().context("Failed to write report to stdout")
}
