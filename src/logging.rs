//! Diagnostic logging to stderr.
//!
//! Stdout is reserved for the JSON report, so all tracing output goes to
//! stderr. `RUST_LOG` overrides the default filter.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize logging with the given verbosity.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "genvoice_rs={level},voice_synth={level},latent_audio={level},warn"
        ))
    });

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
