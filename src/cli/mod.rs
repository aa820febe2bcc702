//! CLI argument parsing and validation.

mod args;

pub use args::{ArgsError, LatentArgs, LatentCommand, SynthArgs};
