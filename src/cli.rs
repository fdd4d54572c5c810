//! Command-line interface implementation for templatize.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for templatize.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "templatize: compile a working project into a reusable project template",
    long_about = "Replaces the placeholder values of a working reference project with template \
                  variables and writes the result to admin/template. The destination is \
                  deleted and rebuilt on every run."
)]
pub struct Args {
    /// Project root to compile (defaults to the current directory)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling on invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
