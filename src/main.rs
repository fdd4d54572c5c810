//! templatize's main application entry point.
//! Handles command-line argument parsing and runs a single compilation.

use templatize::{
    cli::{get_args, Args},
    compiler::compile,
    config::get_config,
    error::{default_error_handler, Result},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the configuration from the project's admin directory
/// 2. Compiles the project into admin/template
/// 3. Prints the summary
fn run(args: Args) -> Result<()> {
    let config = get_config(&args.root)?;
    let summary = compile(&args.root, &config)?;
    println!("{summary}");
    Ok(())
}
