//! templatize compiles a working reference project into a project template.
//! Fixed placeholder values are replaced with template variable markers, files
//! that changed are tagged with a suffix, and the result is written to a clean
//! destination directory.

/// Command-line interface module
pub mod cli;

/// Compilation orchestration: reset, walk, write, summarize
pub mod compiler;

/// Configuration handling
/// Supports JSON and YAML formats (templatize.json, templatize.yml, templatize.yaml)
pub mod config;

/// Fixed names and built-in defaults
pub mod constants;

/// Error types and handling
pub mod error;

/// Root-level and any-depth path exclusions
pub mod ignore;

/// Per-entry classification and destination paths
pub mod processor;

/// Marker block stripping and literal replacement
pub mod transform;
