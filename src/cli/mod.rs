//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `check` | Merge `--kml` and `--export`, report warnings and errors |
//! | `dump` | Merge `--kml` and `--export`, print the merged model |
//! | `evaluate` | Report warnings and errors for a dumped model |
//!
//! `check` and `evaluate` exit non-zero when any error is found; warnings
//! alone still exit successfully.
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Coloured, human-readable output
//! - `json` - `{"warnings": [...], "errors": [...], "findings": [...]}`
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! grid-square-checker --verbose check -k grid.kml -e export.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod check;
mod output;

pub use app::{run, Cli, Commands};
pub use check::SourceArgs;
pub use output::{Output, OutputFormat};
