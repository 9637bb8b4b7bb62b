//! grid-square-checker - Reconciles grid squares between a reference KML and a database export

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = grid_square_checker::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
