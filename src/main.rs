//! drift - Track changes in GitHub Projects over time

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = drift_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
