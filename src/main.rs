//! metax_access binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match metax_access::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
