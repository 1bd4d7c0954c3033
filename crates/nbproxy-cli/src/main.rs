use nbproxy_core::logging;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_console_logging() {
        eprintln!("nbproxy: {:#}", err);
    }

    match cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("nbproxy error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
