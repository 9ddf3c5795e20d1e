use retrobios_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state-dir file when possible, stderr otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("retrobios error: {:#}", err);
        std::process::exit(1);
    }
}
