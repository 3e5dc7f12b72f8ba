//! todo - manage todo lists from the command line

use std::process::ExitCode;

use clap::Parser;
use todo_cli::cli::{self, Cli};

fn main() -> ExitCode {
    let parsed = match Cli::try_parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            // help output is not a failure
            let code = if e.use_stderr() { cli::EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if let Err(e) = cli::run(parsed) {
        eprintln!("{:#}", e);
        ExitCode::from(cli::exit_code(&e))
    } else {
        ExitCode::SUCCESS
    }
}
