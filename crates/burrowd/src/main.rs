//! Entry point for the `burrowd` shell server.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match burrowd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(io::stderr(), "burrowd: {error}"));
            ExitCode::FAILURE
        }
    }
}
