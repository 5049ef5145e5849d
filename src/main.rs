//! `boa-test` entry point.
//!
//! Runs the analyzer on each named test case and checks its assertion file.
//! See `boa-test --help` for options and exit codes.

use std::process::ExitCode;

use boa_harness::cli::{self, run_cmd, CliCommand};
use boa_harness::ExitClass;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "boa-test".to_string());
    let args: Vec<String> = argv.collect();

    let class = match cli::parse_args(&args) {
        Ok(CliCommand::Run(run)) => run_cmd::run(run).await,
        Ok(CliCommand::ShowConfig(run)) => run_cmd::show(&run),
        Ok(CliCommand::Help) => {
            cli::print_usage(&program);
            ExitClass::Success
        }
        Ok(CliCommand::Version) => {
            println!("boa-test {}", env!("CARGO_PKG_VERSION"));
            ExitClass::Success
        }
        Err(e) => {
            eprintln!("{}", e);
            cli::print_usage(&program);
            e.exit_class()
        }
    };

    ExitCode::from(class.code())
}
