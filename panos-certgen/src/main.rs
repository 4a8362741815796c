//! Binary entrypoint for `panos-certgen`.
//!
//! Prints exactly one JSON result on stdout. Logs go to stderr
//! (`RUST_LOG=debug` for protocol detail).

use std::process::ExitCode;

use clap::Parser;
use panos_certgen::cli::{self, Cli};
use panos_certgen::module::{self, ModuleResult};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match cli::usage_error(&e) {
            Some(error) => return report(&ModuleResult::failure(&error)),
            None => e.exit(),
        },
    };

    let result = match cli.into_module_args() {
        Ok(args) => module::run(args).await,
        Err(e) => ModuleResult::failure(&e),
    };
    report(&result)
}

fn report(result: &ModuleResult) -> ExitCode {
    match result.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to serialize result: {e}");
            return ExitCode::FAILURE;
        }
    }
    result.exit_code()
}
