//! CLI entry point for the literal tool.

use std::process::ExitCode;

use literal::run;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("{error}");
            error.exit_code()
        }
    }
}
