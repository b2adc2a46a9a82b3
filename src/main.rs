use clap::Parser;
use radiology_extractor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Create async runtime for the concurrent parsing stage
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            let error = anyhow::Error::new(error);
            eprintln!("Error: {:#}", error);
            process::exit(if is_validation_failure(&error) { 2 } else { 1 });
        }
    }
}

/// Input validation failures exit with status 2, everything else with 1
fn is_validation_failure(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<radiology_extractor::Error>()
        .is_some_and(radiology_extractor::Error::is_validation)
}
