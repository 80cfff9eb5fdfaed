use anyhow::Context;
use clap::{CommandFactory, Parser};
use sped_processor::cli::args::{Args, Commands};
use sped_processor::cli::commands::{self, CommandStatus};
use std::process;

fn main() {
    let args = Args::parse();

    // No subcommand: show help
    let Some(command) = args.command else {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(run_until_interrupted(command)) {
        Ok(status) => process::exit(status.exit_code()),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Run the command, stopping early on CTRL+C
async fn run_until_interrupted(command: Commands) -> anyhow::Result<CommandStatus> {
    tokio::select! {
        result = commands::run(command) => Ok(result?),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to install CTRL+C signal handler")?;
            eprintln!("\nReceived CTRL+C, shutting down...");
            Err(sped_processor::Error::processing_interrupted("Processing interrupted by user").into())
        }
    }
}
