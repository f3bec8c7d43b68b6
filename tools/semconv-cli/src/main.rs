//! semconv CLI - generate typed semantic-convention constants
//!
//! Loads a semantic-convention model, folds it into emission units under a
//! grouping policy and writes Rust modules, or prints the plan for review.

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{generate::GenerateCommand, plan::PlanCommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

/// semconv - Generate typed constants from semantic conventions
#[derive(Debug, Parser)]
#[command(name = "semconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate Rust modules from a model
    #[command(name = "generate")]
    Generate(GenerateCommand),

    /// Show the rendering plan without writing anything
    #[command(name = "plan")]
    Plan(PlanCommand),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(cmd) => cmd.execute(),
        Command::Plan(cmd) => cmd.execute(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so generated output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
