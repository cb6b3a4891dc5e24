use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use salesreport::{
    Layout, PipelineError,
    config::DEFAULT_DATA_DIR,
    generator::{self, GenerateOptions},
};

#[derive(Parser)]
#[command(name = "salesreport")]
#[command(about = "Generate sales data and rank salespeople and products")]
#[command(version)]
struct Cli {
    /// Directory holding the input files and the reports
    #[arg(long, global = true, env = "SALESREPORT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate the sales files and write both reports (default)
    Report,

    /// Write a random product catalog, salesperson list and sales files
    Generate {
        /// Number of products in the catalog
        #[arg(long, default_value_t = 20)]
        products: usize,

        /// Number of salespeople, each gets one sales file
        #[arg(long, default_value_t = 8)]
        salespeople: usize,

        /// Seed of the random generator
        #[arg(long, default_value_t = generator::DEFAULT_SEED)]
        seed: u64,
    },
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let layout = Layout::new(&cli.data_dir);
    match cli.command.unwrap_or(Command::Report) {
        Command::Report => {
            salesreport::run_report(&layout)?;
            println!("Reports written to {}", layout.base_dir.display());
        }
        Command::Generate {
            products,
            salespeople,
            seed,
        } => {
            let options = GenerateOptions {
                products,
                salespeople,
                seed,
                ..GenerateOptions::default()
            };
            generator::generate_dataset(&layout, &options)?;
            println!("Input files written to {}", layout.base_dir.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // logs go to stderr, stdout only carries the result line
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
