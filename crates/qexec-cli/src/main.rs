//! qexec Command-Line Interface
//!
//! Runs, inspects and optimizes circuit documents on the statevector
//! simulator.
//!
//! ```text
//! qexec example bell -o bell.json
//! qexec run -i bell.json --shots 100 --seed 7
//! qexec inspect -i bell.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qexec_engine::{ExecutionMode, OptimizationLevel};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{common, example, inspect, optimize, run, version};

/// qexec - gate-by-gate quantum circuit execution
#[derive(Parser)]
#[command(name = "qexec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Executor configuration file (YAML or JSON)
    #[arg(long, env = "QEXEC_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a circuit on the statevector simulator
    Run {
        /// Input circuit document (JSON)
        #[arg(short, long)]
        input: String,

        /// Execution mode (sequential, pipelined, parallel, optimized)
        #[arg(short, long)]
        mode: Option<ExecutionMode>,

        /// Optimization level (none, light, medium, aggressive or 0-3)
        #[arg(long)]
        optimization: Option<OptimizationLevel>,

        /// Number of independent runs
        #[arg(short, long, default_value = "1")]
        shots: u32,

        /// Seed for measurement sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Fail instead of substituting unimplemented modes and levels
        #[arg(long)]
        reject_fallback: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show width, depth, gate counts and layers of a circuit
    Inspect {
        /// Input circuit document (JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Write an optimized copy of a circuit
    Optimize {
        /// Input circuit document (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file
        #[arg(short, long)]
        output: String,

        /// Optimization level (none, light, medium, aggressive or 0-3)
        #[arg(short, long, default_value = "none")]
        level: OptimizationLevel,
    },

    /// Write a sample circuit document
    Example {
        /// Circuit family (bell, ghz)
        kind: String,

        /// Number of qubits for ghz
        #[arg(short = 'n', long, default_value = "3")]
        qubits: u32,

        /// Output file
        #[arg(short, long)]
        output: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            mode,
            optimization,
            shots,
            seed,
            reject_fallback,
            json,
        } => common::load_config(cli.config.as_deref()).and_then(|config| {
            run::execute(
                &input,
                config,
                &run::RunOptions {
                    mode,
                    optimization,
                    shots,
                    seed,
                    reject_fallback,
                    json,
                },
            )
        }),

        Commands::Inspect { input } => inspect::execute(&input),

        Commands::Optimize {
            input,
            output,
            level,
        } => common::load_config(cli.config.as_deref())
            .and_then(|config| optimize::execute(&input, &output, level, config)),

        Commands::Example {
            kind,
            qubits,
            output,
        } => example::execute(&kind, qubits, &output),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
