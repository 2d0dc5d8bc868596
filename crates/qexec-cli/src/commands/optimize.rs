//! Optimize command implementation.

use anyhow::{Context, Result};
use console::style;

use qexec_engine::{Executor, ExecutorConfig, NullSink, OptimizationLevel};
use qexec_ir::write_circuit_file;

use super::common::{load_circuit, print_fallbacks};

/// Execute the optimize command.
pub fn execute(
    input: &str,
    output: &str,
    level: OptimizationLevel,
    config: ExecutorConfig,
) -> Result<()> {
    println!(
        "{} Optimizing {} at level {}",
        style("→").cyan().bold(),
        style(input).green(),
        style(level).yellow()
    );

    let circuit = load_circuit(input)?;
    let sink = NullSink;
    let executor = Executor::with_config(&sink, config);
    let outcome = executor.optimize_circuit(&circuit, level)?;

    if let Some(fallback) = &outcome.fallback {
        print_fallbacks(std::slice::from_ref(fallback));
    }

    write_circuit_file(output, &outcome.circuit)
        .with_context(|| format!("Failed to write circuit: {output}"))?;

    println!(
        "{} Wrote {} ({} gates, depth {} -> {})",
        style("✓").green().bold(),
        style(output).cyan(),
        outcome.circuit.num_gates(),
        circuit.depth(),
        outcome.circuit.depth()
    );

    Ok(())
}
