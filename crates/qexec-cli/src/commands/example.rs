//! Example command implementation.

use anyhow::{Context, Result};
use console::style;

use qexec_ir::{Circuit, write_circuit_file};

/// Build a named sample circuit.
pub fn build(kind: &str, qubits: u32) -> Result<Circuit> {
    let circuit = match kind.to_lowercase().as_str() {
        "bell" => Circuit::bell()?,
        "ghz" => Circuit::ghz(qubits)?,
        other => anyhow::bail!("Unknown example: '{other}'. Available: bell, ghz"),
    };
    Ok(circuit)
}

/// Execute the example command.
pub fn execute(kind: &str, qubits: u32, output: &str) -> Result<()> {
    let circuit = build(kind, qubits)?;
    write_circuit_file(output, &circuit)
        .with_context(|| format!("Failed to write circuit: {output}"))?;

    println!(
        "{} Wrote {} circuit to {} ({} qubits, {} gates)",
        style("✓").green().bold(),
        style(circuit.name()).cyan(),
        style(output).green(),
        circuit.num_qubits(),
        circuit.num_gates()
    );
    Ok(())
}
