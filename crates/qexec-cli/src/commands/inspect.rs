//! Inspect command implementation.

use anyhow::Result;
use console::style;

use super::common::load_circuit;

/// Execute the inspect command.
pub fn execute(input: &str) -> Result<()> {
    let circuit = load_circuit(input)?;
    let counts = circuit.count_by_class();

    println!(
        "{} {} ({})",
        style("Circuit").cyan().bold(),
        style(circuit.name()).green(),
        input
    );
    println!("  {:<14} {}", "Qubits:", circuit.num_qubits());
    println!("  {:<14} {}", "Gates:", circuit.num_gates());
    println!("  {:<14} {}", "Depth:", style(circuit.depth()).yellow());
    println!(
        "  {:<14} {} single, {} two, {} multi, {} measure",
        "By class:", counts.single, counts.two, counts.multi, counts.measurement
    );

    if circuit.is_empty() {
        return Ok(());
    }

    println!("\n{}", style("Layers:").bold());
    let gates = circuit.gates();
    for (layer, indices) in circuit.layers().iter().enumerate() {
        let ops: Vec<String> = indices
            .iter()
            .map(|&i| {
                let gate = &gates[i];
                let qubits: Vec<String> = gate.qubits.iter().map(ToString::to_string).collect();
                match gate.angle() {
                    Some(theta) => format!("{}({theta:.4}) {}", gate.name(), qubits.join(",")),
                    None => format!("{} {}", gate.name(), qubits.join(",")),
                }
            })
            .collect();
        println!("  {:>3}: {}", layer + 1, ops.join("; "));
    }

    Ok(())
}
