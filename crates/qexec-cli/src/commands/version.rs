//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - gate-by-gate quantum circuit execution",
        style("qexec").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qexec-ir           Gates, circuits and the circuit document format");
    println!("  qexec-engine       Executor, strategies and statistics");
    println!("  qexec-adapter-sim  Dense statevector state manager");
    println!("  qexec-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
