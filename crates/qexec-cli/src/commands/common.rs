//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qexec_engine::{ExecutionStats, ExecutorConfig, Fallback};
use qexec_ir::{Circuit, read_circuit_file};

/// Load a circuit from a JSON circuit document.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    read_circuit_file(path_obj).with_context(|| format!("Failed to load circuit: {path}"))
}

/// Return the default config file location (`~/.qexec/config.yaml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qexec").join("config.yaml"))
}

/// Resolve the executor configuration.
///
/// An explicit path (`--config` or `QEXEC_CONFIG`) wins, then
/// `~/.qexec/config.yaml` when it exists, then the defaults. Environment
/// overrides are applied on top in every case.
pub fn load_config(explicit: Option<&Path>) -> Result<ExecutorConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    if let Some(path) = &path {
        debug!("Loading configuration from {}", path.display());
    }

    ExecutorConfig::load(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Invalid configuration in {}", p.display()),
        None => "Invalid configuration".to_string(),
    })
}

/// Print executor statistics as an aligned table.
pub fn print_stats(stats: &ExecutionStats) {
    println!("  {:<18} {}", "Gates:", style(stats.total_gates).yellow());
    println!("  {:<18} {}", "  single-qubit:", stats.single_qubit_gates);
    println!("  {:<18} {}", "  two-qubit:", stats.two_qubit_gates);
    println!("  {:<18} {}", "  multi-qubit:", stats.multi_qubit_gates);
    println!("  {:<18} {}", "  measurements:", stats.measurements);
    println!("  {:<18} {}", "Depth:", stats.circuit_depth);
    println!("  {:<18} {}", "Errors:", stats.errors);
    println!("  {:<18} {:.6}", "Fidelity:", stats.fidelity);
    println!(
        "  {:<18} {:.3} ms",
        "Gate time:",
        stats.execution_time.as_secs_f64() * 1000.0
    );
}

/// Print substitutions made for unimplemented features.
pub fn print_fallbacks(fallbacks: &[Fallback]) {
    for fallback in fallbacks {
        println!(
            "  {} {} not implemented, ran {} instead",
            style("!").yellow().bold(),
            style(fallback.requested).yellow(),
            fallback.substitute
        );
    }
}

/// Print a histogram of measurement outcomes.
pub fn print_histogram(counts: &BTreeMap<String, u32>, shots: u32) {
    println!("\n{} Outcomes ({} shots):", style("✓").green().bold(), shots);

    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let total = f64::from(shots.max(1));
    for (bitstring, count) in sorted.iter().take(16) {
        let prob = f64::from(**count) / total * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        let label = if bitstring.is_empty() {
            "(none)"
        } else {
            bitstring.as_str()
        };

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(label).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
