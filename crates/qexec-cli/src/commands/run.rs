//! Run command implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qexec_adapter_sim::Statevector;
use qexec_engine::{
    ExecutionMode, Executor, ExecutorConfig, FallbackPolicy, OptimizationLevel, RunReport,
    TracingSink,
};

use super::common::{load_circuit, print_fallbacks, print_histogram, print_stats};

/// Flags of the run command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured execution mode.
    pub mode: Option<ExecutionMode>,
    /// Overrides the configured optimization level.
    pub optimization: Option<OptimizationLevel>,
    /// Number of independent runs, each on a fresh state.
    pub shots: u32,
    /// Base seed; shot `k` samples with `seed + k`.
    pub seed: Option<u64>,
    /// Use [`FallbackPolicy::Reject`] instead of the configured policy.
    pub reject_fallback: bool,
    /// Print the report and histogram as JSON.
    pub json: bool,
}

/// Execute the run command.
pub fn execute(input: &str, mut config: ExecutorConfig, options: &RunOptions) -> Result<()> {
    if options.shots == 0 {
        anyhow::bail!("--shots must be at least 1");
    }
    if let Some(mode) = options.mode {
        config.mode = mode;
    }
    if let Some(level) = options.optimization {
        config.optimization = level;
    }
    if options.reject_fallback {
        config.fallback = FallbackPolicy::Reject;
    }

    let circuit = load_circuit(input)?;
    if !options.json {
        println!(
            "{} Running {} ({} mode, {} shots)",
            style("→").cyan().bold(),
            style(input).green(),
            style(config.mode).yellow(),
            options.shots
        );
        println!(
            "  Loaded: {} qubits, {} gates, depth {}",
            circuit.num_qubits(),
            circuit.num_gates(),
            circuit.depth()
        );
    }

    let sink = TracingSink;
    let mut executor = Executor::with_config(&sink, config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    if options.json {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut histogram: BTreeMap<String, u32> = BTreeMap::new();
    let mut last: Option<RunReport> = None;
    for shot in 0..options.shots {
        spinner.set_message(format!("Shot {}/{}...", shot + 1, options.shots));

        let width = circuit.num_qubits() as usize;
        let mut state = match options.seed {
            Some(seed) => Statevector::with_seed(width, seed.wrapping_add(u64::from(shot))),
            None => Statevector::new(width),
        }
        .with_context(|| format!("Cannot allocate a {width}-qubit statevector"))?;

        // Each shot reports its own statistics.
        executor.reset_stats();
        let report = match executor.run_circuit(&circuit, &mut state) {
            Ok(report) => report,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e).with_context(|| format!("Shot {} failed", shot + 1));
            }
        };
        *histogram.entry(report.outcome_bits()).or_default() += 1;
        last = Some(report);
    }
    spinner.finish_and_clear();

    let Some(report) = last else {
        anyhow::bail!("No shots were executed");
    };
    info!(
        "Run {} finished: {} gates in {:?}",
        report.run_id, report.stats.total_gates, report.wall_time
    );

    if options.json {
        let output = serde_json::json!({
            "report": report,
            "histogram": histogram,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "\n{} Executed {} ({} mode)",
        style("✓").green().bold(),
        style(&report.circuit_name).cyan(),
        report.mode
    );
    print_fallbacks(&report.fallbacks);
    print_stats(&report.stats);
    print_histogram(&histogram, options.shots);

    Ok(())
}
