//! Benchmarks for qexec circuit operations
//!
//! Run with: cargo bench -p qexec-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qexec_ir::{Circuit, QubitId, circuit_from_text, circuit_to_text};
use std::f64::consts::PI;

fn layered_circuit(num_qubits: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::new("bench", num_qubits).unwrap();
    for _ in 0..layers {
        for i in 0..num_qubits {
            circuit.h(QubitId(i)).unwrap();
        }
        for i in (0..num_qubits - 1).step_by(2) {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
    }
    circuit
}

/// Benchmark appending gates, which includes the depth update
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::new("bench", 10).unwrap();
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::new("bench", 10).unwrap();
        b.iter(|| {
            circuit
                .rx(black_box(PI / 4.0), black_box(QubitId(0)))
                .unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::new("bench", 10).unwrap();
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.bench_function("ccx_gate", |b| {
        let mut circuit = Circuit::new("bench", 10).unwrap();
        b.iter(|| {
            circuit
                .ccx(black_box(QubitId(0)), black_box(QubitId(1)), black_box(QubitId(2)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark GHZ state circuit creation
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 5, 10, 20, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(Circuit::ghz(n).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark grouping gates into layers
fn bench_layers(c: &mut Criterion) {
    let mut group = c.benchmark_group("layers");

    for num_qubits in &[5, 10, 20, 50] {
        let circuit = layered_circuit(*num_qubits, 5);
        group.bench_with_input(
            BenchmarkId::new("layers", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.layers()));
            },
        );
    }

    group.finish();
}

/// Benchmark text serialization in both directions
fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    for num_qubits in &[5, 20, 50] {
        let circuit = layered_circuit(*num_qubits, 10);
        let text = circuit_to_text(&circuit).unwrap();

        group.bench_with_input(
            BenchmarkId::new("to_text", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit_to_text(circuit).unwrap()));
            },
        );
        group.bench_with_input(BenchmarkId::new("from_text", num_qubits), &text, |b, text| {
            b.iter(|| black_box(circuit_from_text(text).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_addition,
    bench_ghz_circuit,
    bench_layers,
    bench_text,
);

criterion_main!(benches);
