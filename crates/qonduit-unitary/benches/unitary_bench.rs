//! Benchmarks for unitary calculation
//!
//! Run with: cargo bench -p qonduit-unitary

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qonduit_ir::Circuit;
use qonduit_unitary::{to_unitary, unitary_to_little_endian};

/// Benchmark full-circuit unitary calculation on QFT circuits
fn bench_to_unitary(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_unitary");

    for num_qubits in &[2u32, 4, 6, 8] {
        let circuit = Circuit::qft(*num_qubits).unwrap();
        group.bench_with_input(
            BenchmarkId::new("qft", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| to_unitary(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the endianness permutation
fn bench_endian_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("endian_flip");

    for num_qubits in &[2u32, 4, 6, 8] {
        let u = to_unitary(&Circuit::qft(*num_qubits).unwrap()).unwrap();
        group.bench_with_input(BenchmarkId::new("qft", num_qubits), &u, |b, u| {
            b.iter(|| unitary_to_little_endian(black_box(u)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_unitary, bench_endian_flip);
criterion_main!(benches);
