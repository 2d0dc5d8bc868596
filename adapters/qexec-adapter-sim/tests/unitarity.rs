//! Property tests: gate kernels preserve the norm and undo correctly.

use proptest::prelude::*;
use qexec_adapter_sim::Statevector;
use qexec_ir::StateManager;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
enum Op {
    H(usize),
    X(usize),
    Y(usize),
    T(usize),
    Rx(usize, f64),
    Ry(usize, f64),
    Rz(usize, f64),
    Cx(usize, usize),
    Cry(usize, usize, f64),
    Swap(usize, usize),
    Ccx(usize, usize, usize),
}

impl Op {
    fn apply(&self, sv: &mut Statevector) {
        // Duplicate-qubit ops are rejected by the state; that is fine here.
        let _ = match *self {
            Op::H(q) => sv.apply_h(q),
            Op::X(q) => sv.apply_x(q),
            Op::Y(q) => sv.apply_y(q),
            Op::T(q) => sv.apply_t(q),
            Op::Rx(q, t) => sv.apply_rx(q, t),
            Op::Ry(q, t) => sv.apply_ry(q, t),
            Op::Rz(q, t) => sv.apply_rz(q, t),
            Op::Cx(c, t) => sv.apply_cx(c, t),
            Op::Cry(c, t, th) => sv.apply_cry(c, t, th),
            Op::Swap(a, b) => sv.apply_swap(a, b),
            Op::Ccx(a, b, c) => sv.apply_ccx(a, b, c),
        };
    }
}

fn arb_op(n: usize) -> impl Strategy<Value = Op> {
    let q = 0..n;
    let angle = -6.3_f64..6.3;
    prop_oneof![
        q.clone().prop_map(Op::H),
        q.clone().prop_map(Op::X),
        q.clone().prop_map(Op::Y),
        q.clone().prop_map(Op::T),
        (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Rx(q, t)),
        (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Ry(q, t)),
        (q.clone(), angle.clone()).prop_map(|(q, t)| Op::Rz(q, t)),
        (q.clone(), q.clone()).prop_map(|(c, t)| Op::Cx(c, t)),
        (q.clone(), q.clone(), angle).prop_map(|(c, t, th)| Op::Cry(c, t, th)),
        (q.clone(), q.clone()).prop_map(|(a, b)| Op::Swap(a, b)),
        (q.clone(), q.clone(), q).prop_map(|(a, b, c)| Op::Ccx(a, b, c)),
    ]
}

fn arb_program() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1_usize..=5).prop_flat_map(|n| (Just(n), prop::collection::vec(arb_op(n), 0..40)))
}

proptest! {
    #[test]
    fn gates_preserve_norm((n, ops) in arb_program()) {
        let mut sv = Statevector::new(n).unwrap();
        for op in &ops {
            op.apply(&mut sv);
        }
        prop_assert!((sv.norm_sqr() - 1.0).abs() < EPS);
    }

    #[test]
    fn measurement_leaves_normalized_basis_on_qubit(
        (n, ops) in arb_program(),
        seed in any::<u64>(),
    ) {
        let mut sv = Statevector::with_seed(n, seed).unwrap();
        for op in &ops {
            op.apply(&mut sv);
        }
        for q in 0..n {
            let bit = sv.measure(q).unwrap();
            let p1 = sv.probability_one(q).unwrap();
            let expected = if bit { 1.0 } else { 0.0 };
            prop_assert!((p1 - expected).abs() < EPS);
            prop_assert!((sv.norm_sqr() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn rotation_inverse_restores_state(
        (n, ops) in arb_program(),
        theta in -6.3_f64..6.3,
    ) {
        let mut sv = Statevector::new(n).unwrap();
        for op in &ops {
            op.apply(&mut sv);
        }
        let before = sv.amplitudes().to_vec();
        sv.apply_ry(0, theta).unwrap();
        sv.apply_ry(0, -theta).unwrap();
        sv.apply_rz(n - 1, theta).unwrap();
        sv.apply_rz(n - 1, -theta).unwrap();
        for (a, b) in before.iter().zip(sv.amplitudes()) {
            prop_assert!((a - b).norm() < EPS);
        }
    }
}
