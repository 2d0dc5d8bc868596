//! Statevector simulation engine.

use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::PI;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use qexec_ir::{StateError, StateManager, StateResult, check_qubits};

/// Largest state this simulator will allocate (2^24 amplitudes, 256 MiB).
pub const MAX_QUBITS: usize = 24;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// 2x2 matrix in row-major order: `[m00, m01, m10, m11]`.
type Matrix2 = [Complex64; 4];

/// A statevector representing a quantum state.
///
/// Qubit `k` is bit `k` of the amplitude index, so qubit 0 is the least
/// significant bit.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
    /// Source of measurement randomness.
    rng: StdRng,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> StateResult<Self> {
        Self::with_rng(num_qubits, StdRng::from_entropy())
    }

    /// Create a statevector whose measurements are reproducible.
    pub fn with_seed(num_qubits: usize, seed: u64) -> StateResult<Self> {
        Self::with_rng(num_qubits, StdRng::seed_from_u64(seed))
    }

    fn with_rng(num_qubits: usize, rng: StdRng) -> StateResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        debug!("Allocated {}-qubit statevector", num_qubits);
        Ok(Self {
            amplitudes,
            num_qubits,
            rng,
        })
    }

    /// Return to |0...0⟩. The random stream is not rewound.
    pub fn reset(&mut self) {
        self.amplitudes.fill(ZERO);
        self.amplitudes[0] = ONE;
    }

    /// The raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of each computational basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Sum of probabilities; 1.0 up to rounding for any reachable state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_one(&self, qubit: usize) -> StateResult<f64> {
        check_qubits(self.num_qubits, &[qubit])?;
        let mask = 1 << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    /// Apply `m` to `target` on every basis state where all `controls` bits are set.
    fn apply_matrix(&mut self, controls: usize, target: usize, m: Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & controls == controls {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    /// Diagonal variant of [`Self::apply_matrix`].
    fn apply_diagonal(&mut self, controls: usize, target: usize, d0: Complex64, d1: Complex64) {
        let tgt_mask = 1 << target;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & controls == controls {
                *amp *= if i & tgt_mask == 0 { d0 } else { d1 };
            }
        }
    }

    /// Exchange the values of two qubits where all `controls` bits are set.
    fn swap_bits(&mut self, controls: usize, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 && i & controls == controls {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn rx_matrix(theta: f64) -> Matrix2 {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        [c, neg_i_s, neg_i_s, c]
    }

    fn ry_matrix(theta: f64) -> Matrix2 {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        [c, -s, s, c]
    }

    fn rz_phases(theta: f64) -> (Complex64, Complex64) {
        (
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }
}

impl StateManager for Statevector {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn apply_x(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_matrix(0, qubit, [ZERO, ONE, ONE, ZERO]);
        Ok(())
    }

    fn apply_y(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        let i = Complex64::i();
        self.apply_matrix(0, qubit, [ZERO, -i, i, ZERO]);
        Ok(())
    }

    fn apply_z(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_diagonal(0, qubit, ONE, -ONE);
        Ok(())
    }

    fn apply_h(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        self.apply_matrix(0, qubit, [h, h, h, -h]);
        Ok(())
    }

    fn apply_s(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_diagonal(0, qubit, ONE, Complex64::from_polar(1.0, PI / 2.0));
        Ok(())
    }

    fn apply_t(&mut self, qubit: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_diagonal(0, qubit, ONE, Complex64::from_polar(1.0, PI / 4.0));
        Ok(())
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_matrix(0, qubit, Self::rx_matrix(theta));
        Ok(())
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        self.apply_matrix(0, qubit, Self::ry_matrix(theta));
        Ok(())
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[qubit])?;
        let (d0, d1) = Self::rz_phases(theta);
        self.apply_diagonal(0, qubit, d0, d1);
        Ok(())
    }

    fn apply_cx(&mut self, control: usize, target: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, target])?;
        self.apply_matrix(1 << control, target, [ZERO, ONE, ONE, ZERO]);
        Ok(())
    }

    fn apply_cz(&mut self, control: usize, target: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, target])?;
        self.apply_diagonal(1 << control, target, ONE, -ONE);
        Ok(())
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[q1, q2])?;
        self.swap_bits(0, q1, q2);
        Ok(())
    }

    fn apply_crx(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, target])?;
        self.apply_matrix(1 << control, target, Self::rx_matrix(theta));
        Ok(())
    }

    fn apply_cry(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, target])?;
        self.apply_matrix(1 << control, target, Self::ry_matrix(theta));
        Ok(())
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, target])?;
        let (d0, d1) = Self::rz_phases(theta);
        self.apply_diagonal(1 << control, target, d0, d1);
        Ok(())
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[c1, c2, target])?;
        self.apply_matrix((1 << c1) | (1 << c2), target, [ZERO, ONE, ONE, ZERO]);
        Ok(())
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) -> StateResult<()> {
        check_qubits(self.num_qubits, &[control, t1, t2])?;
        self.swap_bits(1 << control, t1, t2);
        Ok(())
    }

    fn measure(&mut self, qubit: usize) -> StateResult<bool> {
        let p1 = self.probability_one(qubit)?;
        let r: f64 = self.rng.r#gen();
        let outcome = r < p1;

        let mask = 1 << qubit;
        let kept = if outcome { p1 } else { 1.0 - p1 };
        if kept <= 0.0 {
            return Err(StateError::Backend(format!(
                "measured qubit {qubit} in a zero-probability branch"
            )));
        }

        // Project onto the observed branch and renormalize.
        let scale = 1.0 / kept.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }

        trace!(qubit, outcome, p1, "Measured qubit");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2).unwrap();
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        assert!(sv.amplitudes()[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_too_many_qubits() {
        assert_eq!(
            Statevector::new(MAX_QUBITS + 1).unwrap_err(),
            StateError::TooManyQubits {
                requested: MAX_QUBITS + 1,
                max: MAX_QUBITS
            }
        );
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_h(0).unwrap();

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes()[0], h));
        assert!(approx_eq(sv.amplitudes()[1], h));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_h(0).unwrap();
        sv.apply_cx(0, 1).unwrap();

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes()[0], h));
        assert!(approx_eq(sv.amplitudes()[1], ZERO));
        assert!(approx_eq(sv.amplitudes()[2], ZERO));
        assert!(approx_eq(sv.amplitudes()[3], h));
    }

    #[test]
    fn test_y_gate_phase() {
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_y(0).unwrap();
        assert!(approx_eq(sv.amplitudes()[1], Complex64::i()));
    }

    #[test]
    fn test_s_squared_is_z() {
        let mut a = Statevector::new(1).unwrap();
        a.apply_h(0).unwrap();
        a.apply_s(0).unwrap();
        a.apply_s(0).unwrap();

        let mut b = Statevector::new(1).unwrap();
        b.apply_h(0).unwrap();
        b.apply_z(0).unwrap();

        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(approx_eq(*x, *y));
        }
    }

    #[test]
    fn test_rx_pi_flips() {
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_rx(0, PI).unwrap();
        assert!((sv.probabilities()[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_controlled_rotation_respects_control() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_cry(0, 1, PI).unwrap();
        assert!(approx_eq(sv.amplitudes()[0], ONE));

        sv.apply_x(0).unwrap();
        sv.apply_cry(0, 1, PI).unwrap();
        // |01⟩ -> |11⟩ (qubit 0 is the low bit)
        assert!((sv.probabilities()[3] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_toffoli_and_fredkin() {
        let mut sv = Statevector::new(3).unwrap();
        sv.apply_x(0).unwrap();
        sv.apply_ccx(0, 1, 2).unwrap();
        assert!((sv.probabilities()[0b001] - 1.0).abs() < 1e-10);

        sv.apply_x(1).unwrap();
        sv.apply_ccx(0, 1, 2).unwrap();
        assert!((sv.probabilities()[0b111] - 1.0).abs() < 1e-10);

        sv.apply_x(2).unwrap();
        sv.apply_cswap(0, 1, 2).unwrap();
        // |011⟩ with control set: qubits 1 and 2 exchange -> |101⟩
        assert!((sv.probabilities()[0b101] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_out_of_range_and_duplicates() {
        let mut sv = Statevector::new(2).unwrap();
        assert_eq!(
            sv.apply_h(2),
            Err(StateError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2
            })
        );
        assert_eq!(sv.apply_cx(1, 1), Err(StateError::DuplicateQubit(1)));
        assert!(sv.apply_i(5).is_err());
    }

    #[test]
    fn test_measure_deterministic() {
        let mut sv = Statevector::with_seed(1, 7).unwrap();
        sv.apply_x(0).unwrap();
        for _ in 0..20 {
            assert!(sv.measure(0).unwrap());
        }
    }

    #[test]
    fn test_measure_collapses() {
        let mut sv = Statevector::with_seed(2, 42).unwrap();
        sv.apply_h(0).unwrap();
        sv.apply_cx(0, 1).unwrap();

        let first = sv.measure(0).unwrap();
        // Entangled partner now agrees every time.
        assert_eq!(sv.measure(1).unwrap(), first);
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_seeded_measurements_repeat() {
        let run = |seed| {
            let mut sv = Statevector::with_seed(1, seed).unwrap();
            (0..16)
                .map(|_| {
                    sv.reset();
                    sv.apply_h(0).unwrap();
                    sv.measure(0).unwrap()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }
}
