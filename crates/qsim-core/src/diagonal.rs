//! Diagonals of tensor products of single-qubit diagonal operators.
//!
//! The diagonal of `c · ⊗_p O_p` (with `O_p = op` at the listed positions
//! and the identity elsewhere) is built by Kronecker expansion from qubit 0
//! upward. Each new factor becomes the more significant block, so entry `k`
//! of the result is `c · Π_p op[bit(k, p)]`, matching the bit convention of
//! the gate engine. This is the reverse of the textbook `O_0 ⊗ O_1 ⊗ …`
//! layout, where the first listed factor is the most significant block.
//!
//! Diagonals are built for a [`StateSpace`], so the register width has
//! already passed the configured qubit cap before anything is allocated.
//!
//! ```rust
//! use num_complex::Complex64;
//! use qsim_core::StateSpace;
//! use qsim_core::diagonal::z_chain;
//!
//! // Z₀Z₂ on three qubits: +1 where bits 0 and 2 agree.
//! let space = StateSpace::new(3).unwrap();
//! let d = z_chain::<f64>(&space, &[2, 0], 1.0).unwrap();
//! assert_eq!(d[0b000], Complex64::new(1.0, 0.0));
//! assert_eq!(d[0b001], Complex64::new(-1.0, 0.0));
//! assert_eq!(d[0b101], Complex64::new(1.0, 0.0));
//! ```

use ndarray::{Array1, ArrayView1};
use num_complex::Complex;

use crate::error::{CoreError, CoreResult};
use crate::index::IndexArray;
use crate::scalar::{Real, complex, to_real};
use crate::space::StateSpace;

/// Kronecker product of two vectors; `b` is the fast (low-order) index.
pub fn kron<T: Real>(
    a: ArrayView1<'_, Complex<T>>,
    b: ArrayView1<'_, Complex<T>>,
) -> Array1<Complex<T>> {
    let nb = b.len();
    Array1::from_shape_fn(a.len() * nb, |k| a[k / nb] * b[k % nb])
}

/// Diagonal of `coef · ⊗_{p ∈ positions} op` on the qubits of `space`.
///
/// `positions` may be given in any order; they are sorted internally.
/// Positions are validated first, then a zero coefficient short-circuits
/// to the all-zero diagonal.
pub fn diagonal_operator<T: Real>(
    space: &StateSpace,
    op: [Complex<T>; 2],
    positions: &[u32],
    coef: Complex<T>,
) -> CoreResult<Array1<Complex<T>>> {
    let num_qubits = space.num_qubits();
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(CoreError::DuplicateQubit { qubit: pair[0] });
        }
    }
    if let Some(&last) = sorted.last() {
        space.indices().check_qubit(last)?;
    }
    if coef == complex(T::zero(), T::zero()) {
        return Ok(space.zeros());
    }

    let op = Array1::from(op.to_vec());
    let mut result = Array1::from(vec![coef]);
    let mut next = 0u32;
    for &p in &sorted {
        if p > next {
            result = kron(identity_block::<T>(p - next).view(), result.view());
        }
        result = kron(op.view(), result.view());
        next = p + 1;
    }
    if next < num_qubits {
        result = kron(identity_block::<T>(num_qubits - next).view(), result.view());
    }
    Ok(result)
}

/// Diagonal of `coef · Z_{p₁} Z_{p₂} …`.
pub fn z_chain<T: Real>(
    space: &StateSpace,
    positions: &[u32],
    coef: f64,
) -> CoreResult<Array1<Complex<T>>> {
    let one = complex(T::one(), T::zero());
    diagonal_operator(space, [one, -one], positions, real_coef(coef)?)
}

/// Diagonal of `coef · n_{p₁} n_{p₂} …` with `n = (1 − Z)/2`.
pub fn number_chain<T: Real>(
    space: &StateSpace,
    positions: &[u32],
    coef: f64,
) -> CoreResult<Array1<Complex<T>>> {
    let zero = complex(T::zero(), T::zero());
    let one = complex(T::one(), T::zero());
    diagonal_operator(space, [zero, one], positions, real_coef(coef)?)
}

/// Evaluate the diagonal at each index directly, `c · Π_p op[bit(k, p)]`.
///
/// Reference form of [`diagonal_operator`] for an existing index array.
pub fn diagonal_from_indices<T: Real>(
    indices: &IndexArray,
    op: [Complex<T>; 2],
    positions: &[u32],
    coef: Complex<T>,
) -> CoreResult<Array1<Complex<T>>> {
    for &p in positions {
        indices.check_qubit(p)?;
    }
    Ok(indices
        .view()
        .mapv(|k| positions.iter().fold(coef, |acc, &p| acc * op[(k >> p) & 1])))
}

fn identity_block<T: Real>(qubits: u32) -> Array1<Complex<T>> {
    Array1::from_elem(1usize << qubits, complex(T::one(), T::zero()))
}

fn real_coef<T: Real>(coef: f64) -> CoreResult<Complex<T>> {
    Ok(complex(to_real(coef)?, T::zero()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use num_complex::Complex64;

    fn re(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    fn space(num_qubits: u32) -> StateSpace {
        StateSpace::new(num_qubits).unwrap()
    }

    #[test]
    fn test_single_z_matches_bit_sign() {
        let d = z_chain::<f64>(&space(3), &[1], 1.0).unwrap();
        for k in 0..8usize {
            let expected = if (k >> 1) & 1 == 0 { 1.0 } else { -1.0 };
            assert_eq!(d[k], re(expected), "index {k}");
        }
    }

    #[test]
    fn test_positions_sorted_internally() {
        let a = z_chain::<f64>(&space(4), &[3, 0, 2], 0.5).unwrap();
        let b = z_chain::<f64>(&space(4), &[0, 2, 3], 0.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_coefficient_short_circuits() {
        let d = z_chain::<f64>(&space(3), &[0, 1], 0.0).unwrap();
        assert_eq!(d.len(), 8);
        assert!(d.iter().all(|c| *c == re(0.0)));
    }

    #[test]
    fn test_zero_coefficient_still_validates_positions() {
        assert!(matches!(
            z_chain::<f64>(&space(3), &[5], 0.0),
            Err(CoreError::QubitOutOfRange { qubit: 5, num_qubits: 3 })
        ));
        assert!(matches!(
            number_chain::<f64>(&space(3), &[2, 2], 0.0),
            Err(CoreError::DuplicateQubit { qubit: 2 })
        ));
    }

    #[test]
    fn test_width_is_capped_by_config_before_allocating() {
        // A 60-qubit diagonal would need 2^60 entries; the space refuses it.
        assert!(matches!(
            StateSpace::new(60),
            Err(CoreError::TooManyQubits { num_qubits: 60, max: 30 })
        ));
        let narrow = SimConfig::default().with_max_qubits(4);
        assert!(matches!(
            StateSpace::with_config(5, narrow.clone()),
            Err(CoreError::TooManyQubits { num_qubits: 5, max: 4 })
        ));
        let space = StateSpace::with_config(4, narrow).unwrap();
        assert_eq!(z_chain::<f64>(&space, &[0], 0.0).unwrap().len(), 16);
    }

    #[test]
    fn test_number_chain() {
        let d = number_chain::<f64>(&space(3), &[0, 2], 2.0).unwrap();
        for k in 0..8usize {
            let expected = if k & 0b101 == 0b101 { 2.0 } else { 0.0 };
            assert_eq!(d[k], re(expected), "index {k}");
        }
    }

    #[test]
    fn test_empty_positions_is_scaled_identity() {
        let d = z_chain::<f64>(&space(2), &[], 3.0).unwrap();
        assert!(d.iter().all(|c| *c == re(3.0)));
    }

    #[test]
    fn test_matches_direct_evaluation() {
        let space = space(5);
        let op = [re(2.0), Complex64::new(0.0, 1.0)];
        let coef = Complex64::new(0.5, -0.5);
        let positions = [4, 1, 2];
        let built = diagonal_operator(&space, op, &positions, coef).unwrap();
        let direct = diagonal_from_indices(space.indices(), op, &positions, coef).unwrap();
        assert_eq!(built, direct);
    }

    #[test]
    fn test_first_position_is_least_significant_block() {
        // Z on qubit 0 alternates sign with the fastest index.
        let d = z_chain::<f64>(&space(2), &[0], 1.0).unwrap();
        assert_eq!(d.to_vec(), vec![re(1.0), re(-1.0), re(1.0), re(-1.0)]);
    }

    #[test]
    fn test_invalid_positions() {
        assert!(matches!(
            z_chain::<f64>(&space(3), &[3], 1.0),
            Err(CoreError::QubitOutOfRange { qubit: 3, num_qubits: 3 })
        ));
        assert!(matches!(
            z_chain::<f64>(&space(3), &[1, 1], 1.0),
            Err(CoreError::DuplicateQubit { qubit: 1 })
        ));
    }

    #[test]
    fn test_single_precision() {
        let d = z_chain::<f32>(&space(2), &[0, 1], 1.0).unwrap();
        assert_eq!(d[0b01], Complex::new(-1.0f32, 0.0));
        assert_eq!(d[0b11], Complex::new(1.0f32, 0.0));
    }
}
