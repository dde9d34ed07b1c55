//! Diagonal operators acting on statevectors.
//!
//! A diagonal built by [`qsim_core::diagonal`] scales each basis row of the
//! state independently, so both the action and its exponential are a
//! single in-place pass broadcast along the batch axis.

use ndarray::{ArrayView1, ArrayViewMut, Dimension, RemoveAxis};
use num_complex::Complex;
use qsim_core::scalar::{Real, complex, to_real};
use qsim_core::{CoreError, StateSpace, kernel};
use tracing::debug;

use crate::error::EvolveResult;

/// `ψ[k] ← d[k] · ψ[k]`.
pub fn apply_diagonal<T, D>(
    space: &StateSpace,
    diag: ArrayView1<'_, Complex<T>>,
    psi: ArrayViewMut<'_, Complex<T>, D>,
) -> EvolveResult<()>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    check(space, &diag)?;
    space.check_state(&psi)?;
    kernel::scale_rows(space.config().device, diag, psi);
    Ok(())
}

/// `ψ[k] ← exp(−iθ d[k]) · ψ[k]`.
///
/// Exact for any diagonal; complex entries contribute a real growth or
/// decay factor `exp(θ · Im d[k])`.
pub fn exp_diagonal<T, D>(
    space: &StateSpace,
    diag: ArrayView1<'_, Complex<T>>,
    theta: f64,
    psi: ArrayViewMut<'_, Complex<T>, D>,
) -> EvolveResult<()>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    check(space, &diag)?;
    space.check_state(&psi)?;
    debug!(num_qubits = space.num_qubits(), theta, "diagonal evolution");
    let minus_i_theta = complex(T::zero(), -to_real::<T>(theta)?);
    let factor = diag.mapv(|d| (minus_i_theta * d).exp());
    kernel::scale_rows(space.config().device, factor.view(), psi);
    Ok(())
}

fn check<T>(space: &StateSpace, diag: &ArrayView1<'_, Complex<T>>) -> EvolveResult<()> {
    if diag.len() != space.dim() {
        return Err(CoreError::DimensionMismatch {
            expected: space.dim(),
            got: diag.len(),
        }
        .into());
    }
    Ok(())
}
