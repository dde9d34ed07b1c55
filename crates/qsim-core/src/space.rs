//! State space of an `L`-qubit register and the gate entry points.
//!
//! A [`StateSpace`] owns the cached [`IndexArray`] for its width plus the
//! [`SimConfig`] that governs allocation and kernel execution. Every gate
//! can be applied in three forms:
//!
//! - [`apply`](StateSpace::apply): pure, returns a freshly allocated array.
//! - [`apply_into`](StateSpace::apply_into): writes into an explicit output
//!   buffer of the same shape.
//! - [`apply_in_place`](StateSpace::apply_in_place): updates the state
//!   through a caller-held scratch buffer, swapping the two in O(1).
//!
//! Inputs are borrowed immutably and outputs mutably, so an output buffer
//! can never alias the state it is computed from.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use num_complex::Complex64;
//! use qsim_core::{Gate, StateSpace};
//!
//! let space = StateSpace::new(3).unwrap();
//! let mut psi: Array1<Complex64> = space.zeros();
//! psi[0] = Complex64::new(1.0, 0.0);
//! let mut scratch = space.zeros();
//!
//! space
//!     .apply_all(&[Gate::X(0), Gate::X(1), Gate::X(2)], &mut psi, &mut scratch)
//!     .unwrap();
//! assert_eq!(psi[7], Complex64::new(1.0, 0.0));
//! ```

use ndarray::{
    Array, Array1, Array2, ArrayBase, ArrayView, ArrayViewMut, Data, Dimension, RemoveAxis,
};
use num_complex::Complex;
use tracing::trace;

use crate::config::SimConfig;
use crate::error::{CoreError, CoreResult};
use crate::gate::Gate;
use crate::index::IndexArray;
use crate::kernel::{self, Action, Write};
use crate::scalar::Real;

/// Hilbert space of a fixed-width register.
#[derive(Debug, Clone)]
pub struct StateSpace {
    indices: IndexArray,
    config: SimConfig,
}

impl StateSpace {
    /// State space for `num_qubits` qubits with the default configuration.
    pub fn new(num_qubits: u32) -> CoreResult<Self> {
        Self::with_config(num_qubits, SimConfig::default())
    }

    /// State space for `num_qubits` qubits under `config`.
    pub fn with_config(num_qubits: u32, config: SimConfig) -> CoreResult<Self> {
        config.validate()?;
        if num_qubits > config.max_qubits {
            return Err(CoreError::TooManyQubits {
                num_qubits,
                max: config.max_qubits,
            });
        }
        let indices = IndexArray::new(num_qubits)?;
        Ok(Self { indices, config })
    }

    /// Register width `L`.
    pub fn num_qubits(&self) -> u32 {
        self.indices.num_qubits()
    }

    /// Dimension `2^L`.
    pub fn dim(&self) -> usize {
        self.indices.len()
    }

    /// The cached index array.
    pub fn indices(&self) -> &IndexArray {
        &self.indices
    }

    /// The configuration this space was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// All-zero single state of length `2^L`.
    pub fn zeros<T: Real>(&self) -> Array1<Complex<T>> {
        Array1::zeros(self.dim())
    }

    /// All-zero batch of `batch` states, shape `2^L × batch`.
    pub fn zeros_batch<T: Real>(&self, batch: usize) -> Array2<Complex<T>> {
        Array2::zeros((self.dim(), batch))
    }

    /// Fail unless `psi` has `2^L` rows along the basis axis.
    pub fn check_state<S, D>(&self, psi: &ArrayBase<S, D>) -> CoreResult<()>
    where
        S: Data,
        D: Dimension,
    {
        let got = psi.shape().first().copied().unwrap_or(0);
        if got != self.dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.dim(),
                got,
            });
        }
        Ok(())
    }

    /// Fail unless `out` has exactly the shape of `psi`.
    pub fn check_output<S1, S2, D>(
        &self,
        psi: &ArrayBase<S1, D>,
        out: &ArrayBase<S2, D>,
    ) -> CoreResult<()>
    where
        S1: Data,
        S2: Data,
        D: Dimension,
    {
        if psi.shape() != out.shape() {
            return Err(CoreError::ShapeMismatch {
                expected: psi.shape().to_vec(),
                got: out.shape().to_vec(),
            });
        }
        Ok(())
    }

    /// Apply `gate` to `psi`, returning a new array.
    pub fn apply<T, S, D>(
        &self,
        gate: &Gate,
        psi: &ArrayBase<S, D>,
    ) -> CoreResult<Array<Complex<T>, D>>
    where
        T: Real,
        S: Data<Elem = Complex<T>>,
        D: Dimension + RemoveAxis,
    {
        let mut out = Array::zeros(psi.raw_dim());
        self.apply_into(gate, psi.view(), out.view_mut())?;
        Ok(out)
    }

    /// Apply `gate` to `psi`, writing the result into `out`.
    pub fn apply_into<T, D>(
        &self,
        gate: &Gate,
        psi: ArrayView<'_, Complex<T>, D>,
        out: ArrayViewMut<'_, Complex<T>, D>,
    ) -> CoreResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        let action = self.lower(gate)?;
        self.apply_action_into(&action, psi, out, Write::Assign)
    }

    /// Add `weight · (gate ψ)` into `acc`.
    pub fn accumulate_into<T, D>(
        &self,
        gate: &Gate,
        weight: Complex<T>,
        psi: ArrayView<'_, Complex<T>, D>,
        acc: ArrayViewMut<'_, Complex<T>, D>,
    ) -> CoreResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        let action = self.lower(gate)?;
        self.apply_action_into(&action, psi, acc, Write::Accumulate(weight))
    }

    /// Apply `gate` to `psi` in place, using `scratch` as the write buffer.
    ///
    /// On return `psi` holds the result and `scratch` holds the previous
    /// state. `scratch` must have the shape of `psi`.
    pub fn apply_in_place<T, D>(
        &self,
        gate: &Gate,
        psi: &mut Array<Complex<T>, D>,
        scratch: &mut Array<Complex<T>, D>,
    ) -> CoreResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.apply_into(gate, psi.view(), scratch.view_mut())?;
        std::mem::swap(psi, scratch);
        Ok(())
    }

    /// Apply `gates` in order to `psi`, ping-ponging through `scratch`.
    ///
    /// On return `psi` holds the final state regardless of how many gates
    /// were applied; the contents of `scratch` are unspecified.
    pub fn apply_all<T, D>(
        &self,
        gates: &[Gate],
        psi: &mut Array<Complex<T>, D>,
        scratch: &mut Array<Complex<T>, D>,
    ) -> CoreResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        for gate in gates {
            trace!(%gate, "applying gate");
            self.apply_in_place(gate, psi, scratch)?;
        }
        Ok(())
    }

    /// Evaluate an already-lowered action into `out` after shape checks.
    pub fn apply_action_into<T, D>(
        &self,
        action: &Action<T>,
        psi: ArrayView<'_, Complex<T>, D>,
        out: ArrayViewMut<'_, Complex<T>, D>,
        write: Write<T>,
    ) -> CoreResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.check_state(&psi)?;
        self.check_output(&psi, &out)?;
        kernel::apply_action(self.config.device, &self.indices, action, psi, out, write);
        Ok(())
    }

    fn lower<T: Real>(&self, gate: &Gate) -> CoreResult<Action<T>> {
        gate.validate(&self.indices)?;
        gate.action()
    }
}
