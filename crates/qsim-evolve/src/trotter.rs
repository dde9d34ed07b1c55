//! Trotter-Suzuki evolution of statevectors.
//!
//! Approximates `exp(-i H t) ψ` by splitting the evolution into `n_steps`
//! slices, each evolved under each term in sequence through the
//! [`Evolver`] driver.
//!
//! # First-order Trotter (Lie-Trotter)
//!
//!   exp(-i H t) ≈ [∏_k exp(-i c_k T_k t/n)]^n
//!
//! # Second-order Trotter (Suzuki-Trotter)
//!
//!   exp(-i H t) ≈ [S₂(t/n)]^n
//!   S₂(τ) = [∏_k exp(-i c_k T_k τ/2)] · [∏_k exp(-i c_{n-k} T_{n-k} τ/2)]
//!
//! Field terms are evolved exactly; coupling and hopping terms are
//! themselves products over pairs with angle `c_k · τ · w[i,j]`. The
//! reverse sweep also reverses the pair order inside each term, so every
//! slice is the mirror image of itself and the error stays second order
//! when pairs sharing a qubit do not commute.

use ndarray::{Array, Dimension, RemoveAxis};
use num_complex::Complex;
use qsim_core::StateSpace;
use qsim_core::scalar::Real;
use tracing::{debug, trace};

use crate::driver::{Evolver, Sweep};
use crate::error::{EvolveError, EvolveResult};
use crate::hamiltonian::Hamiltonian;

/// Trotter product-formula time evolution.
#[derive(Debug, Clone)]
pub struct TrotterEvolution {
    hamiltonian: Hamiltonian,
    /// Total evolution time t.
    t: f64,
    /// Number of Trotter steps (repetitions).
    n_steps: usize,
}

impl TrotterEvolution {
    /// Construct a new first- or second-order Trotter evolution.
    ///
    /// # Arguments
    /// * `hamiltonian` — the Hamiltonian H = Σ c_k T_k
    /// * `t`          — total evolution time
    /// * `n_steps`    — number of Trotter slices (higher → more accurate)
    pub fn new(hamiltonian: Hamiltonian, t: f64, n_steps: usize) -> Self {
        Self {
            hamiltonian,
            t,
            n_steps,
        }
    }

    /// The Hamiltonian being evolved.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Evolve `psi` in place with the first-order formula.
    ///
    /// Each slice applies every term once with time step `t / n_steps`.
    pub fn first_order<T, D>(
        &self,
        space: &StateSpace,
        psi: &mut Array<Complex<T>, D>,
    ) -> EvolveResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.validate(space)?;
        space.check_state(psi)?;
        let step_t = self.t / self.n_steps as f64;

        debug!(
            n_terms = self.hamiltonian.n_terms(),
            n_steps = self.n_steps,
            num_qubits = space.num_qubits(),
            step_t,
            "first-order Trotter evolution"
        );

        let mut evolver = Evolver::new(space);
        for step in 0..self.n_steps {
            for term in self.hamiltonian.terms() {
                trace!(step, term = %term.term, coeff = term.coeff, "trotter term");
                evolver.exp_term(psi, term, step_t)?;
            }
        }
        Ok(())
    }

    /// Evolve `psi` in place with the second-order Suzuki-Trotter formula.
    ///
    /// Each slice is a symmetric product: forward half-step then reverse
    /// half-step.
    pub fn second_order<T, D>(
        &self,
        space: &StateSpace,
        psi: &mut Array<Complex<T>, D>,
    ) -> EvolveResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.validate(space)?;
        space.check_state(psi)?;
        let half_t = self.t / (2.0 * self.n_steps as f64);

        debug!(
            n_terms = self.hamiltonian.n_terms(),
            n_steps = self.n_steps,
            num_qubits = space.num_qubits(),
            half_t,
            "second-order Trotter evolution"
        );

        let mut evolver = Evolver::new(space);
        for step in 0..self.n_steps {
            // Forward sweep: exp(-i c_k T_k τ/2)  for k = 0..n
            for term in self.hamiltonian.terms() {
                trace!(step, term = %term.term, coeff = term.coeff, "trotter term (forward)");
                evolver.exp_term(psi, term, half_t)?;
            }
            // Reverse sweep: exp(-i c_k T_k τ/2)  for k = n-1..0, pairs mirrored
            for term in self.hamiltonian.terms().iter().rev() {
                trace!(step, term = %term.term, coeff = term.coeff, "trotter term (reverse)");
                evolver.exp_term_swept(psi, term, half_t, Sweep::Reverse)?;
            }
        }
        Ok(())
    }

    fn validate(&self, space: &StateSpace) -> EvolveResult<()> {
        if self.hamiltonian.is_empty() {
            return Err(EvolveError::EmptyHamiltonian);
        }
        if self.n_steps == 0 {
            return Err(EvolveError::InvalidSteps(0));
        }
        self.hamiltonian.check(space.num_qubits())
    }
}
