//! Product-formula evolution under field, coupling and hopping terms.
//!
//! Every call evolves `ψ` by a sequential product of two-term rotations,
//! one per site or coupled pair:
//!
//!   ψ ← cos θ · ψ − i sin θ · (O ψ)
//!
//! Each rotation reads the state left by the previous one. For a field
//! term the per-site generators commute and the product is exactly
//! `exp(−iθ Σ_i O(i))`. For coupling terms it is the first-order product
//! formula of the summed generator, each factor unitary on its own.
//!
//! Hopping (XY) rotations act only inside the `{|01⟩, |10⟩}` subspace of
//! each pair. Both partner amplitudes are read from the previous buffer
//! before either is written:
//!
//!   a' = cos θ · a − i sin θ · b,   b' = cos θ · b − i sin θ · a
//!
//! The driver never allocates per term. It holds one scratch array,
//! created on first use and reused across calls, and ping-pongs through a
//! [`DoubleBuffer`]; the parity rule of [`DoubleBuffer::finish`] leaves the
//! result in the caller's array. The angle is converted to the amplitude
//! precision once, before the loop.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qsim_core::{Pauli, StateSpace};
//! use qsim_evolve::driver::Evolver;
//!
//! // exp(-iπ/2 X) on |0⟩ is -i|1⟩.
//! let space = StateSpace::new(1).unwrap();
//! let mut psi = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
//! let mut evolver = Evolver::new(&space);
//! evolver.exp_field(&mut psi, Pauli::X, std::f64::consts::FRAC_PI_2).unwrap();
//! assert!((psi[1] - Complex64::new(0.0, -1.0)).norm() < 1e-12);
//! ```

use ndarray::{Array, Dimension, RemoveAxis};
use num_complex::Complex;
use qsim_core::StateSpace;
use qsim_core::bits::{BitOp, bit_mask};
use qsim_core::gate::{Pauli, PauliPair};
use qsim_core::kernel::{Action, Monomial, Phase, Write};
use qsim_core::scalar::{Real, complex, rotation_coeffs};
use tracing::debug;

use crate::buffer::DoubleBuffer;
use crate::coupling::Coupling;
use crate::error::EvolveResult;
use crate::hamiltonian::{HamiltonianTerm, Term};

/// Rotation coefficients `(cos θ, −i sin θ)`.
type Coeffs<T> = (Complex<T>, Complex<T>);

/// How pair rotations derive their angle from the coupling matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairAngle {
    /// θ for every pair with nonzero weight.
    Uniform,
    /// θ · w[i,j] per pair.
    Weighted,
}

/// Order in which a call visits its sites or pairs.
///
/// A reverse sweep applies the same rotations as a forward one in mirror
/// order, so a forward half-step followed by a reverse half-step is
/// symmetric even when the pair rotations do not commute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sweep {
    /// Qubit 0 upward; pairs in row-major order.
    #[default]
    Forward,
    /// The forward order, reversed.
    Reverse,
}

/// Evolution driver bound to a state space, owning a reusable scratch buffer.
#[derive(Debug)]
pub struct Evolver<'s, T, D: Dimension> {
    space: &'s StateSpace,
    scratch: Option<Array<Complex<T>, D>>,
}

impl<'s, T, D> Evolver<'s, T, D>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    /// Driver for states on `space`. No buffer is allocated until first use.
    pub fn new(space: &'s StateSpace) -> Self {
        Self {
            space,
            scratch: None,
        }
    }

    /// The state space this driver evolves on.
    pub fn space(&self) -> &'s StateSpace {
        self.space
    }

    /// Release the scratch buffer.
    pub fn release(&mut self) {
        self.scratch = None;
    }

    /// `ψ ← Π_i exp(−iθ O(i)) ψ` over every qubit.
    ///
    /// Returns the number of rotations applied (`L`).
    pub fn exp_field(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        pauli: Pauli,
        theta: f64,
    ) -> EvolveResult<usize> {
        debug!(
            term = %pauli,
            num_qubits = self.space.num_qubits(),
            num_terms = self.space.num_qubits(),
            theta,
            "field evolution"
        );
        self.field_rotations(psi, pauli, theta, Sweep::Forward)
    }

    /// `ψ ← Π_{i<j, w≠0} exp(−iθ OO(i,j)) ψ`, visiting pairs in row-major order.
    ///
    /// Every coupled pair rotates by the same θ; the weight only selects
    /// which pairs take part. Returns the number of rotations applied.
    pub fn exp_coupling(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        pair: PauliPair,
        coupling: &Coupling,
        theta: f64,
    ) -> EvolveResult<usize> {
        self.check(psi, coupling)?;
        debug!(
            term = %pair,
            num_qubits = self.space.num_qubits(),
            num_terms = coupling.num_pairs(),
            theta,
            "coupling evolution"
        );
        self.coupling_rotations(psi, pair, coupling, theta, PairAngle::Uniform, Sweep::Forward)
    }

    /// Exact XY rotation inside the `{|01⟩, |10⟩}` subspace of every coupled pair.
    ///
    /// Returns the number of rotations applied.
    pub fn exp_hopping(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        coupling: &Coupling,
        theta: f64,
    ) -> EvolveResult<usize> {
        self.check(psi, coupling)?;
        debug!(
            term = "XY",
            num_qubits = self.space.num_qubits(),
            num_terms = coupling.num_pairs(),
            theta,
            "hopping evolution"
        );
        self.hopping_rotations(psi, coupling, theta, PairAngle::Uniform, Sweep::Forward)
    }

    /// `ψ ← exp(−i · coeff · dt · term) ψ` as a product over sites or pairs.
    ///
    /// Pair rotations use the weighted angle `coeff · dt · w[i,j]`, so this
    /// is the slice used by multi-step evolution of a
    /// [`Hamiltonian`](crate::hamiltonian::Hamiltonian).
    pub fn exp_term(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        term: &HamiltonianTerm,
        dt: f64,
    ) -> EvolveResult<usize> {
        self.exp_term_swept(psi, term, dt, Sweep::Forward)
    }

    /// [`exp_term`](Self::exp_term) visiting sites or pairs in `sweep` order.
    pub fn exp_term_swept(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        term: &HamiltonianTerm,
        dt: f64,
        sweep: Sweep,
    ) -> EvolveResult<usize> {
        let theta = term.coeff * dt;
        match &term.term {
            Term::Field(pauli) => self.field_rotations(psi, *pauli, theta, sweep),
            Term::Coupling(pair, w) => {
                self.check(psi, w)?;
                self.coupling_rotations(psi, *pair, w, theta, PairAngle::Weighted, sweep)
            }
            Term::Hopping(w) => {
                self.check(psi, w)?;
                self.hopping_rotations(psi, w, theta, PairAngle::Weighted, sweep)
            }
        }
    }

    fn field_rotations(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        pauli: Pauli,
        theta: f64,
        sweep: Sweep,
    ) -> EvolveResult<usize> {
        self.space.check_state(psi)?;
        let coeffs = rotation_coeffs::<T>(theta)?;
        let actions = (0..self.space.num_qubits())
            .map(|q| Ok(Action::rotation(coeffs, pauli.monomial(q))));
        self.run(psi, actions, sweep)
    }

    fn coupling_rotations(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        pair: PauliPair,
        coupling: &Coupling,
        theta: f64,
        angle: PairAngle,
        sweep: Sweep,
    ) -> EvolveResult<usize> {
        let uniform = rotation_coeffs::<T>(theta)?;
        let actions = coupling.pairs().map(|(i, j, w)| -> EvolveResult<Action<T>> {
            let coeffs = pair_coeffs(uniform, theta, w, angle)?;
            Ok(Action::rotation(coeffs, pair.monomial(i, j)))
        });
        self.run(psi, actions, sweep)
    }

    fn hopping_rotations(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        coupling: &Coupling,
        theta: f64,
        angle: PairAngle,
        sweep: Sweep,
    ) -> EvolveResult<usize> {
        let uniform = rotation_coeffs::<T>(theta)?;
        let actions = coupling.pairs().map(|(i, j, w)| -> EvolveResult<Action<T>> {
            let coeffs = pair_coeffs(uniform, theta, w, angle)?;
            Ok(hopping_rotation(coeffs, i, j))
        });
        self.run(psi, actions, sweep)
    }

    fn check(&self, psi: &Array<Complex<T>, D>, coupling: &Coupling) -> EvolveResult<()> {
        self.space.check_state(psi)?;
        coupling.check_size(self.space.num_qubits())
    }

    /// Apply `actions` in `sweep` order, ping-ponging between `psi` and the
    /// scratch slot.
    ///
    /// Actions are lowered before the first step, so a failure leaves `psi`
    /// untouched.
    fn run<I>(
        &mut self,
        psi: &mut Array<Complex<T>, D>,
        actions: I,
        sweep: Sweep,
    ) -> EvolveResult<usize>
    where
        I: IntoIterator<Item = EvolveResult<Action<T>>>,
    {
        let mut actions = actions.into_iter().collect::<EvolveResult<Vec<_>>>()?;
        if sweep == Sweep::Reverse {
            actions.reverse();
        }
        let space = self.space;
        let scratch = self.scratch_for(psi.raw_dim());
        let mut buffer = DoubleBuffer::new(psi, scratch);
        for action in &actions {
            buffer.step(|current, next| {
                space.apply_action_into(action, current, next, Write::Assign)
            })?;
        }
        Ok(buffer.finish())
    }

    /// The scratch slot, (re)allocated when missing or shaped differently.
    fn scratch_for(&mut self, dim: D) -> &mut Array<Complex<T>, D> {
        if self.scratch.as_ref().is_some_and(|s| s.raw_dim() != dim) {
            self.scratch = None;
        }
        self.scratch.get_or_insert_with(|| Array::zeros(dim))
    }
}

/// Per-pair rotation coefficients.
fn pair_coeffs<T: Real>(
    uniform: Coeffs<T>,
    theta: f64,
    weight: f64,
    angle: PairAngle,
) -> EvolveResult<Coeffs<T>> {
    match angle {
        PairAngle::Uniform => Ok(uniform),
        PairAngle::Weighted => Ok(rotation_coeffs(theta * weight)?),
    }
}

/// `exp(−iθ (|01⟩⟨10| + |10⟩⟨01|))` on qubits `i`, `j` as two monomials.
///
/// Odd-parity rows get `cos θ · ψ[k] − i sin θ · ψ[k ^ mask]`; even-parity
/// rows keep `ψ[k]`.
fn hopping_rotation<T: Real>((cos, neg_i_sin): Coeffs<T>, i: u32, j: u32) -> Action<T> {
    let mask = bit_mask(i) | bit_mask(j);
    let zero = complex(T::zero(), T::zero());
    let one = complex(T::one(), T::zero());
    Action::Sum(
        Monomial::diagonal(Phase::Parity {
            mask,
            even: one,
            odd: cos,
        }),
        Monomial {
            source: BitOp::Flip(mask),
            phase: Phase::Parity {
                mask,
                even: zero,
                odd: neg_i_sin,
            },
        },
    )
}

/// One-shot [`Evolver::exp_field`] with a scratch buffer scoped to the call.
pub fn exp_field<T, D>(
    space: &StateSpace,
    psi: &mut Array<Complex<T>, D>,
    pauli: Pauli,
    theta: f64,
) -> EvolveResult<()>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    Evolver::new(space).exp_field(psi, pauli, theta).map(|_| ())
}

/// One-shot [`Evolver::exp_coupling`].
pub fn exp_coupling<T, D>(
    space: &StateSpace,
    psi: &mut Array<Complex<T>, D>,
    pair: PauliPair,
    coupling: &Coupling,
    theta: f64,
) -> EvolveResult<()>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    Evolver::new(space).exp_coupling(psi, pair, coupling, theta).map(|_| ())
}

/// One-shot [`Evolver::exp_hopping`].
pub fn exp_hopping<T, D>(
    space: &StateSpace,
    psi: &mut Array<Complex<T>, D>,
    coupling: &Coupling,
    theta: f64,
) -> EvolveResult<()>
where
    T: Real,
    D: Dimension + RemoveAxis,
{
    Evolver::new(space).exp_hopping(psi, coupling, theta).map(|_| ())
}
