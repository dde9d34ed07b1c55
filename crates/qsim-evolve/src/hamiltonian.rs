//! Hamiltonian actions on statevectors.
//!
//! A Hamiltonian is a weighted sum of terms summed over the register:
//!
//!   H = Σ_k  c_k · T_k
//!
//! where each `T_k` is one of
//!
//! - a **field** `Σ_i O(i)` for a single-qubit Pauli `O`,
//! - a **coupling** `Σ_{i<j} w[i,j] · OO(i,j)` for a Pauli product `OO`,
//! - a **hopping** (XY) term that exchanges the amplitudes of `|01⟩` and
//!   `|10⟩` on every coupled pair, weighted by `w[i,j]`.
//!
//! Actions are accumulated into a zero-initialised output, one monomial at
//! a time, through the row kernels of `qsim_core`. No operator matrix is
//! formed.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qsim_core::{Pauli, PauliPair, StateSpace};
//! use qsim_evolve::coupling::Coupling;
//! use qsim_evolve::hamiltonian::{Hamiltonian, HamiltonianTerm};
//!
//! // Transverse-field Ising chain: H = -ZZ - 0.5·X
//! let space = StateSpace::new(2).unwrap();
//! let h = Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::coupling(PauliPair::ZZ, Coupling::chain(2, 1.0).unwrap(), -1.0),
//!     HamiltonianTerm::field(Pauli::X, -0.5),
//! ]);
//!
//! let c = |re: f64| Complex64::new(re, 0.0);
//! let psi = array![c(1.0), c(0.0), c(0.0), c(0.0)];
//! let out = h.apply(&space, &psi).unwrap();
//! assert_eq!(out, array![c(-1.0), c(-0.5), c(-0.5), c(0.0)]);
//! ```

use std::fmt;

use ndarray::{Array, ArrayBase, ArrayView, ArrayViewMut, Axis, Data, Dimension, RemoveAxis};
use num_complex::Complex;
use qsim_core::StateSpace;
use qsim_core::bits::bit_mask;
use qsim_core::gate::{Pauli, PauliPair};
use qsim_core::kernel::{Action, Write};
use qsim_core::scalar::{Real, complex, to_real};
use serde::{Deserialize, Serialize};

use crate::coupling::Coupling;
use crate::error::EvolveResult;

/// Operator part of a Hamiltonian term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    /// `Σ_i O(i)` over every qubit.
    Field(Pauli),
    /// `Σ_{i<j} w[i,j] · OO(i,j)` over coupled pairs.
    Coupling(PauliPair, Coupling),
    /// XY exchange `Σ_{i<j} w[i,j] · (|01⟩⟨10| + |10⟩⟨01|)_{ij}`.
    Hopping(Coupling),
}

impl Term {
    /// The coupling matrix, if the term has one.
    pub fn coupling(&self) -> Option<&Coupling> {
        match self {
            Term::Field(_) => None,
            Term::Coupling(_, w) | Term::Hopping(w) => Some(w),
        }
    }

    /// Fail unless the term fits a register of `num_qubits` qubits.
    pub fn check(&self, num_qubits: u32) -> EvolveResult<()> {
        match self.coupling() {
            Some(w) => w.check_size(num_qubits),
            None => Ok(()),
        }
    }

    /// Number of sites or coupled pairs the term visits.
    pub fn num_sites(&self, num_qubits: u32) -> usize {
        match self.coupling() {
            Some(w) => w.num_pairs(),
            None => num_qubits as usize,
        }
    }

    /// Add `weight · (term ψ)` into `acc`.
    pub fn accumulate_into<T, D>(
        &self,
        space: &StateSpace,
        weight: Complex<T>,
        psi: ArrayView<'_, Complex<T>, D>,
        acc: ArrayViewMut<'_, Complex<T>, D>,
    ) -> EvolveResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.borrowed().accumulate_into(space, weight, psi, acc)
    }

    fn borrowed(&self) -> TermRef<'_> {
        match self {
            Term::Field(pauli) => TermRef::Field(*pauli),
            Term::Coupling(pair, w) => TermRef::Coupling(*pair, w),
            Term::Hopping(w) => TermRef::Hopping(w),
        }
    }
}

/// Borrowed form of [`Term`], so single-term actions need not own a coupling.
#[derive(Debug, Clone, Copy)]
enum TermRef<'a> {
    Field(Pauli),
    Coupling(PauliPair, &'a Coupling),
    Hopping(&'a Coupling),
}

impl TermRef<'_> {
    fn accumulate_into<T, D>(
        self,
        space: &StateSpace,
        weight: Complex<T>,
        psi: ArrayView<'_, Complex<T>, D>,
        mut acc: ArrayViewMut<'_, Complex<T>, D>,
    ) -> EvolveResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        if let TermRef::Coupling(_, w) | TermRef::Hopping(w) = self {
            w.check_size(space.num_qubits())?;
        }
        space.check_state(&psi)?;
        space.check_output(&psi, &acc)?;

        match self {
            TermRef::Field(pauli) => {
                for q in 0..space.num_qubits() {
                    let action = Action::Monomial(pauli.monomial(q));
                    let write = Write::Accumulate(weight);
                    space.apply_action_into(&action, psi.view(), acc.view_mut(), write)?;
                }
            }
            TermRef::Coupling(pair, w) => {
                for (i, j, wij) in w.pairs() {
                    let action = Action::Monomial(pair.monomial(i, j));
                    let write = Write::Accumulate(weight * real(wij)?);
                    space.apply_action_into(&action, psi.view(), acc.view_mut(), write)?;
                }
            }
            TermRef::Hopping(w) => {
                for (i, j, wij) in w.pairs() {
                    let mask = bit_mask(i) | bit_mask(j);
                    let c = weight * real(wij)?;
                    // bit i != bit j; the partner differs in both bits
                    for k in space.indices().select(|k| (k & mask).count_ones() == 1) {
                        let partner = psi.index_axis(Axis(0), k ^ mask);
                        acc.index_axis_mut(Axis(0), k)
                            .zip_mut_with(&partner, |o, &a| *o = *o + c * a);
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Field(pauli) => write!(f, "{pauli} field"),
            Term::Coupling(pair, _) => write!(f, "{pair} coupling"),
            Term::Hopping(_) => f.write_str("XY hopping"),
        }
    }
}

/// A single weighted term: `coeff · term`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The operator.
    pub term: Term,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, term: Term) -> Self {
        Self { coeff, term }
    }

    /// Shorthand: uniform field `coeff · Σ_i O(i)`.
    pub fn field(pauli: Pauli, coeff: f64) -> Self {
        Self::new(coeff, Term::Field(pauli))
    }

    /// Shorthand: coupling `coeff · Σ w[i,j] OO(i,j)`.
    pub fn coupling(pair: PauliPair, coupling: Coupling, coeff: f64) -> Self {
        Self::new(coeff, Term::Coupling(pair, coupling))
    }

    /// Shorthand: XY hopping over `coupling`.
    pub fn hopping(coupling: Coupling, coeff: f64) -> Self {
        Self::new(coeff, Term::Hopping(coupling))
    }
}

/// A weighted sum of field, coupling and hopping terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    /// Create from a list of terms.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        Self { terms }
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Append a term.
    pub fn push(&mut self, term: HamiltonianTerm) {
        self.terms.push(term);
    }

    /// Fail unless every term fits a register of `num_qubits` qubits.
    pub fn check(&self, num_qubits: u32) -> EvolveResult<()> {
        self.terms.iter().try_for_each(|t| t.term.check(num_qubits))
    }

    /// `Hψ`, returned as a new array.
    pub fn apply<T, S, D>(
        &self,
        space: &StateSpace,
        psi: &ArrayBase<S, D>,
    ) -> EvolveResult<Array<Complex<T>, D>>
    where
        T: Real,
        S: Data<Elem = Complex<T>>,
        D: Dimension + RemoveAxis,
    {
        let mut out = Array::zeros(psi.raw_dim());
        self.apply_into(space, psi.view(), out.view_mut())?;
        Ok(out)
    }

    /// `Hψ`, written into `out` (previous contents are discarded).
    pub fn apply_into<T, D>(
        &self,
        space: &StateSpace,
        psi: ArrayView<'_, Complex<T>, D>,
        mut out: ArrayViewMut<'_, Complex<T>, D>,
    ) -> EvolveResult<()>
    where
        T: Real,
        D: Dimension + RemoveAxis,
    {
        self.check(space.num_qubits())?;
        space.check_state(&psi)?;
        space.check_output(&psi, &out)?;
        out.fill(complex(T::zero(), T::zero()));
        for t in &self.terms {
            t.term.accumulate_into(space, real(t.coeff)?, psi.view(), out.view_mut())?;
        }
        Ok(())
    }
}

impl FromIterator<HamiltonianTerm> for Hamiltonian {
    fn from_iter<I: IntoIterator<Item = HamiltonianTerm>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// `Σ_i O(i) ψ`.
pub fn field_action<T, S, D>(
    space: &StateSpace,
    pauli: Pauli,
    psi: &ArrayBase<S, D>,
) -> EvolveResult<Array<Complex<T>, D>>
where
    T: Real,
    S: Data<Elem = Complex<T>>,
    D: Dimension + RemoveAxis,
{
    term_action(space, TermRef::Field(pauli), psi)
}

/// `Σ_{i<j, w≠0} w[i,j] · OO(i,j) ψ`.
pub fn coupling_action<T, S, D>(
    space: &StateSpace,
    pair: PauliPair,
    coupling: &Coupling,
    psi: &ArrayBase<S, D>,
) -> EvolveResult<Array<Complex<T>, D>>
where
    T: Real,
    S: Data<Elem = Complex<T>>,
    D: Dimension + RemoveAxis,
{
    term_action(space, TermRef::Coupling(pair, coupling), psi)
}

/// XY exchange action: on each coupled pair, every index with bit `i ≠ bit j`
/// receives `w[i,j]` times the amplitude of its partner with both bits flipped.
pub fn hopping_action<T, S, D>(
    space: &StateSpace,
    coupling: &Coupling,
    psi: &ArrayBase<S, D>,
) -> EvolveResult<Array<Complex<T>, D>>
where
    T: Real,
    S: Data<Elem = Complex<T>>,
    D: Dimension + RemoveAxis,
{
    term_action(space, TermRef::Hopping(coupling), psi)
}

fn term_action<T, S, D>(
    space: &StateSpace,
    term: TermRef<'_>,
    psi: &ArrayBase<S, D>,
) -> EvolveResult<Array<Complex<T>, D>>
where
    T: Real,
    S: Data<Elem = Complex<T>>,
    D: Dimension + RemoveAxis,
{
    let mut out = Array::zeros(psi.raw_dim());
    let one = complex(T::one(), T::zero());
    term.accumulate_into(space, one, psi.view(), out.view_mut())?;
    Ok(out)
}

fn real<T: Real>(x: f64) -> EvolveResult<Complex<T>> {
    Ok(complex(to_real(x)?, T::zero()))
}
