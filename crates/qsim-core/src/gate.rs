//! Gate definitions and their index-algebra actions.
//!
//! Each gate lowers to an [`Action`]: a permutation of basis indices, a
//! per-index phase, or a sum of two such monomials. Conventions:
//!
//! - `Z(i)` multiplies by `1 − 2·bit(k, i)`.
//! - `Y(i)` is `i·Z(i)·X(i)`: flip first, then sign, then multiply by `i`.
//! - `H(i) = (X(i) + Z(i)) / √2`.
//! - `Rp(i, θ) = cos(θ/2)·1 − i·sin(θ/2)·P(i)` for `P ∈ {X, Y, Z}`.
//! - `YY(i, j) = −ZZ(i, j)·XX(i, j)`.

use std::fmt;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::bits::{BitOp, bit_mask};
use crate::error::CoreResult;
use crate::index::IndexArray;
use crate::kernel::{Action, Monomial, Phase};
use crate::scalar::{Real, complex, imag_unit, rotation_coeffs};

/// Single-qubit Pauli generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl Pauli {
    /// The gate applying this Pauli to `qubit`.
    pub fn on(self, qubit: u32) -> Gate {
        match self {
            Pauli::X => Gate::X(qubit),
            Pauli::Y => Gate::Y(qubit),
            Pauli::Z => Gate::Z(qubit),
        }
    }

    /// Monomial form of this Pauli on `qubit`.
    pub fn monomial<T: Real>(self, qubit: u32) -> Monomial<T> {
        let m = bit_mask(qubit);
        match self {
            Pauli::X => Monomial::permutation(BitOp::Flip(m)),
            Pauli::Z => Monomial::diagonal(sign_parity(m)),
            Pauli::Y => Monomial {
                source: BitOp::Flip(m),
                phase: sign_parity(m).scaled(imag_unit()),
            },
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        };
        f.write_str(s)
    }
}

/// Two-qubit Pauli product generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliPair {
    /// X⊗X.
    XX,
    /// Y⊗Y.
    YY,
    /// Z⊗Z.
    ZZ,
}

impl PauliPair {
    /// The gate applying this product to qubits `a` and `b`.
    pub fn on(self, a: u32, b: u32) -> Gate {
        match self {
            PauliPair::XX => Gate::XX(a, b),
            PauliPair::YY => Gate::YY(a, b),
            PauliPair::ZZ => Gate::ZZ(a, b),
        }
    }

    /// Monomial form of this product on `a` and `b`.
    pub fn monomial<T: Real>(self, a: u32, b: u32) -> Monomial<T> {
        let m = bit_mask(a) | bit_mask(b);
        match self {
            PauliPair::XX => Monomial::permutation(BitOp::Flip(m)),
            PauliPair::ZZ => Monomial::diagonal(sign_parity(m)),
            PauliPair::YY => Monomial {
                source: BitOp::Flip(m),
                phase: sign_parity(m).scaled(complex(-T::one(), T::zero())),
            },
        }
    }
}

impl fmt::Display for PauliPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PauliPair::XX => "XX",
            PauliPair::YY => "YY",
            PauliPair::ZZ => "ZZ",
        };
        f.write_str(s)
    }
}

/// `+1` on even parity of `k & mask`, `−1` on odd.
fn sign_parity<T: Real>(mask: usize) -> Phase<T> {
    Phase::Parity {
        mask,
        even: complex(T::one(), T::zero()),
        odd: complex(-T::one(), T::zero()),
    }
}

/// A gate acting on named qubits. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Pauli-X.
    X(u32),
    /// Pauli-Y, as `i·Z·X`.
    Y(u32),
    /// Pauli-Z.
    Z(u32),
    /// Hadamard.
    H(u32),
    /// Phase gate: `+i` on |1⟩.
    S(u32),
    /// Inverse phase gate: `−i` on |1⟩.
    Sdg(u32),
    /// X rotation.
    Rx(u32, f64),
    /// Y rotation.
    Ry(u32, f64),
    /// Z rotation.
    Rz(u32, f64),
    /// Controlled NOT.
    Cnot {
        /// Control qubit.
        control: u32,
        /// Target qubit.
        target: u32,
    },
    /// Controlled Z.
    Cz {
        /// Control qubit.
        control: u32,
        /// Target qubit.
        target: u32,
    },
    /// Exchange two qubits.
    Swap(u32, u32),
    /// X⊗X.
    XX(u32, u32),
    /// Y⊗Y.
    YY(u32, u32),
    /// Z⊗Z.
    ZZ(u32, u32),
}

impl Gate {
    /// Short gate name.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::H(_) => "h",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::Rx(..) => "rx",
            Gate::Ry(..) => "ry",
            Gate::Rz(..) => "rz",
            Gate::Cnot { .. } => "cx",
            Gate::Cz { .. } => "cz",
            Gate::Swap(..) => "swap",
            Gate::XX(..) => "xx",
            Gate::YY(..) => "yy",
            Gate::ZZ(..) => "zz",
        }
    }

    /// Qubits the gate touches, in declaration order.
    pub fn qubits(&self) -> Vec<u32> {
        match *self {
            Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::H(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _) => vec![q],
            Gate::Cnot { control, target } | Gate::Cz { control, target } => {
                vec![control, target]
            }
            Gate::Swap(a, b) | Gate::XX(a, b) | Gate::YY(a, b) | Gate::ZZ(a, b) => vec![a, b],
        }
    }

    /// Check qubit ranges (and distinctness for two-qubit gates).
    pub fn validate(&self, indices: &IndexArray) -> CoreResult<()> {
        match self.qubits().as_slice() {
            [q] => indices.check_qubit(*q),
            [a, b] => indices.check_pair(*a, *b),
            _ => Ok(()),
        }
    }

    /// Lower the gate to its index-algebra action at precision `T`.
    pub fn action<T: Real>(&self) -> CoreResult<Action<T>> {
        let one = complex(T::one(), T::zero());
        let action = match *self {
            Gate::X(q) => Action::Monomial(Pauli::X.monomial(q)),
            Gate::Y(q) => Action::Monomial(Pauli::Y.monomial(q)),
            Gate::Z(q) => Action::Monomial(Pauli::Z.monomial(q)),
            Gate::H(q) => {
                let r = complex(T::FRAC_1_SQRT_2(), T::zero());
                Action::Sum(
                    Pauli::X.monomial(q).scaled(r),
                    Pauli::Z.monomial(q).scaled(r),
                )
            }
            Gate::S(q) => Action::Monomial(Monomial::diagonal(Phase::AllSet {
                mask: bit_mask(q),
                set: imag_unit(),
                unset: one,
            })),
            Gate::Sdg(q) => Action::Monomial(Monomial::diagonal(Phase::AllSet {
                mask: bit_mask(q),
                set: -imag_unit::<T>(),
                unset: one,
            })),
            Gate::Rx(q, theta) => {
                Action::rotation(rotation_coeffs(theta / 2.0)?, Pauli::X.monomial(q))
            }
            Gate::Ry(q, theta) => {
                Action::rotation(rotation_coeffs(theta / 2.0)?, Pauli::Y.monomial(q))
            }
            Gate::Rz(q, theta) => {
                Action::rotation(rotation_coeffs(theta / 2.0)?, Pauli::Z.monomial(q))
            }
            Gate::Cnot { control, target } => {
                Action::Monomial(Monomial::permutation(BitOp::ControlledFlip { control, target }))
            }
            Gate::Cz { control, target } => Action::Monomial(Monomial::diagonal(Phase::AllSet {
                mask: bit_mask(control) | bit_mask(target),
                set: -one,
                unset: one,
            })),
            Gate::Swap(a, b) => Action::Monomial(Monomial::permutation(BitOp::SwapBits(a, b))),
            Gate::XX(a, b) => Action::Monomial(PauliPair::XX.monomial(a, b)),
            Gate::YY(a, b) => Action::Monomial(PauliPair::YY.monomial(a, b)),
            Gate::ZZ(a, b) => Action::Monomial(PauliPair::ZZ.monomial(a, b)),
        };
        Ok(action)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match *self {
            Gate::Rx(_, t) | Gate::Ry(_, t) | Gate::Rz(_, t) => write!(f, "({t})")?,
            _ => {}
        }
        let qubits: Vec<String> = self.qubits().iter().map(|q| format!("q{q}")).collect();
        write!(f, " {}", qubits.join(", "))
    }
}
