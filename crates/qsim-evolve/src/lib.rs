//! `qsim-evolve` — Hamiltonian actions and product-formula time evolution.
//!
//! Builds on the [`qsim_core`] engine to act with, and evolve under,
//! Hamiltonians summed over a register:
//!
//! - [`hamiltonian`] — field, coupling and XY hopping actions `Hψ`
//! - [`driver`] — sequential per-site and per-pair rotations with a
//!   reusable scratch buffer
//! - [`trotter`] — first- and second-order multi-step evolution
//! - [`diagonal`] — diagonal operators and their exponentials
//! - [`coupling`] — validated symmetric coupling matrices
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qsim_core::StateSpace;
//! use qsim_evolve::coupling::Coupling;
//! use qsim_evolve::driver::exp_hopping;
//!
//! // Full excitation transfer |01⟩ → -i|10⟩ under XY hopping at θ = π/2.
//! let space = StateSpace::new(2).unwrap();
//! let w = Coupling::new(array![[0.0, 1.0], [1.0, 0.0]]).unwrap();
//! let zero = Complex64::new(0.0, 0.0);
//! let mut psi = array![zero, Complex64::new(1.0, 0.0), zero, zero];
//! exp_hopping(&space, &mut psi, &w, std::f64::consts::FRAC_PI_2).unwrap();
//! assert!((psi[2] - Complex64::new(0.0, -1.0)).norm() < 1e-12);
//! assert!(psi[1].norm() < 1e-12);
//! ```

pub mod buffer;
pub mod coupling;
pub mod diagonal;
pub mod driver;
pub mod error;
pub mod hamiltonian;
pub mod trotter;

pub use buffer::DoubleBuffer;
pub use coupling::Coupling;
pub use driver::{Evolver, Sweep};
pub use error::{EvolveError, EvolveResult};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, Term};
pub use trotter::TrotterEvolution;
