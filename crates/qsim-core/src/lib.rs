//! `qsim-core` — bit-indexed statevector engine.
//!
//! An `L`-qubit state is a dense array of `2^L` complex amplitudes (or a
//! `2^L × N` batch). Qubit `p` of basis state `k` is bit `p` of `k`, with
//! bit 0 the least significant. Gates are never materialised as matrices:
//! each one lowers to index permutations and per-index phases evaluated
//! against a cached index array.
//!
//! - [`bits`] — scalar bit algebra and [`BitOp`] index transformations
//! - [`index`] — the canonical index array `0..2^L`
//! - [`gate`] — [`Gate`], [`Pauli`] and [`PauliPair`] with their actions
//! - [`kernel`] — row kernels shared by gates and higher-level evolution
//! - [`space`] — [`StateSpace`], the entry point for gate application
//! - [`diagonal`] — diagonals of tensor products of diagonal operators
//! - [`config`] — explicit engine configuration
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qsim_core::{Gate, StateSpace};
//!
//! // Uniform superposition on two qubits, then Z on qubit 0.
//! let space = StateSpace::new(2).unwrap();
//! let h = Complex64::new(0.5, 0.0);
//! let psi = array![h, h, h, h];
//! let out = space.apply(&Gate::Z(0), &psi).unwrap();
//! assert_eq!(out, array![h, -h, h, -h]);
//! ```

pub mod bits;
pub mod config;
pub mod diagonal;
pub mod error;
pub mod gate;
pub mod index;
pub mod kernel;
pub mod scalar;
pub mod space;

pub use bits::BitOp;
pub use config::{Device, SimConfig};
pub use error::{CoreError, CoreResult};
pub use gate::{Gate, Pauli, PauliPair};
pub use index::IndexArray;
pub use scalar::Real;
pub use space::StateSpace;
