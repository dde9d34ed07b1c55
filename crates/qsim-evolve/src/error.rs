//! Error types for the evolution crate.

use thiserror::Error;

/// Errors produced by Hamiltonian actions and time evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvolveError {
    /// Error raised by the core engine.
    #[error("engine error: {0}")]
    Core(#[from] qsim_core::CoreError),

    /// Coupling matrix is not square.
    #[error("coupling matrix must be square, got {rows}x{cols}")]
    CouplingNotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Coupling matrix size differs from the register width.
    #[error("coupling matrix is {size}x{size} but the register has {num_qubits} qubits")]
    CouplingSizeMismatch {
        /// Side length of the coupling matrix.
        size: usize,
        /// Number of qubits in the register.
        num_qubits: u32,
    },

    /// Coupling matrix is not symmetric.
    #[error("coupling matrix is not symmetric: w[{i},{j}] != w[{j},{i}]")]
    AsymmetricCoupling {
        /// Row of the first offending entry.
        i: usize,
        /// Column of the first offending entry.
        j: usize,
    },

    /// Coupling matrix contains a NaN or infinite weight.
    #[error("coupling weight w[{i},{j}] is not finite")]
    NonFiniteCoupling {
        /// Row of the offending entry.
        i: usize,
        /// Column of the offending entry.
        j: usize,
    },

    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty — no terms to evolve")]
    EmptyHamiltonian,

    /// n_steps must be ≥ 1.
    #[error("n_steps must be at least 1, got {0}")]
    InvalidSteps(usize),
}

/// Result type for evolution operations.
pub type EvolveResult<T> = Result<T, EvolveError>;
