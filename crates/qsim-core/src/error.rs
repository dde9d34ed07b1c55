//! Error types for the core engine.

use thiserror::Error;

/// Errors produced by the statevector engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A register must hold at least one qubit.
    #[error("qubit count must be at least 1")]
    InvalidQubitCount,

    /// The register is too wide for the index type or the configured cap.
    #[error("{num_qubits} qubits exceeds the supported maximum of {max}")]
    TooManyQubits {
        /// Requested number of qubits.
        num_qubits: u32,
        /// Largest accepted number of qubits.
        max: u32,
    },

    /// A gate or operator references a qubit outside `[0, L)`.
    #[error("qubit {qubit} is out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the register.
        num_qubits: u32,
    },

    /// A multi-qubit operator names the same qubit twice.
    #[error("qubit {qubit} appears more than once in the same operator")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: u32,
    },

    /// Amplitude array length along the basis axis is not `2^L`.
    #[error("amplitude array has {got} basis rows, expected {expected}")]
    DimensionMismatch {
        /// Expected number of rows (`2^L`).
        expected: usize,
        /// Rows actually present.
        got: usize,
    },

    /// Output buffer shape differs from the input state shape.
    #[error("output buffer shape {got:?} does not match state shape {expected:?}")]
    ShapeMismatch {
        /// Shape of the input state.
        expected: Vec<usize>,
        /// Shape of the supplied output buffer.
        got: Vec<usize>,
    },

    /// An angle or coefficient could not be represented in the amplitude precision.
    #[error("value {0} cannot be represented in the amplitude precision")]
    AngleConversion(f64),

    /// Configuration could not be parsed or is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core engine operations.
pub type CoreResult<T> = Result<T, CoreError>;
