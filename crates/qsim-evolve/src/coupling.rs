//! Symmetric coupling matrices.
//!
//! `w[i, j]` is the interaction strength between qubits `i` and `j`. Only
//! the upper triangle (`i < j`) is visited and only pairs with a nonzero
//! weight contribute; the diagonal is ignored.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use qsim_evolve::coupling::Coupling;
//!
//! let w = Coupling::new(array![[0.0, 1.0, 0.0], [1.0, 0.0, 2.0], [0.0, 2.0, 0.0]]).unwrap();
//! let pairs: Vec<_> = w.pairs().collect();
//! assert_eq!(pairs, vec![(0, 1, 1.0), (1, 2, 2.0)]);
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{EvolveError, EvolveResult};

/// Relative tolerance for the symmetry check.
const SYMMETRY_TOL: f64 = 1e-12;

/// A validated, symmetric coupling matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<f64>", into = "Array2<f64>")]
pub struct Coupling {
    weights: Array2<f64>,
}

impl Coupling {
    /// Validate `weights` as a square, symmetric, finite matrix.
    pub fn new(weights: Array2<f64>) -> EvolveResult<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols {
            return Err(EvolveError::CouplingNotSquare { rows, cols });
        }
        for ((i, j), &w) in weights.indexed_iter() {
            if !w.is_finite() {
                return Err(EvolveError::NonFiniteCoupling { i, j });
            }
            if i < j {
                let v = weights[[j, i]];
                if (w - v).abs() > SYMMETRY_TOL * w.abs().max(v.abs()).max(1.0) {
                    return Err(EvolveError::AsymmetricCoupling { i, j });
                }
            }
        }
        Ok(Self { weights })
    }

    /// Build from an edge list `(i, j, w)`; both `w[i, j]` and `w[j, i]` are set.
    ///
    /// Repeated edges overwrite earlier ones.
    pub fn from_edges(size: usize, edges: &[(usize, usize, f64)]) -> EvolveResult<Self> {
        let mut weights = Array2::zeros((size, size));
        for &(i, j, w) in edges {
            if i >= size || j >= size {
                return Err(EvolveError::CouplingSizeMismatch {
                    size,
                    num_qubits: u32::try_from(i.max(j) + 1).unwrap_or(u32::MAX),
                });
            }
            weights[[i, j]] = w;
            weights[[j, i]] = w;
        }
        Self::new(weights)
    }

    /// Open nearest-neighbour chain with uniform weight.
    pub fn chain(size: usize, weight: f64) -> EvolveResult<Self> {
        let edges: Vec<_> = (1..size).map(|i| (i - 1, i, weight)).collect();
        Self::from_edges(size, &edges)
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight between qubits `i` and `j`.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[[i, j]]
    }

    /// The underlying matrix.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Coupled pairs `(i, j, w)` with `i < j` and `w ≠ 0`, in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.weights
            .indexed_iter()
            .filter(|&((i, j), &w)| i < j && w != 0.0)
            .map(|((i, j), &w)| (i as u32, j as u32, w))
    }

    /// Number of coupled pairs.
    pub fn num_pairs(&self) -> usize {
        self.pairs().count()
    }

    /// Fail unless the matrix is `num_qubits × num_qubits`.
    pub fn check_size(&self, num_qubits: u32) -> EvolveResult<()> {
        if self.size() != num_qubits as usize {
            return Err(EvolveError::CouplingSizeMismatch {
                size: self.size(),
                num_qubits,
            });
        }
        Ok(())
    }
}

impl TryFrom<Array2<f64>> for Coupling {
    type Error = EvolveError;

    fn try_from(weights: Array2<f64>) -> EvolveResult<Self> {
        Self::new(weights)
    }
}

impl From<Coupling> for Array2<f64> {
    fn from(coupling: Coupling) -> Self {
        coupling.weights
    }
}
