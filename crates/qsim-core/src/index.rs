//! The canonical index array `0..2^L`.

use ndarray::{Array1, ArrayView1};

use crate::bits::BitOp;
use crate::error::{CoreError, CoreResult};

/// Widest register the `usize` index type can address.
///
/// Two bits of headroom keep `2^L` and every shifted mask representable.
pub const MAX_INDEX_QUBITS: u32 = usize::BITS - 2;

/// Ordered basis-state indices of an `L`-qubit register.
///
/// Immutable once built; create it once per register width and share it
/// across every gate application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexArray {
    num_qubits: u32,
    indices: Array1<usize>,
}

impl IndexArray {
    /// Build the index array for `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> CoreResult<Self> {
        if num_qubits == 0 {
            return Err(CoreError::InvalidQubitCount);
        }
        if num_qubits > MAX_INDEX_QUBITS {
            return Err(CoreError::TooManyQubits {
                num_qubits,
                max: MAX_INDEX_QUBITS,
            });
        }
        let dim = 1usize << num_qubits;
        Ok(Self {
            num_qubits,
            indices: Array1::from_iter(0..dim),
        })
    }

    /// Register width `L`.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of indices, `2^L`.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false: a register holds at least one qubit.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Read-only view of the indices.
    pub fn view(&self) -> ArrayView1<'_, usize> {
        self.indices.view()
    }

    /// Fail unless `qubit < L`.
    pub fn check_qubit(&self, qubit: u32) -> CoreResult<()> {
        if qubit < self.num_qubits {
            Ok(())
        } else {
            Err(CoreError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            })
        }
    }

    /// Fail unless both qubits are in range and distinct.
    pub fn check_pair(&self, a: u32, b: u32) -> CoreResult<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b {
            return Err(CoreError::DuplicateQubit { qubit: a });
        }
        Ok(())
    }

    /// Apply `op` element-wise, allocating the result.
    pub fn map(&self, op: BitOp) -> Array1<usize> {
        self.indices.mapv(|k| op.apply(k))
    }

    /// Apply `op` element-wise into a caller-supplied buffer of length `2^L`.
    pub fn map_into(&self, op: BitOp, out: &mut Array1<usize>) -> CoreResult<()> {
        if out.len() != self.len() {
            return Err(CoreError::DimensionMismatch {
                expected: self.len(),
                got: out.len(),
            });
        }
        out.zip_mut_with(&self.indices, |o, &k| *o = op.apply(k));
        Ok(())
    }

    /// Indices for which `keep` holds, in ascending order.
    pub fn select(&self, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        self.indices.iter().copied().filter(|&k| keep(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_array_is_canonical() {
        let idx = IndexArray::new(3).unwrap();
        assert_eq!(idx.len(), 8);
        assert_eq!(idx.num_qubits(), 3);
        assert!(idx.view().iter().copied().eq(0..8));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            IndexArray::new(0),
            Err(CoreError::InvalidQubitCount)
        ));
    }

    #[test]
    fn test_width_beyond_index_type_rejected() {
        assert!(matches!(
            IndexArray::new(MAX_INDEX_QUBITS + 1),
            Err(CoreError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_check_qubit_and_pair() {
        let idx = IndexArray::new(2).unwrap();
        assert!(idx.check_qubit(1).is_ok());
        assert!(matches!(
            idx.check_qubit(2),
            Err(CoreError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2
            })
        ));
        assert!(matches!(
            idx.check_pair(1, 1),
            Err(CoreError::DuplicateQubit { qubit: 1 })
        ));
    }

    #[test]
    fn test_map_and_map_into_agree() {
        let idx = IndexArray::new(3).unwrap();
        let op = BitOp::Reflect { width: 3 };
        let owned = idx.map(op);
        let mut out = Array1::zeros(8);
        idx.map_into(op, &mut out).unwrap();
        assert_eq!(owned, out);
        assert_eq!(out[1], 4);
        assert_eq!(out[6], 3);
    }

    #[test]
    fn test_map_into_rejects_wrong_length() {
        let idx = IndexArray::new(3).unwrap();
        let mut out = Array1::zeros(4);
        assert!(matches!(
            idx.map_into(BitOp::Identity, &mut out),
            Err(CoreError::DimensionMismatch {
                expected: 8,
                got: 4
            })
        ));
    }

    #[test]
    fn test_select_differing_bits() {
        let idx = IndexArray::new(2).unwrap();
        let sel = idx.select(|k| ((k ^ (k >> 1)) & 1) == 1);
        assert_eq!(sel, vec![1, 2]);
    }
}
