//! Row kernels over the basis axis.
//!
//! Every operator in this crate acts on an amplitude array as either a
//! *monomial*
//!
//!   (Oψ)[k] = phase(k) · ψ[source(k)]
//!
//! or as the sum of two monomials (Hadamard, rotations). `source` is a
//! [`BitOp`] on the output index and `phase` is a per-index factor, so no
//! operator matrix is ever materialised.
//!
//! Row `k` along axis 0 is basis state `k`. For a batched `2^L × N` array
//! the factor broadcasts along the batch axis and permutations move whole
//! rows, leaving the batch axis untouched.

use ndarray::{ArrayView, ArrayView1, ArrayViewMut, Axis, Dimension, RemoveAxis, Zip};
use num_complex::Complex;

use crate::bits::BitOp;
use crate::config::Device;
use crate::index::IndexArray;
use crate::scalar::Real;

/// Per-index scalar factor of a monomial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase<T> {
    /// The same factor everywhere.
    Uniform(Complex<T>),
    /// `even` where `k & mask` has even popcount, `odd` otherwise.
    Parity {
        /// Bits whose parity selects the factor.
        mask: usize,
        /// Factor for even parity.
        even: Complex<T>,
        /// Factor for odd parity.
        odd: Complex<T>,
    },
    /// `set` where every bit of `mask` is 1, `unset` otherwise.
    AllSet {
        /// Bits that must all be set.
        mask: usize,
        /// Factor when all bits are set.
        set: Complex<T>,
        /// Factor otherwise.
        unset: Complex<T>,
    },
}

impl<T: Real> Phase<T> {
    /// Factor at output index `k`.
    #[inline]
    pub fn at(&self, k: usize) -> Complex<T> {
        match *self {
            Phase::Uniform(c) => c,
            Phase::Parity { mask, even, odd } => {
                if (k & mask).count_ones() & 1 == 0 {
                    even
                } else {
                    odd
                }
            }
            Phase::AllSet { mask, set, unset } => {
                if k & mask == mask {
                    set
                } else {
                    unset
                }
            }
        }
    }

    /// Multiply every factor by `c`.
    #[must_use]
    pub fn scaled(self, c: Complex<T>) -> Self {
        match self {
            Phase::Uniform(u) => Phase::Uniform(u * c),
            Phase::Parity { mask, even, odd } => Phase::Parity {
                mask,
                even: even * c,
                odd: odd * c,
            },
            Phase::AllSet { mask, set, unset } => Phase::AllSet {
                mask,
                set: set * c,
                unset: unset * c,
            },
        }
    }
}

/// A signed/phased permutation: `(Oψ)[k] = phase(k) · ψ[source(k)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monomial<T> {
    /// Maps an output index to the input index it reads.
    pub source: BitOp,
    /// Factor applied at the output index.
    pub phase: Phase<T>,
}

impl<T: Real> Monomial<T> {
    /// Pure permutation.
    pub fn permutation(source: BitOp) -> Self {
        Self {
            source,
            phase: Phase::Uniform(Complex::new(T::one(), T::zero())),
        }
    }

    /// Pure diagonal.
    pub fn diagonal(phase: Phase<T>) -> Self {
        Self {
            source: BitOp::Identity,
            phase,
        }
    }

    /// Identity scaled by `c`.
    pub fn scalar(c: Complex<T>) -> Self {
        Self::diagonal(Phase::Uniform(c))
    }

    /// Same monomial with every factor multiplied by `c`.
    #[must_use]
    pub fn scaled(self, c: Complex<T>) -> Self {
        Self {
            source: self.source,
            phase: self.phase.scaled(c),
        }
    }
}

/// An operator expressed in index algebra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action<T> {
    /// A single monomial.
    Monomial(Monomial<T>),
    /// The sum of two monomials.
    Sum(Monomial<T>, Monomial<T>),
}

impl<T: Real> Action<T> {
    /// `cos θ · ψ − i sin θ · (Pψ)` given precomputed `(cos θ, −i sin θ)`.
    pub fn rotation(coeffs: (Complex<T>, Complex<T>), generator: Monomial<T>) -> Self {
        let (cos, neg_i_sin) = coeffs;
        Action::Sum(Monomial::scalar(cos), generator.scaled(neg_i_sin))
    }
}

/// How a kernel combines its result with the destination row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Write<T> {
    /// `out[k] = (Oψ)[k]`.
    Assign,
    /// `out[k] += w · (Oψ)[k]`.
    Accumulate(Complex<T>),
}

/// Evaluate `action` on `psi` row by row into `out`.
///
/// Shapes are not checked here; [`StateSpace`](crate::space::StateSpace)
/// validates them before calling in.
pub fn apply_action<T, D>(
    device: Device,
    indices: &IndexArray,
    action: &Action<T>,
    psi: ArrayView<'_, Complex<T>, D>,
    mut out: ArrayViewMut<'_, Complex<T>, D>,
    write: Write<T>,
) where
    T: Real,
    D: Dimension + RemoveAxis,
{
    let rows = Zip::from(out.axis_iter_mut(Axis(0))).and(indices.view());
    let fill = |mut row: ArrayViewMut<'_, Complex<T>, D::Smaller>, &k: &usize| match action {
        Action::Monomial(m) => {
            let c = m.phase.at(k);
            let src = psi.index_axis(Axis(0), m.source.apply(k));
            Zip::from(&mut row).and(&src).for_each(|o, &a| {
                *o = combine(*o, c * a, write);
            });
        }
        Action::Sum(m0, m1) => {
            let c0 = m0.phase.at(k);
            let c1 = m1.phase.at(k);
            let src0 = psi.index_axis(Axis(0), m0.source.apply(k));
            let src1 = psi.index_axis(Axis(0), m1.source.apply(k));
            Zip::from(&mut row)
                .and(&src0)
                .and(&src1)
                .for_each(|o, &a, &b| {
                    *o = combine(*o, c0 * a + c1 * b, write);
                });
        }
    };
    match device {
        Device::Serial => rows.for_each(fill),
        Device::Parallel => rows.par_for_each(fill),
    }
}

#[inline]
fn combine<T: Real>(old: Complex<T>, value: Complex<T>, write: Write<T>) -> Complex<T> {
    match write {
        Write::Assign => value,
        Write::Accumulate(w) => old + w * value,
    }
}

/// Multiply row `k` of `psi` by `factor[k]` in place.
pub fn scale_rows<T, D>(
    device: Device,
    factor: ArrayView1<'_, Complex<T>>,
    mut psi: ArrayViewMut<'_, Complex<T>, D>,
) where
    T: Real,
    D: Dimension + RemoveAxis,
{
    let rows = Zip::from(psi.axis_iter_mut(Axis(0))).and(factor);
    let scale = |mut row: ArrayViewMut<'_, Complex<T>, D::Smaller>, &f: &Complex<T>| {
        row.map_inplace(|a| *a = f * *a);
    };
    match device {
        Device::Serial => rows.for_each(scale),
        Device::Parallel => rows.par_for_each(scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_phase_parity_and_all_set() {
        let p = Phase::Parity {
            mask: 0b11,
            even: c(1.0, 0.0),
            odd: c(-1.0, 0.0),
        };
        assert_eq!(p.at(0b00), c(1.0, 0.0));
        assert_eq!(p.at(0b01), c(-1.0, 0.0));
        assert_eq!(p.at(0b11), c(1.0, 0.0));

        let s = Phase::AllSet {
            mask: 0b10,
            set: c(0.0, 1.0),
            unset: c(1.0, 0.0),
        };
        assert_eq!(s.at(0b01), c(1.0, 0.0));
        assert_eq!(s.at(0b10), c(0.0, 1.0));
        assert_eq!(s.scaled(c(2.0, 0.0)).at(0b10), c(0.0, 2.0));
    }

    #[test]
    fn test_monomial_gather() {
        let idx = IndexArray::new(2).unwrap();
        let psi = array![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)];
        let mut out: Array1<Complex64> = Array1::zeros(4);
        let flip = Action::Monomial(Monomial::permutation(BitOp::Flip(0b01)));
        apply_action(
            Device::Serial,
            &idx,
            &flip,
            psi.view(),
            out.view_mut(),
            Write::Assign,
        );
        assert_eq!(out, array![c(2.0, 0.0), c(1.0, 0.0), c(4.0, 0.0), c(3.0, 0.0)]);
    }

    #[test]
    fn test_accumulate_adds_weighted() {
        let idx = IndexArray::new(1).unwrap();
        let psi = array![c(1.0, 0.0), c(0.0, 1.0)];
        let mut acc = array![c(1.0, 0.0), c(1.0, 0.0)];
        let ident = Action::Monomial(Monomial::scalar(c(1.0, 0.0)));
        apply_action(
            Device::Serial,
            &idx,
            &ident,
            psi.view(),
            acc.view_mut(),
            Write::Accumulate(c(2.0, 0.0)),
        );
        assert_eq!(acc, array![c(3.0, 0.0), c(1.0, 2.0)]);
    }

    #[test]
    fn test_parallel_matches_serial_on_batch() {
        let idx = IndexArray::new(3).unwrap();
        let psi = ndarray::Array2::from_shape_fn((8, 3), |(k, b)| c(k as f64, b as f64));
        let action = Action::Sum(
            Monomial::diagonal(Phase::Parity {
                mask: 0b101,
                even: c(0.5, 0.0),
                odd: c(0.0, -0.5),
            }),
            Monomial::permutation(BitOp::SwapBits(0, 2)),
        );
        let mut serial: ndarray::Array2<Complex64> = ndarray::Array2::zeros((8, 3));
        let mut parallel: ndarray::Array2<Complex64> = ndarray::Array2::zeros((8, 3));
        apply_action(
            Device::Serial,
            &idx,
            &action,
            psi.view(),
            serial.view_mut(),
            Write::Assign,
        );
        apply_action(
            Device::Parallel,
            &idx,
            &action,
            psi.view(),
            parallel.view_mut(),
            Write::Assign,
        );
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_scale_rows_broadcasts_over_batch() {
        let mut psi = ndarray::Array2::from_elem((2, 2), c(1.0, 0.0));
        let factor = array![c(1.0, 0.0), c(-1.0, 0.0)];
        scale_rows(Device::Serial, factor.view(), psi.view_mut());
        assert_eq!(psi.row(0).to_vec(), vec![c(1.0, 0.0); 2]);
        assert_eq!(psi.row(1).to_vec(), vec![c(-1.0, 0.0); 2]);
    }
}
