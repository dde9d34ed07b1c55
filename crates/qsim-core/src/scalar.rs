//! Amplitude precision.

use std::fmt::Debug;

use num_complex::Complex;
use num_traits::{Float, FloatConst};

use crate::error::{CoreError, CoreResult};

/// Real component type of the amplitudes (`f32` or `f64`).
pub trait Real: Float + FloatConst + Debug + Send + Sync + 'static {}

impl<T> Real for T where T: Float + FloatConst + Debug + Send + Sync + 'static {}

/// Convert an `f64` angle or coefficient to the amplitude precision.
pub fn to_real<T: Real>(value: f64) -> CoreResult<T> {
    T::from(value).ok_or(CoreError::AngleConversion(value))
}

/// Complex constant `re + i·im`.
#[inline]
pub fn complex<T: Real>(re: T, im: T) -> Complex<T> {
    Complex::new(re, im)
}

/// The imaginary unit.
#[inline]
pub fn imag_unit<T: Real>() -> Complex<T> {
    Complex::new(T::zero(), T::one())
}

/// `cos θ` and `-i·sin θ`, the two coefficients of a Pauli rotation.
pub fn rotation_coeffs<T: Real>(theta: f64) -> CoreResult<(Complex<T>, Complex<T>)> {
    let theta: T = to_real(theta)?;
    Ok((
        complex(theta.cos(), T::zero()),
        complex(T::zero(), -theta.sin()),
    ))
}
