//! Two-slot double buffer for sequential term application.
//!
//! Each step reads the front slot and writes the back slot, then the two
//! swap roles. Swapping exchanges the `&mut` handles, never the data, so a
//! step costs no allocation and no copy.
//!
//! After `n` steps the latest result sits in the caller's `state` array
//! when `n` is even and in `scratch` when `n` is odd. [`DoubleBuffer::finish`]
//! resolves that by parity: on an odd count it swaps the two arrays' storage
//! once (O(1)), so on return `state` always holds the final result.

use ndarray::{Array, ArrayView, ArrayViewMut, Dimension};
use num_complex::Complex;

/// Ping-pong buffer over a state array and a scratch array of equal shape.
#[derive(Debug)]
pub struct DoubleBuffer<'a, T, D: Dimension> {
    front: &'a mut Array<Complex<T>, D>,
    back: &'a mut Array<Complex<T>, D>,
    steps: usize,
}

impl<'a, T, D: Dimension> DoubleBuffer<'a, T, D> {
    /// Start with `state` as the current slot and `scratch` as the write slot.
    pub fn new(
        state: &'a mut Array<Complex<T>, D>,
        scratch: &'a mut Array<Complex<T>, D>,
    ) -> Self {
        Self {
            front: state,
            back: scratch,
            steps: 0,
        }
    }

    /// The latest result.
    pub fn current(&self) -> ArrayView<'_, Complex<T>, D> {
        self.front.view()
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run `f(current, next)` and flip the slots.
    ///
    /// On error the slots are left unflipped and the step is not counted.
    pub fn step<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce(ArrayView<'_, Complex<T>, D>, ArrayViewMut<'_, Complex<T>, D>) -> Result<(), E>,
    {
        f(self.front.view(), self.back.view_mut())?;
        std::mem::swap(&mut self.front, &mut self.back);
        self.steps += 1;
        Ok(())
    }

    /// Hand the result back to the caller's `state` array.
    ///
    /// Returns the number of steps applied. On return the `state` passed
    /// to [`new`](Self::new) holds the final result and `scratch` holds
    /// the state before the last step (or the untouched scratch after zero
    /// steps).
    pub fn finish(self) -> usize {
        if self.steps % 2 == 1 {
            // front is the caller's scratch here
            std::mem::swap(self.front, self.back);
        }
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Ix1, array};
    use num_complex::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn add_one(cur: ArrayView<'_, Complex64, Ix1>, mut next: ArrayViewMut<'_, Complex64, Ix1>) {
        next.zip_mut_with(&cur, |o, &a| *o = a + c(1.0));
    }

    #[test]
    fn test_odd_step_count_restores_state_slot() {
        let mut state = array![c(0.0), c(10.0)];
        let mut scratch: Array1<Complex64> = Array1::zeros(2);
        let mut buf = DoubleBuffer::new(&mut state, &mut scratch);
        for _ in 0..3 {
            buf.step::<(), _>(|cur, next| {
                add_one(cur, next);
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(buf.current(), array![c(3.0), c(13.0)]);
        assert_eq!(buf.finish(), 3);
        assert_eq!(state, array![c(3.0), c(13.0)]);
        assert_eq!(scratch, array![c(2.0), c(12.0)]);
    }

    #[test]
    fn test_even_step_count() {
        let mut state = array![c(1.0)];
        let mut scratch: Array1<Complex64> = Array1::zeros(1);
        let mut buf = DoubleBuffer::new(&mut state, &mut scratch);
        for _ in 0..4 {
            buf.step::<(), _>(|cur, next| {
                add_one(cur, next);
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(buf.finish(), 4);
        assert_eq!(state, array![c(5.0)]);
    }

    #[test]
    fn test_zero_steps_leaves_state() {
        let mut state = array![c(7.0)];
        let mut scratch: Array1<Complex64> = Array1::zeros(1);
        let buf = DoubleBuffer::new(&mut state, &mut scratch);
        assert_eq!(buf.finish(), 0);
        assert_eq!(state, array![c(7.0)]);
    }

    #[test]
    fn test_failed_step_does_not_flip() {
        let mut state = array![c(1.0)];
        let mut scratch: Array1<Complex64> = Array1::zeros(1);
        let mut buf = DoubleBuffer::new(&mut state, &mut scratch);
        let res: Result<(), &str> = buf.step(|_, _| Err("boom"));
        assert!(res.is_err());
        assert_eq!(buf.steps(), 0);
        assert_eq!(buf.current(), array![c(1.0)]);
    }
}
