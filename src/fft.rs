//! FFT plan ownership for kernel construction and forward transforms.
//!
//! Wraps the rustfft plan behind a narrow in-place forward interface so the
//! kernel builder and the transform logic never touch the backend directly.

use std::fmt;
use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Owned forward FFT plan, fixed to a single transform length.
///
/// Created once per engine and reused for kernel construction and every
/// subsequent forward call. The plan is released when the engine drops.
pub(crate) struct FftPlan {
    fft: Arc<dyn Fft<f64>>,
    length: usize,
}

impl FftPlan {
    /// Plans an in-place forward transform of `length` points.
    pub(crate) fn forward(length: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(length);
        Self { fft, length }
    }

    /// Transform length this plan was created for.
    pub(crate) const fn length(&self) -> usize {
        self.length
    }

    /// Runs the unnormalized forward transform in place.
    ///
    /// `buffer` must hold exactly [`FftPlan::length`] complex values.
    pub(crate) fn process(&self, buffer: &mut [Complex<f64>]) {
        debug_assert_eq!(buffer.len(), self.length);
        self.fft.process(buffer);
    }
}

impl fmt::Debug for FftPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlan")
            .field("length", &self.length)
            .finish()
    }
}
