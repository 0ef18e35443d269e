//! Kernel construction for the constant-Q transform.
//!
//! Builds the bank of frequency-domain analysis kernels: one windowed complex
//! exponential per bin, pushed through the forward FFT, conjugated, and
//! normalized. Construction runs once per engine and is amortized over every
//! subsequent forward call.

use std::f64::consts::PI;

use ndarray::{Array2, ArrayView1};
use num_complex::Complex;

use crate::fft::FftPlan;
use crate::types::{CqtConfig, WindowFunction};

/// Frequency-domain kernel bank: one conjugated, normalized row per bin.
///
/// Read-only after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub(crate) struct SpectralKernel {
    /// `num_bins` rows of `fft_length` complex coefficients.
    matrix: Array2<Complex<f64>>,
}

impl SpectralKernel {
    /// Builds the kernel bank for `config` using the engine's FFT plan.
    ///
    /// The caller validates `config` beforehand; `plan` must be sized to
    /// `config.fft_length()`.
    ///
    /// # Panics
    /// Panics if a per-bin window length exceeds the longest-window bound
    /// derived from the configuration. This is an arithmetic inconsistency
    /// in the derived parameters, not a recoverable runtime condition.
    pub(crate) fn build(config: &CqtConfig, plan: &FftPlan) -> Self {
        let num_bins = config.num_bins();
        let fft_length = config.fft_length();
        let q = config.q_factor();
        debug_assert_eq!(plan.length(), fft_length);

        let mut matrix = Array2::from_elem((num_bins, fft_length), Complex::new(0.0, 0.0));

        // Bin 0 carries the longest window; the FFT length is the next power
        // of two above it, so the atom buffer accommodates every bin.
        let max_window = config.window_length(0);
        let mut atom = vec![Complex::new(0.0, 0.0); fft_length];

        for k in 0..num_bins {
            let window_length = config.window_length(k);
            assert!(
                window_length <= max_window,
                "window length {window_length} for bin {k} exceeds the maximum of {max_window}"
            );

            let window = generate_window(window_length, config.window_function);
            let scale = 1.0 / window_length as f64;

            atom.fill(Complex::new(0.0, 0.0));
            for (i, slot) in atom
                .iter_mut()
                .take(window_length.min(fft_length))
                .enumerate()
            {
                let phase = 2.0 * PI * q * i as f64 / window_length as f64;
                *slot = Complex::new(phase.cos() * scale, phase.sin() * scale) * window[i];
            }

            plan.process(&mut atom);
            matrix.row_mut(k).assign(&ArrayView1::from(&atom[..]));
        }

        // Conjugate for cross-correlation with the frame spectrum, and fold
        // in the forward FFT's unnormalized scale.
        let norm = fft_length as f64;
        matrix.mapv_inplace(|coefficient| coefficient.conj() / norm);

        Self { matrix }
    }

    /// Total number of analysis bins.
    pub(crate) fn num_bins(&self) -> usize {
        self.matrix.nrows()
    }

    /// FFT length shared with every forward call.
    pub(crate) fn fft_length(&self) -> usize {
        self.matrix.ncols()
    }

    /// Projects an FFT'd frame onto the kernel bank, writing one complex
    /// coefficient per bin.
    pub(crate) fn project(&self, spectrum: &[Complex<f64>], projection: &mut [Complex<f64>]) {
        debug_assert_eq!(spectrum.len(), self.fft_length());
        debug_assert_eq!(projection.len(), self.num_bins());

        let spectrum = ArrayView1::from(spectrum);
        for (row, slot) in self.matrix.rows().into_iter().zip(projection.iter_mut()) {
            *slot = row.dot(&spectrum);
        }
    }
}

/// Generate window function coefficients.
///
/// Lengths below two collapse to all-ones, keeping the `size - 1`
/// denominator well defined.
pub(crate) fn generate_window(size: usize, function: WindowFunction) -> Vec<f64> {
    if size < 2 {
        return vec![1.0; size];
    }

    let denom = (size - 1) as f64;
    match function {
        WindowFunction::Hamming => (0..size)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
            .collect(),
        WindowFunction::Hann => (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
            .collect(),
    }
}
