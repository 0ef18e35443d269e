//! The constant-Q transform engine.
//!
//! Projects time-domain frames onto a precomputed frequency-domain kernel
//! bank: one FFT per frame followed by a complex projection per bin, yielding
//! squared magnitudes on a logarithmic frequency axis.

use num_complex::Complex;

use crate::error::{CqtError, CqtResult};
use crate::fft::FftPlan;
use crate::kernel::SpectralKernel;
use crate::types::CqtConfig;

/// Reusable scratch arena for forward transform calls.
///
/// Holds the FFT-length spectrum buffer and the bin-count projection buffer
/// that every forward call overwrites. The engine owns one arena for the
/// `&mut self` convenience methods; allocate one per thread with
/// [`CqtScratch::for_transform`] to run concurrent calls against a shared
/// engine via [`ConstantQTransform::forward_with_scratch`].
#[derive(Debug, Clone)]
pub struct CqtScratch {
    spectrum: Vec<Complex<f64>>,
    projection: Vec<Complex<f64>>,
}

impl CqtScratch {
    /// Creates a scratch arena sized for `transform`.
    pub fn for_transform(transform: &ConstantQTransform) -> Self {
        Self::with_sizes(transform.fft_length(), transform.bin_count())
    }

    fn with_sizes(fft_length: usize, num_bins: usize) -> Self {
        Self {
            spectrum: vec![Complex::new(0.0, 0.0); fft_length],
            projection: vec![Complex::new(0.0, 0.0); num_bins],
        }
    }
}

/// Constant-Q transform engine.
///
/// Construction derives the transform parameters, builds the kernel bank,
/// and plans the FFT; each subsequent [`forward`](Self::forward) call costs
/// one FFT plus one complex projection per bin. Kernel bank and plan are
/// read-only after construction, so a single engine can serve concurrent
/// callers through [`forward_with_scratch`](Self::forward_with_scratch) with
/// one [`CqtScratch`] per thread.
#[derive(Debug)]
pub struct ConstantQTransform {
    config: CqtConfig,
    kernel: SpectralKernel,
    plan: FftPlan,
    scratch: CqtScratch,
}

impl ConstantQTransform {
    /// Constructs an engine for `config`.
    ///
    /// Runs the one-time kernel construction: one windowed FFT per bin plus
    /// a normalization pass over the whole bank. Amortize the cost by
    /// constructing a single engine and transforming many frames with it.
    ///
    /// # Errors
    /// Returns [`CqtError::InvalidConfiguration`] when the parameters violate
    /// the constraints documented on [`CqtConfig::validate`].
    pub fn new(config: CqtConfig) -> CqtResult<Self> {
        config.validate().map_err(CqtError::InvalidConfiguration)?;

        let plan = FftPlan::forward(config.fft_length());
        let kernel = SpectralKernel::build(&config, &plan);
        let scratch = CqtScratch::with_sizes(kernel.fft_length(), kernel.num_bins());

        tracing::debug!(
            num_bins = kernel.num_bins(),
            fft_length = kernel.fft_length(),
            q_factor = config.q_factor(),
            "constant-Q kernel bank built"
        );

        Ok(Self {
            config,
            kernel,
            plan,
            scratch,
        })
    }

    /// Total number of analysis bins K.
    pub fn bin_count(&self) -> usize {
        self.kernel.num_bins()
    }

    /// FFT length shared by kernel construction and every forward call.
    pub fn fft_length(&self) -> usize {
        self.kernel.fft_length()
    }

    /// Quality factor fixed by the bins-per-octave setting.
    pub fn q_factor(&self) -> f64 {
        self.config.q_factor()
    }

    /// Center frequency of `bin` in Hz.
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        self.config.bin_frequency(bin)
    }

    /// Center frequencies of all bins, lowest first.
    pub fn bin_frequencies(&self) -> Vec<f64> {
        (0..self.bin_count())
            .map(|bin| self.config.bin_frequency(bin))
            .collect()
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &CqtConfig {
        &self.config
    }

    /// Runs the forward transform, returning one squared magnitude per bin.
    ///
    /// Frames shorter than [`fft_length`](Self::fft_length) are zero-padded;
    /// longer frames are silently cropped to their leading `fft_length`
    /// samples.
    pub fn forward(&mut self, samples: &[f64]) -> Vec<f64> {
        let mut magnitudes = vec![0.0; self.bin_count()];
        run_forward(
            &self.kernel,
            &self.plan,
            samples,
            &mut self.scratch,
            &mut magnitudes,
        );
        magnitudes
    }

    /// Runs the forward transform into a caller-owned output buffer.
    ///
    /// Produces results identical to [`forward`](Self::forward) for identical
    /// inputs, without allocating.
    ///
    /// # Errors
    /// Returns [`CqtError::DimensionMismatch`] when `magnitudes` is not sized
    /// to [`bin_count`](Self::bin_count); nothing is written in that case.
    pub fn forward_into(&mut self, samples: &[f64], magnitudes: &mut [f64]) -> CqtResult<()> {
        if magnitudes.len() != self.bin_count() {
            return Err(CqtError::DimensionMismatch(format!(
                "Output size mismatch: expected {}, got {}",
                self.bin_count(),
                magnitudes.len()
            )));
        }

        run_forward(
            &self.kernel,
            &self.plan,
            samples,
            &mut self.scratch,
            magnitudes,
        );
        Ok(())
    }

    /// Runs the forward transform against a caller-supplied scratch arena.
    ///
    /// Takes `&self`: the kernel bank and FFT plan are read-only, so one
    /// engine can be shared across threads with one [`CqtScratch`] per
    /// caller and no locking.
    ///
    /// # Errors
    /// Returns [`CqtError::DimensionMismatch`] when `magnitudes` is not sized
    /// to [`bin_count`](Self::bin_count) or `scratch` was built for a
    /// different engine; nothing is written in either case.
    pub fn forward_with_scratch(
        &self,
        samples: &[f64],
        scratch: &mut CqtScratch,
        magnitudes: &mut [f64],
    ) -> CqtResult<()> {
        if magnitudes.len() != self.bin_count() {
            return Err(CqtError::DimensionMismatch(format!(
                "Output size mismatch: expected {}, got {}",
                self.bin_count(),
                magnitudes.len()
            )));
        }

        if scratch.spectrum.len() != self.fft_length() || scratch.projection.len() != self.bin_count()
        {
            return Err(CqtError::DimensionMismatch(format!(
                "Scratch arena sized for a different engine: expected {}x{}, got {}x{}",
                self.fft_length(),
                self.bin_count(),
                scratch.spectrum.len(),
                scratch.projection.len()
            )));
        }

        run_forward(&self.kernel, &self.plan, samples, scratch, magnitudes);
        Ok(())
    }
}

/// Shared forward pass: frame FFT, kernel projection, squared magnitudes.
///
/// Buffer sizes are checked by the callers; `magnitudes` holds exactly one
/// slot per bin.
fn run_forward(
    kernel: &SpectralKernel,
    plan: &FftPlan,
    samples: &[f64],
    scratch: &mut CqtScratch,
    magnitudes: &mut [f64],
) {
    let effective = samples.len().min(kernel.fft_length());

    for (slot, &sample) in scratch.spectrum.iter_mut().zip(&samples[..effective]) {
        *slot = Complex::new(sample, 0.0);
    }
    for slot in scratch.spectrum.iter_mut().skip(effective) {
        *slot = Complex::new(0.0, 0.0);
    }

    plan.process(&mut scratch.spectrum);
    kernel.project(&scratch.spectrum, &mut scratch.projection);

    for (magnitude, coefficient) in magnitudes.iter_mut().zip(&scratch.projection) {
        *magnitude = coefficient.norm_sqr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WindowFunction;
    use std::f64::consts::PI;

    /// Generate test audio signal (sine wave)
    fn generate_sine_wave(samples: usize, freq: f64, sample_rate: f64) -> Vec<f64> {
        (0..samples)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    fn full_range_config() -> CqtConfig {
        CqtConfig::new(55.0, 7040.0, 12, 44100.0, WindowFunction::Hamming)
    }

    fn small_config() -> CqtConfig {
        CqtConfig::new(110.0, 880.0, 12, 8000.0, WindowFunction::Hann)
    }

    #[test]
    fn test_bin_count_matches_formula() {
        let cqt = ConstantQTransform::new(full_range_config()).expect("valid configuration");
        // 12 * log2(7040 / 55) = 12 * 7 octaves
        assert_eq!(cqt.bin_count(), 84);

        let cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        assert_eq!(cqt.bin_count(), 36);
    }

    #[test]
    fn test_output_length_equals_bin_count() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        for frame_length in [0, 1, 100, cqt.fft_length(), cqt.fft_length() * 2] {
            let frame = generate_sine_wave(frame_length, 440.0, 8000.0);
            assert_eq!(cqt.forward(&frame).len(), cqt.bin_count());
        }
    }

    #[test]
    fn test_forward_variants_agree() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        let frame = generate_sine_wave(2048, 440.0, 8000.0);

        let allocated = cqt.forward(&frame);

        let mut buffered = vec![0.0; cqt.bin_count()];
        cqt.forward_into(&frame, &mut buffered)
            .expect("output buffer sized to bin count");

        let mut scratch = CqtScratch::for_transform(&cqt);
        let mut scratched = vec![0.0; cqt.bin_count()];
        cqt.forward_with_scratch(&frame, &mut scratch, &mut scratched)
            .expect("scratch arena sized for this engine");

        assert_eq!(allocated, buffered);
        assert_eq!(allocated, scratched);
    }

    #[test]
    fn test_zero_input_produces_zero_output() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        for frame_length in [0, 17, 1000, cqt.fft_length() + 13] {
            let silence = vec![0.0; frame_length];
            for magnitude in cqt.forward(&silence) {
                assert!(magnitude.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_identically_configured_engines_agree() {
        let mut first = ConstantQTransform::new(small_config()).expect("valid configuration");
        let mut second = ConstantQTransform::new(small_config()).expect("valid configuration");

        let frame = generate_sine_wave(1500, 330.0, 8000.0);
        assert_eq!(first.forward(&frame), second.forward(&frame));
    }

    #[test]
    fn test_zero_padding_equivalence() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        let short = generate_sine_wave(1024, 220.0, 8000.0);

        let mut padded = short.clone();
        padded.resize(cqt.fft_length() - 1, 0.0);

        assert_eq!(cqt.forward(&short), cqt.forward(&padded));
    }

    #[test]
    fn test_truncation_matches_leading_samples() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        let fft_length = cqt.fft_length();

        let long = generate_sine_wave(fft_length + 4000, 550.0, 8000.0);
        let cropped = long[..fft_length].to_vec();

        assert_eq!(cqt.forward(&long), cqt.forward(&cropped));
    }

    #[test]
    fn test_pure_tone_peaks_at_expected_bin() {
        let mut cqt = ConstantQTransform::new(full_range_config()).expect("valid configuration");
        let frame = generate_sine_wave(4096, 440.0, 44100.0);

        let magnitudes = cqt.forward(&frame);
        let peak_bin = magnitudes
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("magnitudes are finite"))
            .map(|(bin, _)| bin)
            .expect("output is non-empty");

        // A4 sits 12 * log2(440 / 55) = 36 bins above A1.
        assert!(
            (34..=38).contains(&peak_bin),
            "440 Hz peak landed at bin {peak_bin}"
        );

        let peak_magnitude = magnitudes[peak_bin];
        for (bin, &magnitude) in magnitudes.iter().enumerate() {
            if bin.abs_diff(peak_bin) > 2 {
                assert!(
                    peak_magnitude > 3.0 * magnitude,
                    "bin {bin} magnitude {magnitude} rivals the peak {peak_magnitude}"
                );
            }
        }
    }

    #[test]
    fn test_forward_into_rejects_missized_buffer_without_writing() {
        let mut cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        let frame = generate_sine_wave(512, 440.0, 8000.0);

        let mut undersized = vec![-1.0; cqt.bin_count() - 1];
        let result = cqt.forward_into(&frame, &mut undersized);
        assert!(matches!(result, Err(CqtError::DimensionMismatch(_))));
        assert!(undersized.iter().all(|&slot| slot == -1.0));

        let mut oversized = vec![-1.0; cqt.bin_count() + 1];
        let result = cqt.forward_into(&frame, &mut oversized);
        assert!(matches!(result, Err(CqtError::DimensionMismatch(_))));
        assert!(oversized.iter().all(|&slot| slot == -1.0));
    }

    #[test]
    fn test_foreign_scratch_is_rejected() {
        let cqt = ConstantQTransform::new(full_range_config()).expect("valid configuration");
        let other = ConstantQTransform::new(small_config()).expect("valid configuration");

        let mut scratch = CqtScratch::for_transform(&other);
        let mut magnitudes = vec![0.0; cqt.bin_count()];
        let result = cqt.forward_with_scratch(&[0.0; 64], &mut scratch, &mut magnitudes);
        assert!(matches!(result, Err(CqtError::DimensionMismatch(_))));
    }

    #[test]
    fn test_shared_engine_across_threads() {
        let cqt = ConstantQTransform::new(small_config()).expect("valid configuration");
        let frame = generate_sine_wave(2000, 440.0, 8000.0);

        let mut scratch = CqtScratch::for_transform(&cqt);
        let mut expected = vec![0.0; cqt.bin_count()];
        cqt.forward_with_scratch(&frame, &mut scratch, &mut expected)
            .expect("scratch arena sized for this engine");

        let outputs: Vec<Vec<f64>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut scratch = CqtScratch::for_transform(&cqt);
                        let mut magnitudes = vec![0.0; cqt.bin_count()];
                        cqt.forward_with_scratch(&frame, &mut scratch, &mut magnitudes)
                            .expect("scratch arena sized for this engine");
                        magnitudes
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker thread panicked"))
                .collect()
        });

        for output in outputs {
            assert_eq!(output, expected);
        }
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let config = CqtConfig::new(0.0, 7040.0, 12, 44100.0, WindowFunction::Hamming);
        assert!(matches!(
            ConstantQTransform::new(config),
            Err(CqtError::InvalidConfiguration(_))
        ));

        // Nyquist violation: 7040 Hz content at a 14 kHz sample rate
        let config = CqtConfig::new(55.0, 7040.0, 12, 14000.0, WindowFunction::Hamming);
        assert!(matches!(
            ConstantQTransform::new(config),
            Err(CqtError::InvalidConfiguration(_))
        ));
    }
}
