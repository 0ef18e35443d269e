//! Supporting types for constant-Q analysis.
//!
//! This module contains the transform configuration and the window function
//! selector applied during kernel construction.

/// Window functions applied to each analysis kernel.
///
/// Different window types provide different trade-offs between spectral
/// leakage and main-lobe width in the per-bin frequency response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFunction {
    /// Hamming window - non-zero endpoints, strong sidelobe suppression.
    Hamming,
    /// Hann window - zero endpoints, moderate leakage.
    Hann,
}

/// Configuration for Constant-Q Transform (CQT) analysis.
///
/// The CQT provides logarithmic frequency spacing that aligns with musical
/// intervals, making it ideal for music analysis and harmonic detection.
/// All derived quantities (quality factor, bin count, per-bin window
/// lengths, FFT length) are computed from these five parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CqtConfig {
    /// Minimum analyzed frequency in Hz (typically 55 Hz for A1 or 27.5 Hz for A0)
    pub min_freq: f64,
    /// Maximum analyzed frequency in Hz
    /// Must stay below half the sample rate
    pub max_freq: f64,
    /// Number of frequency bins per octave (typically 12-24 for musical analysis)
    /// Higher values provide better frequency resolution but lengthen the analysis windows
    pub bins_per_octave: usize,
    /// Sample rate of the analyzed signal in Hz
    pub sample_rate: f64,
    /// Window function applied to each analysis kernel
    pub window_function: WindowFunction,
}

impl CqtConfig {
    /// Create a new CQT configuration.
    ///
    /// # Arguments
    /// * `min_freq` - Minimum analyzed frequency in Hz
    /// * `max_freq` - Maximum analyzed frequency in Hz
    /// * `bins_per_octave` - Number of frequency bins per octave
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_function` - Window applied to each analysis kernel
    pub const fn new(
        min_freq: f64,
        max_freq: f64,
        bins_per_octave: usize,
        sample_rate: f64,
        window_function: WindowFunction,
    ) -> Self {
        Self {
            min_freq,
            max_freq,
            bins_per_octave,
            sample_rate,
            window_function,
        }
    }

    /// Create a CQT configuration for general musical analysis.
    ///
    /// Uses 12 bins per octave for chromatic scale analysis over A1 (55 Hz)
    /// through A8 (7040 Hz), with a Hamming window.
    pub const fn musical(sample_rate: f64) -> Self {
        Self {
            min_freq: 55.0,   // A1
            max_freq: 7040.0, // A8
            bins_per_octave: 12,
            sample_rate,
            window_function: WindowFunction::Hamming,
        }
    }

    /// Calculate the quality factor fixed by the bins-per-octave setting.
    ///
    /// Q relates each bin's window length to its center frequency; more bins
    /// per octave means narrower bins and longer windows.
    pub fn q_factor(&self) -> f64 {
        1.0 / (2.0_f64.powf(1.0 / self.bins_per_octave as f64) - 1.0)
    }

    /// Calculate the total number of CQT bins.
    pub fn num_bins(&self) -> usize {
        let octaves = (self.max_freq / self.min_freq).log2();
        (octaves * self.bins_per_octave as f64).ceil() as usize
    }

    /// Calculate the center frequency for a given bin index.
    ///
    /// # Arguments
    /// * `bin_index` - Zero-based bin index
    ///
    /// # Returns
    /// Center frequency in Hz for the specified bin
    pub fn bin_frequency(&self, bin_index: usize) -> f64 {
        self.min_freq * 2.0_f64.powf(bin_index as f64 / self.bins_per_octave as f64)
    }

    /// Calculate the analysis window length in samples for a given bin index.
    ///
    /// Window length shrinks monotonically as the bin index climbs toward
    /// higher frequencies; bin 0 carries the longest window.
    pub fn window_length(&self, bin_index: usize) -> usize {
        (self.q_factor() * self.sample_rate / self.bin_frequency(bin_index)).ceil() as usize
    }

    /// Calculate the FFT length shared by kernel construction and every
    /// forward call.
    ///
    /// The smallest power of two that accommodates the longest (lowest
    /// frequency) analysis window.
    pub fn fft_length(&self) -> usize {
        self.window_length(0).next_power_of_two()
    }

    /// Calculate the base-two logarithm of the FFT length.
    pub fn fft_length_log2(&self) -> u32 {
        self.fft_length().trailing_zeros()
    }

    /// Validate the CQT configuration parameters.
    ///
    /// # Returns
    /// Result indicating whether the configuration is valid
    pub fn validate(&self) -> Result<(), String> {
        if self.bins_per_octave == 0 {
            return Err("Bins per octave must be greater than 0".to_string());
        }

        if self.min_freq <= 0.0 {
            return Err("Minimum frequency must be greater than 0".to_string());
        }

        if self.max_freq <= self.min_freq {
            return Err("Maximum frequency must be greater than minimum frequency".to_string());
        }

        if self.sample_rate <= 0.0 {
            return Err("Sample rate must be greater than 0".to_string());
        }

        if self.sample_rate <= 2.0 * self.max_freq {
            return Err(
                "Sample rate must exceed twice the maximum frequency (Nyquist)".to_string(),
            );
        }

        // Check that we have at least one bin
        if self.num_bins() == 0 {
            return Err("Configuration results in zero CQT bins".to_string());
        }

        Ok(())
    }
}
