use std::f64::consts::PI;

use constant_q::{ConstantQTransform, CqtConfig, CqtResult, WindowFunction};

pub fn main() -> CqtResult<()> {
    let sample_rate_hz = 44_100.0;
    let tone_hz = 440.0;

    let config = CqtConfig::new(55.0, 7040.0, 12, sample_rate_hz, WindowFunction::Hamming);
    let mut cqt = ConstantQTransform::new(config)?;
    println!(
        "Engine: {} bins, FFT length {}, Q = {:.3}",
        cqt.bin_count(),
        cqt.fft_length(),
        cqt.q_factor()
    );

    let frame: Vec<f64> = (0..4096)
        .map(|i| (2.0 * PI * tone_hz * i as f64 / sample_rate_hz).sin())
        .collect();

    let magnitudes = cqt.forward(&frame);
    let (peak_bin, peak_magnitude) = magnitudes
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .expect("engine produces at least one bin");

    println!(
        "{} Hz sine peaks at bin {} ({:.1} Hz), squared magnitude {:.3e}",
        tone_hz,
        peak_bin,
        cqt.bin_frequency(peak_bin),
        peak_magnitude
    );

    Ok(())
}
