//! Per-pixel spectral analysis of a sweep movie.
//!
//! Each pixel's time course is Fourier-transformed independently; only the
//! coefficient at the fundamental stimulus frequency (one cycle across the
//! movie duration) is kept. Its magnitude becomes the response power, its
//! phase a time delay into the stimulus cycle.

use ndarray::{s, Array2};
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::TAU;

use crate::dataset::{Movie, Sweep};
use crate::errors::DegenerateSpectrumError;

/// Per-pixel response of one sweep at the fundamental stimulus frequency.
#[derive(Debug, Clone)]
pub struct SweepSpectrum {
    /// Amplitude-normalized single-sided power, `2*|X[k]| / T`.
    pub power: Array2<f64>,
    /// Response phase `(-arg X[k]) mod 2pi`, in `[0, 2pi)`.
    pub phase: Array2<f64>,
    /// Phase converted to a delay in seconds within one stimulus cycle.
    pub time_shift: Array2<f64>,
    /// Frequency of the analyzed bin in Hz.
    pub fundamental_hz: f64,
}

/// Runs the per-pixel DFT of `movie` along time and evaluates bin `bin`.
///
/// The frequency axis follows the standard FFT bin formula for `T` samples
/// at `sample_interval_s` spacing, so bin 1 corresponds to exactly one cycle
/// over the recorded duration. The phase sign is flipped so that phase grows
/// with increasing response delay.
pub fn analyze_sweep(
    movie: &Movie,
    sweep: Sweep,
    sample_interval_s: f64,
    bin: usize,
) -> Result<SweepSpectrum, DegenerateSpectrumError> {
    assert!(bin >= 1, "frequency bin 0 is the DC component");

    let (samples, height, width) = movie.dim();
    if samples < 2 || bin >= samples {
        return Err(DegenerateSpectrumError {
            sweep,
            samples,
            bin,
        });
    }

    let fundamental_hz = bin as f64 / (samples as f64 * sample_interval_s);
    log::debug!(
        "sweep {}: {} samples, fundamental bin {} at {:.4} Hz",
        sweep,
        samples,
        bin,
        fundamental_hz
    );

    let fft = FftPlanner::new().plan_fft_forward(samples);
    let mut buffer = vec![Complex64::new(0.0, 0.0); samples];

    let mut power = Array2::zeros((height, width));
    let mut phase = Array2::zeros((height, width));
    let mut time_shift = Array2::zeros((height, width));

    for row in 0..height {
        for col in 0..width {
            for (n, &value) in movie.slice(s![.., row, col]).iter().enumerate() {
                buffer[n] = Complex64::new(value, 0.0);
            }
            fft.process(&mut buffer);

            let coeff = buffer[bin];
            let wrapped = (-coeff.arg()).rem_euclid(TAU);

            power[[row, col]] = 2.0 * coeff.norm() / samples as f64;
            phase[[row, col]] = wrapped;
            time_shift[[row, col]] = wrapped / (TAU * fundamental_hz);
        }
    }

    Ok(SweepSpectrum {
        power,
        phase,
        time_shift,
        fundamental_hz,
    })
}
