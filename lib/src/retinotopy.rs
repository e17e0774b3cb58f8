//! The full mapping pipeline: spectra, delay lookup, direction averaging.

use ndarray::Array2;

use crate::average::mean_pair;
use crate::dataset::{RetinoDataset, StimulusAxis, Sweep};
use crate::delay::DelayTable;
use crate::errors::PipelineError;
use crate::spectrum::analyze_sweep;

/// Pipeline parameters.
///
/// The defaults describe the reference acquisition setup (10 Hz sampling,
/// 20-sample stimulus onset, per-axis cycle ceilings); the ceilings and trim
/// length are dataset properties and should be supplied per recording.
#[derive(Debug, Clone)]
pub struct RetinoConfig {
    /// Sampling interval of the movies in seconds.
    pub sample_interval_s: f64,
    /// Number of warm-up samples the loader trims from each movie.
    pub trim_samples: usize,
    /// Largest valid delay for the vertical-bar (left/right) axis, seconds.
    pub vertical_ceiling_s: f64,
    /// Largest valid delay for the horizontal-bar (up/down) axis, seconds.
    pub horizontal_ceiling_s: f64,
    /// Frequency bin of the stimulus fundamental (1 = one cycle per movie).
    pub frequency_bin: usize,
    /// Re-anchor the azimuth map by adding its own pre-conversion minimum.
    /// Preserves the legacy normalization; elevation is never shifted.
    pub azimuth_min_shift: bool,
}

impl Default for RetinoConfig {
    fn default() -> Self {
        Self {
            sample_interval_s: 0.1,
            trim_samples: 20,
            vertical_ceiling_s: 9.3,
            horizontal_ceiling_s: 8.6,
            frequency_bin: 1,
            azimuth_min_shift: true,
        }
    }
}

/// The four output maps, `[height, width]` each. Angle maps are in degrees.
#[derive(Debug, Clone)]
pub struct RetinoMaps {
    pub azimuth: Array2<f64>,
    pub elevation: Array2<f64>,
    pub azi_power: Array2<f64>,
    pub el_power: Array2<f64>,
}

impl RetinoMaps {
    /// The maps with their canonical field names, in output order.
    pub fn iter_named(&self) -> [(&'static str, &Array2<f64>); 4] {
        [
            ("elPowerMap", &self.el_power),
            ("aziPowerMap", &self.azi_power),
            ("elevationMap", &self.elevation),
            ("azimuthMap", &self.azimuth),
        ]
    }
}

/// Angle and power maps of a single sweep.
fn sweep_maps(
    dataset: &RetinoDataset,
    config: &RetinoConfig,
    sweep: Sweep,
) -> Result<(Array2<f64>, Array2<f64>), PipelineError> {
    let spectrum = analyze_sweep(
        dataset.movie(sweep),
        sweep,
        config.sample_interval_s,
        config.frequency_bin,
    )?;

    let ceiling_s = match sweep.axis() {
        StimulusAxis::Vertical => config.vertical_ceiling_s,
        StimulusAxis::Horizontal => config.horizontal_ceiling_s,
    };
    let table = DelayTable::new(
        dataset.time_steps(sweep.axis()),
        dataset.position_table(sweep),
        ceiling_s,
    );

    let angles = table.map(&spectrum.time_shift, sweep)?;
    log::debug!("sweep {}: angle map resolved", sweep);
    Ok((angles, spectrum.power))
}

/// Computes the azimuth/elevation position and power maps of a dataset.
///
/// The dataset is expected to be validated and warm-up trimmed (the loader
/// does both). Opposing sweep directions are averaged to cancel the
/// hemodynamic response lag, then angle maps are converted to degrees.
pub fn compute_retinotopy(
    dataset: &RetinoDataset,
    config: &RetinoConfig,
) -> Result<RetinoMaps, PipelineError> {
    let (height, width) = dataset.frame_dims();
    log::info!("computing retinotopic maps for {}x{} pixels", height, width);

    let (lr_angle, lr_power) = sweep_maps(dataset, config, Sweep::LeftRight)?;
    let (rl_angle, rl_power) = sweep_maps(dataset, config, Sweep::RightLeft)?;
    let (du_angle, du_power) = sweep_maps(dataset, config, Sweep::DownUp)?;
    let (td_angle, td_power) = sweep_maps(dataset, config, Sweep::TopDown)?;

    let azimuth_rad = mean_pair(&lr_angle, &rl_angle);
    let elevation_rad = mean_pair(&du_angle, &td_angle);
    let azi_power = mean_pair(&lr_power, &rl_power);
    let el_power = mean_pair(&du_power, &td_power);

    let elevation = elevation_rad.mapv(f64::to_degrees);
    let mut azimuth = azimuth_rad.mapv(f64::to_degrees);
    if config.azimuth_min_shift {
        // Legacy anchor: the minimum of the radian map, added after the
        // degree conversion.
        let min_rad = azimuth_rad.iter().copied().fold(f64::INFINITY, f64::min);
        azimuth += min_rad;
    }

    log::info!("retinotopic maps complete");
    Ok(RetinoMaps {
        azimuth,
        elevation,
        azi_power,
        el_power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Movie;
    use crate::errors::{LookupError, PipelineError};
    use ndarray::{Array1, Array3};
    use std::f64::consts::{PI, TAU};

    const EPSILON: f64 = 1e-9;

    /// One full stimulus cycle: 100 samples at 0.1 s, fundamental 0.1 Hz.
    const SAMPLES: usize = 100;
    const INTERVAL: f64 = 0.1;

    fn sinusoid_movie(amplitude: f64, phi: f64) -> Movie {
        let f1 = 1.0 / (SAMPLES as f64 * INTERVAL);
        Array3::from_shape_fn((SAMPLES, 1, 1), |(n, _, _)| {
            let t = n as f64 * INTERVAL;
            amplitude * (TAU * f1 * t + phi).cos()
        })
    }

    /// 0.1 .. 10.0 s in 0.1 s steps, covering the whole cycle.
    fn cycle_steps() -> Array1<f64> {
        Array1::from_iter((1..=SAMPLES).map(|i| i as f64 / 10.0))
    }

    fn scenario_dataset() -> RetinoDataset {
        let steps = cycle_steps();

        // rightLeft responds at phase pi/4, whose 8.75 s delay rounds onto
        // the 8.7/8.8 grid boundary; both entries carry the same position so
        // the expectation does not depend on the rounding direction.
        let mut rl_position = steps.mapv(|t| 0.02 * t);
        rl_position[86] = 0.175;
        rl_position[87] = 0.175;

        RetinoDataset {
            down_up: sinusoid_movie(1.0, PI),
            top_down: sinusoid_movie(1.0, 3.0 * PI / 2.0),
            left_right: sinusoid_movie(2.0, PI / 2.0),
            right_left: sinusoid_movie(2.0, PI / 4.0),
            du_position: steps.mapv(|t| 0.03 * t),
            td_position: steps.mapv(|t| 0.01 * t),
            lr_position: steps.mapv(|t| 0.02 * t),
            rl_position,
            horizontal_time_steps: steps.clone(),
            vertical_time_steps: steps,
        }
        .validated()
        .unwrap()
    }

    fn scenario_config() -> RetinoConfig {
        RetinoConfig {
            trim_samples: 0,
            ..RetinoConfig::default()
        }
    }

    #[test]
    fn scenario_recovers_power_and_phase() {
        let dataset = scenario_dataset();

        let lr = analyze_sweep(&dataset.left_right, Sweep::LeftRight, INTERVAL, 1).unwrap();
        assert!((lr.fundamental_hz - 0.1).abs() < EPSILON);
        assert!((lr.power[[0, 0]] - 2.0).abs() < EPSILON);
        // Phase pi/2 flips to (-pi/2) mod 2pi = 3pi/2.
        assert!((lr.phase[[0, 0]] - 3.0 * PI / 2.0).abs() < EPSILON);
        // 3pi/2 of a 10 s cycle is a 7.5 s delay.
        assert!((lr.time_shift[[0, 0]] - 7.5).abs() < EPSILON);
    }

    #[test]
    fn scenario_end_to_end_maps() {
        let dataset = scenario_dataset();
        let maps = compute_retinotopy(&dataset, &scenario_config()).unwrap();

        // Azimuth power pools both sweeps, each recovering amplitude 2.0.
        assert!((maps.azi_power[[0, 0]] - 2.0).abs() < EPSILON);
        assert!((maps.el_power[[0, 0]] - 1.0).abs() < EPSILON);

        // leftRight delay 7.5 s -> position 0.15; rightLeft -> 0.175.
        let azimuth_rad: f64 = (0.15 + 0.175) / 2.0;
        let expected_azimuth = azimuth_rad.to_degrees() + azimuth_rad;
        assert!((maps.azimuth[[0, 0]] - expected_azimuth).abs() < EPSILON);

        // downUp: phase pi -> 5.0 s -> 0.15; topDown: pi/2 -> 2.5 s -> 0.025.
        let elevation_rad: f64 = (0.15 + 0.025) / 2.0;
        assert!((maps.elevation[[0, 0]] - elevation_rad.to_degrees()).abs() < EPSILON);
    }

    #[test]
    fn azimuth_power_is_exact_mean_of_sweep_powers() {
        let dataset = scenario_dataset();
        let maps = compute_retinotopy(&dataset, &scenario_config()).unwrap();

        let lr = analyze_sweep(&dataset.left_right, Sweep::LeftRight, INTERVAL, 1).unwrap();
        let rl = analyze_sweep(&dataset.right_left, Sweep::RightLeft, INTERVAL, 1).unwrap();
        assert_eq!(maps.azi_power, mean_pair(&lr.power, &rl.power));
    }

    #[test]
    fn azimuth_shift_can_be_disabled() {
        let dataset = scenario_dataset();
        let config = RetinoConfig {
            azimuth_min_shift: false,
            ..scenario_config()
        };
        let maps = compute_retinotopy(&dataset, &config).unwrap();

        let azimuth_rad: f64 = (0.15 + 0.175) / 2.0;
        assert!((maps.azimuth[[0, 0]] - azimuth_rad.to_degrees()).abs() < EPSILON);
    }

    #[test]
    fn degenerate_movie_aborts_in_spectrum_stage() {
        let mut dataset = scenario_dataset();
        dataset.left_right = Array3::zeros((1, 1, 1));
        match compute_retinotopy(&dataset, &scenario_config()) {
            Err(PipelineError::Spectrum(err)) => assert_eq!(err.sweep, Sweep::LeftRight),
            other => panic!("expected spectrum failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn uncovered_delay_aborts_in_lookup_stage() {
        let mut dataset = scenario_dataset();
        // Truncate the vertical table so the 7.5 s leftRight delay is
        // beyond its coverage but below the clamp ceiling.
        dataset.vertical_time_steps = Array1::from_iter((1..=50).map(|i| i as f64 / 10.0));
        dataset.lr_position = dataset.vertical_time_steps.mapv(|t| 0.02 * t);
        dataset.rl_position = dataset.vertical_time_steps.mapv(|t| 0.02 * t);
        let dataset = dataset.validated().unwrap();

        match compute_retinotopy(&dataset, &scenario_config()) {
            Err(PipelineError::Lookup(LookupError {
                sweep,
                row,
                col,
                time_shift_s,
            })) => {
                assert_eq!(sweep, Sweep::LeftRight);
                assert_eq!((row, col), (0, 0));
                assert!((time_shift_s - 7.5).abs() < EPSILON);
            }
            other => panic!("expected lookup failure, got {:?}", other.map(|_| ())),
        }
    }
}
