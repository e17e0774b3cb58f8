//! Dataset structs used throughout the library.

use ndarray::{Array1, Array3, Axis};
use std::fmt;

use crate::errors::DataLoadError;

/// One recorded movie: `[time, height, width]` pixel intensities.
pub type Movie = Array3<f64>;

/// Orientation of the stimulus bar, which determines the time-step table a
/// sweep is keyed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusAxis {
    /// Vertical bars sweeping horizontally (azimuth axis).
    Vertical,
    /// Horizontal bars sweeping vertically (elevation axis).
    Horizontal,
}

/// One of the four stimulus sweep directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    DownUp,
    TopDown,
    LeftRight,
    RightLeft,
}

impl Sweep {
    /// The bar orientation driving this sweep.
    pub fn axis(self) -> StimulusAxis {
        match self {
            Sweep::DownUp | Sweep::TopDown => StimulusAxis::Horizontal,
            Sweep::LeftRight | Sweep::RightLeft => StimulusAxis::Vertical,
        }
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sweep::DownUp => "downUp",
            Sweep::TopDown => "topDown",
            Sweep::LeftRight => "leftRight",
            Sweep::RightLeft => "rightLeft",
        };
        write!(f, "{}", name)
    }
}

/// A full recording session: four sweep movies, their stimulus position
/// tables, and the two per-axis time-step tables.
///
/// Position tables are aligned index-for-index with the time-step table of
/// their axis: left/right sweeps against `vertical_time_steps`, up/down
/// sweeps against `horizontal_time_steps`.
#[derive(Debug, Clone)]
pub struct RetinoDataset {
    pub down_up: Movie,
    pub top_down: Movie,
    pub left_right: Movie,
    pub right_left: Movie,
    pub du_position: Array1<f64>,
    pub td_position: Array1<f64>,
    pub lr_position: Array1<f64>,
    pub rl_position: Array1<f64>,
    pub horizontal_time_steps: Array1<f64>,
    pub vertical_time_steps: Array1<f64>,
}

impl RetinoDataset {
    /// Checks the shape invariants and returns the dataset unchanged.
    ///
    /// All four movies must share the same frame size, and each position
    /// table must match the length of its axis time-step table.
    pub fn validated(self) -> Result<Self, DataLoadError> {
        let (_, ref_h, ref_w) = self.down_up.dim();
        for (sweep, movie) in [
            (Sweep::TopDown, &self.top_down),
            (Sweep::LeftRight, &self.left_right),
            (Sweep::RightLeft, &self.right_left),
        ] {
            let (_, h, w) = movie.dim();
            if (h, w) != (ref_h, ref_w) {
                return Err(DataLoadError::FrameShapeMismatch {
                    sweep,
                    height: h,
                    width: w,
                    reference: Sweep::DownUp,
                    ref_height: ref_h,
                    ref_width: ref_w,
                });
            }
        }

        for (table, steps) in [
            ("horizontalTimeSteps", &self.horizontal_time_steps),
            ("verticalTimeSteps", &self.vertical_time_steps),
        ] {
            if steps.is_empty() {
                return Err(DataLoadError::EmptyTable(table));
            }
        }

        for (positions, len, time_steps, steps_len) in [
            (
                "DUPositionAvg",
                self.du_position.len(),
                "horizontalTimeSteps",
                self.horizontal_time_steps.len(),
            ),
            (
                "TDPositionAvg",
                self.td_position.len(),
                "horizontalTimeSteps",
                self.horizontal_time_steps.len(),
            ),
            (
                "LRPositionAvg",
                self.lr_position.len(),
                "verticalTimeSteps",
                self.vertical_time_steps.len(),
            ),
            (
                "RLPositionAvg",
                self.rl_position.len(),
                "verticalTimeSteps",
                self.vertical_time_steps.len(),
            ),
        ] {
            if len != steps_len {
                return Err(DataLoadError::TableLengthMismatch {
                    positions,
                    positions_len: len,
                    time_steps,
                    time_steps_len: steps_len,
                });
            }
        }

        Ok(self)
    }

    /// Drops the first `trim` time samples of every movie, discarding the
    /// transient stimulus-onset response.
    ///
    /// Each movie must keep at least 2 samples so that the fundamental
    /// frequency bin stays defined.
    pub fn trim_warmup(mut self, trim: usize) -> Result<Self, DataLoadError> {
        for (sweep, movie) in [
            (Sweep::DownUp, &mut self.down_up),
            (Sweep::TopDown, &mut self.top_down),
            (Sweep::LeftRight, &mut self.left_right),
            (Sweep::RightLeft, &mut self.right_left),
        ] {
            let samples = movie.len_of(Axis(0));
            if samples < trim + 2 {
                return Err(DataLoadError::TooShortForTrim {
                    sweep,
                    samples,
                    trim,
                });
            }
            if trim > 0 {
                *movie = movie.slice_axis(Axis(0), ndarray::Slice::from(trim..)).to_owned();
            }
        }
        Ok(self)
    }

    /// Frame size `(height, width)` shared by all movies.
    pub fn frame_dims(&self) -> (usize, usize) {
        let (_, h, w) = self.down_up.dim();
        (h, w)
    }

    pub fn movie(&self, sweep: Sweep) -> &Movie {
        match sweep {
            Sweep::DownUp => &self.down_up,
            Sweep::TopDown => &self.top_down,
            Sweep::LeftRight => &self.left_right,
            Sweep::RightLeft => &self.right_left,
        }
    }

    pub fn position_table(&self, sweep: Sweep) -> &Array1<f64> {
        match sweep {
            Sweep::DownUp => &self.du_position,
            Sweep::TopDown => &self.td_position,
            Sweep::LeftRight => &self.lr_position,
            Sweep::RightLeft => &self.rl_position,
        }
    }

    pub fn time_steps(&self, axis: StimulusAxis) -> &Array1<f64> {
        match axis {
            StimulusAxis::Horizontal => &self.horizontal_time_steps,
            StimulusAxis::Vertical => &self.vertical_time_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn small_dataset() -> RetinoDataset {
        let movie = Movie::zeros((4, 2, 3));
        let steps = Array1::from(vec![0.1, 0.2, 0.3]);
        let pos = Array1::from(vec![0.0, 0.5, 1.0]);
        RetinoDataset {
            down_up: movie.clone(),
            top_down: movie.clone(),
            left_right: movie.clone(),
            right_left: movie,
            du_position: pos.clone(),
            td_position: pos.clone(),
            lr_position: pos.clone(),
            rl_position: pos,
            horizontal_time_steps: steps.clone(),
            vertical_time_steps: steps,
        }
    }

    #[test]
    fn validation_accepts_consistent_dataset() {
        assert!(small_dataset().validated().is_ok());
    }

    #[test]
    fn validation_rejects_frame_mismatch() {
        let mut ds = small_dataset();
        ds.right_left = Movie::zeros((4, 3, 3));
        match ds.validated() {
            Err(DataLoadError::FrameShapeMismatch { sweep, .. }) => {
                assert_eq!(sweep, Sweep::RightLeft)
            }
            other => panic!("expected FrameShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn validation_rejects_table_length_mismatch() {
        let mut ds = small_dataset();
        ds.lr_position = Array1::from(vec![0.0, 1.0]);
        match ds.validated() {
            Err(DataLoadError::TableLengthMismatch { positions, .. }) => {
                assert_eq!(positions, "LRPositionAvg")
            }
            other => panic!("expected TableLengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn trim_drops_leading_samples() {
        let mut ds = small_dataset();
        ds.down_up[[0, 0, 0]] = 7.0;
        ds.down_up[[2, 0, 0]] = 3.0;
        let trimmed = ds.trim_warmup(2).unwrap();
        assert_eq!(trimmed.down_up.dim(), (2, 2, 3));
        assert_eq!(trimmed.down_up[[0, 0, 0]], 3.0);
    }

    #[test]
    fn trim_rejects_too_short_movie() {
        let ds = small_dataset();
        match ds.trim_warmup(3) {
            Err(DataLoadError::TooShortForTrim { samples, trim, .. }) => {
                assert_eq!((samples, trim), (4, 3))
            }
            other => panic!("expected TooShortForTrim, got {:?}", other),
        }
    }

    #[test]
    fn sweep_axis_association() {
        assert_eq!(Sweep::LeftRight.axis(), StimulusAxis::Vertical);
        assert_eq!(Sweep::RightLeft.axis(), StimulusAxis::Vertical);
        assert_eq!(Sweep::DownUp.axis(), StimulusAxis::Horizontal);
        assert_eq!(Sweep::TopDown.axis(), StimulusAxis::Horizontal);
    }
}
