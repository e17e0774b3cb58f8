//! Delay-to-angle lookup against the stimulus time grid.
//!
//! The stimulus position/time tables are sampled on a 0.1 s grid, so
//! phase-derived delays are snapped onto that same grid and resolved by
//! exact lookup rather than interpolation. Interpolating would invent
//! positions the stimulus never occupied, since the bar trajectory is not
//! linear in time.

use ndarray::{Array1, Array2};
use std::collections::HashMap;

use crate::dataset::Sweep;
use crate::errors::LookupError;

/// Rounds a time in seconds to the table resolution of integer tenths.
fn tenths(seconds: f64) -> i64 {
    (seconds * 10.0).round() as i64
}

/// Angular position keyed by rounded stimulus time, for one sweep.
///
/// Built once per sweep from the axis time-step table and the sweep's
/// position table. Keys are fixed-point tenths of a second, which sidesteps
/// float-equality lookups; on duplicate rounded time steps the first entry
/// wins, matching a first-match scan of the table.
#[derive(Debug, Clone)]
pub struct DelayTable {
    positions: HashMap<i64, f64>,
    ceiling_tenths: i64,
}

impl DelayTable {
    /// Builds the lookup from aligned `time_steps`/`positions` tables.
    ///
    /// `ceiling_s` is the largest valid delay for this axis; anything above
    /// it is treated as cycle wrap-around and clamped down.
    pub fn new(time_steps: &Array1<f64>, positions: &Array1<f64>, ceiling_s: f64) -> Self {
        assert_eq!(
            time_steps.len(),
            positions.len(),
            "time-step and position tables must be aligned"
        );

        let mut map = HashMap::with_capacity(time_steps.len());
        for (&step, &position) in time_steps.iter().zip(positions.iter()) {
            map.entry(tenths(step)).or_insert(position);
        }

        Self {
            positions: map,
            ceiling_tenths: tenths(ceiling_s),
        }
    }

    /// Resolves one delay to the position the stimulus occupied then.
    ///
    /// Delays past the ceiling are clamped to it, and a delay rounding to
    /// exactly zero is moved to the first grid step (zero is not a valid key
    /// by construction of the tables).
    fn position_at(&self, time_shift_s: f64) -> Option<f64> {
        let mut key = tenths(time_shift_s);
        if key > self.ceiling_tenths {
            key = self.ceiling_tenths;
        }
        if key == 0 {
            key = 1;
        }
        self.positions.get(&key).copied()
    }

    /// Maps a whole time-shift map into a new angle map.
    ///
    /// A delay with no table entry aborts with the offending pixel and
    /// value, since it means the table does not cover the cycle at 0.1 s
    /// resolution.
    pub fn map(
        &self,
        time_shift: &Array2<f64>,
        sweep: Sweep,
    ) -> Result<Array2<f64>, LookupError> {
        let mut angles = Array2::zeros(time_shift.raw_dim());
        for ((row, col), &time_shift_s) in time_shift.indexed_iter() {
            match self.position_at(time_shift_s) {
                Some(position) => angles[[row, col]] = position,
                None => {
                    return Err(LookupError {
                        sweep,
                        row,
                        col,
                        time_shift_s,
                    })
                }
            }
        }
        Ok(angles)
    }
}
