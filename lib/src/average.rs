//! Averaging of complementary sweep directions.

use ndarray::Array2;

/// Elementwise mean of two maps from opposing sweep directions.
///
/// For angle maps this cancels the hemodynamic response lag, which offsets
/// the two directions by the same delay with opposite sign. For power maps
/// it simply pools the evidence from both sweeps.
pub fn mean_pair(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    (a + b) / 2.0
}
