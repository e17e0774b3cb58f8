//! Error types used by this lib.
use thiserror::Error;

use crate::dataset::Sweep;

/// Errors raised while reading or validating an input dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("I/O error while reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad container magic {found:#010x} (expected {expected:#010x})")]
    BadMagic { found: u32, expected: u32 },
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),
    #[error("required field `{0}` is missing from the dataset")]
    MissingField(&'static str),
    #[error("field `{name}` has rank {found} (expected {expected})")]
    WrongRank {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("movie `{sweep}` has {height}x{width} frames, but `{reference}` has {ref_height}x{ref_width}")]
    FrameShapeMismatch {
        sweep: Sweep,
        height: usize,
        width: usize,
        reference: Sweep,
        ref_height: usize,
        ref_width: usize,
    },
    #[error("position table `{positions}` has {positions_len} entries, but time-step table `{time_steps}` has {time_steps_len}")]
    TableLengthMismatch {
        positions: &'static str,
        positions_len: usize,
        time_steps: &'static str,
        time_steps_len: usize,
    },
    #[error("time-step table `{0}` is empty")]
    EmptyTable(&'static str),
    #[error("movie `{sweep}` has only {samples} time samples, cannot trim {trim} warm-up samples")]
    TooShortForTrim {
        sweep: Sweep,
        samples: usize,
        trim: usize,
    },
}

/// A movie is too short to carry the requested frequency bin.
#[derive(Debug, Error)]
#[error("movie `{sweep}` has {samples} time samples, too few for frequency bin {bin}")]
pub struct DegenerateSpectrumError {
    pub sweep: Sweep,
    pub samples: usize,
    pub bin: usize,
}

/// A rounded, clamped time shift has no entry in the stimulus time-step
/// table. Signals that the table does not cover one full cycle at 0.1 s
/// resolution for this recording.
#[derive(Debug, Error)]
#[error("sweep `{sweep}`: time shift {time_shift_s} s at pixel ({row}, {col}) has no match in the time-step table")]
pub struct LookupError {
    pub sweep: Sweep,
    pub row: usize,
    pub col: usize,
    pub time_shift_s: f64,
}

/// Errors raised while writing output files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error in file persistence: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level pipeline error, naming the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset loading failed: {0}")]
    Load(#[from] DataLoadError),
    #[error("spectral analysis failed: {0}")]
    Spectrum(#[from] DegenerateSpectrumError),
    #[error("delay-to-angle lookup failed: {0}")]
    Lookup(#[from] LookupError),
}
