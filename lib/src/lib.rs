//! Retinotopic map computation from widefield imaging of drifting-bar
//! visual stimulation.
//!
//! Per pixel, the response at the stimulus drift frequency is extracted by a
//! DFT along time; its phase becomes a delay into the stimulus cycle, the
//! delay is resolved to a visual-field position via the recorded stimulus
//! position/time tables, and opposing sweep directions are averaged to
//! cancel the hemodynamic response lag.

mod average;
mod dataset;
mod delay;
mod errors;
mod loader;
mod persistence;
mod retinotopy;
mod spectrum;

// Public re-export
pub use crate::average::mean_pair;
pub use crate::dataset::{Movie, RetinoDataset, StimulusAxis, Sweep};
pub use crate::delay::DelayTable;
pub use crate::errors::{
    DataLoadError, DegenerateSpectrumError, LookupError, PersistenceError, PipelineError,
};
pub use crate::loader::{describe_dataset, load_dataset, FieldSummary};
pub use crate::persistence::{save_dataset, save_maps, FileType, MapsFile};
pub use crate::retinotopy::{compute_retinotopy, RetinoConfig, RetinoMaps};
pub use crate::spectrum::{analyze_sweep, SweepSpectrum};
