//! Persistence (saving computed maps and datasets to files).

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dataset::RetinoDataset;
use crate::errors::PersistenceError;
use crate::loader::{MAGIC, VERSION};
use crate::retinotopy::RetinoMaps;

/// File formats supported for writing maps.
#[derive(Debug, Clone, Copy)]
pub enum FileType {
    /// The field-tagged binary container also used for input datasets.
    Rtm,
    /// One plain CSV file per map, written next to the requested path.
    Csv,
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rtm" => Ok(FileType::Rtm),
            "csv" => Ok(FileType::Csv),
            _ => Err(format!("Invalid file type: {}", s)),
        }
    }
}

/// Struct specifying a file to write computed maps to.
#[derive(Debug, Clone)]
pub struct MapsFile {
    /// Path to file
    pub file_path: PathBuf,
    /// Type of file
    pub file_type: FileType,
}

/// One field of the binary container, borrowed from its source array.
pub(crate) struct RawField<'a> {
    pub name: &'a str,
    pub dims: Vec<usize>,
    pub values: Vec<f64>,
}

pub(crate) fn write_container(path: &Path, fields: &[RawField<'_>]) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(File::create(path)?);

    writer.write_u32::<LittleEndian>(MAGIC)?;
    writer.write_u32::<LittleEndian>(VERSION)?;
    writer.write_u32::<LittleEndian>(fields.len() as u32)?;

    for field in fields {
        writer.write_u16::<LittleEndian>(field.name.len() as u16)?;
        writer.write_all(field.name.as_bytes())?;
        writer.write_u8(field.dims.len() as u8)?;
        for &dim in &field.dims {
            writer.write_u32::<LittleEndian>(dim as u32)?;
        }
        for &value in &field.values {
            writer.write_f64::<LittleEndian>(value)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Saves the four output maps in the requested format.
pub fn save_maps(file: &MapsFile, maps: &RetinoMaps) -> Result<(), PersistenceError> {
    match file.file_type {
        FileType::Rtm => save_maps_rtm(&file.file_path, maps),
        FileType::Csv => save_maps_csv(&file.file_path, maps),
    }
}

fn save_maps_rtm(path: &Path, maps: &RetinoMaps) -> Result<(), PersistenceError> {
    let fields: Vec<RawField<'_>> = maps
        .iter_named()
        .into_iter()
        .map(|(name, map)| RawField {
            name,
            dims: vec![map.nrows(), map.ncols()],
            values: map.iter().copied().collect(),
        })
        .collect();
    write_container(path, &fields)?;
    log::info!("wrote {} maps to {}", fields.len(), path.display());
    Ok(())
}

fn save_maps_csv(path: &Path, maps: &RetinoMaps) -> Result<(), PersistenceError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("maps")
        .to_owned();

    for (name, map) in maps.iter_named() {
        let map_path = path.with_file_name(format!("{}.{}.csv", stem, name));
        let mut writer = BufWriter::new(File::create(&map_path)?);
        for row in map.rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(writer, "{}", line.join(","))?;
        }
        writer.flush()?;
        log::info!("wrote {} to {}", name, map_path.display());
    }
    Ok(())
}

/// Writes a dataset back into the input container format.
///
/// Used by dataset-preparation tooling and tests; `load_dataset` reads the
/// result back.
pub fn save_dataset(path: &Path, dataset: &RetinoDataset) -> Result<(), PersistenceError> {
    fn movie_raw<'a>(name: &'a str, movie: &crate::dataset::Movie) -> RawField<'a> {
        let (t, h, w) = movie.dim();
        RawField {
            name,
            dims: vec![t, h, w],
            values: movie.iter().copied().collect(),
        }
    }
    fn vector_raw<'a>(name: &'a str, vector: &ndarray::Array1<f64>) -> RawField<'a> {
        RawField {
            name,
            dims: vec![vector.len()],
            values: vector.to_vec(),
        }
    }

    let fields = vec![
        movie_raw("downUp", &dataset.down_up),
        movie_raw("topDown", &dataset.top_down),
        movie_raw("leftRight", &dataset.left_right),
        movie_raw("rightLeft", &dataset.right_left),
        vector_raw("DUPositionAvg", &dataset.du_position),
        vector_raw("TDPositionAvg", &dataset.td_position),
        vector_raw("LRPositionAvg", &dataset.lr_position),
        vector_raw("RLPositionAvg", &dataset.rl_position),
        vector_raw("horizontalTimeSteps", &dataset.horizontal_time_steps),
        vector_raw("verticalTimeSteps", &dataset.vertical_time_steps),
    ];
    write_container(path, &fields)
}
