//! Dataset container reading.
//!
//! Recordings are exchanged as a little-endian field-tagged binary
//! container: a magic/version header, then per field a name, a dimension
//! list, and the raw `f64` values. Position and time-step vectors may be
//! stored as `[1,N]` or `[N,1]` matrices by the acquisition export and are
//! flattened on load.

use byteorder::{LittleEndian, ReadBytesExt};
use ndarray::{Array1, Array3};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::dataset::{Movie, RetinoDataset};
use crate::errors::DataLoadError;
use crate::retinotopy::RetinoConfig;

/// The bytes "RTM1", read as a little-endian u32.
pub(crate) const MAGIC: u32 = 0x314D_5452;
pub(crate) const VERSION: u32 = 1;

/// Name and shape of one container field.
#[derive(Debug, Clone)]
pub struct FieldSummary {
    pub name: String,
    pub dims: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub name: String,
    pub dims: Vec<usize>,
    pub data: Vec<f64>,
}

pub(crate) fn read_container<P: AsRef<Path>>(path: P) -> Result<Vec<Field>, DataLoadError> {
    let mut reader = BufReader::new(File::open(path)?);

    let magic = reader.read_u32::<LittleEndian>()?;
    if magic != MAGIC {
        return Err(DataLoadError::BadMagic {
            found: magic,
            expected: MAGIC,
        });
    }
    let version = reader.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(DataLoadError::UnsupportedVersion(version));
    }

    let field_count = reader.read_u32::<LittleEndian>()?;
    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        let name_len = reader.read_u16::<LittleEndian>()? as usize;
        let mut name_buf = vec![0u8; name_len];
        reader.read_exact(&mut name_buf)?;
        let name = String::from_utf8_lossy(&name_buf).into_owned();

        let ndim = reader.read_u8()? as usize;
        let mut dims = Vec::with_capacity(ndim);
        for _ in 0..ndim {
            dims.push(reader.read_u32::<LittleEndian>()? as usize);
        }

        let mut data = vec![0.0f64; dims.iter().product()];
        reader.read_f64_into::<LittleEndian>(&mut data)?;
        fields.push(Field { name, dims, data });
    }

    Ok(fields)
}

fn take(fields: &mut Vec<Field>, name: &'static str) -> Result<Field, DataLoadError> {
    fields
        .iter()
        .position(|field| field.name == name)
        .map(|index| fields.swap_remove(index))
        .ok_or(DataLoadError::MissingField(name))
}

fn movie_field(fields: &mut Vec<Field>, name: &'static str) -> Result<Movie, DataLoadError> {
    let field = take(fields, name)?;
    if field.dims.len() != 3 {
        return Err(DataLoadError::WrongRank {
            name: field.name,
            expected: 3,
            found: field.dims.len(),
        });
    }
    let shape = (field.dims[0], field.dims[1], field.dims[2]);
    Ok(Array3::from_shape_vec(shape, field.data)
        .expect("container field length matches its declared dimensions"))
}

fn vector_field(fields: &mut Vec<Field>, name: &'static str) -> Result<Array1<f64>, DataLoadError> {
    let field = take(fields, name)?;
    let is_row_or_column = field.dims.len() == 2 && field.dims.iter().any(|&d| d == 1);
    if field.dims.len() != 1 && !is_row_or_column {
        return Err(DataLoadError::WrongRank {
            name: field.name,
            expected: 1,
            found: field.dims.len(),
        });
    }
    Ok(Array1::from(field.data))
}

/// Loads, validates, and warm-up trims a recorded dataset.
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    config: &RetinoConfig,
) -> Result<RetinoDataset, DataLoadError> {
    log::trace!("loading dataset from {}", path.as_ref().display());
    let mut fields = read_container(&path)?;

    let dataset = RetinoDataset {
        down_up: movie_field(&mut fields, "downUp")?,
        top_down: movie_field(&mut fields, "topDown")?,
        left_right: movie_field(&mut fields, "leftRight")?,
        right_left: movie_field(&mut fields, "rightLeft")?,
        du_position: vector_field(&mut fields, "DUPositionAvg")?,
        td_position: vector_field(&mut fields, "TDPositionAvg")?,
        lr_position: vector_field(&mut fields, "LRPositionAvg")?,
        rl_position: vector_field(&mut fields, "RLPositionAvg")?,
        horizontal_time_steps: vector_field(&mut fields, "horizontalTimeSteps")?,
        vertical_time_steps: vector_field(&mut fields, "verticalTimeSteps")?,
    }
    .validated()?
    .trim_warmup(config.trim_samples)?;

    let (height, width) = dataset.frame_dims();
    log::info!(
        "loaded dataset: {}x{} pixels, {} warm-up samples trimmed",
        height,
        width,
        config.trim_samples
    );
    Ok(dataset)
}

/// Lists the fields of a dataset container without loading the arrays.
pub fn describe_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<FieldSummary>, DataLoadError> {
    Ok(read_container(path)?
        .into_iter()
        .map(|field| FieldSummary {
            name: field.name,
            dims: field.dims,
        })
        .collect())
}
