//! HEALPix maps stored as Parquet tables.
//!
//! One row per pixel: `pixel: UInt64` (RING index) and `value: Float64`.
//! The Arrow schema metadata records `nside` and `ordering = "RING"`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Float64Array, RecordBatch, UInt64Array};
use arrow::datatypes::{DataType, Field, Float64Type, Schema, UInt64Type};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::properties::WriterProperties;
use tomos2n_healpix::{Nside, SphericalMap};
use tracing::debug;

use crate::error::IoError;

const PIXEL_COLUMN: &str = "pixel";
const VALUE_COLUMN: &str = "value";
const NSIDE_KEY: &str = "nside";
const ORDERING_KEY: &str = "ordering";
const RING: &str = "RING";

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
}

impl Compression {
    fn to_parquet(self) -> parquet::basic::Compression {
        match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
        }
    }
}

/// Configuration for writing maps to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::validation("row_group_size must be greater than 0"));
        }
        Ok(())
    }
}

fn build_schema(nside: Nside) -> Schema {
    let metadata = HashMap::from([
        (NSIDE_KEY.to_string(), nside.get().to_string()),
        (ORDERING_KEY.to_string(), RING.to_string()),
    ]);
    Schema::new_with_metadata(
        vec![
            Field::new(PIXEL_COLUMN, DataType::UInt64, false),
            Field::new(VALUE_COLUMN, DataType::Float64, false),
        ],
        metadata,
    )
}

/// Writes `map` to a Parquet file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid,
/// [`IoError::Io`] if the file cannot be created, or [`IoError::Parquet`]
/// if encoding fails.
pub fn write_map(path: &Path, map: &SphericalMap, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    let schema = Arc::new(build_schema(map.nside()));

    let pixels: ArrayRef = Arc::new(UInt64Array::from_iter_values(0..map.npix() as u64));
    let values: ArrayRef = Arc::new(Float64Array::from(map.as_slice().to_vec()));
    let batch = RecordBatch::try_new(schema.clone(), vec![pixels, values])?;

    let props = WriterProperties::builder()
        .set_compression(config.compression.to_parquet())
        .set_max_row_group_size(config.row_group_size)
        .build();
    let file = std::fs::File::create(path).map_err(|e| IoError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    debug!(path = %path.display(), npix = map.npix(), "wrote map");
    Ok(())
}

/// Reads a map written by [`write_map`] or any Parquet table with the same
/// two columns.
///
/// Rows may appear in any order but must cover every pixel exactly once.
/// Without `nside` metadata the resolution is inferred from the row count.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file is not readable Parquet |
/// | [`IoError::Validation`] | missing columns, bad metadata, or pixel gaps |
/// | [`IoError::Healpix`] | row count is not `12 * nside^2` |
pub fn read_map(path: &Path) -> Result<SphericalMap, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| IoError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let declared = declared_nside(&schema)?;
    let (pixel_idx, value_idx) = column_indices(&schema)?;

    let batches = builder
        .build()?
        .collect::<Result<Vec<RecordBatch>, _>>()?;
    let n_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let nside = match declared {
        Some(nside) if nside.npix() != n_rows => {
            return Err(IoError::validation(format!(
                "nside {nside} implies {} pixels, file has {n_rows} rows",
                nside.npix()
            )));
        }
        Some(nside) => nside,
        None => Nside::from_npix(n_rows)?,
    };

    let mut data = vec![0.0; n_rows];
    let mut seen = vec![false; n_rows];
    for batch in &batches {
        let pixels = batch.column(pixel_idx).as_primitive::<UInt64Type>();
        let values = batch.column(value_idx).as_primitive::<Float64Type>();
        for (pixel, value) in pixels.values().iter().zip(values.values().iter()) {
            let pix = *pixel as usize;
            if pix >= n_rows || seen[pix] {
                return Err(IoError::validation(format!(
                    "pixel {pixel} is out of range or repeated"
                )));
            }
            seen[pix] = true;
            data[pix] = *value;
        }
    }

    debug!(path = %path.display(), nside = nside.get(), "read map");
    Ok(SphericalMap::new(nside, data)?)
}

fn declared_nside(schema: &Schema) -> Result<Option<Nside>, IoError> {
    let metadata = schema.metadata();
    if let Some(ordering) = metadata.get(ORDERING_KEY).filter(|o| *o != RING) {
        return Err(IoError::validation(format!(
            "unsupported pixel ordering '{ordering}', expected {RING}"
        )));
    }
    metadata
        .get(NSIDE_KEY)
        .map(|raw| {
            let n: u32 = raw
                .parse()
                .map_err(|_| IoError::validation(format!("invalid nside metadata '{raw}'")))?;
            Ok(Nside::new(n)?)
        })
        .transpose()
}

fn column_indices(schema: &Schema) -> Result<(usize, usize), IoError> {
    let mut mismatches = Vec::new();
    let mut find = |name: &str, data_type: DataType| match schema.index_of(name) {
        Ok(i) if *schema.field(i).data_type() == data_type => Some(i),
        Ok(i) => {
            mismatches.push(format!(
                "column '{name}' has type {}, expected {data_type}",
                schema.field(i).data_type()
            ));
            None
        }
        Err(_) => {
            mismatches.push(format!("missing column '{name}'"));
            None
        }
    };
    let pixel = find(PIXEL_COLUMN, DataType::UInt64);
    let value = find(VALUE_COLUMN, DataType::Float64);
    match (pixel, value) {
        (Some(p), Some(v)) => Ok((p, v)),
        _ => Err(IoError::Validation {
            count: mismatches.len(),
            details: mismatches.join("; "),
        }),
    }
}
