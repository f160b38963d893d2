//! CSV dataset loading via the Arrow CSV reader
//!
//! Column types are inferred, then cast: name columns to `Utf8`, score
//! columns to `Float64`. Columns are matched by header name, so column order
//! in the file does not matter.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use super::{AttributeRecord, HorseRecord, Record};
use crate::attributes::{TraitKey, TraitVector};
use crate::{Error, Result};

/// A record type that can be decoded from a CSV record batch.
pub trait CsvRecord: Record + Sized {
    /// Decode every row of `batch`.
    ///
    /// # Errors
    ///
    /// Returns error if a required column is missing or a name cell is null.
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>>;
}

/// Read every row of a CSV file.
pub(super) fn read_records<R: CsvRecord, P: AsRef<Path>>(path: P) -> Result<Vec<R>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        Error::StorageError(format!("Failed to open CSV file {}: {e}", path.display()))
    })?;

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(Cursor::new(&bytes), None)?;
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(Cursor::new(&bytes))?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(R::from_batch(&batch?)?);
    }

    tracing::info!(path = %path.display(), rows = records.len(), "dataset loaded");
    Ok(records)
}

fn column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<Option<ArrayRef>> {
    let Ok(index) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    Ok(Some(cast(batch.column(index), to)?))
}

fn required(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    column(batch, name, to)?
        .ok_or_else(|| Error::StorageError(format!("Missing required column '{name}'")))
}

fn as_strings<'a>(array: &'a ArrayRef, name: &str) -> Result<&'a StringArray> {
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::StorageError(format!("Column '{name}' is not text")))
}

fn as_floats<'a>(array: &'a ArrayRef, name: &str) -> Result<&'a Float64Array> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| Error::StorageError(format!("Column '{name}' is not numeric")))
}

fn text_cell(array: &StringArray, row: usize) -> Option<String> {
    if array.is_null(row) {
        return None;
    }
    let value = array.value(row);
    (!value.is_empty()).then(|| value.to_string())
}

fn float_cell(array: &Float64Array, row: usize) -> Option<f64> {
    (!array.is_null(row)).then(|| array.value(row))
}

fn name_cell(array: &StringArray, row: usize, column: &str) -> Result<String> {
    text_cell(array, row)
        .ok_or_else(|| Error::StorageError(format!("Row {row}: empty '{column}' cell")))
}

impl CsvRecord for HorseRecord {
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let names = required(batch, "horse_name", &DataType::Utf8)?;
        let sires = required(batch, "sire", &DataType::Utf8)?;
        let damsires = required(batch, "dam_sire", &DataType::Utf8)?;

        let names = as_strings(&names, "horse_name")?;
        let sires = as_strings(&sires, "sire")?;
        let damsires = as_strings(&damsires, "dam_sire")?;

        (0..batch.num_rows())
            .map(|row| {
                Ok(Self::with_parents(
                    name_cell(names, row, "horse_name")?,
                    text_cell(sires, row),
                    text_cell(damsires, row),
                ))
            })
            .collect()
    }
}

impl CsvRecord for AttributeRecord {
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let names = required(batch, "name", &DataType::Utf8)?;
        let names = as_strings(&names, "name")?;

        let mut trait_columns = Vec::with_capacity(TraitKey::ALL.len());
        for key in TraitKey::ALL {
            trait_columns.push((key, required(batch, key.as_str(), &DataType::Float64)?));
        }
        let turf = column(batch, "turf", &DataType::Float64)?;
        let dirt = column(batch, "dirt", &DataType::Float64)?;

        let trait_columns = trait_columns
            .iter()
            .map(|(key, array)| Ok((*key, as_floats(array, key.as_str())?)))
            .collect::<Result<Vec<_>>>()?;
        let turf = turf.as_ref().map(|a| as_floats(a, "turf")).transpose()?;
        let dirt = dirt.as_ref().map(|a| as_floats(a, "dirt")).transpose()?;

        (0..batch.num_rows())
            .map(|row| {
                let traits: TraitVector = trait_columns
                    .iter()
                    .filter_map(|(key, array)| float_cell(array, row).map(|v| (*key, v)))
                    .collect();
                Ok(Self::new(name_cell(names, row, "name")?, traits).with_surface(
                    turf.and_then(|a| float_cell(a, row)),
                    dirt.and_then(|a| float_cell(a, row)),
                ))
            })
            .collect()
    }
}
