use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, ExpressionRecord, UnifiedTable};
use super::normalize::RawTable;
use crate::config::{ComparisonSource, LoadMode};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every configured comparison and concatenate into one table.
///
/// In [`LoadMode::Strict`] the first unreadable file aborts the load. In
/// [`LoadMode::Tolerant`] it is logged and skipped. Either way, loading zero
/// records is [`DashboardError::NoData`].
pub fn load_comparisons(
    sources: &[ComparisonSource],
    mode: LoadMode,
) -> crate::Result<UnifiedTable> {
    let mut records = Vec::new();
    let mut labels = Vec::new();

    for source in sources {
        match load_comparison(source) {
            Ok(rows) => {
                log::info!(
                    "Loaded {} genes for '{}' from {}",
                    rows.len(),
                    source.label,
                    source.path.display()
                );
                labels.push(source.label.clone());
                records.extend(rows);
            }
            Err(e) if mode == LoadMode::Tolerant => {
                log::warn!("Skipping comparison: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    if records.is_empty() {
        return Err(DashboardError::NoData);
    }
    Ok(UnifiedTable::new(records, labels))
}

/// Read, normalise and tag a single comparison file.
pub fn load_comparison(source: &ComparisonSource) -> crate::Result<Vec<ExpressionRecord>> {
    load_file(&source.path)
        .and_then(|table| table.normalize().into_records(&source.label))
        .map_err(|e| DashboardError::FileRead {
            label: source.label.clone(),
            path: source.path.clone(),
            reason: format!("{e:#}"),
        })
}

/// Load a raw result table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`          – comma separated, header row
/// * `.tsv` / `.txt` – tab separated, header row
/// * `.parquet`      – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" | "txt" => load_delimited(path, b'\t'),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, one gene per row. The first header cell may
/// be empty when the table was written with an unnamed row index.
fn load_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push(record.iter().map(|c| CellValue::String(c.to_string())).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet result table, as written by `df.to_parquet()` in Pandas or
/// `df.write_parquet()` in Polars. A pandas index saved as
/// `__index_level_0__` becomes the gene column. Nested columns are rejected.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&headers)
                .map(|(col, name)| {
                    extract_cell(col, row).with_context(|| format!("row {row}, column '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
