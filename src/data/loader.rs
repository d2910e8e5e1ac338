use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::excitation::ExcitationRecord;
use super::model::{
    CONVOLUTION, ConvolutionSample, ConvolutionSeries, STICKS, SpectrumData, Stick, StickSeries,
};
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a complete spectrum record from a JSON file.
///
/// ```json
/// {
///   "convolution": [{ "x": 180.0, "y": 0.0 }, ...],
///   "sticks":      [{ "poles": 195.2, "residues": 0.31 }, ...]
/// }
/// ```
///
/// An absent key is kept as `None` so the chart builder can report it.
pub fn load_record(path: &Path) -> Result<SpectrumData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let data = record_from_json(&root)?;
    info!(
        "loaded record {}: {} convolution samples, {} sticks",
        path.display(),
        data.convolution.as_ref().map_or(0, Vec::len),
        data.sticks.as_ref().map_or(0, Vec::len),
    );
    Ok(data)
}

/// Build a [`SpectrumData`] from an already parsed JSON object.
pub fn record_from_json(root: &JsonValue) -> Result<SpectrumData> {
    let obj = root
        .as_object()
        .context("Expected top-level JSON object with 'convolution' and 'sticks'")?;

    // An explicit null counts as an absent series.
    let convolution = match obj.get(CONVOLUTION).filter(|v| !v.is_null()) {
        Some(v) => Some(
            json_pairs(v, CONVOLUTION, ["x", "y"])?
                .into_iter()
                .map(|(x, y)| ConvolutionSample { x, y })
                .collect(),
        ),
        None => None,
    };
    let sticks = match obj.get(STICKS).filter(|v| !v.is_null()) {
        Some(v) => Some(
            json_pairs(v, STICKS, ["poles", "residues"])?
                .into_iter()
                .map(|(poles, residues)| Stick { poles, residues })
                .collect(),
        ),
        None => None,
    };

    Ok(SpectrumData {
        convolution,
        sticks,
    })
}

/// Load a convolution table (`x`, `y` columns).  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "x": ..., "y": ... }, ...]`
/// * `.csv`     – header row with `x` and `y` columns
/// * `.parquet` – numeric `x` and `y` columns
pub fn load_convolution(path: &Path) -> Result<ConvolutionSeries> {
    let pairs = load_table(path, CONVOLUTION, ["x", "y"])?;
    Ok(pairs
        .into_iter()
        .map(|(x, y)| ConvolutionSample { x, y })
        .collect())
}

/// Load a stick table (`poles`, `residues` columns).  Same formats as
/// [`load_convolution`].
pub fn load_sticks(path: &Path) -> Result<StickSeries> {
    let pairs = load_table(path, STICKS, ["poles", "residues"])?;
    Ok(pairs
        .into_iter()
        .map(|(poles, residues)| Stick { poles, residues })
        .collect())
}

/// Load the chemistry engine's excitation results: a JSON array with one
/// object per excited state.
pub fn load_excitations(path: &Path) -> Result<Vec<ExcitationRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<ExcitationRecord> = serde_json::from_str(&text)
        .with_context(|| format!("parsing excitation records in {}", path.display()))?;
    info!("loaded {} excitation records from {}", records.len(), path.display());
    Ok(records)
}

fn load_table(path: &Path, series: &'static str, columns: [&'static str; 2]) -> Result<Vec<(f64, f64)>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let pairs = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, columns),
        "json" => load_json(path, series, columns),
        "csv" => load_csv(path, columns),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {series} from {}", path.display()))?;

    debug!("{}: {} rows", path.display(), pairs.len());
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path, series: &'static str, columns: [&'static str; 2]) -> Result<Vec<(f64, f64)>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    json_pairs(&root, series, columns)
}

/// Read `[{a: .., b: ..}, ...]` into pairs, reporting the first element that
/// lacks a numeric field.
fn json_pairs(
    val: &JsonValue,
    series: &'static str,
    [a, b]: [&'static str; 2],
) -> Result<Vec<(f64, f64)>> {
    let rows = val
        .as_array()
        .with_context(|| format!("'{series}' is not a JSON array"))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let obj = row
                .as_object()
                .with_context(|| format!("{series}[{index}] is not a JSON object"))?;
            Ok((
                json_number(obj, series, index, a)?,
                json_number(obj, series, index, b)?,
            ))
        })
        .collect()
}

fn json_number(
    obj: &Map<String, JsonValue>,
    series: &'static str,
    index: usize,
    field: &'static str,
) -> Result<f64> {
    obj.get(field)
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| {
            ChartError::MalformedSeries {
                series,
                index,
                field,
            }
            .into()
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sample per row.
/// Columns other than the two requested ones are ignored.
fn load_csv(path: &Path, [a, b]: [&'static str; 2]) -> Result<Vec<(f64, f64)>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let a_idx = headers
        .iter()
        .position(|h| h.trim() == a)
        .with_context(|| format!("CSV missing '{a}' column"))?;
    let b_idx = headers
        .iter()
        .position(|h| h.trim() == b)
        .with_context(|| format!("CSV missing '{b}' column"))?;

    let mut pairs = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let va = parse_cell(record.get(a_idx), row_no, a)?;
        let vb = parse_cell(record.get(b_idx), row_no, b)?;
        pairs.push((va, vb));
    }
    Ok(pairs)
}

fn parse_cell(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = cell.unwrap_or("").trim();
    tok.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load two numeric columns from a Parquet file, as written by
/// `df.to_parquet()` from a frame of samples.
fn load_parquet(path: &Path, [a, b]: [&'static str; 2]) -> Result<Vec<(f64, f64)>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut pairs = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let a_idx = schema
            .index_of(a)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{a}' column"))?;
        let b_idx = schema
            .index_of(b)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{b}' column"))?;

        let va = extract_f64_column(batch.column(a_idx))
            .with_context(|| format!("failed to read '{a}'"))?;
        let vb = extract_f64_column(batch.column(b_idx))
            .with_context(|| format!("failed to read '{b}'"))?;

        pairs.extend(va.into_iter().zip(vb));
    }

    Ok(pairs)
}

/// Extract a numeric column as `f64`.  Nulls become NaN and are rejected
/// later by the series validation.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    let any = col.as_any();
    let values = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map_or(f64::NAN, |i| i as f64))
            .collect(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect(),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(values)
}
