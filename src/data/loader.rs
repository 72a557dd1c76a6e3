use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, RawPaper, REQUIRED_COLUMNS};
use crate::error::{ExplorerError, ExplorerResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a paper metadata file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`             – comma-delimited with a header row (also the fallback)
/// * `.tsv` / `.tab`    – tab-delimited with a header row
/// * `.json`            – `[{ "title": ..., "journal": ..., ... }, ...]`
/// * `.parquet` / `.pq` – one column per field, any Arrow type that prints
///
/// Row-level problems are tolerated and counted in the dataset's
/// [`LoadReport`](super::model::LoadReport); only structural problems fail.
pub fn load_file(path: &Path) -> ExplorerResult<Dataset> {
    if !path.exists() {
        return Err(ExplorerError::data_source(path, "file does not exist"));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        _ => load_delimited(path, b',')?,
    };

    let report = dataset.report();
    log::info!(
        "Loaded {} of {} rows from {} (years {})",
        report.rows_retained,
        report.rows_read,
        path.display(),
        dataset
            .year_range()
            .map_or_else(|| "none".to_string(), |r| r.to_string()),
    );
    if report.has_anomalies() {
        log::info!(
            "{}: {} unparsed dates, {} missing journals, {} rows without title, {} rows without year",
            path.display(),
            report.unparsed_dates,
            report.missing_journal,
            report.dropped_missing_title,
            report.dropped_missing_year,
        );
    }
    if dataset.is_empty() && report.rows_read > 0 {
        log::warn!("{}: every row was dropped during normalization", path.display());
    }

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited (CSV / TSV) loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> ExplorerResult<Dataset> {
    let file = std::fs::File::open(path).map_err(|e| ExplorerError::data_source(path, e))?;
    load_delimited_from_reader(path, file, delimiter)
}

/// Load delimited text from any reader. `source` only labels the dataset
/// and error messages.
///
/// Short or over-long rows are accepted; missing cells read as absent.
/// Cells are decoded lossily so a stray invalid byte never drops a row.
pub fn load_delimited_from_reader<R: Read>(
    source: &Path,
    input: R,
    delimiter: u8,
) -> ExplorerResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| ExplorerError::data_source(source, format!("reading header row: {e}")))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();
    let columns = ColumnIndex::locate(source, &headers)?;
    log::debug!("{}: header columns {:?}", source.display(), headers);

    let mut rows = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|e| {
            ExplorerError::data_source(source, format!("row {}: {e}", row_no + 2))
        })?;
        let cell = |idx: usize| record.get(idx).map(String::from_utf8_lossy);
        let [title, authors, journal, publish_time, abstract_text] = columns.0.map(cell);
        rows.push(RawPaper::from_cells(
            title.as_deref(),
            authors.as_deref(),
            journal.as_deref(),
            publish_time.as_deref(),
            abstract_text.as_deref(),
        ));
    }

    Ok(Dataset::from_raw(source, rows))
}

/// Positions of [`REQUIRED_COLUMNS`] within a header row, in the same order.
struct ColumnIndex([usize; 5]);

impl ColumnIndex {
    fn locate(source: &Path, headers: &[String]) -> ExplorerResult<Self> {
        let mut idx = [0usize; 5];
        let mut missing = Vec::new();
        for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| h == name) {
                Some(i) => *slot = i,
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(ExplorerError::data_source(
                source,
                format!("missing required column(s) {missing:?}; headers={headers:?}"),
            ));
        }
        Ok(ColumnIndex(idx))
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "...", "authors": "...", "journal": "...",
///     "publish_time": "2020-03-27", "abstract": "..." },
///   ...
/// ]
/// ```
///
/// A key missing from a single record reads as absent; a key missing from
/// every record is a structural error.
fn load_json(path: &Path) -> ExplorerResult<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|e| ExplorerError::data_source(path, e))?;
    load_json_str(path, &text)
}

/// Parse records-oriented JSON text. `source` only labels the dataset.
pub fn load_json_str(source: &Path, text: &str) -> ExplorerResult<Dataset> {
    let root: JsonValue = serde_json::from_str(text)
        .map_err(|e| ExplorerError::data_source(source, format!("parsing JSON: {e}")))?;
    let records = root
        .as_array()
        .ok_or_else(|| ExplorerError::data_source(source, "expected top-level JSON array"))?;

    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            ExplorerError::data_source(source, format!("record {i} is not a JSON object"))
        })?;
        objects.push(obj);
    }

    if !objects.is_empty() {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|col| objects.iter().all(|obj| !obj.contains_key(*col)))
            .collect();
        if !missing.is_empty() {
            return Err(ExplorerError::data_source(
                source,
                format!("missing required field(s) {missing:?}"),
            ));
        }
    }

    let rows = objects.into_iter().map(|obj| {
        let [title, authors, journal, publish_time, abstract_text] =
            REQUIRED_COLUMNS.map(|col| obj.get(col).and_then(json_to_text));
        RawPaper::from_cells(
            title.as_deref(),
            authors.as_deref(),
            journal.as_deref(),
            publish_time.as_deref(),
            abstract_text.as_deref(),
        )
    });

    Ok(Dataset::from_raw(source, rows.collect::<Vec<_>>()))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing paper metadata.
///
/// Each required field must be a top-level column. String columns are read
/// as-is; other types (e.g. `Date32` publish times, integer years) go
/// through Arrow's display formatting. Nulls read as absent.
fn load_parquet(path: &Path) -> ExplorerResult<Dataset> {
    let file = std::fs::File::open(path).map_err(|e| ExplorerError::data_source(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| ExplorerError::data_source(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| ExplorerError::data_source(path, format!("building parquet reader: {e}")))?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| ExplorerError::data_source(path, format!("reading record batch: {e}")))?;
        let schema = batch.schema();
        let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let columns = ColumnIndex::locate(path, &headers)?;
        let arrays = columns.0.map(|i| batch.column(i));

        for row in 0..batch.num_rows() {
            let [title, authors, journal, publish_time, abstract_text] =
                arrays.map(|col| arrow_cell_to_text(col.as_ref(), row));
            rows.push(RawPaper::from_cells(
                title.as_deref(),
                authors.as_deref(),
                journal.as_deref(),
                publish_time.as_deref(),
                abstract_text.as_deref(),
            ));
        }
    }

    Ok(Dataset::from_raw(path, rows))
}

/// Render a single Arrow cell as text, `None` for nulls or unprintable types.
fn arrow_cell_to_text(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match array_value_to_string(col, row) {
        Ok(s) => Some(s),
        Err(e) => {
            log::debug!("unprintable {:?} cell at row {row}: {e}", col.data_type());
            None
        }
    }
}
