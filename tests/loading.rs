use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use paper_explorer::data::loader::load_file;
use paper_explorer::data::model::{Dataset, REQUIRED_COLUMNS, UNKNOWN_JOURNAL};
use paper_explorer::ExplorerError;

fn fixture(name: &str) -> Dataset {
    load_file(Path::new(&format!("tests/fixtures/{name}"))).unwrap()
}

#[test]
fn csv_fixture_normalizes_rows() {
    let ds = fixture("metadata.csv");

    assert_eq!(ds.len(), 6);
    let years: Vec<i32> = ds.papers().iter().map(|p| p.year).collect();
    assert_eq!(years, [2020, 2003, 2020, 2020, 2020, 2021]);

    let range = ds.year_range().unwrap();
    assert_eq!((range.min(), range.max()), (2003, 2021));

    let bat = &ds.papers()[3];
    assert_eq!(bat.title, "Bat coronavirus origins");
    assert_eq!(bat.journal, UNKNOWN_JOURNAL);
    assert_eq!(bat.abstract_word_count, 5);

    let report = ds.report();
    assert_eq!(report.rows_read, 8);
    assert_eq!(report.rows_retained, 6);
    assert_eq!(report.dropped_missing_title, 1);
    assert_eq!(report.dropped_missing_year, 1);
    assert_eq!(report.unparsed_dates, 1);
    assert_eq!(report.missing_journal, 1);
}

#[test]
fn retained_rows_satisfy_invariants() {
    for name in ["metadata.csv", "metadata.tsv", "metadata.json"] {
        let ds = fixture(name);
        for p in ds.papers() {
            assert!(!p.title.trim().is_empty(), "{name}: empty title");
            assert!(!p.journal.is_empty(), "{name}: empty journal");
            assert_eq!(p.abstract_word_count, p.abstract_text.as_deref().map_or(0, |a| a.split_whitespace().count()));
        }
    }
}

/// Copy the CSV fixture's required columns into a Utf8 Parquet file.
fn csv_fixture_as_parquet(dir: &Path) -> std::path::PathBuf {
    let mut reader = csv::Reader::from_path("tests/fixtures/metadata.csv").unwrap();
    let headers = reader.headers().unwrap().clone();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();
    for name in REQUIRED_COLUMNS {
        let idx = headers.iter().position(|h| h == name).unwrap();
        let values: StringArray = records
            .iter()
            .map(|r| r.get(idx).filter(|v| !v.is_empty()))
            .collect();
        fields.push(Field::new(name, DataType::Utf8, true));
        columns.push(Arc::new(values));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let path = dir.join("metadata.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

#[test]
fn every_format_agrees() {
    let csv = fixture("metadata.csv");
    let tsv = fixture("metadata.tsv");
    let json = fixture("metadata.json");
    let dir = tempfile::tempdir().unwrap();
    let parquet = load_file(&csv_fixture_as_parquet(dir.path())).unwrap();

    for (name, other) in [("tsv", &tsv), ("json", &json), ("parquet", &parquet)] {
        assert_eq!(csv.papers(), other.papers(), "{name}: papers differ");
        assert_eq!(csv.report(), other.report(), "{name}: load report differs");
    }
}

#[test]
fn parquet_with_date_column_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("authors", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("publish_time", DataType::Date32, true),
        Field::new("abstract", DataType::Utf8, true),
    ]));
    // 18_330 days after the epoch is 2020-03-09.
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("A"), Some("B"), None])),
        Arc::new(StringArray::from(vec![Some("X"), None, None])),
        Arc::new(StringArray::from(vec![Some("Cell"), None, Some("BMJ")])),
        Arc::new(Date32Array::from(vec![Some(18_330), None, Some(18_330)])),
        Arc::new(StringArray::from(vec![Some("a b c"), None, None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 1);
    let a = &ds.papers()[0];
    assert_eq!(a.title, "A");
    assert_eq!(a.year, 2020);
    assert_eq!(a.publish_time.to_string(), "2020-03-09");
    assert_eq!(a.abstract_word_count, 3);
    assert_eq!(ds.report().dropped_missing_year, 1);
    assert_eq!(ds.report().dropped_missing_title, 1);
}

#[test]
fn missing_columns_are_fatal() {
    let err = load_file(Path::new("tests/fixtures/missing_columns.csv")).unwrap_err();
    assert!(matches!(err, ExplorerError::DataSource { .. }));
    let msg = err.to_string();
    assert!(msg.contains("publish_time"), "{msg}");
    assert!(msg.contains("abstract"), "{msg}");
}

#[test]
fn missing_file_is_fatal() {
    let err = load_file(Path::new("tests/fixtures/nope.csv")).unwrap_err();
    assert!(matches!(err, ExplorerError::DataSource { .. }));
}

#[test]
fn corrupt_parquet_is_fatal() {
    let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    file.write_all(b"definitely not parquet").unwrap();
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, ExplorerError::DataSource { .. }));
}

#[test]
fn header_only_file_is_empty_not_an_error() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "title,authors,journal,publish_time,abstract").unwrap();
    let ds = load_file(file.path()).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.year_range(), None);
}
