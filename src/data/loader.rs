use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::model::{Column, ColumnData, Dataset, DatasetError};

/// Cell tokens that load as an absent value.
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "<NA>",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("no columns to parse from {}", .0.display())]
    NoColumns(PathBuf),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// * `.xls` / `.xlsx` – first worksheet, first row is the header
/// * `.tsv` / `.tab`  – tab-delimited text with a header row
/// * anything else    – comma-delimited text with a header row
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    // Surface missing/unreadable files as I/O errors before any parser sees them.
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match ext.as_str() {
        "xls" | "xlsx" => {
            drop(file);
            load_spreadsheet(path)
        }
        "tsv" | "tab" => load_delimited(file, b'\t', path),
        _ => load_delimited(file, b',', path),
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn load_delimited(file: File, delimiter: u8, path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(LoadError::NoColumns(path.to_path_buf()));
    }
    let headers = unique_headers(headers);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, value) in record.iter().enumerate() {
            cells[col].push(parse_missing(value));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_text_column(raw)))
        .collect();

    Ok(Dataset::new(columns)?)
}

fn parse_missing(value: &str) -> Option<String> {
    if NA_TOKENS.contains(&value.trim()) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Integer when every present cell parses as `i64`, float when every present
/// cell parses as `f64`, text otherwise.  An all-missing column is numeric.
/// Non-finite floats (`inf`, `-inf`) load as absent.
fn infer_text_column(raw: Vec<Option<String>>) -> ColumnData {
    let present = || raw.iter().flatten().map(|s| s.trim());

    if present().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnData::Integer(
            raw.iter()
                .map(|c| c.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }
    if present().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnData::Float(
            raw.iter()
                .map(|c| {
                    c.as_deref()
                        .and_then(|s| s.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                })
                .collect(),
        );
    }
    ColumnData::Text(raw)
}

// ---------------------------------------------------------------------------
// Spreadsheets
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoColumns(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| LoadError::NoColumns(path.to_path_buf()))?;
    let headers = unique_headers(header_row.iter().map(header_text).collect());

    let mut cells: Vec<Vec<Data>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col, column_cells) in cells.iter_mut().enumerate() {
            column_cells.push(row.get(col).cloned().unwrap_or(Data::Empty));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_sheet_column(&raw)))
        .collect();

    Ok(Dataset::new(columns)?)
}

fn header_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if is_exact_integer(*f) => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_exact_integer(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER
}

fn sheet_number(c: &Data) -> Option<f64> {
    match c {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        _ => None,
    }
}

/// Empty cells and missing-value tokens.
fn is_missing_cell(c: &Data) -> bool {
    match c {
        Data::Empty => true,
        Data::String(s) => parse_missing(s).is_none(),
        _ => false,
    }
}

fn infer_sheet_column(raw: &[Data]) -> ColumnData {
    let present = || raw.iter().filter(|c| !is_missing_cell(c));

    if present().all(|c| sheet_number(c).is_some()) {
        let values: Vec<Option<f64>> = raw.iter().map(sheet_number).collect();
        let integral = values.iter().flatten().all(|&v| is_exact_integer(v));
        if integral {
            return ColumnData::Integer(values.iter().map(|v| v.map(|f| f as i64)).collect());
        }
        return ColumnData::Float(values);
    }

    ColumnData::Text(
        raw.iter()
            .map(|c| match c {
                Data::Empty => None,
                Data::String(s) => parse_missing(s),
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Header clean-up
// ---------------------------------------------------------------------------

/// Blank headers become `Unnamed: <i>`; repeats get `.1`, `.2`, … suffixes.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h
            };
            let mut name = base.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{base}.{n}");
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file");
        path
    }

    #[test]
    fn csv_infers_kinds_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "small.csv", b"a,b\n1,x\n2,y\n,z\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.row_count(), 3);
        let a = ds.column("a").unwrap();
        assert_eq!(a.kind(), ColumnKind::Numeric);
        assert_eq!(a.missing_count(), 1);
        assert_eq!(ds.column("b").unwrap().kind(), ColumnKind::Categorical);
    }

    #[test]
    fn csv_float_and_na_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "f.csv", b"v,w\n1.5,NA\n2,n/a\nnan,\n");

        let ds = load_file(&path).unwrap();
        let v = ds.column("v").unwrap();
        assert!(matches!(v.data(), ColumnData::Float(_)));
        assert_eq!(v.present_values(), vec![1.5, 2.0]);
        let w = ds.column("w").unwrap();
        assert_eq!(w.kind(), ColumnKind::Numeric);
        assert_eq!(w.missing_count(), 3);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.tsv", b"x\ty\n1\t2\n3\t4\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column("y").unwrap().present_values(), vec![2.0, 4.0]);
    }

    #[test]
    fn unknown_extension_is_delimited_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.txt", b"n\n7\n");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dup.csv", b"a,a,\n1,2,3\n");

        let ds = load_file(&path).unwrap();
        let names: Vec<&str> = ds.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn ragged_rows_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", b"a,b\n1,2\n3\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn empty_file_has_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", b"");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns(_)));
    }

    #[test]
    fn corrupt_spreadsheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.xlsx", b"definitely not a zip archive");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn xlsx_first_sheet_with_header() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "id").unwrap();
        ws.write_string(0, 1, "name").unwrap();
        ws.write_string(0, 2, "score").unwrap();
        ws.write_number(1, 0, 1).unwrap();
        ws.write_string(1, 1, "Ada").unwrap();
        ws.write_number(1, 2, 98.5).unwrap();
        ws.write_number(2, 0, 2).unwrap();
        ws.write_string(2, 1, "Grace").unwrap();
        wb.save(&path).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.row_count(), 2);
        let id = ds.column("id").unwrap();
        assert!(matches!(id.data(), ColumnData::Integer(_)));
        assert_eq!(ds.column("name").unwrap().kind(), ColumnKind::Categorical);
        let score = ds.column("score").unwrap();
        assert_eq!(score.kind(), ColumnKind::Numeric);
        assert_eq!(score.missing_count(), 1);
        assert_eq!(score.present_values(), vec![98.5]);
    }

    #[test]
    fn xlsx_huge_whole_numbers_stay_float() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "big").unwrap();
        ws.write_number(1, 0, 1e20).unwrap();
        ws.write_number(2, 0, 2e20).unwrap();
        wb.save(&path).unwrap();

        let ds = load_file(&path).unwrap();
        let big = ds.column("big").unwrap();
        assert!(matches!(big.data(), ColumnData::Float(_)));
        assert_eq!(big.present_values(), vec![1e20, 2e20]);
    }

    #[test]
    fn xlsx_na_token_keeps_column_numeric() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("na.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "v").unwrap();
        ws.write_number(1, 0, 1.5).unwrap();
        ws.write_string(2, 0, "NA").unwrap();
        ws.write_number(3, 0, 3.0).unwrap();
        wb.save(&path).unwrap();

        let ds = load_file(&path).unwrap();
        let v = ds.column("v").unwrap();
        assert_eq!(v.kind(), ColumnKind::Numeric);
        assert_eq!(v.missing_count(), 1);
        assert_eq!(v.present_values(), vec![1.5, 3.0]);
    }

    #[test]
    fn csv_infinities_load_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "inf.csv", b"v\n1.5\ninf\n-inf\n2.5\n");

        let ds = load_file(&path).unwrap();
        let v = ds.column("v").unwrap();
        assert_eq!(v.kind(), ColumnKind::Numeric);
        assert_eq!(v.missing_count(), 2);
        assert_eq!(v.present_values(), vec![1.5, 2.5]);
    }
}
