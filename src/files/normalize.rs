//! Turns JSON, CSV and spreadsheet files into a uniform list of records or values.
//!
//! Every reader returns a `serde_json::Value` so the presentation layer has a single
//! shape to work with: usually an array of objects (one per row), sometimes an array
//! of primitives or a bare scalar when the source is JSON.

use std::fs::File;
use std::io;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::format::FileFormat;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Read `path` and normalize it according to its extension.
pub fn read_file(path: &Path) -> Result<Value, NormalizeError> {
    let format = FileFormat::from_path(path)
        .ok_or_else(|| NormalizeError::UnsupportedFormat(path.display().to_string()))?;

    match format {
        FileFormat::Json => {
            let bytes = std::fs::read(path)?;
            let parsed: Value = serde_json::from_slice(&bytes)?;
            Ok(normalize_json(parsed))
        }
        FileFormat::Csv => {
            let file = File::open(path)?;
            Ok(Value::Array(read_csv(file)?))
        }
        FileFormat::Spreadsheet => Ok(Value::Array(read_spreadsheet(path)?)),
    }
}

/// Objects collapse to their first list-valued field, or become a one-element list.
pub fn normalize_json(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(list) = map.values().find(|v| v.is_array()) {
                return list.clone();
            }
            Value::Array(vec![Value::Object(map)])
        }
        other => other,
    }
}

pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<Value>, NormalizeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = Map::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            let value = record
                .get(idx)
                .map(coerce_scalar)
                .unwrap_or_else(|| Value::String(String::new()));
            row.insert(name.to_string(), value);
        }
        rows.push(Value::Object(row));
    }
    Ok(rows)
}

/// Best-effort numeric coercion for CSV cells: integer, then finite float, else the
/// trimmed text. Integers too wide for `u64` stay text rather than losing digits.
pub fn coerce_scalar(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = s.parse::<u64>() {
        return Value::Number(u.into());
    }
    if is_integer_text(s) {
        return Value::String(s.to_string());
    }
    if let Some(n) = s.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(s.to_string())
}

fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

pub fn read_spreadsheet(path: &Path) -> Result<Vec<Value>, NormalizeError> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    Ok(records_from_range(&range?))
}

/// First row is the header; the rest pair with it positionally.
pub fn records_from_range(range: &Range<Data>) -> Vec<Value> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(header_name).collect();

    rows.map(|cells| {
        let record: Map<String, Value> = headers
            .iter()
            .zip(cells)
            .map(|(name, cell)| (name.clone(), cell_value(cell)))
            .collect();
        Value::Object(record)
    })
    .collect()
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => cell_text(other),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::DateTime(_) | Data::Error(_) => Value::String(cell_text(cell)),
    }
}

fn cell_text(cell: &Data) -> String {
    if let Data::DateTime(_) = cell {
        if let Some(dt) = cell.as_datetime() {
            return dt.to_string();
        }
    }
    cell.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn coerce_numbers_and_text() {
        assert_eq!(coerce_scalar("42"), json!(42));
        assert_eq!(coerce_scalar("3.14"), json!(3.14));
        assert_eq!(coerce_scalar(""), json!(""));
        assert_eq!(coerce_scalar("   "), json!(""));
        assert_eq!(coerce_scalar("abc"), json!("abc"));
        assert_eq!(coerce_scalar("-17"), json!(-17));
        assert_eq!(coerce_scalar(" 8 "), json!(8));
    }

    #[test]
    fn coerce_leading_zeros_are_lost() {
        assert_eq!(coerce_scalar("007"), json!(7));
    }

    #[test]
    fn coerce_ambiguous_values_stay_strings() {
        assert_eq!(coerce_scalar("1,000"), json!("1,000"));
        assert_eq!(coerce_scalar("12abc"), json!("12abc"));
        assert_eq!(coerce_scalar("NaN"), json!("NaN"));
        assert_eq!(coerce_scalar("inf"), json!("inf"));
    }

    #[test]
    fn coerce_wide_integers_keep_their_digits() {
        assert_eq!(coerce_scalar("18446744073709551615"), json!(18446744073709551615u64));
        assert_eq!(coerce_scalar("12345678901234567890"), json!(12345678901234567890u64));
        assert_eq!(coerce_scalar("99999999999999999999"), json!("99999999999999999999"));
        assert_eq!(coerce_scalar("-99999999999999999999"), json!("-99999999999999999999"));
        assert_eq!(coerce_scalar("1e25"), json!(1e25));
    }

    #[test]
    fn csv_wide_ids_render_exactly() {
        use crate::files::{render::table_page, view::TableView};

        let rows = read_csv("acct\n12345678901234567890\n123456789012345678901234\n".as_bytes()).unwrap();
        let html = table_page("ids.csv", &TableView::from_value(Value::Array(rows)));
        assert!(html.contains("<td>12345678901234567890</td>"));
        assert!(html.contains("<td>123456789012345678901234</td>"));
    }

    #[test]
    fn json_object_with_list_returns_first_list() {
        assert_eq!(normalize_json(json!({"a": [1, 2], "b": "x"})), json!([1, 2]));
        assert_eq!(
            normalize_json(json!({"meta": {"n": 1}, "rows": [{"id": 1}], "more": [9]})),
            json!([{"id": 1}])
        );
    }

    #[test]
    fn json_object_without_list_is_wrapped() {
        assert_eq!(normalize_json(json!({"a": "x"})), json!([{"a": "x"}]));
    }

    #[test]
    fn json_list_and_scalars_pass_through() {
        assert_eq!(normalize_json(json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(normalize_json(json!("hello")), json!("hello"));
        assert_eq!(normalize_json(json!(null)), json!(null));
    }

    #[test]
    fn csv_rows_keep_header_order_and_coerce() {
        let data = "name,age,score\nann,31,9.5\nbob,,x\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], json!({"name": "ann", "age": 31, "score": 9.5}));
        assert_eq!(rows[1], json!({"name": "bob", "age": "", "score": "x"}));
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "age", "score"]);
    }

    #[test]
    fn csv_short_rows_are_padded_and_long_rows_trimmed() {
        let data = "a,b,c\n1\n1,2,3,4\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0], json!({"a": 1, "b": "", "c": ""}));
        assert_eq!(rows[1], json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn csv_header_only_yields_no_rows() {
        assert!(read_csv("a,b\n".as_bytes()).unwrap().is_empty());
        assert!(read_csv("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn csv_invalid_utf8_is_a_parse_error() {
        let data: &[u8] = b"a,b\n\xff\xfe,1\n";
        let err = read_csv(data).unwrap_err();
        assert!(matches!(err, NormalizeError::Csv(_)));
    }

    #[test]
    fn csv_has_no_size_limit() {
        let mut data = String::from("id,label\n");
        for i in 0..20_000 {
            data.push_str(&format!("{i},row-{i}\n"));
        }
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 20_000);
        assert_eq!(rows[19_999]["id"], json!(19_999));
    }

    #[test]
    fn range_first_row_is_header() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("name".into()));
        range.set_value((0, 1), Data::Empty);
        range.set_value((0, 2), Data::Int(2024));
        range.set_value((1, 0), Data::String("ann".into()));
        range.set_value((1, 1), Data::Float(1.5));
        range.set_value((1, 2), Data::Bool(true));
        range.set_value((2, 0), Data::String("007".into()));

        let rows = records_from_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], json!({"name": "ann", "": 1.5, "2024": true}));
        // no coercion: spreadsheet text stays text
        assert_eq!(rows[1], json!({"name": "007", "": null, "2024": null}));
    }

    #[test]
    fn empty_range_yields_no_records() {
        let range: Range<Data> = Range::empty();
        assert!(records_from_range(&range).is_empty());
    }

    #[test]
    fn read_file_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let json_path = write(&dir, "items.JSON", br#"{"items": [{"id": 1}]}"#);
        assert_eq!(read_file(&json_path).unwrap(), json!([{"id": 1}]));

        let csv_path = write(&dir, "table.csv", b"x,y\n1,2.5\n");
        assert_eq!(read_file(&csv_path).unwrap(), json!([{"x": 1, "y": 2.5}]));
    }

    fn write_workbook(path: &Path) {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 2, "active").unwrap();
        sheet.write_string(1, 0, "ann").unwrap();
        sheet.write_number(1, 1, 1.5).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_string(2, 0, "007").unwrap();
        sheet.write_number(2, 1, 42.0).unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn read_file_parses_first_worksheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.xlsx");
        write_workbook(&path);

        let rows = read_file(&path).unwrap();
        assert_eq!(
            rows,
            json!([
                {"name": "ann", "": 1.5, "active": true},
                {"name": "007", "": 42.0, "active": null},
            ])
        );
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "", "active"]);
    }

    #[test]
    fn read_file_rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", b"hello");
        assert!(matches!(read_file(&path), Err(NormalizeError::UnsupportedFormat(_))));
    }

    #[test]
    fn read_file_reports_parse_failures() {
        let dir = TempDir::new().unwrap();
        let bad_json = write(&dir, "broken.json", b"{\"a\": ");
        assert!(matches!(read_file(&bad_json), Err(NormalizeError::Json(_))));

        let bad_xlsx = write(&dir, "broken.xlsx", b"this is not a zip archive");
        assert!(matches!(read_file(&bad_xlsx), Err(NormalizeError::Spreadsheet(_))));
    }
}
