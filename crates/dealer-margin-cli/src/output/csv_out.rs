use serde_json::{Map, Value};
use std::io;

use super::cell_text;

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A stock report exports one row per vehicle; anything else becomes a
/// two-column field/value sheet.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result"));
    match result {
        Some(Value::Object(res)) => match res.get("vehicles") {
            Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
            _ => write_fields(&mut wtr, res),
        },
        _ => match value {
            Value::Object(map) => write_fields(&mut wtr, map),
            Value::Array(rows) => write_rows(&mut wtr, rows),
            _ => {
                let _ = wtr.write_record([cell_text(value)]);
            }
        },
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutCsv<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell_text(val)]);
    }
}

/// Headers come from the union of keys so unsold vehicles (no sale period
/// fields) line up with sold ones.
fn write_rows(wtr: &mut StdoutCsv<'_>, rows: &[Value]) {
    let mut headers: Vec<String> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        return;
    }

    let _ = wtr.write_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(cell_text).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
