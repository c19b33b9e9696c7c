use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell_text;

/// Format output as field/value tables. Arrays of records inside the result
/// (per-vehicle rows, period buckets) get a table each.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_tables(result, map),
            _ => print_field_table(map),
        },
        Value::Array(arr) => print_record_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let mut scalars = Map::new();
    let mut sections: Vec<(&String, &Value)> = Vec::new();

    for (key, val) in result {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                sections.push((key, val))
            }
            Value::Object(_) => sections.push((key, val)),
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }

    if !scalars.is_empty() {
        print_field_table(&scalars);
    }

    for (key, val) in sections {
        println!("\n{}:", key);
        match val {
            Value::Array(items) => print_record_table(items),
            Value::Object(map) => print_field_table(map),
            _ => {}
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &cell_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_record_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", cell_text(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h).map(cell_text).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}
