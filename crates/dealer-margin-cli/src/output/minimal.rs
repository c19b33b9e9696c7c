use serde_json::Value;

use super::cell_text;

/// Headline figures, most useful first. Nested paths use '/'.
const PRIORITY_KEYS: [&str; 5] = [
    "net_profit",
    "summary/total_net_profit",
    "is_valid",
    "vat_to_pay",
    "gross_profit",
];

/// Print just the key answer value from the output, e.g. the net profit of
/// a vehicle or of a whole stock book.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for key in PRIORITY_KEYS {
        let pointer = format!("/{}", key);
        if let Some(val) = result_obj.pointer(&pointer) {
            if !val.is_null() {
                println!("{}", cell_text(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell_text(val));
            return;
        }
    }

    println!("{}", cell_text(result_obj));
}
