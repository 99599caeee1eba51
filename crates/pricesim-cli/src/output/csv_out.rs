use serde_json::Value;
use std::io;

/// List fields promoted to row-per-record CSV when present and non-empty,
/// in priority order.
const RECORD_LISTS: [&str; 4] = ["price_patterns", "trend", "errors", "warnings"];

/// Write output as CSV to stdout.
///
/// A result carrying one of the known record lists becomes one CSV row per
/// record; anything else flattens to field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(items) = first_record_list(map) {
                write_records(&mut wtr, items);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    if !val.is_array() && !val.is_object() {
                        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                    }
                }
            }
        }
        Value::Array(items) => write_records(&mut wtr, items),
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn first_record_list(map: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    RECORD_LISTS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    })
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, items: &[Value]) {
    let first = match items.first() {
        Some(Value::Object(first)) => first,
        _ => {
            for item in items {
                let _ = wtr.write_record([&format_csv_value(item)]);
            }
            return;
        }
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in items {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
