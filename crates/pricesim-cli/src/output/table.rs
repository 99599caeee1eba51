use serde_json::Value;
use tabled::builder::Builder;
use tabled::Table;

/// Render output as tables.
///
/// Scalar fields of the result land in a field/value table; list fields
/// (price patterns, trend points, row errors) each get a table of their own
/// below it, and nested objects such as the guard block flatten into dotted
/// field names.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_warnings(map.get("warnings"));
                if let Some(Value::String(methodology)) = map.get("methodology") {
                    println!("\nMethodology: {}", methodology);
                }
            } else {
                print_result(value);
            }
        }
        Value::Array(items) => print_record_table(None, items),
        other => println!("{}", other),
    }
}

fn print_result(result: &Value) {
    let map = match result {
        Value::Object(map) => map,
        other => {
            println!("{}", other);
            return;
        }
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut lists: Vec<(&str, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) => lists.push((key.as_str(), items)),
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    builder.push_record([format!("{key}.{inner_key}"), scalar(inner_val)]);
                }
            }
            _ => builder.push_record([key.to_string(), scalar(val)]),
        }
    }

    println!("{}", Table::from(builder));

    for (name, items) in lists {
        print_record_table(Some(name), items);
    }
}

fn print_record_table(title: Option<&str>, items: &[Value]) {
    if items.is_empty() {
        return;
    }
    if let Some(title) = title {
        println!("\n{}:", title);
    }

    if let Some(Value::Object(first)) = items.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in items {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in items {
            println!("{}", scalar(item));
        }
    }
}

fn print_warnings(warnings: Option<&Value>) {
    if let Some(Value::Array(warnings)) = warnings {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for warning in warnings {
                if let Value::String(s) = warning {
                    println!("  - {}", s);
                }
            }
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
