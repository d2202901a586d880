use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{cell, split_fields};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", other),
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

/// Scalars as a Field/Value table, then one table per nested row list
/// (the cash flow schedule).
fn print_object(map: &serde_json::Map<String, Value>) {
    let (scalars, tables) = split_fields(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalars {
        builder.push_record([key.to_string(), cell(val)]);
    }
    println!("{}", Table::from(builder));

    for (key, rows) in tables {
        println!("\n{}:", key);
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    match build_rows_table(rows) {
        Some(table) => println!("{}", table),
        None => println!("(empty)"),
    }
}

fn build_rows_table(rows: &[Value]) -> Option<Table> {
    let Some(Value::Object(first)) = rows.first() else {
        return None;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }

    Some(Table::from(builder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_rows_render_every_period() {
        let rows = json!([
            { "period": 1, "paymentDate": "Month 6", "remainingPrincipal": 1000.0 },
            { "period": 2, "paymentDate": "Month 12", "remainingPrincipal": 0.0 }
        ]);
        let table = build_rows_table(rows.as_array().unwrap()).unwrap().to_string();
        assert!(table.contains("paymentDate"));
        assert!(table.contains("Month 12"));
    }

    #[test]
    fn test_empty_rows_have_no_table() {
        assert!(build_rows_table(&[]).is_none());
    }
}
