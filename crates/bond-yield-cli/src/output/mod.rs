pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Yaml => json::print_yaml(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar JSON value for a single cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Split an object into scalar fields and nested arrays of rows.
pub(crate) fn split_fields(
    map: &serde_json::Map<String, Value>,
) -> (Vec<(&str, &Value)>, Vec<(&str, &[Value])>) {
    let mut scalars = Vec::new();
    let mut tables = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
                tables.push((key.as_str(), rows.as_slice()))
            }
            _ => scalars.push((key.as_str(), val)),
        }
    }
    (scalars, tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_fields_separates_schedule() {
        let value = json!({
            "bondStatus": "discount",
            "cashFlowSchedule": [{ "period": 1 }, { "period": 2 }],
            "totalInterest": 500.0
        });
        let (scalars, tables) = split_fields(value.as_object().unwrap());
        assert_eq!(scalars.len(), 2);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "cashFlowSchedule");
        assert_eq!(tables[0].1.len(), 2);
    }

    #[test]
    fn test_cell_formats_scalars() {
        assert_eq!(cell(&json!("par")), "par");
        assert_eq!(cell(&json!(5.25)), "5.25");
        assert_eq!(cell(&Value::Null), "");
    }
}
