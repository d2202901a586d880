use serde_json::Value;

use super::cell;

/// Key answer fields, most important first.
const PRIORITY_KEYS: [&str; 4] = [
    "yieldToMaturity",
    "currentYield",
    "totalInterest",
    "bondStatus",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return cell(val);
                }
            }
            map.iter()
                .next()
                .map(|(key, val)| format!("{}: {}", key, cell(val)))
                .unwrap_or_default()
        }
        // A bare schedule: report how many periods it has.
        Value::Array(rows) => format!("{} periods", rows.len()),
        other => cell(other),
    }
}
