use serde_json::Value;
use std::io;

use super::{cell, split_fields};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Scalar results become `field,value` rows; a row list (the cash flow
/// schedule) follows as its own header + records block.
fn write_csv<W: io::Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    let target = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match target {
        Value::Object(map) => {
            let (scalars, tables) = split_fields(map);
            wtr.write_record(["field", "value"])?;
            for (key, val) in scalars {
                wtr.write_record([key.to_string(), cell(val)])?;
            }
            for (_, rows) in tables {
                wtr.write_record([""])?;
                write_rows(&mut wtr, rows)?;
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        other => wtr.write_record([cell(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(cell).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
