//! Row handling: CSV parsing, value coercion, and the two interaction
//! features derived before scoring.

use anyhow::{Context, Result};
use serde_json::Value;

/// A tabular record in transit: one JSON object per row. Preserves
/// insertion order so batch responses echo columns in their input order.
pub type Row = serde_json::Map<String, Value>;

/// String coercion applied to categorical cells and to the source fields
/// of the interaction features. Always succeeds for any JSON value.
pub fn coerce_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Add the two categorical interaction features to a row:
/// `Location_Vehicle = Location_Category + "_" + Vehicle_Type` and
/// `Time_Loyalty = Time_of_Booking + "_" + Customer_Loyalty_Status`.
///
/// Fails only when a source column is missing (e.g. a batch file without
/// the expected header).
pub fn add_interaction_features(row: &mut Row) -> Result<()> {
    let location_vehicle = joined(row, "Location_Category", "Vehicle_Type")?;
    let time_loyalty = joined(row, "Time_of_Booking", "Customer_Loyalty_Status")?;
    row.insert("Location_Vehicle".into(), Value::String(location_vehicle));
    row.insert("Time_Loyalty".into(), Value::String(time_loyalty));
    Ok(())
}

fn joined(row: &Row, left: &str, right: &str) -> Result<String> {
    let cell = |name: &str| {
        row.get(name)
            .with_context(|| format!("missing column '{name}'"))
    };
    Ok(format!("{}_{}", coerce_str(cell(left)?), coerce_str(cell(right)?)))
}

/// Parse an uploaded CSV (header row required) into rows, inferring a JSON
/// type per cell: integer, then float, else string; empty cells become null.
pub fn rows_from_csv(data: &[u8]) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);
    let headers = reader.headers().context("could not read CSV header")?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("could not read CSV record")?;
        let mut row = Row::new();
        for (name, cell) in headers.iter().zip(record.iter()) {
            row.insert(name.to_string(), infer_cell(cell));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn infer_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}
