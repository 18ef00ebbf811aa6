use serde_json::{Map, Value};
use std::io;

use super::{cell, is_matrix, is_record_list};

/// Write the result as CSV.
///
/// A result carrying a correlation matrix is written as the matrix with a
/// header row. A result with a record list (schedule, distribution, yearly
/// projection) is written as that list. Anything else becomes field,value
/// pairs of the scalar fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = match value.as_object().and_then(|m| m.get("result")) {
        Some(Value::Object(r)) => r,
        _ => {
            let _ = wtr.write_record([cell(value)]);
            let _ = wtr.flush();
            return;
        }
    };

    if let (Some(matrix), Some(Value::Array(columns))) = (result.get("matrix"), result.get("columns")) {
        write_matrix(&mut wtr, matrix, columns);
    } else if let Some(list) = result.values().find(|v| is_record_list(v)) {
        write_records(&mut wtr, list);
    } else {
        write_fields(&mut wtr, result);
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in result {
        if is_matrix(val) || is_record_list(val) {
            continue;
        }
        let _ = wtr.write_record([key.as_str(), &cell(val)]);
    }
}

fn write_matrix<W: io::Write>(wtr: &mut csv::Writer<W>, matrix: &Value, columns: &[Value]) {
    let mut header = vec![String::new()];
    header.extend(columns.iter().map(cell));
    let _ = wtr.write_record(&header);

    for (name, row) in columns.iter().zip(matrix.as_array().into_iter().flatten()) {
        let mut record = vec![cell(name)];
        record.extend(row.as_array().into_iter().flatten().map(cell));
        let _ = wtr.write_record(&record);
    }
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, list: &Value) {
    let items: Vec<&Map<String, Value>> = list
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .collect();
    let Some(first) = items.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in &items {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
