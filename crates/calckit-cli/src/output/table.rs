use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, is_matrix, is_record_list, CLASSIFICATION_KEYS};

/// Print the result as a field/value table, then any matrix or record lists
/// (schedules, distributions, factor breakdowns) as tables of their own.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", cell(value));
        return;
    };
    let Some(Value::Object(result)) = envelope.get("result") else {
        print_fields(envelope);
        return;
    };

    print_fields(result);

    let headers: Vec<String> = result
        .get("columns")
        .and_then(Value::as_array)
        .map(|cols| cols.iter().map(cell).collect())
        .unwrap_or_default();

    for (key, val) in result {
        if is_matrix(val) {
            println!("\n{}:", key);
            print_matrix(val, &headers);
        } else if is_record_list(val) {
            println!("\n{}:", key);
            print_records(val);
        }
    }

    for key in CLASSIFICATION_KEYS {
        if let Some(guidance) = result
            .get(key)
            .and_then(|c| c.get("guidance"))
            .and_then(Value::as_str)
        {
            println!("\n{}", guidance);
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

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if is_matrix(val) || is_record_list(val) {
            continue;
        }
        builder.push_record([key.as_str(), &cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_matrix(matrix: &Value, headers: &[String]) {
    let Some(rows) = matrix.as_array() else {
        return;
    };
    let mut builder = Builder::default();
    if !headers.is_empty() {
        let mut top = vec![String::new()];
        top.extend(headers.iter().cloned());
        builder.push_record(top);
    }
    for (i, row) in rows.iter().enumerate() {
        let mut record = vec![headers.get(i).cloned().unwrap_or_default()];
        if let Some(cells) = row.as_array() {
            record.extend(cells.iter().map(cell));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_records(list: &Value) {
    let Some(items) = list.as_array() else {
        return;
    };
    let Some(Value::Object(first)) = items.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in items.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}
