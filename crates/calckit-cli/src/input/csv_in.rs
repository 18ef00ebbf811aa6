use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Numeric table read from a CSV file with a header row.
pub struct DecimalTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Decimal>>,
}

/// Read a CSV file whose header names the columns and whose cells are all
/// numeric. Blank cells are rejected rather than skipped.
pub fn read_decimal_table(path: &str) -> Result<DecimalTable, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to open '{}': {}", path, e))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = i + 2;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                Decimal::from_str(cell).map_err(|e| {
                    format!(
                        "{}:{}: column '{}' is not a number ('{}'): {}",
                        path,
                        line,
                        headers.get(col).map(String::as_str).unwrap_or("?"),
                        cell,
                        e
                    )
                })
            })
            .collect::<Result<Vec<Decimal>, String>>()?;
        rows.push(row);
    }

    debug!("read {} rows x {} columns from {}", rows.len(), headers.len(), path);
    Ok(DecimalTable { headers, rows })
}
