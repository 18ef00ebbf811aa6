use serde_json::Value;

use super::{cell, CLASSIFICATION_KEYS};

/// Headline field per calculator, tried in order.
const HEADLINE_KEYS: [&str; 8] = [
    "probability",
    "probability_of_default",
    "months",
    "months_to_goal",
    "bmi",
    "fat_mass_index",
    "score",
    "most_linked",
];

/// Print the headline value, followed by its classification label when the
/// result carries one.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        println!("{}", cell(result));
        return;
    };

    let headline = HEADLINE_KEYS
        .iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
        .map(cell);
    let label = CLASSIFICATION_KEYS
        .iter()
        .find_map(|k| map.get(*k))
        .map(cell);

    match (headline, label) {
        (Some(h), Some(l)) => println!("{} ({})", h, l),
        (Some(h), None) => println!("{}", h),
        (None, _) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
    }
}
