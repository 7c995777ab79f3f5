// Lenient accessors over backend JSON records

use serde_json::Value;

/// Nested movie object, if `movie` holds one
pub fn movie_object(record: &Value) -> Option<&Value> {
    record.get("movie").filter(|m| m.is_object())
}

/// First value among `keys` on the record that is neither null nor a blank string
pub fn first_field<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|v| is_present(v))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// First present value among `keys`, on the record first, then on its nested movie
pub fn first_field_or_movie<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    first_field(record, keys).or_else(|| movie_object(record).and_then(|m| first_field(m, keys)))
}

/// Coerce a JSON scalar to a number the way a loose numeric cast would
///
/// Numbers pass through; strings are trimmed and parsed; everything else
/// (and blank strings) yields None.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Non-blank string content of a value
pub fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}
