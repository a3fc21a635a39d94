//! Response normalization applied uniformly to every source.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Extracts the record array from a response.
///
/// A response is either a bare array or an envelope object whose `data`
/// field is an array. Anything else yields an empty list.
pub fn normalize_response(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Normalizes a response and decodes each record, skipping undecodable ones.
pub fn decode_records<T: DeserializeOwned>(source_name: &str, response: Value) -> Vec<T> {
    let items = normalize_response(response);
    let total = items.len();

    let records: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(source = source_name, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect();

    if records.len() != total {
        debug!(
            source = source_name,
            kept = records.len(),
            total = total,
            "Some records were skipped during decoding"
        );
    }

    records
}
