// Catalog search/trending response handling

use filmlog_models::CatalogEntry;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Parse a catalog response into typed entries
///
/// Accepts a bare array or a paged `{"results": [...]}` object. Entries that
/// fail to deserialize or carry no usable id are skipped and logged.
pub fn parse_catalog_results(response: &Value) -> Vec<CatalogEntry> {
    let items = match response {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("results").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => {
                debug!("parse_catalog_results: object response without a results array");
                return Vec::new();
            }
        },
        _ => {
            debug!("parse_catalog_results: unexpected response shape");
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<CatalogEntry>(item.clone()) {
            Ok(entry) if entry.id > 0 => entries.push(entry),
            Ok(_) => {
                skipped += 1;
                debug!(index, "parse_catalog_results: skipping entry with no valid identifier");
            }
            Err(e) => {
                skipped += 1;
                debug!(index, error = %e, "parse_catalog_results: skipping malformed entry");
            }
        }
    }

    debug!(
        "parse_catalog_results: input_count={}, parsed={}, skipped={}",
        items.len(),
        entries.len(),
        skipped
    );

    entries
}

/// Remove repeated catalog ids, keeping the first occurrence and input order
///
/// Paginated trending/search responses overlap between pages.
pub fn dedupe_by_id(entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id)).collect()
}
