//! Column diffing between a source table and a warehouse destination

use std::collections::{BTreeMap, HashSet};

/// Column type given to destination columns created by a sync
pub const PLACEHOLDER_COLUMN_TYPE: &str = "STRING";

/// Columns present in `source` but absent from `destination`
///
/// Names are compared case-insensitively and returned with the source's
/// spelling, sorted case-insensitively, without duplicates.
pub fn missing_columns<S, D>(source: &[S], destination: &[D]) -> Vec<String>
where
    S: AsRef<str>,
    D: AsRef<str>,
{
    let existing: HashSet<String> = destination
        .iter()
        .map(|c| c.as_ref().to_uppercase())
        .collect();

    let mut missing = BTreeMap::new();
    for column in source {
        let key = column.as_ref().to_uppercase();
        if !existing.contains(&key) {
            missing
                .entry(key)
                .or_insert_with(|| column.as_ref().to_string());
        }
    }

    missing.into_values().collect()
}
