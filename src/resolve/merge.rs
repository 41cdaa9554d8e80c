//! Map merge logic
//!
//! The manifest's map-valued fields (environment, tags) merge key-wise:
//! - Keys unique to either side are preserved
//! - Key collision: the overlay (function) value wins

use std::collections::BTreeMap;

/// Merge two string maps, overlay winning on key collisions.
pub fn merge_maps(
    base: &BTreeMap<String, String>,
    overlay: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_overlay_wins_on_collision() {
        let base = map(&[("TABLE_NAME", "tableName1")]);
        let overlay = map(&[("TABLE_NAME", "tableName2")]);
        let merged = merge_maps(&base, &overlay);

        assert_eq!(merged["TABLE_NAME"], "tableName2");
    }

    #[test]
    fn test_unique_keys_preserved() {
        let base = map(&[("SYSTEM_NAME", "mySystem"), ("TABLE_NAME", "tableName1")]);
        let overlay = map(&[("TABLE_NAME", "tableName2")]);
        let merged = merge_maps(&base, &overlay);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["SYSTEM_NAME"], "mySystem");
        assert_eq!(merged["TABLE_NAME"], "tableName2");
    }

    #[test]
    fn test_add_new_key() {
        let base = map(&[("A", "1")]);
        let overlay = map(&[("B", "2")]);
        let merged = merge_maps(&base, &overlay);

        assert_eq!(merged["A"], "1");
        assert_eq!(merged["B"], "2");
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let base = map(&[("A", "1"), ("B", "2")]);
        let merged = merge_maps(&base, &BTreeMap::new());

        assert_eq!(merged, base);
    }

    #[test]
    fn test_empty_base() {
        let overlay = map(&[("A", "1")]);
        let merged = merge_maps(&BTreeMap::new(), &overlay);

        assert_eq!(merged, overlay);
    }
}
