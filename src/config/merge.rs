//! Field-by-field merging of configuration tiers.
//!
//! Objects merge recursively; every other value in a higher tier replaces the
//! lower one. A `null` in a higher tier means "not specified" and leaves the
//! lower value in place.

use serde_json::Value;

/// Merge `overlay` onto `base`, `overlay` winning.
///
/// ```
/// use serde_json::json;
/// use treehouse_dashboard::config::deep_merge;
///
/// let base = json!({"server": {"host": "127.0.0.1", "port": 8050}});
/// let overlay = json!({"server": {"port": 9000}});
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({"server": {"host": "127.0.0.1", "port": 9000}})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later tiers winning.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_sections_merge_key_by_key() {
        let base = json!({
            "database": {"path": "treehouse.db", "busy_timeout_ms": 5000},
            "server": {"port": 8050}
        });
        let overlay = json!({"database": {"path": "/srv/reporting.db"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "database": {"path": "/srv/reporting.db", "busy_timeout_ms": 5000},
                "server": {"port": 8050}
            })
        );
    }

    #[test]
    fn null_leaves_lower_tier_value() {
        let base = json!({"dashboard": {"window_days": 14}});
        let overlay = json!({"dashboard": {"window_days": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
    }

    #[test]
    fn arrays_and_scalars_are_replaced() {
        let base = json!({"hosts": ["a", "b"], "port": {"nested": true}});
        let overlay = json!({"hosts": ["c"], "port": 9000});
        assert_eq!(deep_merge(base, overlay), json!({"hosts": ["c"], "port": 9000}));
    }

    #[test]
    fn merge_all_applies_tiers_in_order() {
        let tiers = vec![
            json!({"server": {"port": 8050, "host": "127.0.0.1"}}),
            json!({"server": {"port": 8080}}),
            json!({"server": {"port": 9090}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"server": {"port": 9090, "host": "127.0.0.1"}})
        );
    }
}
