//! Deep merge of configuration layers
//!
//! Merge semantics:
//! - Mappings: deep-merge by key (recursive)
//! - Sequences: REPLACE wholesale, never concatenate
//! - Scalars: the higher-precedence layer wins
//!
//! Defaults never overwrite an explicitly supplied application value at any
//! key path.

use serde_json::Value;

/// Merge `overlay` over `base`, returning the combined value.
///
/// Keys present only in `base` are kept; keys present in `overlay` win,
/// recursively for nested mappings. Sequences and scalars from `overlay`
/// replace the base value wholesale.
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

        // sequences are replaced, not concatenated
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        (_, overlay) => overlay,
    }
}

/// Fold an ordered layer list; the first layer is the base, later layers
/// take precedence.
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
