//! JSON rendering of deltas.
//!
//! A [`Delta`] renders to a JSON object that mirrors its structure: one key
//! per path segment, each mapped to an object with a `"type"` tag
//! (`"ADD"`, `"DEL"` or `"MOD"`) and the value keys that apply to that
//! change. Absent sides are omitted entirely, never written as `null`, so
//! the key set of a change object tells the reader which sides exist.
//! See [`Delta::to_json`] for a complete example.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

use crate::diff::{ChangeEntry, Delta};
use crate::error::RenderError;
use crate::value::Value;

impl Value {
    /// Converts this value to a `serde_json::Value`.
    ///
    /// Records become objects with every field included, hidden ones too;
    /// the rendered form is a full description of the value, not of its
    /// comparable surface. Absent optionals become `null`, present ones
    /// render as their payload. Numeric families are preserved: integers
    /// stay integers, floats stay floats.
    pub fn to_tree(&self) -> JsonValue {
        match self {
            Value::Int(n) => json!(*n),
            Value::UInt(n) => json!(*n),
            Value::Float(x) => json!(*x),
            Value::Bool(b) => json!(*b),
            Value::Str(s) => json!(s),
            Value::Record(rec) => {
                let obj: Map<String, JsonValue> = rec
                    .fields
                    .iter()
                    .map(|field| (field.name.to_owned(), field.value.to_tree()))
                    .collect();
                JsonValue::Object(obj)
            }
            Value::Seq(items) => JsonValue::Array(items.iter().map(Value::to_tree).collect()),
            Value::Map(entries) => {
                let obj: Map<String, JsonValue> = entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_tree()))
                    .collect();
                JsonValue::Object(obj)
            }
            Value::Optional(None) => JsonValue::Null,
            Value::Optional(Some(inner)) => inner.to_tree(),
            Value::Opaque(label) => json!(label),
        }
    }
}

impl ChangeEntry {
    /// Converts this change to its JSON object form.
    ///
    /// The `"type"` key always carries the wire tag of [`kind`]. The other
    /// keys depend on the change:
    ///
    /// - additions and removals carry `"value"`
    /// - modifications carry `"old_value"` and `"new_value"`
    /// - optional transitions carry only the side that exists
    /// - nested deltas carry the rendered sub-delta under `"value"`
    ///
    /// [`kind`]: ChangeEntry::kind
    pub fn to_tree(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("type".to_owned(), json!(self.kind().as_str()));
        match self {
            ChangeEntry::Added { value } | ChangeEntry::Removed { value } => {
                obj.insert("value".to_owned(), value.to_tree());
            }
            ChangeEntry::Modified { old, new } => {
                obj.insert("old_value".to_owned(), old.to_tree());
                obj.insert("new_value".to_owned(), new.to_tree());
            }
            ChangeEntry::BecamePresent { new } => {
                obj.insert("new_value".to_owned(), new.to_tree());
            }
            ChangeEntry::BecameAbsent { old } => {
                obj.insert("old_value".to_owned(), old.to_tree());
            }
            ChangeEntry::Nested { changes } => {
                obj.insert("value".to_owned(), changes.to_tree());
            }
        }
        JsonValue::Object(obj)
    }
}

impl Delta {
    /// Converts this delta to a `serde_json::Value` tree.
    ///
    /// An empty delta renders as an empty object.
    pub fn to_tree(&self) -> JsonValue {
        let obj: Map<String, JsonValue> = self
            .iter()
            .map(|(segment, entry)| (segment.clone(), entry.to_tree()))
            .collect();
        JsonValue::Object(obj)
    }

    /// Renders this delta as a compact JSON string.
    ///
    /// # Examples
    ///
    /// ```
    /// use recdiff::{compare, reflect_record, EngineConfig};
    ///
    /// reflect_record! {
    ///     pub struct Build {
    ///         pub number: u64,
    ///     }
    /// }
    ///
    /// let old = Build { number: 7 };
    /// let new = Build { number: 8 };
    /// let delta = compare(&old, &new, &EngineConfig::default()).unwrap();
    ///
    /// assert_eq!(
    ///     delta.to_json().unwrap(),
    ///     r#"{"number":{"new_value":8,"old_value":7,"type":"MOD"}}"#
    /// );
    /// ```
    pub fn to_json(&self) -> Result<String, RenderError> {
        serde_json::to_string(&self.to_tree()).map_err(RenderError::json_serialization)
    }

    /// Renders this delta as an indented JSON string.
    pub fn to_json_pretty(&self) -> Result<String, RenderError> {
        serde_json::to_string_pretty(&self.to_tree()).map_err(RenderError::json_serialization)
    }
}

/// Serializes as the same tree [`Delta::to_tree`] produces, so deltas can be
/// embedded in larger serde documents.
impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tree().serialize(serializer)
    }
}

impl Serialize for ChangeEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tree().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldValue, RecordValue};

    #[test]
    fn test_added_renders_value_only() {
        let entry = ChangeEntry::Added {
            value: Value::Int(5),
        };
        assert_eq!(entry.to_tree(), json!({ "type": "ADD", "value": 5 }));
    }

    #[test]
    fn test_removed_renders_value_only() {
        let entry = ChangeEntry::Removed {
            value: Value::Str("gone".into()),
        };
        assert_eq!(entry.to_tree(), json!({ "type": "DEL", "value": "gone" }));
    }

    #[test]
    fn test_modified_renders_both_sides() {
        let entry = ChangeEntry::Modified {
            old: Value::Float(53.032),
            new: Value::Float(53.042),
        };
        assert_eq!(
            entry.to_tree(),
            json!({ "type": "MOD", "old_value": 53.032, "new_value": 53.042 })
        );
    }

    #[test]
    fn test_optional_transition_omits_absent_side() {
        let entry = ChangeEntry::BecamePresent {
            new: Value::UInt(9),
        };
        let tree = entry.to_tree();
        assert_eq!(tree, json!({ "type": "MOD", "new_value": 9 }));
        // The absent side must be missing, not null.
        assert!(tree.get("old_value").is_none());

        let entry = ChangeEntry::BecameAbsent {
            old: Value::UInt(9),
        };
        let tree = entry.to_tree();
        assert_eq!(tree, json!({ "type": "MOD", "old_value": 9 }));
        assert!(tree.get("new_value").is_none());
    }

    #[test]
    fn test_integers_keep_their_family() {
        assert_eq!(Value::Int(i64::MAX).to_tree(), json!(9223372036854775807i64));
        assert_eq!(
            Value::UInt(u64::MAX).to_tree(),
            json!(18446744073709551615u64)
        );
        assert_eq!(Value::Float(2.0).to_tree(), json!(2.0));
    }

    #[test]
    fn test_record_renders_all_fields() {
        let value = Value::Record(RecordValue::new(
            "tests::Creds",
            vec![
                FieldValue::new("user", true, Value::Str("svc".into())),
                FieldValue::new("token", false, Value::Str("t0".into())),
            ],
        ));
        assert_eq!(value.to_tree(), json!({ "user": "svc", "token": "t0" }));
    }

    #[test]
    fn test_optional_values_render_as_null_or_payload() {
        assert_eq!(Value::Optional(None).to_tree(), JsonValue::Null);
        assert_eq!(
            Value::Optional(Some(Box::new(Value::Int(3)))).to_tree(),
            json!(3)
        );
    }

    #[test]
    fn test_empty_delta_renders_empty_object() {
        let delta = Delta::new();
        assert_eq!(delta.to_tree(), json!({}));
        assert_eq!(delta.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_serialize_delegates_to_tree() {
        let entry = ChangeEntry::Modified {
            old: Value::Int(1),
            new: Value::Int(2),
        };
        let serialized: JsonValue = serde_json::to_value(&entry).unwrap();
        assert_eq!(serialized, entry.to_tree());
    }
}
