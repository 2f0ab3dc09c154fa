//! Core comparison engine.
//!
//! [`compare`] takes two values of the same record type and produces a
//! [`Delta`]: a map from path segment (field name or sequence index) to the
//! change observed at that position. An empty delta means no observable
//! difference.
//!
//! Sequences are compared positionally: index `i` of the old value against
//! index `i` of the new one, with the surplus tail of the longer side
//! reported as pure additions or removals. An element inserted in the middle
//! therefore shows up as a run of modifications plus a trailing addition,
//! not as a single insert. That is the intended trade-off; there is no
//! alignment heuristic.
//!
//! # Examples
//!
//! ```
//! use recdiff::{compare, reflect_record, EngineConfig};
//!
//! reflect_record! {
//!     #[derive(Debug, Clone)]
//!     pub struct Replica {
//!         pub host: String,
//!         pub lag_ms: u64,
//!     }
//! }
//!
//! let old = Replica { host: "db-1".into(), lag_ms: 12 };
//! let new = Replica { host: "db-1".into(), lag_ms: 480 };
//!
//! let delta = compare(&old, &new, &EngineConfig::default()).unwrap();
//! assert_eq!(delta.len(), 1);
//! assert!(delta.get("lag_ms").is_some());
//! ```

use std::collections::{btree_map, BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::EngineError;
use crate::reflect::Reflect;
use crate::value::{RecordValue, Value};

/// Absolute difference below which two floats count as equal.
///
/// The comparison is `(old - new).abs() > FLOAT_TOLERANCE`, so swapping the
/// inputs can never change whether two floats compare equal.
pub const FLOAT_TOLERANCE: f64 = 1e-6;

/// Comparison settings, built with a fluent API.
///
/// # Examples
///
/// ```
/// use recdiff::EngineConfig;
///
/// let config = EngineConfig::new()
///     .exclude("updated_at")
///     .exclude("revision");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Field names to skip wherever they appear, at any nesting level.
    /// Sequence indices are never matched against this set.
    pub excluded: HashSet<String>,
    /// Reserved recursion limit. The current engine does not enforce it;
    /// recursion is bounded by the reflected value, which is always finite.
    pub max_depth: Option<usize>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes one field name from comparison at every nesting level.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Excludes several field names at once.
    pub fn exclude_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }
}

/// The three kinds of change a delta can report.
///
/// Serialized as the wire tags `"ADD"`, `"DEL"` and `"MOD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The position exists only in the new value.
    #[serde(rename = "ADD")]
    Added,
    /// The position exists only in the old value.
    #[serde(rename = "DEL")]
    Removed,
    /// The position exists on both sides with different values.
    #[serde(rename = "MOD")]
    Modified,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "ADD",
            ChangeKind::Removed => "DEL",
            ChangeKind::Modified => "MOD",
        }
    }
}

/// One observed change.
///
/// Each variant carries exactly the payload that is meaningful for it: an
/// addition has no old value to report, a removal no new one, and a nested
/// delta stands in for both. [`BecamePresent`](ChangeEntry::BecamePresent)
/// and [`BecameAbsent`](ChangeEntry::BecameAbsent) cover optional values
/// flipping state; on the wire they are modifications with one side omitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEntry {
    /// The position exists only in the new value.
    Added { value: Value },
    /// The position exists only in the old value.
    Removed { value: Value },
    /// A leaf changed; both sides are reported in full.
    Modified { old: Value, new: Value },
    /// An optional value went from absent to present.
    BecamePresent { new: Value },
    /// An optional value went from present to absent.
    BecameAbsent { old: Value },
    /// A record or sequence changed somewhere inside; the payload locates
    /// the changes precisely.
    Nested { changes: Delta },
}

impl ChangeEntry {
    /// The wire-level kind of this entry. Everything that is neither a pure
    /// addition nor a pure removal counts as a modification.
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEntry::Added { .. } => ChangeKind::Added,
            ChangeEntry::Removed { .. } => ChangeKind::Removed,
            ChangeEntry::Modified { .. }
            | ChangeEntry::BecamePresent { .. }
            | ChangeEntry::BecameAbsent { .. }
            | ChangeEntry::Nested { .. } => ChangeKind::Modified,
        }
    }
}

/// The result of a comparison: path segments mapped to the change observed
/// there.
///
/// Keys are field names for records and decimal indices for sequences.
/// Entries are kept sorted by key, so iteration and rendering are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    entries: BTreeMap<String, ChangeEntry>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the comparison found no observable difference.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changes at this level. A nested delta counts as one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The change recorded under a path segment, if any.
    pub fn get(&self, segment: &str) -> Option<&ChangeEntry> {
        self.entries.get(segment)
    }

    /// Iterates over `(segment, entry)` pairs in sorted segment order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ChangeEntry> {
        self.entries.iter()
    }

    /// Counts the entries of one kind at this level.
    ///
    /// # Examples
    ///
    /// ```
    /// use recdiff::{compare, reflect_record, ChangeEntry, ChangeKind, EngineConfig};
    ///
    /// reflect_record! {
    ///     pub struct Shelf {
    ///         pub slots: Vec<i32>,
    ///     }
    /// }
    ///
    /// let old = Shelf { slots: vec![1, 3, 4] };
    /// let new = Shelf { slots: vec![1, 2, 4, 5] };
    /// let delta = compare(&old, &new, &EngineConfig::default()).unwrap();
    ///
    /// let ChangeEntry::Nested { changes } = delta.get("slots").unwrap() else {
    ///     panic!("expected a nested delta");
    /// };
    /// assert_eq!(changes.count(ChangeKind::Modified), 1);
    /// assert_eq!(changes.count(ChangeKind::Added), 1);
    /// ```
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.kind() == kind)
            .count()
    }

    fn insert(&mut self, segment: String, entry: ChangeEntry) {
        self.entries.insert(segment, entry);
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = (&'a String, &'a ChangeEntry);
    type IntoIter = btree_map::Iter<'a, String, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Compares two values of the same record type.
///
/// This is the main entry point. Both values are reflected into the dynamic
/// model and handed to [`compare_values`].
///
/// # Arguments
///
/// * `old` - The earlier value
/// * `new` - The later value
/// * `config` - Exclusions and other comparison settings
///
/// # Returns
///
/// Returns the [`Delta`] between the two values, empty when they do not
/// observably differ, or an [`EngineError`] when the inputs are not
/// comparable records.
///
/// # Examples
///
/// ```
/// use recdiff::{compare, reflect_record, EngineConfig};
///
/// reflect_record! {
///     #[derive(Debug, Clone)]
///     pub struct Quota {
///         pub limit: u64,
///         pub used: u64,
///     }
/// }
///
/// let old = Quota { limit: 100, used: 20 };
/// let new = Quota { limit: 100, used: 95 };
///
/// let delta = compare(&old, &new, &EngineConfig::default()).unwrap();
/// assert_eq!(delta.len(), 1);
/// ```
pub fn compare<T: Reflect>(old: &T, new: &T, config: &EngineConfig) -> Result<Delta, EngineError> {
    compare_values(&old.reflect(), &new.reflect(), config)
}

/// Compares two already-reflected values.
///
/// This is the dynamically typed entry point behind [`compare`]. Both inputs
/// must be records of the same type; anything else is rejected with
/// [`EngineError::TypeMismatch`] or [`EngineError::NotARecord`] before any
/// field is looked at.
pub fn compare_values(
    old: &Value,
    new: &Value,
    config: &EngineConfig,
) -> Result<Delta, EngineError> {
    let (old_rec, new_rec) = match (old, new) {
        (Value::Record(old_rec), Value::Record(new_rec)) => {
            if old_rec.type_name != new_rec.type_name {
                return Err(EngineError::type_mismatch(
                    old_rec.type_name,
                    new_rec.type_name,
                ));
            }
            (old_rec, new_rec)
        }
        _ => {
            if old.kind() != new.kind() {
                return Err(EngineError::type_mismatch(
                    old.kind().name(),
                    new.kind().name(),
                ));
            }
            return Err(EngineError::not_a_record(old.kind().name()));
        }
    };

    let mut delta = Delta::new();
    if old_rec.is_fully_hidden() {
        trace!(
            type_name = old_rec.type_name,
            "record has no visible fields, comparing rendered form"
        );
        if old.to_string() != new.to_string() {
            delta.insert(
                old_rec.short_name().to_owned(),
                ChangeEntry::Modified {
                    old: old.clone(),
                    new: new.clone(),
                },
            );
        }
    } else {
        diff_record_fields(old_rec, new_rec, &mut delta, config);
    }

    debug!(
        type_name = old_rec.type_name,
        entries = delta.len(),
        "record delta computed"
    );
    Ok(delta)
}

/// Walks the visible fields of two same-typed records and records every
/// observed change into `delta`, keyed by field name.
fn diff_record_fields(
    old: &RecordValue,
    new: &RecordValue,
    delta: &mut Delta,
    config: &EngineConfig,
) {
    for field in old.visible_fields() {
        if config.is_excluded(field.name) {
            trace!(field = field.name, "field excluded from comparison");
            continue;
        }
        // Both records reflect the same type, so this lookup only misses
        // when a hand-written Reflect impl disagrees with itself.
        let Some(counterpart) = new.field(field.name) else {
            continue;
        };
        if let Some(entry) = compare_value(&field.value, &counterpart.value, config) {
            delta.insert(field.name.to_owned(), entry);
        }
    }
}

/// Compares one pair of values below the root and reports the change at
/// that position, if there is one to report.
fn compare_value(old: &Value, new: &Value, config: &EngineConfig) -> Option<ChangeEntry> {
    match (old, new) {
        (Value::Record(old_rec), Value::Record(new_rec)) => {
            if old_rec.is_fully_hidden() {
                if old.to_string() != new.to_string() {
                    return Some(modified(old, new));
                }
                return None;
            }
            let mut changes = Delta::new();
            diff_record_fields(old_rec, new_rec, &mut changes, config);
            if changes.is_empty() {
                None
            } else {
                Some(ChangeEntry::Nested { changes })
            }
        }
        (Value::Seq(old_items), Value::Seq(new_items)) => {
            compare_seqs(old_items, new_items, config)
        }
        // Associative containers have no stable notion of position, so they
        // are reported as equal whatever their contents.
        (Value::Map(_), Value::Map(_)) => None,
        (Value::Optional(old_opt), Value::Optional(new_opt)) => match (old_opt, new_opt) {
            (None, None) => None,
            (None, Some(new_inner)) => Some(ChangeEntry::BecamePresent {
                new: (**new_inner).clone(),
            }),
            (Some(old_inner), None) => Some(ChangeEntry::BecameAbsent {
                old: (**old_inner).clone(),
            }),
            (Some(old_inner), Some(new_inner)) => compare_value(old_inner, new_inner, config),
        },
        (Value::Int(old_n), Value::Int(new_n)) => (old_n != new_n).then(|| modified(old, new)),
        (Value::UInt(old_n), Value::UInt(new_n)) => (old_n != new_n).then(|| modified(old, new)),
        (Value::Float(old_x), Value::Float(new_x)) => {
            ((old_x - new_x).abs() > FLOAT_TOLERANCE).then(|| modified(old, new))
        }
        (Value::Bool(old_b), Value::Bool(new_b)) => (old_b != new_b).then(|| modified(old, new)),
        (Value::Str(old_s), Value::Str(new_s)) => (old_s != new_s).then(|| modified(old, new)),
        (Value::Opaque(_), _) | (_, Value::Opaque(_)) => None,
        // Mismatched kinds below the root. Reflecting a shared type never
        // produces this; hand-built values get a plain modification.
        _ => Some(modified(old, new)),
    }
}

/// Compares two sequences index by index.
///
/// Positions present on both sides are compared recursively; the surplus
/// tail of the longer side becomes additions or removals. Two empty
/// sequences produce no entry at all.
fn compare_seqs(old: &[Value], new: &[Value], config: &EngineConfig) -> Option<ChangeEntry> {
    if old.is_empty() && new.is_empty() {
        return None;
    }

    let mut changes = Delta::new();
    if old.is_empty() {
        for (index, item) in new.iter().enumerate() {
            changes.insert(
                index.to_string(),
                ChangeEntry::Added {
                    value: item.clone(),
                },
            );
        }
    } else if new.is_empty() {
        for (index, item) in old.iter().enumerate() {
            changes.insert(
                index.to_string(),
                ChangeEntry::Removed {
                    value: item.clone(),
                },
            );
        }
    } else {
        let shared = old.len().min(new.len());
        for index in 0..shared {
            if let Some(entry) = compare_value(&old[index], &new[index], config) {
                changes.insert(index.to_string(), entry);
            }
        }
        for (index, item) in old.iter().enumerate().skip(shared) {
            changes.insert(
                index.to_string(),
                ChangeEntry::Removed {
                    value: item.clone(),
                },
            );
        }
        for (index, item) in new.iter().enumerate().skip(shared) {
            changes.insert(
                index.to_string(),
                ChangeEntry::Added {
                    value: item.clone(),
                },
            );
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(ChangeEntry::Nested { changes })
    }
}

fn modified(old: &Value, new: &Value) -> ChangeEntry {
    ChangeEntry::Modified {
        old: old.clone(),
        new: new.clone(),
    }
}
