//! RECDIFF - Recursive delta computation between same-typed records.
//!
//! This library compares two values of one record type field by field and
//! reports what changed as a [`Delta`]: a tree of additions, removals and
//! modifications keyed by field name or sequence index. Types opt in through
//! the [`Reflect`] trait, usually via the [`reflect_record!`] macro, and a
//! delta renders to JSON with [`Delta::to_json`] or [`Delta::to_json_pretty`].
//!
//! A few rules shape every comparison:
//!
//! - only externally visible fields participate; a record with none falls
//!   back to comparing its rendered text form
//! - sequences are compared by position, without alignment heuristics
//! - floats are equal within [`FLOAT_TOLERANCE`]
//! - string-keyed maps and opaque values are never compared
//! - fields can be excluded by name at every nesting level through
//!   [`EngineConfig`]
//!
//! # Example
//!
//! ```
//! use recdiff::{compare, reflect_record, EngineConfig};
//!
//! reflect_record! {
//!     #[derive(Debug, Clone)]
//!     pub struct Service {
//!         pub image: String,
//!         pub replicas: u32,
//!         pub command: Vec<String>,
//!     }
//! }
//!
//! # fn example() -> Result<(), recdiff::RecdiffError> {
//! let old = Service {
//!     image: "app:1.4".into(),
//!     replicas: 2,
//!     command: vec!["serve".into()],
//! };
//! let new = Service {
//!     image: "app:1.5".into(),
//!     replicas: 2,
//!     command: vec!["serve".into(), "--verbose".into()],
//! };
//!
//! let delta = compare(&old, &new, &EngineConfig::default())?;
//! assert_eq!(delta.len(), 2);
//! println!("{}", delta.to_json_pretty()?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod diff;
pub mod error;
pub mod output;
pub mod reflect;
pub mod value;

// Re-export commonly used types for convenience
pub use diff::{
    compare, compare_values, ChangeEntry, ChangeKind, Delta, EngineConfig, FLOAT_TOLERANCE,
};
pub use error::{EngineError, RecdiffError, RenderError};
pub use reflect::Reflect;
pub use value::{FieldValue, Kind, RecordValue, Value};
