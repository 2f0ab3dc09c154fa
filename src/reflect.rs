//! Conversion of user types into the dynamic [`Value`] model.
//!
//! The engine compares [`Value`] trees, so every type that wants to be
//! compared provides a [`Reflect`] impl. Scalars, strings, options, boxes,
//! sequences and string-keyed maps are covered here; record types get their
//! impl from the [`reflect_record!`] macro, which also records per-field
//! visibility.
//!
//! ```
//! use recdiff::{reflect_record, Reflect, Value};
//!
//! reflect_record! {
//!     #[derive(Debug)]
//!     pub struct Peer {
//!         pub addr: String,
//!         pub port: u16,
//!     }
//! }
//!
//! let peer = Peer { addr: "10.0.0.1".into(), port: 7000 };
//! let Value::Record(rec) = peer.reflect() else { panic!("expected a record") };
//! assert_eq!(rec.short_name(), "Peer");
//! assert_eq!(rec.fields.len(), 2);
//! ```
//!
//! [`reflect_record!`]: crate::reflect_record

use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// Produces the dynamic view of `self` that the comparison engine walks.
///
/// Implementations must be pure: reflecting the same value twice yields the
/// same tree. The tree must also be finite; a hand-written impl over a
/// cyclic structure will recurse without terminating.
pub trait Reflect {
    fn reflect(&self) -> Value;
}

macro_rules! reflect_widened {
    ($variant:ident as $wide:ty => $($ty:ty),* $(,)?) => {
        $(impl Reflect for $ty {
            fn reflect(&self) -> Value {
                Value::$variant(*self as $wide)
            }
        })*
    };
}

reflect_widened!(Int as i64 => i8, i16, i32, i64, isize);
reflect_widened!(UInt as u64 => u8, u16, u32, u64, usize);
reflect_widened!(Float as f64 => f32, f64);

impl Reflect for bool {
    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Reflect for str {
    fn reflect(&self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

/// `None` and `Some` map onto the two optional states the engine
/// distinguishes; the payload is reflected recursively.
impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value {
        Value::Optional(self.as_ref().map(|inner| Box::new(inner.reflect())))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Value {
        Value::Seq(self.iter().map(|item| item.reflect()).collect())
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value {
        Value::Seq(self.iter().map(|item| item.reflect()).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Value {
        Value::Seq(self.iter().map(|item| item.reflect()).collect())
    }
}

impl<T: Reflect> Reflect for HashMap<String, T> {
    fn reflect(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.reflect()))
                .collect(),
        )
    }
}

impl<T: Reflect> Reflect for BTreeMap<String, T> {
    fn reflect(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.reflect()))
                .collect(),
        )
    }
}

/// Defines a struct and derives its [`Reflect`] impl in one go.
///
/// The struct body is emitted verbatim; alongside it the macro generates a
/// `Reflect` impl that reflects every field in declaration order and tags it
/// with its visibility: `pub` fields are visible, while private and
/// `pub(crate)`-style restricted fields are hidden and therefore skipped by
/// the comparison engine.
///
/// Every field type must itself implement [`Reflect`]. Named-field structs
/// only; generics are not supported.
///
/// ```
/// use recdiff::{compare, reflect_record, EngineConfig};
///
/// reflect_record! {
///     #[derive(Debug, Clone)]
///     pub struct Listener {
///         pub addr: String,
///         pub backlog: u32,
///         generation: u64,
///     }
/// }
///
/// let old = Listener { addr: "0.0.0.0:80".into(), backlog: 128, generation: 1 };
/// let new = Listener { addr: "0.0.0.0:80".into(), backlog: 256, generation: 2 };
///
/// let delta = compare(&old, &new, &EngineConfig::default()).unwrap();
/// // `generation` is private, so only `backlog` shows up.
/// assert_eq!(delta.len(), 1);
/// assert!(delta.get("backlog").is_some());
/// ```
#[macro_export]
macro_rules! reflect_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($fields:tt)*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fields)*
        }

        impl $crate::Reflect for $name {
            fn reflect(&self) -> $crate::Value {
                let mut fields = ::std::vec::Vec::new();
                $crate::reflect_record!(@fields self, fields, $($fields)*);
                $crate::Value::Record($crate::RecordValue::new(
                    ::std::any::type_name::<$name>(),
                    fields,
                ))
            }
        }
    };

    // Field munchers, one per visibility form. Attributes on fields only
    // matter for the emitted struct, so they are dropped here.
    (@fields $this:ident, $acc:ident,) => {};
    (@fields $this:ident, $acc:ident, #[$fmeta:meta] $($rest:tt)*) => {
        $crate::reflect_record!(@fields $this, $acc, $($rest)*);
    };
    (@fields $this:ident, $acc:ident, pub ($($restrict:tt)*) $field:ident : $ty:ty $(, $($rest:tt)*)?) => {
        $acc.push($crate::FieldValue::new(
            stringify!($field),
            false,
            $crate::Reflect::reflect(&$this.$field),
        ));
        $crate::reflect_record!(@fields $this, $acc, $($($rest)*)?);
    };
    (@fields $this:ident, $acc:ident, pub $field:ident : $ty:ty $(, $($rest:tt)*)?) => {
        $acc.push($crate::FieldValue::new(
            stringify!($field),
            true,
            $crate::Reflect::reflect(&$this.$field),
        ));
        $crate::reflect_record!(@fields $this, $acc, $($($rest)*)?);
    };
    (@fields $this:ident, $acc:ident, $field:ident : $ty:ty $(, $($rest:tt)*)?) => {
        $acc.push($crate::FieldValue::new(
            stringify!($field),
            false,
            $crate::Reflect::reflect(&$this.$field),
        ));
        $crate::reflect_record!(@fields $this, $acc, $($($rest)*)?);
    };
}
