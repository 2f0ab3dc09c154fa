//! Dynamic value model for record comparison.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed view of one value, as produced by [`Reflect`].
///
/// The comparison engine never sees user types directly; it walks two `Value`
/// trees. Each variant corresponds to one kind the engine knows how to
/// compare, or knows it must leave alone.
///
/// [`Reflect`]: crate::Reflect
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integers of any width, widened.
    Int(i64),
    /// Unsigned integers of any width, widened.
    UInt(u64),
    /// `f32` or `f64`, widened. Compared within [`FLOAT_TOLERANCE`].
    ///
    /// [`FLOAT_TOLERANCE`]: crate::FLOAT_TOLERANCE
    Float(f64),
    Bool(bool),
    Str(String),
    /// A named record with ordered, visibility-tagged fields.
    Record(RecordValue),
    /// A positional sequence.
    Seq(Vec<Value>),
    /// A string-keyed associative container. Rendered, never compared.
    Map(BTreeMap<String, Value>),
    /// An optional or indirect reference.
    Optional(Option<Box<Value>>),
    /// A value that cannot be introspected (closures, channels, handles).
    /// The payload is a display label. Always treated as equal.
    Opaque(String),
}

/// The comparison kind of a [`Value`], used in diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    UInt,
    Float,
    Bool,
    Str,
    Record,
    Seq,
    Map,
    Optional,
    Opaque,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "integer",
            Kind::UInt => "unsigned integer",
            Kind::Float => "float",
            Kind::Bool => "boolean",
            Kind::Str => "string",
            Kind::Record => "record",
            Kind::Seq => "sequence",
            Kind::Map => "map",
            Kind::Optional => "optional",
            Kind::Opaque => "opaque",
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::UInt(_) => Kind::UInt,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Str(_) => Kind::Str,
            Value::Record(_) => Kind::Record,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Optional(_) => Kind::Optional,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Shorthand for building an [`Opaque`](Value::Opaque) value from a label.
    pub fn opaque(label: impl Into<String>) -> Self {
        Value::Opaque(label.into())
    }
}

/// A record value: the type's name plus its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    /// Fully qualified type name, used for type-identity checks.
    pub type_name: &'static str,
    pub fields: Vec<FieldValue>,
}

impl RecordValue {
    pub fn new(type_name: &'static str, fields: Vec<FieldValue>) -> Self {
        Self { type_name, fields }
    }

    /// The last path segment of the type name (`a::b::Server` -> `Server`).
    pub fn short_name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Iterates over the externally visible fields only.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().filter(|field| field.visible)
    }

    /// True when no field is externally visible. Such records can only be
    /// compared through their rendered form.
    pub fn is_fully_hidden(&self) -> bool {
        self.fields.iter().all(|field| !field.visible)
    }
}

/// One named field inside a [`RecordValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: &'static str,
    /// Whether the field is part of the type's public surface. Hidden fields
    /// are skipped during comparison.
    pub visible: bool,
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: &'static str, visible: bool, value: Value) -> Self {
        Self {
            name,
            visible,
            value,
        }
    }
}

/// Canonical text rendering, deterministic for a given value.
///
/// This is the form the engine compares when a record exposes no visible
/// fields. Records render all fields, hidden included.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Record(rec) => {
                if rec.fields.is_empty() {
                    return write!(f, "{} {{}}", rec.short_name());
                }
                write!(f, "{} {{ ", rec.short_name())?;
                for (i, field) in rec.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                write!(f, " }}")
            }
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Optional(None) => write!(f, "none"),
            Value::Optional(Some(inner)) => write!(f, "{inner}"),
            Value::Opaque(label) => write!(f, "{label}"),
        }
    }
}
