//! Custom error types for RECDIFF.

/// Errors the comparison engine can report about its inputs.
///
/// These are the only ways a comparison can fail; every pair of valid
/// same-typed records produces a delta, possibly empty.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("input values do not share the same type: {old} vs {new}")]
    TypeMismatch {
        old: &'static str,
        new: &'static str,
    },

    #[error("input values are not records: {kind}")]
    NotARecord { kind: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to serialize delta to JSON: {source}")]
    JsonSerialization {
        #[source]
        source: serde_json::Error,
    },
}

/// Umbrella error for callers that drive comparison and rendering through
/// one `Result` type.
#[derive(Debug, thiserror::Error)]
pub enum RecdiffError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl EngineError {
    pub fn type_mismatch(old: &'static str, new: &'static str) -> Self {
        Self::TypeMismatch { old, new }
    }

    pub fn not_a_record(kind: &'static str) -> Self {
        Self::NotARecord { kind }
    }
}

impl RenderError {
    pub fn json_serialization(source: serde_json::Error) -> Self {
        Self::JsonSerialization { source }
    }
}
