use crate::foundation::ids::EntityKind;

/// Convenience result type used across the crate.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy.
///
/// Every variant is fatal: a failed build never hands out a partially populated graph, and a
/// failed frame aborts that frame's traversal. Recoverable conditions are reported as
/// [`crate::Warning`] values instead.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Missing, misplaced or structurally invalid mandatory block.
    #[error("malformed declaration: {0}")]
    Malformed(String),

    /// An id was declared twice for the same entity kind.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Kind of entity whose table rejected the id.
        kind: EntityKind,
        /// Offending id.
        id: String,
    },

    /// A reference names an entity that does not exist.
    #[error("unresolved {kind} reference '{id}' (in {from})")]
    UnresolvedReference {
        /// Kind of entity the reference points at.
        kind: EntityKind,
        /// Referenced id.
        id: String,
        /// Where the reference was found.
        from: String,
    },

    /// A numeric constraint (ordering, positivity) was violated.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// A value outside a closed set (axis letter, boolean literal).
    #[error("invalid enum value: {0}")]
    InvalidEnum(String),

    /// Invalid animation construction parameters.
    #[error("animation error: {0}")]
    Animation(String),

    /// Render traversal invariant violated. Indicates the validator and the traversal disagree.
    #[error("traversal error: {0}")]
    Traversal(String),

    /// Errors when decoding declaration or options documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Malformed`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Build a [`SceneError::DuplicateId`] value.
    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Build a [`SceneError::UnresolvedReference`] value.
    pub fn unresolved(kind: EntityKind, id: impl Into<String>, from: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            id: id.into(),
            from: from.into(),
        }
    }

    /// Build a [`SceneError::OutOfRange`] value.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Build a [`SceneError::InvalidEnum`] value.
    pub fn invalid_enum(msg: impl Into<String>) -> Self {
        Self::InvalidEnum(msg.into())
    }

    /// Build a [`SceneError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`SceneError::Traversal`] value.
    pub fn traversal(msg: impl Into<String>) -> Self {
        Self::Traversal(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
