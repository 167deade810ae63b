//! Error types for the chain-state codec.

/// Errors produced while encoding or decoding persisted chain state.
///
/// Each variant is a distinct failure kind with its own recovery
/// contract; callers are expected to match on the kind, not the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input buffer is truncated, out of range, or structurally
    /// invalid. `offset` is the number of bytes consumed up to the
    /// failure. The whole record must be treated as untrustworthy.
    #[error("malformed data at offset {offset}: {reason}")]
    Deserialize { reason: String, offset: usize },

    /// Previously-trusted persisted state failed to parse; the store
    /// itself is damaged.
    #[error("corrupted chain state: {0}")]
    Corruption(String),

    /// Caller-supplied data disagrees with the record being decoded, or a
    /// decoded value violates an internal invariant. A contract
    /// violation, not data corruption; fatal to the operation in
    /// progress.
    #[error("assertion failed: {0}")]
    Assert(String),

    /// The requested record does not exist in the DAG.
    #[error("{0}")]
    NotInDag(String),
}

impl Error {
    pub fn deserialize(reason: impl Into<String>, offset: usize) -> Self {
        Self::Deserialize {
            reason: reason.into(),
            offset,
        }
    }

    pub fn corruption(reason: impl Into<String>) -> Self {
        Self::Corruption(reason.into())
    }

    pub fn assertion(reason: impl Into<String>) -> Self {
        Self::Assert(reason.into())
    }

    pub fn not_in_dag(reason: impl Into<String>) -> Self {
        Self::NotInDag(reason.into())
    }

    /// Whether this is the malformed-input kind.
    pub fn is_deserialize_err(&self) -> bool {
        matches!(self, Self::Deserialize { .. })
    }

    /// Whether this is the storage-corruption kind.
    pub fn is_corruption_err(&self) -> bool {
        matches!(self, Self::Corruption(_))
    }

    /// Whether this is the internal-invariant kind.
    pub fn is_assert_err(&self) -> bool {
        matches!(self, Self::Assert(_))
    }

    /// Whether this is the not-found kind.
    pub fn is_not_in_dag_err(&self) -> bool {
        matches!(self, Self::NotInDag(_))
    }

    /// Bytes consumed before a malformed-input failure, if applicable.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Deserialize { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Rebases a malformed-input offset by `base` bytes already consumed
    /// by the caller. Other kinds pass through unchanged.
    pub(crate) fn at_offset(self, base: usize) -> Self {
        match self {
            Self::Deserialize { reason, offset } => Self::Deserialize {
                reason,
                offset: offset + base,
            },
            other => other,
        }
    }
}
