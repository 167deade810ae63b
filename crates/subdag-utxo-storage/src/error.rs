//! Error types for UTXO storage.

use crate::store::StoreError;
use subdag_primitives::{Hash, OutPoint};

/// Errors that can occur during UTXO storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backing store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Chain-state codec error.
    #[error("codec error: {0}")]
    Codec(#[from] subdag_chainio::Error),

    /// UTXO not found when trying to spend.
    #[error("UTXO not found: {0}")]
    UtxoNotFound(OutPoint),

    /// Block spend journal not found.
    #[error("spend journal not found for block {0}")]
    UndoNotFound(Hash),

    /// Caller-supplied block data is internally inconsistent.
    #[error("inconsistent block data: {0}")]
    InconsistentBlock(String),
}
