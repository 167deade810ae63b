//! UTXO set, spend-journal and tip-set storage for the subdag node.
//!
//! This crate is the thin layer between the chain-state codec and a
//! transactional key-value store:
//!
//! - **UTXO entries**: one record per unspent output, written on create,
//!   deleted on spend, never updated.
//! - **Spend journals**: per-block undo data written on connect and
//!   consumed on disconnect to roll the block's ledger effect back out.
//! - **Tip set**: the current childless blocks, rewritten on every tip
//!   change.
//!
//! The production store is an external collaborator reached through the
//! [`KeyValueStore`] trait; [`MemoryStore`] is the in-process
//! implementation used by tests.

mod error;
mod storage;
mod store;

pub use error::Error;
pub use storage::ChainStore;
pub use store::{KeyValueStore, MemoryStore, StoreError};

use subdag_primitives::{HASH_SIZE, OutPoint};

/// Result type for UTXO storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Store namespaces.
pub mod ns {
    /// UTXO entries.
    /// Key: outpoint (txid || index) = 36 bytes.
    /// Value: serialized ledger entry.
    pub const UTXOS: &str = "utxos";

    /// Block spend journals.
    /// Key: block hash.
    /// Value: serialized spend journal.
    pub const UNDO: &str = "undo";

    /// Metadata.
    /// Keys: see [`crate::meta_keys`].
    pub const META: &str = "meta";
}

/// Metadata keys.
pub mod meta_keys {
    pub const TIPS: &[u8] = b"tips";
}

/// Width of a UTXO storage key in bytes.
pub const OUTPOINT_KEY_SIZE: usize = HASH_SIZE + 4;

/// Convert an outpoint to its storage key.
///
/// Format: txid (32 bytes, natural order) || index (4 bytes, little-endian)
pub fn outpoint_to_key(outpoint: &OutPoint) -> [u8; OUTPOINT_KEY_SIZE] {
    let mut key = [0u8; OUTPOINT_KEY_SIZE];
    key[..HASH_SIZE].copy_from_slice(outpoint.txid.as_bytes());
    key[HASH_SIZE..].copy_from_slice(&outpoint.index.to_le_bytes());
    key
}

/// Parse a storage key back to an outpoint.
pub fn key_to_outpoint(key: &[u8; OUTPOINT_KEY_SIZE]) -> OutPoint {
    let mut txid = [0u8; HASH_SIZE];
    txid.copy_from_slice(&key[..HASH_SIZE]);
    let index = u32::from_le_bytes(key[HASH_SIZE..].try_into().expect("key width is fixed"));
    OutPoint {
        txid: subdag_primitives::Hash::from_bytes(txid),
        index,
    }
}
