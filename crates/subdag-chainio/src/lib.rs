//! Persisted chain-state codec for the subdag node.
//!
//! This crate owns every byte format the ledger writes to, and reads back
//! from, the transactional key-value store:
//!
//! - **Unspent-output entries**: `VLQ(header) || VLQ(compressed amount) ||
//!   compressed script`, where the header code packs the creation height
//!   with the coinbase flag in its lowest bit.
//! - **Spend journals**: per-block concatenation of the consumed outputs
//!   in reverse transaction/input order, with per-transaction header-code
//!   deduplication, enabling sequential decode during block disconnect.
//! - **Tip sets**: a frozen textual rendering of the current DAG tip
//!   hashes.
//!
//! Every operation is a pure function over in-memory buffers and owned
//! values; decoders report the byte offset consumed at the point of
//! failure and never retain references into their input.

mod compressor;
mod entry;
mod error;
mod script;
mod serialize;
#[cfg(test)]
mod tests;
mod tips;
mod undo;

pub use compressor::{
    compress_amount, compress_script, compressed_script_size, decompress_amount,
    write_compressed_script,
};
pub use entry::{deserialize_coin, serialize_coin, serialized_coin_size};
pub use error::Error;
pub use script::read_compressed_script;
pub use serialize::{read_vlq, vlq_len, write_vlq};
pub use tips::{deserialize_tip_hashes, serialize_tip_hashes};
pub use undo::{
    decode_spent_output, deserialize_spend_journal, serialize_spend_journal,
    spend_journal_serialized_size,
};

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
