//! Codec for unspent-output ledger entries.
//!
//! Serialized layout: `VLQ(header code) || VLQ(compressed amount) ||
//! compressed script`, where the header code is the creation height
//! shifted left one bit with the coinbase flag in the lowest bit.

use crate::compressor::{
    compress_amount, compressed_script_size, decompress_amount, write_compressed_script,
};
use crate::script::read_compressed_script;
use crate::serialize::{read_vlq, vlq_len, write_vlq};
use crate::{Error, Result};
use subdag_primitives::Coin;

/// Packs a creation height and coinbase flag into a single header code.
pub(crate) fn header_code(height: u64, is_coinbase: bool) -> u64 {
    (height << 1) | u64::from(is_coinbase)
}

/// Returns the exact number of bytes [`serialize_coin`] produces for
/// `coin`.
pub fn serialized_coin_size(coin: &Coin) -> usize {
    vlq_len(header_code(coin.height, coin.is_coinbase))
        + vlq_len(compress_amount(coin.amount))
        + compressed_script_size(&coin.script_pubkey)
}

/// Serializes a ledger entry for storage.
pub fn serialize_coin(coin: &Coin) -> Vec<u8> {
    let mut out = Vec::with_capacity(serialized_coin_size(coin));
    write_vlq(&mut out, header_code(coin.height, coin.is_coinbase));
    write_vlq(&mut out, compress_amount(coin.amount));
    write_compressed_script(&mut out, &coin.script_pubkey);
    out
}

/// Deserializes a ledger entry.
///
/// Sub-decoder failures propagate with the byte offset already consumed;
/// an empty buffer fails at offset 0. Bytes past the end of the script
/// are ignored.
pub fn deserialize_coin(serialized: &[u8]) -> Result<Coin> {
    let (code, mut offset) = read_vlq(serialized)?;

    let (compressed_amount, n) =
        read_vlq(&serialized[offset..]).map_err(|e| e.at_offset(offset))?;
    offset += n;
    let amount = decompress_amount(compressed_amount)
        .ok_or_else(|| Error::deserialize("compressed amount out of range", offset))?;

    let (script_pubkey, _) =
        read_compressed_script(&serialized[offset..]).map_err(|e| e.at_offset(offset))?;

    Ok(Coin {
        is_coinbase: code & 0x01 != 0,
        amount,
        height: code >> 1,
        script_pubkey,
    })
}
