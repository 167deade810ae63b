//! Decompression of stored locking scripts.

use crate::compressor::{
    NUM_SPECIAL_SCRIPTS, OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160,
};
use crate::serialize::read_vlq;
use crate::{Error, Result};

const MAX_SCRIPT_SIZE: usize = 10_000;

/// Reads one compressed script from the front of `bytes`, returning the
/// decompressed script and the number of bytes consumed.
///
/// The leading tag deterministically selects the template; a truncated
/// payload, an x coordinate naming no curve point, or a raw length above
/// [`MAX_SCRIPT_SIZE`] is a malformed-input error.
pub fn read_compressed_script(bytes: &[u8]) -> Result<(Vec<u8>, usize)> {
    let (tag, mut offset) = read_vlq(bytes)?;
    match tag {
        0x00 => {
            // Pay-to-pubkey-hash.
            let hash = take(bytes, &mut offset, 20)?;
            let mut script = Vec::with_capacity(25);
            script.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
            script.extend_from_slice(hash);
            script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
            Ok((script, offset))
        }
        0x01 => {
            // Pay-to-script-hash.
            let hash = take(bytes, &mut offset, 20)?;
            let mut script = Vec::with_capacity(23);
            script.extend_from_slice(&[OP_HASH160, 20]);
            script.extend_from_slice(hash);
            script.push(OP_EQUAL);
            Ok((script, offset))
        }
        0x02 | 0x03 => {
            // Pay-to-compressed-pubkey; the tag is the key's own prefix.
            let x = take(bytes, &mut offset, 32)?;
            let mut script = Vec::with_capacity(35);
            script.push(33);
            script.push(tag as u8);
            script.extend_from_slice(x);
            script.push(OP_CHECKSIG);
            Ok((script, offset))
        }
        0x04 | 0x05 => {
            // Pay-to-uncompressed-pubkey stored as its x coordinate; the
            // y coordinate is recomputed from the parity in the tag.
            let x = take(bytes, &mut offset, 32)?;
            let mut compressed = [0u8; 33];
            compressed[0] = 0x02 | (tag as u8 & 0x01);
            compressed[1..].copy_from_slice(x);
            let pubkey = secp256k1::PublicKey::from_slice(&compressed).map_err(|_| {
                Error::deserialize("compressed script x coordinate is not on the curve", offset)
            })?;
            let mut script = Vec::with_capacity(67);
            script.push(65);
            script.extend_from_slice(&pubkey.serialize_uncompressed());
            script.push(OP_CHECKSIG);
            Ok((script, offset))
        }
        _ => {
            if tag > (MAX_SCRIPT_SIZE + NUM_SPECIAL_SCRIPTS) as u64 {
                return Err(Error::deserialize(
                    format!("raw script length tag {tag} exceeds maximum"),
                    offset,
                ));
            }
            let size = tag as usize - NUM_SPECIAL_SCRIPTS;
            let raw = take(bytes, &mut offset, size)?;
            Ok((raw.to_vec(), offset))
        }
    }
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    if bytes.len() - *offset < len {
        return Err(Error::deserialize(
            "unexpected end of data in compressed script",
            bytes.len(),
        ));
    }
    let slice = &bytes[*offset..*offset + len];
    *offset += len;
    Ok(slice)
}
