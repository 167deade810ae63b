//! Domain-specific compression applied to ledger entries before the
//! generic integer codec: monetary amounts and locking scripts.

use crate::serialize::{vlq_len, write_vlq};
use subdag_primitives::MAX_MONEY;

// Constants for opcodes
pub(crate) const OP_DUP: u8 = 0x76;
pub(crate) const OP_HASH160: u8 = 0xa9;
pub(crate) const OP_EQUALVERIFY: u8 = 0x88;
pub(crate) const OP_CHECKSIG: u8 = 0xac;
pub(crate) const OP_EQUAL: u8 = 0x87;

/// Number of type tags reserved for fixed-size script templates; raw
/// scripts store their length offset by this count.
pub(crate) const NUM_SPECIAL_SCRIPTS: usize = 6;

// https://github.com/bitcoin/bitcoin/blob/0903ce8dbc25d3823b03d52f6e6bff74d19e801e/src/compressor.cpp#L140
//
// NOTE: This function is defined only for 0 <= n <= MAX_MONEY.

/// Rewrites an amount to exploit the trailing decimal structure typical
/// of monetary values, so the integer codec stores it in fewer bytes.
///
/// Zero maps to itself. Otherwise up to nine factors of ten are stripped
/// and, when fewer than nine, the last significant digit is split off;
/// the exponent, digit and remaining significand combine into a single
/// value offset by one to keep zero reserved. [`decompress_amount`]
/// exactly inverts this for every amount up to [`MAX_MONEY`].
pub fn compress_amount(n: u64) -> u64 {
    debug_assert!(n <= MAX_MONEY);

    if n == 0 {
        return 0;
    }
    let mut e = 0;
    let mut n = n;
    while n % 10 == 0 && e < 9 {
        n /= 10;
        e += 1;
    }
    if e < 9 {
        let d = n % 10;
        debug_assert!((1..=9).contains(&d));
        n /= 10;
        1 + (n * 9 + d - 1) * 10 + e
    } else {
        1 + (n - 1) * 10 + 9
    }
}

/// Inverts [`compress_amount`].
///
/// Returns `None` when `x` is not in the image of the compression, which
/// can only happen for values that never came from a well-formed encoder;
/// arithmetic is checked so hostile input fails closed instead of
/// wrapping.
pub fn decompress_amount(x: u64) -> Option<u64> {
    if x == 0 {
        return Some(0);
    }
    let mut x = x - 1;
    let e = x % 10;
    x /= 10;
    let mut n = if e < 9 {
        let d = (x % 9) + 1;
        x /= 9;
        x.checked_mul(10)?.checked_add(d)?
    } else {
        x.checked_add(1)?
    };
    for _ in 0..e {
        n = n.checked_mul(10)?;
    }
    Some(n)
}

fn to_key_id(script: &[u8]) -> Option<[u8; 20]> {
    if script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
    {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&script[3..23]);
        Some(hash)
    } else {
        None
    }
}

fn to_script_id(script: &[u8]) -> Option<[u8; 20]> {
    if script.len() == 23 && script[0] == OP_HASH160 && script[1] == 20 && script[22] == OP_EQUAL {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&script[2..22]);
        Some(hash)
    } else {
        None
    }
}

enum PublicKey {
    Compressed([u8; 33]),
    Uncompressed([u8; 65]),
}

fn to_pub_key(script: &[u8]) -> Option<PublicKey> {
    if script.len() == 35
        && script[0] == 33
        && script[34] == OP_CHECKSIG
        && (script[1] == 0x02 || script[1] == 0x03)
    {
        let mut pubkey = [0u8; 33];
        pubkey.copy_from_slice(&script[1..34]);
        Some(PublicKey::Compressed(pubkey))
    } else if script.len() == 67
        && script[0] == 65
        && script[66] == OP_CHECKSIG
        && script[1] == 0x04
    {
        // If not fully valid, it would not be compressible: decompression
        // recomputes the y coordinate from the curve.
        if secp256k1::PublicKey::from_slice(&script[1..66]).is_ok() {
            let mut pubkey = [0u8; 65];
            pubkey.copy_from_slice(&script[1..66]);
            Some(PublicKey::Uncompressed(pubkey))
        } else {
            None
        }
    } else {
        None
    }
}

/// Compresses a locking script matching one of the recognized templates.
///
/// Recognized shapes and their one-byte tags: pay-to-pubkey-hash (`0x00`),
/// pay-to-script-hash (`0x01`), pay-to-compressed-pubkey with the key's
/// even/odd prefix preserved (`0x02`/`0x03`), and pay-to-uncompressed-
/// pubkey stored as its x coordinate with the y parity in the tag's low
/// bit (`0x04`/`0x05`). Returns `None` for everything else.
pub fn compress_script(script: &[u8]) -> Option<Vec<u8>> {
    if let Some(hash) = to_key_id(script) {
        let mut out = Vec::with_capacity(21);
        out.push(0x00);
        out.extend_from_slice(&hash);
        Some(out)
    } else if let Some(hash) = to_script_id(script) {
        let mut out = Vec::with_capacity(21);
        out.push(0x01);
        out.extend_from_slice(&hash);
        Some(out)
    } else if let Some(public_key) = to_pub_key(script) {
        let mut out = Vec::with_capacity(33);

        match public_key {
            PublicKey::Compressed(compressed) => {
                out.push(compressed[0]);
                out.extend_from_slice(&compressed[1..33]);
            }
            PublicKey::Uncompressed(uncompressed) => {
                out.push(0x04 | (uncompressed[64] & 0x01));
                out.extend_from_slice(&uncompressed[1..33]);
            }
        }

        Some(out)
    } else {
        None
    }
}

/// Returns the exact number of bytes [`write_compressed_script`] emits
/// for `script`.
pub fn compressed_script_size(script: &[u8]) -> usize {
    match compress_script(script) {
        Some(compressed) => compressed.len(),
        None => vlq_len((script.len() + NUM_SPECIAL_SCRIPTS) as u64) + script.len(),
    }
}

/// Appends the compressed form of `script` to `out`.
///
/// Unrecognized scripts fall back to a length-derived tag followed by the
/// raw bytes, so the transform never costs more than the tag itself.
pub fn write_compressed_script(out: &mut Vec<u8>, script: &[u8]) {
    if let Some(compressed) = compress_script(script) {
        out.extend_from_slice(&compressed);
    } else {
        write_vlq(out, (script.len() + NUM_SPECIAL_SCRIPTS) as u64);
        out.extend_from_slice(script);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_compression_known_values() {
        let cases = [
            (0, 0),
            (1, 1),
            (5_000_000_000, 50),
            (1_000_000, 7),
            (13_761_000_000, 123_847),
            (34_405_000_000, 309_647),
            (MAX_MONEY, 21_000_000),
        ];
        for (amount, compressed) in cases {
            assert_eq!(compress_amount(amount), compressed, "compress {amount}");
            assert_eq!(
                decompress_amount(compressed),
                Some(amount),
                "decompress {compressed}"
            );
        }
    }

    #[test]
    fn test_amount_compression_round_trip() {
        for _ in 0..1024 {
            let n = fastrand::u64(..=MAX_MONEY);
            assert_eq!(decompress_amount(compress_amount(n)), Some(n));
        }
    }

    #[test]
    fn test_decompress_rejects_out_of_range() {
        assert_eq!(decompress_amount(u64::MAX), None);
    }

    #[test]
    fn test_pay_to_pubkey_hash_classification() {
        let mut script = vec![OP_DUP, OP_HASH160, 20];
        script.extend_from_slice(&[0xaa; 20]);
        script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);

        let compressed = compress_script(&script).unwrap();
        assert_eq!(compressed.len(), 21);
        assert_eq!(compressed[0], 0x00);
        assert_eq!(&compressed[1..], &[0xaa; 20]);

        // A single wrong opcode falls out of the template.
        script[24] = OP_EQUAL;
        assert!(compress_script(&script).is_none());
    }

    #[test]
    fn test_pay_to_script_hash_classification() {
        let mut script = vec![OP_HASH160, 20];
        script.extend_from_slice(&[0xbb; 20]);
        script.push(OP_EQUAL);

        let compressed = compress_script(&script).unwrap();
        assert_eq!(compressed[0], 0x01);
        assert_eq!(&compressed[1..], &[0xbb; 20]);
    }

    #[test]
    fn test_compressed_pubkey_classification() {
        for prefix in [0x02u8, 0x03] {
            let mut script = vec![33, prefix];
            script.extend_from_slice(&[0xcc; 32]);
            script.push(OP_CHECKSIG);

            // No curve check for already-compressed keys; the bytes are
            // preserved in both directions.
            let compressed = compress_script(&script).unwrap();
            assert_eq!(compressed[0], prefix);
            assert_eq!(&compressed[1..], &[0xcc; 32]);
        }
    }

    #[test]
    fn test_invalid_uncompressed_pubkey_is_not_compressible() {
        // 0x04 prefix but (x, y) is not a curve point.
        let mut script = vec![65, 0x04];
        script.extend_from_slice(&[0x11; 64]);
        script.push(OP_CHECKSIG);
        assert!(compress_script(&script).is_none());

        // Still storable through the raw fallback.
        assert_eq!(
            compressed_script_size(&script),
            vlq_len((script.len() + NUM_SPECIAL_SCRIPTS) as u64) + script.len()
        );
    }

    #[test]
    fn test_raw_fallback_size() {
        assert_eq!(compressed_script_size(&[]), 1);
        assert_eq!(compressed_script_size(&[0x6a]), 2);
        let script = vec![0x51; 300];
        assert_eq!(compressed_script_size(&script), 2 + 300);
    }
}
