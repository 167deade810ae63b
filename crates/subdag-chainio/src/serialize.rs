//! Variable-length integer encoding used throughout the chain-state
//! formats.
//!
//! The scheme is base-128 with the high bit of every byte except the last
//! set as a continuation marker, MSB first. Unlike a plain base-128
//! encoding, each continuation byte carries a +1 bias so that every
//! byte-length range is fully utilized: one byte covers 0..=127, two
//! bytes cover 128..=16511, three bytes cover 16512..=2113663, and so on
//! with no gaps and exactly one encoding per value.

use crate::{Error, Result};

/// Returns the number of bytes [`write_vlq`] will emit for `n`.
pub fn vlq_len(mut n: u64) -> usize {
    let mut size = 1;
    while n > 0x7f {
        size += 1;
        n = (n >> 7) - 1;
    }
    size
}

/// Appends the variable-length encoding of `n` to `out`.
pub fn write_vlq(out: &mut Vec<u8>, mut n: u64) {
    // Bytes come out little end first; reverse so the terminating byte
    // (clear high bit) lands last.
    let mut buf = [0u8; 10];
    let mut len = 0;
    loop {
        buf[len] = (n & 0x7f) as u8 | if len > 0 { 0x80 } else { 0x00 };
        len += 1;
        if n <= 0x7f {
            break;
        }
        n = (n >> 7) - 1;
    }
    buf[..len].reverse();
    out.extend_from_slice(&buf[..len]);
}

/// Decodes a variable-length integer from the front of `bytes`,
/// returning the value and the number of bytes consumed.
///
/// Running out of input before the terminating byte is a malformed-input
/// error. A value that would not fit 64 bits is an invariant violation:
/// no writer of these formats can produce one, so its presence means the
/// record did not come from a well-formed encoder.
pub fn read_vlq(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut n: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if n > u64::MAX >> 7 {
            return Err(Error::assertion("vlq value overflows 64 bits"));
        }
        n = (n << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok((n, i + 1));
        }
        n = n
            .checked_add(1)
            .ok_or_else(|| Error::assertion("vlq value overflows 64 bits"))?;
    }
    Err(Error::deserialize(
        "unexpected end of data while reading vlq",
        bytes.len(),
    ))
}
