//! Textual codec for the persisted DAG tip set.
//!
//! The format is a frozen wire contract: an outer bracketed list of inner
//! bracketed lists, each inner list holding exactly [`HASH_SIZE`] byte
//! values of one tip hash in natural stored order, rendered in decimal
//! with no whitespace, sign, leading zero or exponent. It is written and
//! parsed here explicitly rather than through a structural serializer so
//! the rendering can never drift.
//!
//! This text only ever round-trips through the persistent store, so any
//! parse failure is reported as the storage-corruption kind.

use crate::{Error, Result};
use subdag_primitives::{HASH_SIZE, Hash};

/// Renders the tip set as UTF-8 text, preserving slice order.
pub fn serialize_tip_hashes(tips: &[Hash]) -> Vec<u8> {
    // "[255," per byte plus brackets bounds the length from above.
    let mut text = String::with_capacity(2 + tips.len() * (HASH_SIZE * 4 + 2));
    text.push('[');
    for (i, tip) in tips.iter().enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push('[');
        for (j, byte) in tip.as_bytes().iter().enumerate() {
            if j > 0 {
                text.push(',');
            }
            text.push_str(&byte.to_string());
        }
        text.push(']');
    }
    text.push(']');
    text.into_bytes()
}

/// Parses the persisted tip-set text back into hashes.
///
/// Incomplete text, structural deviation, non-canonical numbers, an
/// inner list whose length is not [`HASH_SIZE`], or trailing data all
/// fail with the storage-corruption error kind.
pub fn deserialize_tip_hashes(serialized: &[u8]) -> Result<Vec<Hash>> {
    let mut parser = Parser {
        bytes: serialized,
        pos: 0,
    };

    parser.expect(b'[')?;
    let mut tips = Vec::new();
    if parser.peek() != Some(b']') {
        loop {
            tips.push(parser.parse_hash()?);
            match parser.peek() {
                Some(b',') => parser.pos += 1,
                _ => break,
            }
        }
    }
    parser.expect(b']')?;

    if parser.pos != serialized.len() {
        return Err(Error::corruption(format!(
            "trailing data after tip set at position {}",
            parser.pos
        )));
    }
    Ok(tips)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(byte) => Err(Error::corruption(format!(
                "expected {:?} at position {}, found {:?}",
                expected as char, self.pos, byte as char
            ))),
            None => Err(Error::corruption(format!(
                "expected {:?} at position {}, found end of data",
                expected as char, self.pos
            ))),
        }
    }

    /// One canonical decimal byte value: no sign, no leading zero, at
    /// most three digits, at most 255.
    fn parse_byte_value(&mut self) -> Result<u8> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let digits = &self.bytes[start..self.pos];
        if digits.is_empty() || digits.len() > 3 || (digits.len() > 1 && digits[0] == b'0') {
            return Err(Error::corruption(format!(
                "invalid byte value at position {start}"
            )));
        }
        let mut value: u32 = 0;
        for &digit in digits {
            value = value * 10 + u32::from(digit - b'0');
        }
        if value > 255 {
            return Err(Error::corruption(format!(
                "byte value {value} out of range at position {start}"
            )));
        }
        Ok(value as u8)
    }

    fn parse_hash(&mut self) -> Result<Hash> {
        self.expect(b'[')?;
        let mut bytes = [0u8; HASH_SIZE];
        for (i, slot) in bytes.iter_mut().enumerate() {
            if i > 0 {
                self.expect(b',')?;
            }
            *slot = self.parse_byte_value()?;
        }
        // A longer or shorter inner list fails structurally here.
        self.expect(b']')?;
        Ok(Hash::from_bytes(bytes))
    }
}
