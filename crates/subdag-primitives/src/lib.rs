//! Core value types shared across the subdag node: block/transaction
//! identifiers, the transaction model, and the ledger entry types the
//! chain-state codec persists.
//!
//! Everything here is a plain owned value. Hashing, validation and
//! consensus live elsewhere; identifiers are opaque 32-byte arrays.

use std::fmt;
use std::str::FromStr;

/// Width of a block or transaction identifier in bytes.
pub const HASH_SIZE: usize = 32;

/// 1 coin in base units.
pub const COIN: u64 = 100_000_000;

/// Maximum amount of money a ledger entry can carry.
pub const MAX_MONEY: u64 = 21_000_000 * COIN;

/// Opaque 32-byte identifier of a block or transaction.
///
/// Stored in natural byte order. The display form follows the usual
/// identifier convention of reversing the bytes, so parsing a display
/// string and reading raw stored bytes are distinct operations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Constructs a hash from its natural-order bytes.
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the natural-order bytes.
    pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Consumes the hash, returning its natural-order bytes.
    pub const fn into_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// The all-zero hash, used as the previous-output id of coinbase
    /// inputs.
    pub const fn zero() -> Self {
        Self([0u8; HASH_SIZE])
    }
}

/// Errors parsing the display form of a [`Hash`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    #[error("invalid hash hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("invalid hash length {0}, expected {HASH_SIZE}")]
    InvalidLength(usize),
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = self.0;
        bytes.reverse();
        f.write_str(&hex::encode(bytes))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s)?;
        let mut bytes: [u8; HASH_SIZE] = decoded
            .try_into()
            .map_err(|rejected: Vec<u8>| HashError::InvalidLength(rejected.len()))?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

/// A reference to a transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OutPoint {
    /// The id of the transaction holding the referenced output.
    pub txid: Hash,
    /// The index of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    /// The null reference carried by coinbase inputs.
    pub const fn null() -> Self {
        Self {
            txid: Hash::zero(),
            index: u32::MAX,
        }
    }

    /// Whether this is the null coinbase reference.
    pub fn is_null(&self) -> bool {
        *self == Self::null()
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxIn {
    /// The output consumed by this input.
    pub previous_outpoint: OutPoint,
    /// Unlocking script satisfying the consumed output's condition.
    pub signature_script: Vec<u8>,
    pub sequence: u64,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxOut {
    /// Transfer value in base units.
    pub value: u64,
    /// Spending condition of the output.
    pub script_pubkey: Vec<u8>,
}

/// An already-parsed transaction.
///
/// The chain-state codec only relies on input/output counts and order;
/// the remaining fields travel along for the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u64,
}

impl Transaction {
    /// Whether this is a coinbase transaction (single input with the null
    /// previous-output reference).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_outpoint.is_null()
    }
}

/// Unspent transaction output.
///
/// Write-once: created when the output enters the ledger, removed on
/// spend, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Coin {
    /// Whether the coin is from a coinbase transaction.
    pub is_coinbase: bool,
    /// Transfer value in base units.
    pub amount: u64,
    /// Block height at which the containing transaction was accepted.
    pub height: u64,
    /// Spending condition of the output.
    pub script_pubkey: Vec<u8>,
}

/// A ledger entry consumed by a connected block, retained so the block's
/// effect can be rolled back.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpentOutput {
    /// Transfer value in base units.
    pub amount: u64,
    /// Spending condition of the consumed output.
    pub script_pubkey: Vec<u8>,
    /// Block height at which the consumed output was created.
    pub height: u64,
    /// Whether the consumed output was created by a coinbase transaction.
    pub is_coinbase: bool,
}

impl From<Coin> for SpentOutput {
    fn from(coin: Coin) -> Self {
        Self {
            amount: coin.amount,
            script_pubkey: coin.script_pubkey,
            height: coin.height,
            is_coinbase: coin.is_coinbase,
        }
    }
}

impl From<SpentOutput> for Coin {
    fn from(spent: SpentOutput) -> Self {
        Self {
            is_coinbase: spent.is_coinbase,
            amount: spent.amount,
            height: spent.height,
            script_pubkey: spent.script_pubkey,
        }
    }
}
