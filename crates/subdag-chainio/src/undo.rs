//! Codec for per-block spend journals.
//!
//! A block's journal concatenates the outputs it consumed, processed
//! last-transaction-first and last-input-first, so the disconnect path
//! decodes sequentially while pushing entries back into the ledger.
//!
//! Within one transaction only the first output written carries the real
//! header code; the creation height and coinbase flag are constant across
//! a transaction's consumed outputs, so every later output writes a
//! header code of zero and inherits the remembered one on decode. A
//! non-zero header code is followed by a legacy reserved `VLQ(0)`.
//!
//! The wire format alone cannot say where one transaction's outputs end,
//! so both directions require the block's transaction list; it and the
//! journal must come from mutually consistent data.

use crate::compressor::{
    compress_amount, compressed_script_size, decompress_amount, write_compressed_script,
};
use crate::entry::header_code;
use crate::script::read_compressed_script;
use crate::serialize::{read_vlq, vlq_len, write_vlq};
use crate::{Error, Result};
use subdag_primitives::{SpentOutput, Transaction};

fn spent_output_size(code: u64, output: &SpentOutput) -> usize {
    let mut size = vlq_len(code);
    if code != 0 {
        size += vlq_len(0);
    }
    size + vlq_len(compress_amount(output.amount)) + compressed_script_size(&output.script_pubkey)
}

fn write_spent_output(out: &mut Vec<u8>, code: u64, output: &SpentOutput) {
    write_vlq(out, code);
    if code != 0 {
        // Legacy reserved field, always zero.
        write_vlq(out, 0);
    }
    write_vlq(out, compress_amount(output.amount));
    write_compressed_script(out, &output.script_pubkey);
}

/// Reads one spent output from the front of `bytes`.
///
/// `inherited` supplies the header code to apply when the entry's own
/// header code on the wire is zero. Returns the output, the wire header
/// code, and the number of bytes consumed.
fn read_spent_output(bytes: &[u8], inherited: u64) -> Result<(SpentOutput, u64, usize)> {
    let (code, mut offset) = read_vlq(bytes)?;
    if code != 0 {
        // Skip the legacy reserved field.
        let (_, n) = read_vlq(&bytes[offset..]).map_err(|e| e.at_offset(offset))?;
        offset += n;
    }

    let (compressed_amount, n) = read_vlq(&bytes[offset..]).map_err(|e| e.at_offset(offset))?;
    offset += n;
    let amount = decompress_amount(compressed_amount)
        .ok_or_else(|| Error::deserialize("compressed amount out of range", offset))?;

    let (script_pubkey, n) =
        read_compressed_script(&bytes[offset..]).map_err(|e| e.at_offset(offset))?;
    offset += n;

    let effective = if code != 0 { code } else { inherited };
    Ok((
        SpentOutput {
            amount,
            script_pubkey,
            height: effective >> 1,
            is_coinbase: effective & 0x01 != 0,
        },
        code,
        offset,
    ))
}

/// Decodes a single spent output, returning it and the number of bytes
/// consumed.
///
/// A zero header code decodes as the legacy `(height 0, non-coinbase)`
/// form; journal decoding substitutes the surrounding transaction's
/// header instead, which is only known there.
pub fn decode_spent_output(serialized: &[u8]) -> Result<(SpentOutput, usize)> {
    let (output, _, consumed) = read_spent_output(serialized, 0)?;
    Ok((output, consumed))
}

fn check_counts(spent: &[SpentOutput], transactions: &[Transaction]) -> Result<()> {
    let required: usize = transactions.iter().map(|tx| tx.inputs.len()).sum();
    if required != spent.len() {
        return Err(Error::assertion(format!(
            "spend journal has {} entries for {} transaction inputs",
            spent.len(),
            required
        )));
    }
    Ok(())
}

/// Returns the exact number of bytes [`serialize_spend_journal`]
/// produces.
pub fn spend_journal_serialized_size(
    spent: &[SpentOutput],
    transactions: &[Transaction],
) -> Result<usize> {
    check_counts(spent, transactions)?;
    let mut size = 0;
    let mut idx = spent.len();
    for tx in transactions.iter().rev() {
        let mut first_in_tx = true;
        for _ in tx.inputs.iter().rev() {
            idx -= 1;
            let code = if first_in_tx {
                header_code(spent[idx].height, spent[idx].is_coinbase)
            } else {
                0
            };
            size += spent_output_size(code, &spent[idx]);
            first_in_tx = false;
        }
    }
    Ok(size)
}

/// Serializes the outputs a block consumed into its spend journal.
///
/// `spent` is ordered by transaction position within the block and then
/// by input position within the transaction; `transactions` are the
/// block's non-coinbase transactions in block order. A block that
/// consumed nothing serializes to an empty buffer.
pub fn serialize_spend_journal(
    spent: &[SpentOutput],
    transactions: &[Transaction],
) -> Result<Vec<u8>> {
    check_counts(spent, transactions)?;
    let mut out = Vec::with_capacity(spend_journal_serialized_size(spent, transactions)?);
    let mut idx = spent.len();
    for tx in transactions.iter().rev() {
        let mut first_in_tx = true;
        for _ in tx.inputs.iter().rev() {
            idx -= 1;
            let output = &spent[idx];
            let code = if first_in_tx {
                header_code(output.height, output.is_coinbase)
            } else {
                // Height and coinbase status are constant within one
                // transaction; deduplicated behind a zero header.
                debug_assert!(
                    output.height == spent[idx + 1].height
                        && output.is_coinbase == spent[idx + 1].is_coinbase
                );
                0
            };
            write_spent_output(&mut out, code, output);
            first_in_tx = false;
        }
    }
    Ok(out)
}

/// Decodes a block's spend journal given the block's non-coinbase
/// transactions, returning the consumed outputs ordered by transaction
/// and then input position.
///
/// An empty buffer is only valid when the transactions have no inputs; a
/// buffer that runs dry against the expected input count, or that leaves
/// bytes over, violates the caller's consistency contract and raises the
/// internal-invariant error. Malformed bytes inside an entry raise the
/// malformed-input error with the offset consumed so far.
pub fn deserialize_spend_journal(
    serialized: &[u8],
    transactions: &[Transaction],
) -> Result<Vec<SpentOutput>> {
    let required: usize = transactions.iter().map(|tx| tx.inputs.len()).sum();
    if serialized.is_empty() {
        if required != 0 {
            return Err(Error::assertion(format!(
                "empty spend journal for {required} expected transaction inputs"
            )));
        }
        return Ok(Vec::new());
    }

    let mut spent = Vec::with_capacity(required);
    let mut offset = 0;
    for tx in transactions.iter().rev() {
        // The last real header code seen while walking this
        // transaction's outputs; zero headers inherit it.
        let mut last_code = 0;
        for _ in tx.inputs.iter().rev() {
            let (output, code, n) =
                read_spent_output(&serialized[offset..], last_code).map_err(|e| e.at_offset(offset))?;
            if code != 0 {
                last_code = code;
            }
            offset += n;
            spent.push(output);
        }
    }

    if offset != serialized.len() {
        return Err(Error::assertion(format!(
            "spend journal has {} bytes left over after {required} entries",
            serialized.len() - offset
        )));
    }

    spent.reverse();
    Ok(spent)
}
