//! UTXO set storage driven by the chain-state codec.

use crate::store::KeyValueStore;
use crate::{Error, Result, meta_keys, ns, outpoint_to_key};
use subdag_chainio::{
    deserialize_coin, deserialize_spend_journal, deserialize_tip_hashes, serialize_coin,
    serialize_spend_journal, serialize_tip_hashes,
};
use subdag_primitives::{Coin, Hash, OutPoint, SpentOutput, Transaction};

const OP_RETURN: u8 = 0x6a;

/// The persisted ledger: UTXO set, per-block spend journals, and the
/// current tip set, all encoded through the chain-state codec.
pub struct ChainStore<S> {
    store: S,
}

impl<S: KeyValueStore> ChainStore<S> {
    /// Constructs a new instance of [`ChainStore`] over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a UTXO by outpoint.
    pub fn get_utxo(&self, outpoint: &OutPoint) -> Result<Option<Coin>> {
        match self.store.get(ns::UTXOS, &outpoint_to_key(outpoint))? {
            Some(bytes) => Ok(Some(deserialize_coin(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Check if a UTXO exists.
    pub fn contains_utxo(&self, outpoint: &OutPoint) -> Result<bool> {
        Ok(self
            .store
            .get(ns::UTXOS, &outpoint_to_key(outpoint))?
            .is_some())
    }

    /// Applies a block's ledger changes.
    ///
    /// Spends every input of the non-coinbase transactions (outputs
    /// created by earlier transactions in the same block are spendable
    /// by later ones), creates the new outputs at `height`, and persists
    /// the block's spend journal keyed by `block_hash`.
    ///
    /// `txids` are the externally computed ids of `transactions`, in the
    /// same order; hashing is not this crate's concern.
    pub fn connect_block(
        &self,
        block_hash: &Hash,
        height: u64,
        txids: &[Hash],
        transactions: &[Transaction],
    ) -> Result<()> {
        check_txid_count(txids, transactions)?;

        let mut spent: Vec<SpentOutput> = Vec::new();
        let mut created: u64 = 0;

        for (txid, tx) in txids.iter().zip(transactions) {
            let is_coinbase = tx.is_coinbase();

            if !is_coinbase {
                for input in &tx.inputs {
                    let outpoint = input.previous_outpoint;
                    let key = outpoint_to_key(&outpoint);
                    let coin_bytes = self
                        .store
                        .get(ns::UTXOS, &key)?
                        .ok_or(Error::UtxoNotFound(outpoint))?;
                    let coin = deserialize_coin(&coin_bytes)?;

                    self.store.delete(ns::UTXOS, &key)?;
                    spent.push(SpentOutput::from(coin));
                }
            }

            for (index, output) in tx.outputs.iter().enumerate() {
                // Provably unspendable outputs never enter the ledger.
                if output.script_pubkey.first() == Some(&OP_RETURN) {
                    continue;
                }

                let outpoint = OutPoint {
                    txid: *txid,
                    index: index as u32,
                };
                let coin = Coin {
                    is_coinbase,
                    amount: output.value,
                    height,
                    script_pubkey: output.script_pubkey.clone(),
                };
                self.store
                    .put(ns::UTXOS, &outpoint_to_key(&outpoint), &serialize_coin(&coin))?;
                created += 1;
            }
        }

        let journal = serialize_spend_journal(&spent, non_coinbase(transactions))?;
        self.store
            .put(ns::UNDO, block_hash.as_bytes(), &journal)?;

        tracing::debug!(
            "Connected block {block_hash} at height {height}: +{created} -{} UTXOs",
            spent.len()
        );

        Ok(())
    }

    /// Rolls a block's ledger changes back out using its spend journal.
    ///
    /// The caller supplies the same transactions (and ids) the block was
    /// connected with; the journal alone cannot delimit them.
    pub fn disconnect_block(
        &self,
        block_hash: &Hash,
        txids: &[Hash],
        transactions: &[Transaction],
    ) -> Result<()> {
        check_txid_count(txids, transactions)?;

        let journal = self
            .store
            .get(ns::UNDO, block_hash.as_bytes())?
            .ok_or(Error::UndoNotFound(*block_hash))?;

        let spendable = non_coinbase(transactions);
        let spent = deserialize_spend_journal(&journal, spendable)?;
        let restored = spent.len();

        // Restore consumed outputs first; the block's own outputs are
        // removed afterwards, so a coin both created and spent inside
        // this block ends up deleted.
        let inputs = spendable.iter().flat_map(|tx| &tx.inputs);
        for (input, spent_output) in inputs.zip(spent) {
            let coin = Coin::from(spent_output);
            self.store.put(
                ns::UTXOS,
                &outpoint_to_key(&input.previous_outpoint),
                &serialize_coin(&coin),
            )?;
        }

        let mut removed: u64 = 0;
        for (txid, tx) in txids.iter().zip(transactions) {
            for index in 0..tx.outputs.len() {
                let outpoint = OutPoint {
                    txid: *txid,
                    index: index as u32,
                };
                self.store.delete(ns::UTXOS, &outpoint_to_key(&outpoint))?;
                removed += 1;
            }
        }

        self.store.delete(ns::UNDO, block_hash.as_bytes())?;

        tracing::info!("Disconnected block {block_hash}: -{removed} +{restored} UTXOs");

        Ok(())
    }

    /// Current DAG tip hashes; empty for a fresh store.
    pub fn tips(&self) -> Result<Vec<Hash>> {
        match self.store.get(ns::META, meta_keys::TIPS)? {
            Some(bytes) => Ok(deserialize_tip_hashes(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the persisted DAG tip set.
    pub fn set_tips(&self, tips: &[Hash]) -> Result<()> {
        self.store
            .put(ns::META, meta_keys::TIPS, &serialize_tip_hashes(tips))?;
        Ok(())
    }
}

fn check_txid_count(txids: &[Hash], transactions: &[Transaction]) -> Result<()> {
    if txids.len() != transactions.len() {
        return Err(Error::InconsistentBlock(format!(
            "{} txids for {} transactions",
            txids.len(),
            transactions.len()
        )));
    }
    Ok(())
}

/// The transactions whose inputs spend ledger entries. The coinbase
/// leads the block when present and consumes nothing.
fn non_coinbase(transactions: &[Transaction]) -> &[Transaction] {
    match transactions.first() {
        Some(tx) if tx.is_coinbase() => &transactions[1..],
        _ => transactions,
    }
}
