//! Wire-format vectors for the persisted chain-state formats, pinned
//! against real main-chain data so the encodings can never drift.

use super::*;
use hex_literal::hex;
use subdag_primitives::{Coin, Hash, OutPoint, SpentOutput, Transaction, TxIn, TxOut};

fn hash(s: &str) -> Hash {
    s.parse().unwrap()
}

fn tx_in(prev_txid: &str, index: u32, signature_script: Vec<u8>) -> TxIn {
    TxIn {
        previous_outpoint: OutPoint {
            txid: hash(prev_txid),
            index,
        },
        signature_script,
        sequence: u64::MAX,
    }
}

fn spending_tx(inputs: Vec<TxIn>, outputs: Vec<TxOut>) -> Transaction {
    Transaction {
        version: 1,
        inputs,
        outputs,
        lock_time: 0,
    }
}

/// Spends the last output of the block-9 coinbase (block 170 data).
fn coinbase_spend() -> SpentOutput {
    SpentOutput {
        amount: 5_000_000_000,
        script_pubkey: hex!(
            "410411db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a5c
             b2e0eaddfb84ccf9744464f82e160bfa9b8b64f9d4c03f999b8643f656b412a3ac"
        )
        .to_vec(),
        height: 9,
        is_coinbase: true,
    }
}

const COINBASE_SPEND_SERIALIZED: [u8; 36] =
    hex!("1300320511db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a5c");

/// The block-170 spending transaction (coinbase omitted).
fn coinbase_spend_tx() -> Transaction {
    spending_tx(
        vec![tx_in(
            "0437cd7f8525ceed2324359c2d0ba26006d92d856a9c20fa0241106ee5a597c9",
            0,
            hex!(
                "47304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab
                 5fb8cd410220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221
                 a8768d1d0901"
            )
            .to_vec(),
        )],
        vec![
            TxOut {
                value: 1_000_000_000,
                script_pubkey: hex!(
                    "4104ae1a62fe09c5f51b13905f07f06b99a2f7159b2225f374cd378d71302fa2
                     8414e7aab37397f554a7df5f142c21c1b7303b8a0626f1baded5c72a704f7e6c
                     d84cac"
                )
                .to_vec(),
            },
            TxOut {
                value: 4_000_000_000,
                script_pubkey: hex!(
                    "410411db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a690
                     9a5cb2e0eaddfb84ccf9744464f82e160bfa9b8b64f9d4c03f999b8643f656b4
                     12a3ac"
                )
                .to_vec(),
            },
        ],
    )
}

#[test]
fn test_spent_output_serialization() {
    struct Case {
        name: &'static str,
        spent: SpentOutput,
        serialized: &'static [u8],
    }

    // Adapted from blocks 170 and 100025 in the main chain.
    let cases = [
        Case {
            name: "spends last output of coinbase",
            spent: coinbase_spend(),
            serialized: &COINBASE_SPEND_SERIALIZED,
        },
        Case {
            name: "spends last output of non coinbase",
            spent: SpentOutput {
                amount: 13_761_000_000,
                script_pubkey: hex!("76a914b2fb57eadf61e106a100a7445a8c3f67898841ec88ac").to_vec(),
                height: 100_024,
                is_coinbase: false,
            },
            serialized: &hex!("8b99700086c64700b2fb57eadf61e106a100a7445a8c3f67898841ec"),
        },
        Case {
            name: "does not spend last output, legacy format",
            spent: SpentOutput {
                amount: 34_405_000_000,
                script_pubkey: hex!("76a9146edbc6c4d31bae9f1ccc38538a114bf42de65e8688ac").to_vec(),
                height: 0,
                is_coinbase: false,
            },
            serialized: &hex!("0091f20f006edbc6c4d31bae9f1ccc38538a114bf42de65e86"),
        },
    ];

    for case in &cases {
        // One transaction with one input reproduces the standalone
        // encoding, and the predicted size must match it.
        let journal_txns = vec![spending_tx(
            vec![tx_in(
                "0437cd7f8525ceed2324359c2d0ba26006d92d856a9c20fa0241106ee5a597c9",
                0,
                Vec::new(),
            )],
            Vec::new(),
        )];
        let spent = vec![case.spent.clone()];

        let size = spend_journal_serialized_size(&spent, &journal_txns).unwrap();
        assert_eq!(size, case.serialized.len(), "{}", case.name);

        let encoded = serialize_spend_journal(&spent, &journal_txns).unwrap();
        assert_eq!(encoded, case.serialized, "{}", case.name);

        let (decoded, consumed) = decode_spent_output(case.serialized).unwrap();
        assert_eq!(decoded, case.spent, "{}", case.name);
        assert_eq!(consumed, case.serialized.len(), "{}", case.name);
    }
}

#[test]
fn test_spent_output_decode_errors() {
    // (serialized, bytes consumed at the point of failure)
    let cases: &[(&[u8], usize)] = &[
        (b"", 0),
        (&hex!("00"), 1),
        (&hex!("13"), 1),
        (&hex!("1300"), 2),
        (&hex!("1332"), 2),
    ];

    for &(serialized, expected_offset) in cases {
        let err = decode_spent_output(serialized).unwrap_err();
        assert!(err.is_deserialize_err(), "{serialized:x?}");
        assert_eq!(err.offset(), Some(expected_offset), "{serialized:x?}");
    }
}

#[test]
fn test_spend_journal_empty_block() {
    assert_eq!(serialize_spend_journal(&[], &[]).unwrap(), Vec::<u8>::new());
    assert_eq!(
        deserialize_spend_journal(&[], &[]).unwrap(),
        Vec::<SpentOutput>::new()
    );
}

#[test]
fn test_spend_journal_single_input() {
    // Block 170: one transaction spending the last output of a coinbase.
    let spent = vec![coinbase_spend()];
    let txns = vec![coinbase_spend_tx()];

    let encoded = serialize_spend_journal(&spent, &txns).unwrap();
    assert_eq!(encoded, COINBASE_SPEND_SERIALIZED);
    assert_eq!(
        spend_journal_serialized_size(&spent, &txns).unwrap(),
        encoded.len()
    );

    assert_eq!(deserialize_spend_journal(&encoded, &txns).unwrap(), spent);
}

#[test]
fn test_spend_journal_two_transactions() {
    // Adapted from block 100025: two transactions, each spending one
    // output created at height 100024. Both entries carry a full header
    // code since each opens its transaction's run.
    let spent = vec![
        SpentOutput {
            amount: 34_405_000_000,
            script_pubkey: hex!("76a9146edbc6c4d31bae9f1ccc38538a114bf42de65e8688ac").to_vec(),
            height: 100_024,
            is_coinbase: false,
        },
        SpentOutput {
            amount: 13_761_000_000,
            script_pubkey: hex!("76a914b2fb57eadf61e106a100a7445a8c3f67898841ec88ac").to_vec(),
            height: 100_024,
            is_coinbase: false,
        },
    ];
    let txns = vec![
        spending_tx(
            vec![tx_in(
                "c0ed017828e59ad5ed3cf70ee7c6fb0f426433047462477dc7a5d470f987a537",
                1,
                hex!(
                    "493046022100c167eead9840da4a033c9a56470d7794a9bb1605b377ebe56884
                     99b39f94be59022100fb6345cab4324f9ea0b9ee9169337534834638d8181297
                     78370f7d378ee4a325014104d962cac5390f12ddb7539507065d0def320d68c0
                     40f2e73337c3a1aaaab7195cb5c4d02e0959624d534f3c10c3cf3d73ca5065eb
                     d62ae986b04c6d090d32627c"
                )
                .to_vec(),
            )],
            vec![
                TxOut {
                    value: 5_000_000,
                    script_pubkey: hex!("76a914f419b8db4ba65f3b6fcc233acb762ca6f51c23d488ac")
                        .to_vec(),
                },
                TxOut {
                    value: 34_400_000_000,
                    script_pubkey: hex!("76a914cadf4fc336ab3c6a4610b75f31ba0676b7f663d288ac")
                        .to_vec(),
                },
            ],
        ),
        spending_tx(
            vec![tx_in(
                "92fbe1d4be82f765dfabc9559d4620864b05cc897c4db0e29adac92d294e52b7",
                0,
                hex!(
                    "483045022100e256743154c097465cf13e89955e1c9ff2e55c46051b627751de
                     e0144183157e02201d8d4f02cde8496aae66768f94d35ce54465bd4ae8836004
                     992d3216a93a13f00141049d23ce8686fe9b802a7a938e8952174d35dd2c2089
                     d4112001ed8089023ab4f93a3c9fcd5bfeaa9727858bf640dc1b1c05ec3b434b
                     b59837f8640e8810e87742"
                )
                .to_vec(),
            )],
            vec![
                TxOut {
                    value: 5_000_000,
                    script_pubkey: hex!("76a914a983ad7c92c38fc0e2025212e9f972204c6e687088ac")
                        .to_vec(),
                },
                TxOut {
                    value: 13_756_000_000,
                    script_pubkey: hex!("76a914a6ebd69952ab486a7a300bfffdcb395dc7d47c2388ac")
                        .to_vec(),
                },
            ],
        ),
    ];

    let expected = hex!(
        "8b99700086c64700b2fb57eadf61e106a100a7445a8c3f67898841ec
         8b99700091f20f006edbc6c4d31bae9f1ccc38538a114bf42de65e86"
    );

    let encoded = serialize_spend_journal(&spent, &txns).unwrap();
    assert_eq!(encoded, expected);
    assert_eq!(
        spend_journal_serialized_size(&spent, &txns).unwrap(),
        encoded.len()
    );

    assert_eq!(deserialize_spend_journal(&encoded, &txns).unwrap(), spent);
}

#[test]
fn test_spend_journal_header_dedup_within_transaction() {
    // One transaction with two inputs: only the entry encoded first (the
    // transaction's last input) carries the real header code; the other
    // goes to the wire as the legacy zero-header form and inherits the
    // height and coinbase flag on decode.
    let spent = vec![
        SpentOutput {
            amount: 34_405_000_000,
            script_pubkey: hex!("76a9146edbc6c4d31bae9f1ccc38538a114bf42de65e8688ac").to_vec(),
            height: 100_024,
            is_coinbase: false,
        },
        SpentOutput {
            amount: 13_761_000_000,
            script_pubkey: hex!("76a914b2fb57eadf61e106a100a7445a8c3f67898841ec88ac").to_vec(),
            height: 100_024,
            is_coinbase: false,
        },
    ];
    let txns = vec![spending_tx(
        vec![
            tx_in(
                "c0ed017828e59ad5ed3cf70ee7c6fb0f426433047462477dc7a5d470f987a537",
                1,
                Vec::new(),
            ),
            tx_in(
                "92fbe1d4be82f765dfabc9559d4620864b05cc897c4db0e29adac92d294e52b7",
                0,
                Vec::new(),
            ),
        ],
        Vec::new(),
    )];

    let expected = hex!(
        "8b99700086c64700b2fb57eadf61e106a100a7445a8c3f67898841ec
         0091f20f006edbc6c4d31bae9f1ccc38538a114bf42de65e86"
    );

    let encoded = serialize_spend_journal(&spent, &txns).unwrap();
    assert_eq!(encoded, expected);
    assert_eq!(
        spend_journal_serialized_size(&spent, &txns).unwrap(),
        encoded.len()
    );

    let decoded = deserialize_spend_journal(&encoded, &txns).unwrap();
    assert_eq!(decoded, spent);
    assert_eq!(decoded[0].height, decoded[1].height);
    assert_eq!(decoded[0].is_coinbase, decoded[1].is_coinbase);
}

#[test]
fn test_spend_journal_errors() {
    let one_input_tx = vec![coinbase_spend_tx()];

    // Missing entries for the supplied transactions violate the caller's
    // consistency contract.
    let err = deserialize_spend_journal(&[], &one_input_tx).unwrap_err();
    assert!(err.is_assert_err());

    // A malformed entry inside the journal is ordinary bad data.
    let truncated = hex!(
        "1301320511db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a"
    );
    let err = deserialize_spend_journal(&truncated, &one_input_tx).unwrap_err();
    assert!(err.is_deserialize_err());

    // Leftover bytes mean the journal and transactions disagree.
    let err = deserialize_spend_journal(&COINBASE_SPEND_SERIALIZED, &[]).unwrap_err();
    assert!(err.is_assert_err());

    // Serializing with mismatched counts is the same contract violation.
    let err = serialize_spend_journal(&[], &one_input_tx).unwrap_err();
    assert!(err.is_assert_err());
}

#[test]
fn test_utxo_entry_serialization() {
    struct Case {
        name: &'static str,
        coin: Coin,
        serialized: &'static [u8],
    }

    let cases = [
        // b7c3332bc138e2c9429818f5fed500bcc1746544218772389054dc8047d7cd3f:0
        Case {
            name: "height 1, coinbase",
            coin: Coin {
                is_coinbase: true,
                amount: 5_000_000_000,
                height: 1,
                script_pubkey: hex!(
                    "410496b538e853519c726a2c91e61ec11600ae1390813a627c66fb8be7947be6
                     3c52da7589379515d4e0a604f8141781e62294721166bf621e73a82cbf2342c8
                     58eeac"
                )
                .to_vec(),
            },
            serialized: &hex!(
                "03320496b538e853519c726a2c91e61ec11600ae1390813a627c66fb8be7947be63c52"
            ),
        },
        // 8131ffb0a2c945ecaf9b9063e59558784f9c3a74741ce6ae2a18d0571dac15bb:1
        Case {
            name: "height 100001, not coinbase",
            coin: Coin {
                is_coinbase: false,
                amount: 1_000_000,
                height: 100_001,
                script_pubkey: hex!("76a914ee8bd501094a7d5ca318da2506de35e1cb025ddc88ac").to_vec(),
            },
            serialized: &hex!("8b99420700ee8bd501094a7d5ca318da2506de35e1cb025ddc"),
        },
    ];

    for case in &cases {
        assert_eq!(
            serialized_coin_size(&case.coin),
            case.serialized.len(),
            "{}",
            case.name
        );
        assert_eq!(serialize_coin(&case.coin), case.serialized, "{}", case.name);
        assert_eq!(
            deserialize_coin(case.serialized).unwrap(),
            case.coin,
            "{}",
            case.name
        );
    }
}

#[test]
fn test_utxo_entry_decode_errors() {
    let cases: &[(&[u8], usize)] = &[
        (b"", 0),
        (&hex!("02"), 1),
        (&hex!("0232"), 2),
    ];

    for &(serialized, expected_offset) in cases {
        let err = deserialize_coin(serialized).unwrap_err();
        assert!(err.is_deserialize_err(), "{serialized:x?}");
        assert_eq!(err.offset(), Some(expected_offset), "{serialized:x?}");
    }
}

#[test]
fn test_tip_hashes_serialization() {
    let genesis = hash("000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f");
    let block1 = hash("00000000839a8e6886ab5951d76f411475428afc90947ee320161bbf18eb6048");

    let cases: [(&str, Hash, &[u8]); 2] = [
        (
            "genesis",
            genesis,
            b"[[111,226,140,10,182,241,179,114,193,166,162,70,174,99,247,79,147,30,131,101,225,90,8,156,104,214,25,0,0,0,0,0]]",
        ),
        (
            "block 1",
            block1,
            b"[[72,96,235,24,191,27,22,32,227,126,148,144,252,138,66,117,20,65,111,215,81,89,171,134,104,142,154,131,0,0,0,0]]",
        ),
    ];

    for (name, tip, expected) in cases {
        let encoded = serialize_tip_hashes(&[tip]);
        assert_eq!(encoded, expected, "{name}");
        assert_eq!(deserialize_tip_hashes(&encoded).unwrap(), vec![tip], "{name}");
    }

    // Multiple tips keep their order.
    let tips = vec![genesis, block1];
    let encoded = serialize_tip_hashes(&tips);
    assert_eq!(deserialize_tip_hashes(&encoded).unwrap(), tips);
}

#[test]
fn test_truncation_never_decodes() {
    // Every strict prefix of a valid encoding is an error, never a
    // silently wrong value.
    let coin_serialized =
        hex!("03320496b538e853519c726a2c91e61ec11600ae1390813a627c66fb8be7947be63c52");
    for len in 0..coin_serialized.len() {
        let err = deserialize_coin(&coin_serialized[..len]).unwrap_err();
        assert!(err.is_deserialize_err(), "prefix of {len} bytes");
    }

    for len in 0..COINBASE_SPEND_SERIALIZED.len() {
        let err = decode_spent_output(&COINBASE_SPEND_SERIALIZED[..len]).unwrap_err();
        assert!(err.is_deserialize_err(), "prefix of {len} bytes");
    }
}

#[test]
fn test_tip_hashes_decode_errors() {
    let cases: &[&[u8]] = &[
        b"",
        b"[[111,226,140,10,182,241,179,114,193,166,162,70,174,99,247,7",
    ];

    for serialized in cases {
        let err = deserialize_tip_hashes(serialized).unwrap_err();
        assert!(err.is_corruption_err(), "{serialized:?}");
    }
}
