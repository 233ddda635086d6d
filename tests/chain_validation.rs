//! Integration tests for chain growth, payload batching, and integrity audits

use merklechain::block::{Block, ProofData};
use merklechain::chain::{Chain, GENESIS_PAYLOAD, GENESIS_PREVIOUS_HASH};
use merklechain::config::parse_config;
use merklechain::consensus::ConsensusStrategy;
use merklechain::error::ChainError;
use merklechain::merkle::MerkleTree;
use merklechain::timing::timed;
use merklechain::transaction::Transaction;

/// Helper to create a proof-of-work chain
fn pow_chain(difficulty: usize) -> Result<Chain, ChainError> {
    Chain::new(ConsensusStrategy::proof_of_work(difficulty)?)
}

/// Helper to build a small transfer batch
fn sample_batch() -> Vec<Transaction> {
    vec![
        Transaction::new("tx1", "Alice", "Bob", 50),
        Transaction::new("tx2", "Bob", "Charlie", 30),
        Transaction::new("tx3", "Charlie", "David", 20),
    ]
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_growing_chain_stays_valid() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut chain = pow_chain(1)?;

    chain.add_block("first")?;
    chain.add_block("second")?;
    chain.add_transactions(&sample_batch())?;

    // Genesis plus three appended blocks
    assert_eq!(chain.len(), 4);
    assert_eq!(chain.blocks[0].payload, GENESIS_PAYLOAD);
    assert_eq!(chain.blocks[0].previous_hash, GENESIS_PREVIOUS_HASH);
    for window in chain.blocks.windows(2) {
        assert_eq!(window[1].previous_hash, window[0].hash);
    }
    chain.audit()?;
    Ok(())
}

#[test]
fn test_batch_payload_matches_an_independent_tree() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(0)?;
    let batch = sample_batch();

    let sealed_payload = chain.add_transactions(&batch)?.payload.clone();

    // Rebuild the tree from the same encodings
    let leaves: Vec<String> = batch.iter().map(Transaction::encode).collect();
    let tree = MerkleTree::build(&leaves);
    assert_eq!(sealed_payload, tree.root_hash());

    // Every transaction in the batch is provable against that tree
    for leaf in &leaves {
        assert!(tree.verify_membership(leaf));
    }
    assert!(!tree.verify_membership("tx9MalloryEve999"));
    Ok(())
}

#[test]
fn test_audit_reports_the_first_violation() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(0)?;
    chain.add_block("one")?;
    chain.add_block("two")?;
    chain.add_block("three")?;

    // Tamper with two blocks; the audit names the earlier one
    chain.blocks[1].payload = "rewritten".to_string();
    chain.blocks[3].payload = "also rewritten".to_string();

    assert_eq!(
        chain.audit().unwrap_err(),
        ChainError::HashMismatch { index: 1 }
    );
    assert!(!chain.is_valid());
    Ok(())
}

#[test]
fn test_rewriting_history_breaks_at_the_successor() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(0)?;
    chain.add_block("one")?;
    chain.add_block("two")?;

    // Restore block 1's own consistency after the rewrite; its successor
    // still points at the old hash
    chain.blocks[1].payload = "rewritten".to_string();
    chain.blocks[1].hash = chain.blocks[1].compute_hash();

    assert_eq!(
        chain.audit().unwrap_err(),
        ChainError::BrokenLink { index: 2 }
    );
    Ok(())
}

#[test]
fn test_mixed_difficulty_history_audits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(1)?;
    chain.add_block("easy")?;

    chain.set_difficulty(2)?;
    chain.add_block("harder")?;

    chain.set_difficulty(0)?;
    chain.add_block("free")?;

    // Each block still verifies against the difficulty it was sealed under
    chain.audit()?;
    match chain.blocks[2].proof {
        ProofData::Work { difficulty, .. } => assert_eq!(difficulty, 2),
        _ => panic!("expected work proof"),
    }
    assert!(chain.blocks[2].hash.starts_with("00"));
    Ok(())
}

#[test]
fn test_pow_chain_from_config_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_config(
        r#"
        consensus = "proof-of-work"

        [pow]
        difficulty = 1
        "#,
    )?;

    let mut chain = Chain::from_config(&config)?;
    chain.add_block("configured")?;

    assert_eq!(chain.strategy().difficulty(), Some(1));
    // Genesis is mined under the configured difficulty too
    assert!(chain.blocks[0].hash.starts_with('0'));
    assert!(chain.blocks[1].hash.starts_with('0'));
    chain.audit()?;
    Ok(())
}

#[test]
fn test_pos_chain_from_config_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_config(
        r#"
        consensus = "proof-of-stake"

        [pos]
        seed = 42

        [[pos.validators]]
        id = "V1"
        stake = 50

        [[pos.validators]]
        id = "V2"
        stake = 30

        [[pos.validators]]
        id = "V3"
        stake = 20
        "#,
    )?;

    let mut first = Chain::from_config(&config)?;
    let mut second = Chain::from_config(&config)?;
    for payload in ["p1", "p2", "p3", "p4"] {
        first.add_block(payload)?;
        second.add_block(payload)?;
    }

    let sealed_ids = |chain: &Chain| -> Vec<String> {
        chain
            .blocks
            .iter()
            .map(|block| match &block.proof {
                ProofData::Stake { validator_id } => validator_id.clone(),
                other => panic!("expected stake proof, got {:?}", other),
            })
            .collect()
    };

    // Same seed, same draw sequence, genesis included
    assert_eq!(sealed_ids(&first), sealed_ids(&second));
    for id in sealed_ids(&first) {
        assert!(["V1", "V2", "V3"].contains(&id.as_str()));
    }
    first.audit()?;
    Ok(())
}

#[test]
fn test_block_serialization_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(1)?;
    chain.add_block("serialize me")?;

    let encoded = serde_json::to_string(chain.last_block())?;
    let decoded: Block = serde_json::from_str(&encoded)?;

    assert_eq!(&decoded, chain.last_block());
    assert!(decoded.hash_is_consistent());
    Ok(())
}

#[test]
fn test_timed_sealing_decorator() -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = pow_chain(2)?;

    let (sealed_index, elapsed) = timed(|| chain.add_block("timed").map(|block| block.index));

    assert_eq!(sealed_index?, 1);
    assert!(elapsed.as_nanos() > 0);
    chain.audit()?;
    Ok(())
}
