//! Block structure and hashing
//!
//! A block commits to its position, creation time, payload, and the hash of
//! its predecessor. The proof it carries depends on how the chain seals
//! blocks: a nonce and difficulty for proof-of-work, a validator id for
//! proof-of-stake. The proof variant contributes to the hash preimage, so a
//! sealed block cannot have its proof swapped without breaking its hash.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::crypto::HexDigest;

/// Consensus-specific data sealed into a block.
///
/// Exactly one variant applies to any given block. For `Work`, only the
/// nonce enters the hash preimage; the difficulty is stored alongside so
/// that audits can re-check the block against the rules it was mined under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofData {
    Work { nonce: u64, difficulty: usize },
    Stake { validator_id: String },
}

impl ProofData {
    /// The proof's contribution to the hash preimage: the nonce rendered in
    /// decimal for work, the validator id for stake (empty until assigned).
    fn preimage_part(&self) -> String {
        match self {
            ProofData::Work { nonce, .. } => nonce.to_string(),
            ProofData::Stake { validator_id } => validator_id.clone(),
        }
    }
}

/// A single link in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Milliseconds since the Unix epoch, stamped once at construction.
    /// Sealing a block never re-stamps it.
    pub timestamp: u64,
    /// Literal data, or the Merkle root summarizing a transaction batch.
    pub payload: String,
    pub previous_hash: HexDigest,
    pub proof: ProofData,
    pub hash: HexDigest,
}

impl Block {
    /// Create a block at `index` linking back to `previous_hash`.
    ///
    /// The timestamp is taken from the clock here and never changes
    /// afterwards; the stored hash starts out consistent with the fields.
    pub fn new(
        index: u64,
        payload: impl Into<String>,
        previous_hash: impl Into<HexDigest>,
        proof: ProofData,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp: Utc::now().timestamp_millis() as u64,
            payload: payload.into(),
            previous_hash: previous_hash.into(),
            proof,
            hash: HexDigest::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the block's hash from its current fields.
    ///
    /// The preimage concatenates, in order: index, timestamp, payload,
    /// previous hash, and the proof contribution. Field order is fixed;
    /// reordering any part would produce a different digest.
    pub fn compute_hash(&self) -> HexDigest {
        let mut hasher = Sha256::new();
        hasher.update(self.index.to_string());
        hasher.update(self.timestamp.to_string());
        hasher.update(&self.payload);
        hasher.update(&self.previous_hash);
        hasher.update(self.proof.preimage_part());
        hex::encode(hasher.finalize())
    }

    /// True when the stored hash matches a fresh recomputation.
    pub fn hash_is_consistent(&self) -> bool {
        self.hash == self.compute_hash()
    }
}
