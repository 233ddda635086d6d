//! Consensus strategies for sealing and verifying blocks
//!
//! A chain runs exactly one strategy. Proof-of-work searches for a nonce
//! whose hash carries a leading-zero prefix; proof-of-stake draws a
//! validator with probability proportional to stake. Verification always
//! judges a block against the parameters sealed into the block itself, so
//! blocks produced under older settings still audit correctly after the
//! strategy's parameters change.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::block::{Block, ProofData};
use crate::crypto::DIGEST_HEX_LEN;
use crate::error::{ChainError, Result};
use crate::validator::{Validator, ValidatorRegistry};

/// The sealing rule a chain runs under.
///
/// Proof-of-stake carries its own random source so that selection is
/// reproducible when constructed with a seed. No global RNG is ever
/// consulted.
#[derive(Debug, Clone)]
pub enum ConsensusStrategy {
    ProofOfWork {
        difficulty: usize,
    },
    ProofOfStake {
        registry: ValidatorRegistry,
        rng: StdRng,
    },
}

impl ConsensusStrategy {
    /// Proof-of-work at the given difficulty (number of leading `'0'` hex
    /// characters required of a sealed hash).
    ///
    /// Difficulty zero accepts every hash. Difficulties beyond the digest
    /// width are unsatisfiable and rejected here rather than looping
    /// forever at sealing time.
    pub fn proof_of_work(difficulty: usize) -> Result<Self> {
        if difficulty > DIGEST_HEX_LEN {
            return Err(ChainError::InvalidConfiguration(format!(
                "difficulty {} exceeds the {} hex character digest width",
                difficulty, DIGEST_HEX_LEN
            )));
        }
        Ok(ConsensusStrategy::ProofOfWork { difficulty })
    }

    /// Proof-of-stake over `registry`, drawing from an RNG seeded with
    /// `seed` when given, or from entropy otherwise.
    pub fn proof_of_stake(registry: ValidatorRegistry, seed: Option<u64>) -> Result<Self> {
        if registry.is_empty() {
            return Err(ChainError::EmptyValidatorSet);
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(ConsensusStrategy::ProofOfStake { registry, rng })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConsensusStrategy::ProofOfWork { .. } => "proof-of-work",
            ConsensusStrategy::ProofOfStake { .. } => "proof-of-stake",
        }
    }

    /// Current difficulty, when running proof-of-work.
    pub fn difficulty(&self) -> Option<usize> {
        match self {
            ConsensusStrategy::ProofOfWork { difficulty } => Some(*difficulty),
            ConsensusStrategy::ProofOfStake { .. } => None,
        }
    }

    /// Current validator registry, when running proof-of-stake.
    pub fn validators(&self) -> Option<&ValidatorRegistry> {
        match self {
            ConsensusStrategy::ProofOfWork { .. } => None,
            ConsensusStrategy::ProofOfStake { registry, .. } => Some(registry),
        }
    }

    /// Change the difficulty future blocks are sealed under. Blocks already
    /// sealed keep the difficulty stored in their proof.
    pub fn set_difficulty(&mut self, new_difficulty: usize) -> Result<()> {
        if new_difficulty > DIGEST_HEX_LEN {
            return Err(ChainError::InvalidConfiguration(format!(
                "difficulty {} exceeds the {} hex character digest width",
                new_difficulty, DIGEST_HEX_LEN
            )));
        }
        match self {
            ConsensusStrategy::ProofOfWork { difficulty } => {
                *difficulty = new_difficulty;
                Ok(())
            }
            ConsensusStrategy::ProofOfStake { .. } => Err(ChainError::InvalidConfiguration(
                "difficulty only applies to proof-of-work".to_string(),
            )),
        }
    }

    /// Replace the validator set future blocks are drawn from. Blocks
    /// already sealed keep the validator id stored in their proof.
    pub fn set_validators(&mut self, new_registry: ValidatorRegistry) -> Result<()> {
        if new_registry.is_empty() {
            return Err(ChainError::EmptyValidatorSet);
        }
        match self {
            ConsensusStrategy::ProofOfStake { registry, .. } => {
                *registry = new_registry;
                Ok(())
            }
            ConsensusStrategy::ProofOfWork { .. } => Err(ChainError::InvalidConfiguration(
                "validators only apply to proof-of-stake".to_string(),
            )),
        }
    }

    /// Placeholder proof for a block that has not been sealed yet.
    pub fn initial_proof(&self) -> ProofData {
        match self {
            ConsensusStrategy::ProofOfWork { difficulty } => ProofData::Work {
                nonce: 0,
                difficulty: *difficulty,
            },
            ConsensusStrategy::ProofOfStake { .. } => ProofData::Stake {
                validator_id: String::new(),
            },
        }
    }

    /// Seal `block` under the strategy's current parameters.
    ///
    /// Proof-of-work counts nonces up from zero until the hash meets the
    /// difficulty target; the block's timestamp is left untouched while the
    /// nonce varies. Proof-of-stake makes a single weighted draw and stamps
    /// the chosen validator's id into the proof.
    pub fn seal(&mut self, block: &mut Block) -> Result<()> {
        match self {
            ConsensusStrategy::ProofOfWork { difficulty } => {
                let difficulty = *difficulty;
                let target = "0".repeat(difficulty);
                let mut nonce = 0u64;
                loop {
                    block.proof = ProofData::Work { nonce, difficulty };
                    block.hash = block.compute_hash();
                    if block.hash.starts_with(&target) {
                        break;
                    }
                    nonce += 1;
                }
                debug!(
                    "sealed block {} at difficulty {} after {} nonce attempts",
                    block.index,
                    difficulty,
                    nonce + 1
                );
                Ok(())
            }
            ConsensusStrategy::ProofOfStake { registry, rng } => {
                let validator_id = select_validator(registry, rng)?.id.clone();
                debug!("sealed block {} with validator {}", block.index, validator_id);
                block.proof = ProofData::Stake { validator_id };
                block.hash = block.compute_hash();
                Ok(())
            }
        }
    }

    /// Check a sealed block's proof against the parameters stored in the
    /// block itself.
    ///
    /// Proof-of-work requires a consistent hash with the stored
    /// difficulty's zero prefix. Proof-of-stake requires hash consistency
    /// only; the sealed validator id is not re-checked against the current
    /// registry, which may have changed since sealing. A proof variant that
    /// does not match the strategy never verifies.
    pub fn verify(&self, block: &Block) -> bool {
        match (self, &block.proof) {
            (ConsensusStrategy::ProofOfWork { .. }, ProofData::Work { difficulty, .. }) => {
                block.hash_is_consistent() && block.hash.starts_with(&"0".repeat(*difficulty))
            }
            (ConsensusStrategy::ProofOfStake { .. }, ProofData::Stake { .. }) => {
                block.hash_is_consistent()
            }
            _ => false,
        }
    }
}

/// Draw one validator with probability proportional to stake.
///
/// The draw is uniform over `[0, total_stake)`; walking the registry in
/// insertion order, the first validator whose cumulative stake exceeds the
/// draw wins. An empty registry or zero total stake is rejected before any
/// random number is consumed.
pub fn select_validator<'a, R: Rng>(
    registry: &'a ValidatorRegistry,
    rng: &mut R,
) -> Result<&'a Validator> {
    let total = registry.total_stake();
    if registry.is_empty() || total == 0 {
        return Err(ChainError::EmptyValidatorSet);
    }
    let draw = rng.gen_range(0..total);
    let mut cumulative = 0u64;
    for validator in registry.validators() {
        cumulative += validator.stake;
        if draw < cumulative {
            return Ok(validator);
        }
    }
    Err(ChainError::EmptyValidatorSet)
}
