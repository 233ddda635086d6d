//! Append-only chain of sealed blocks
//!
//! The chain owns its consensus strategy. Appending constructs a block
//! linked to the current tip, hands it to the strategy for sealing, and
//! stores it. Auditing replays the recorded chain against the rules each
//! block was sealed under, reporting the first violation it finds.

use tracing::{info, warn};

use crate::block::Block;
use crate::config::EngineConfig;
use crate::consensus::ConsensusStrategy;
use crate::error::{ChainError, Result};
use crate::merkle::MerkleTree;
use crate::transaction::Transaction;
use crate::validator::ValidatorRegistry;

pub const GENESIS_PAYLOAD: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Debug, Clone)]
pub struct Chain {
    /// Every block from genesis onward. Never empty.
    pub blocks: Vec<Block>,
    strategy: ConsensusStrategy,
}

impl Chain {
    /// Create a chain holding only the genesis block.
    ///
    /// Genesis is a fixed sentinel: index 0, the genesis payload, and the
    /// literal `"0"` as previous hash. Its proof is produced by the
    /// strategy under construction-time parameters, like any later
    /// block's. Audits never re-derive it; its stored hash anchors
    /// block 1's link.
    pub fn new(mut strategy: ConsensusStrategy) -> Result<Self> {
        let mut genesis = Block::new(
            0,
            GENESIS_PAYLOAD,
            GENESIS_PREVIOUS_HASH,
            strategy.initial_proof(),
        );
        strategy.seal(&mut genesis)?;
        info!(
            "created {} chain, genesis hash {}",
            strategy.name(),
            genesis.hash
        );
        Ok(Chain {
            blocks: vec![genesis],
            strategy,
        })
    }

    /// Create a chain from a loaded configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Chain::new(config.strategy()?)
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn strategy(&self) -> &ConsensusStrategy {
        &self.strategy
    }

    /// Seal a block carrying `payload` onto the tip of the chain.
    pub fn add_block(&mut self, payload: impl Into<String>) -> Result<&Block> {
        let index = self.blocks.len() as u64;
        let previous_hash = self.last_block().hash.clone();
        let mut block = Block::new(index, payload, previous_hash, self.strategy.initial_proof());
        self.strategy.seal(&mut block)?;
        info!("appended block {} via {}", block.index, self.strategy.name());
        self.blocks.push(block);
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Seal a block whose payload is the Merkle root of `transactions`.
    ///
    /// Every transaction must be well formed. An empty batch is not an
    /// error; it produces the empty-root sentinel as payload.
    pub fn add_transactions(&mut self, transactions: &[Transaction]) -> Result<&Block> {
        for (position, tx) in transactions.iter().enumerate() {
            if !tx.is_valid() {
                return Err(ChainError::InvalidTransaction(format!(
                    "batch record {} has blank fields",
                    position
                )));
            }
        }
        let leaves: Vec<String> = transactions.iter().map(Transaction::encode).collect();
        let tree = MerkleTree::build(&leaves);
        self.add_block(tree.root_hash().to_string())
    }

    /// Change the difficulty future blocks are sealed under.
    pub fn set_difficulty(&mut self, difficulty: usize) -> Result<()> {
        self.strategy.set_difficulty(difficulty)?;
        info!("difficulty set to {} for future blocks", difficulty);
        Ok(())
    }

    /// Replace the validator set future blocks are drawn from.
    pub fn set_validators(&mut self, registry: ValidatorRegistry) -> Result<()> {
        self.strategy.set_validators(registry)?;
        info!("validator set replaced for future blocks");
        Ok(())
    }

    /// Walk the chain from block 1 and report the first violation found.
    ///
    /// Each block is checked in order: its stored hash must match a fresh
    /// recomputation, its previous-hash field must equal the predecessor's
    /// stored hash, and its proof must hold under the parameters sealed
    /// into the block itself. The reported index is the block's position
    /// in the chain.
    pub fn audit(&self) -> Result<()> {
        for position in 1..self.blocks.len() {
            let block = &self.blocks[position];
            let previous = &self.blocks[position - 1];
            let index = position as u64;

            if !block.hash_is_consistent() {
                let violation = ChainError::HashMismatch { index };
                warn!("chain audit failed: {}", violation);
                return Err(violation);
            }
            if block.previous_hash != previous.hash {
                let violation = ChainError::BrokenLink { index };
                warn!("chain audit failed: {}", violation);
                return Err(violation);
            }
            if !self.strategy.verify(block) {
                let violation = ChainError::InvalidProof { index };
                warn!("chain audit failed: {}", violation);
                return Err(violation);
            }
        }
        Ok(())
    }

    /// True when [`Chain::audit`] finds no violation.
    pub fn is_valid(&self) -> bool {
        self.audit().is_ok()
    }
}
