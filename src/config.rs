//! Configuration management for the ledger engine

use serde::Deserialize;
use std::fs;

use crate::consensus::ConsensusStrategy;
use crate::error::Result;
use crate::validator::{Validator, ValidatorRegistry};

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_consensus")]
    pub consensus: ConsensusKind,
    #[serde(default)]
    pub pow: PowConfig,
    #[serde(default)]
    pub pos: PosConfig,
}

/// Which consensus strategy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsensusKind {
    ProofOfWork,
    ProofOfStake,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PowConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PosConfig {
    #[serde(default)]
    pub validators: Vec<Validator>,
    /// Seed for the selection RNG. Omit for entropy-based draws.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            consensus: default_consensus(),
            pow: PowConfig::default(),
            pos: PosConfig::default(),
        }
    }
}

impl Default for PowConfig {
    fn default() -> Self {
        PowConfig {
            difficulty: default_difficulty(),
        }
    }
}

impl EngineConfig {
    /// Build the consensus strategy this configuration describes.
    ///
    /// Construction enforces the configuration rules: a satisfiable
    /// difficulty for proof-of-work, a non-empty registry of positively
    /// staked validators for proof-of-stake.
    pub fn strategy(&self) -> Result<ConsensusStrategy> {
        match self.consensus {
            ConsensusKind::ProofOfWork => ConsensusStrategy::proof_of_work(self.pow.difficulty),
            ConsensusKind::ProofOfStake => {
                let registry = ValidatorRegistry::new(self.pos.validators.clone())?;
                ConsensusStrategy::proof_of_stake(registry, self.pos.seed)
            }
        }
    }
}

fn default_consensus() -> ConsensusKind {
    ConsensusKind::ProofOfWork
}

fn default_difficulty() -> usize {
    2
}

/// Parse a TOML configuration string. An empty input yields the defaults.
pub fn parse_config(raw: &str) -> Result<EngineConfig> {
    let config: EngineConfig = if raw.trim().is_empty() {
        EngineConfig::default()
    } else {
        toml::from_str(raw)?
    };

    // Reject bad parameter combinations at load time rather than at the
    // first append.
    config.strategy()?;

    Ok(config)
}

/// Load configuration from a TOML file. A missing or empty file yields the
/// defaults.
pub fn load_config(path: &str) -> Result<EngineConfig> {
    let raw = fs::read_to_string(path).unwrap_or_default();
    parse_config(&raw)
}
