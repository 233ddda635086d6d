//! Error types for merklechain

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    InvalidConfiguration(String),
    InvalidTransaction(String),
    HashMismatch { index: u64 },
    BrokenLink { index: u64 },
    InvalidProof { index: u64 },
    EmptyValidatorSet,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            ChainError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            ChainError::HashMismatch { index } => {
                write!(f, "Stored hash does not match recomputed hash at block {}", index)
            }
            ChainError::BrokenLink { index } => {
                write!(f, "Previous-hash link broken at block {}", index)
            }
            ChainError::InvalidProof { index } => {
                write!(f, "Consensus proof failed verification at block {}", index)
            }
            ChainError::EmptyValidatorSet => {
                write!(f, "Validator set is empty or carries no stake")
            }
        }
    }
}

impl std::error::Error for ChainError {}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::InvalidConfiguration(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
