//! Validator identities and the stake registry used by proof-of-stake

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// A staked participant eligible to seal blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub id: String,
    pub stake: u64,
}

impl Validator {
    pub fn new(id: impl Into<String>, stake: u64) -> Self {
        Validator {
            id: id.into(),
            stake,
        }
    }
}

/// Registry of validators, checked entry by entry at construction.
///
/// Every registered validator carries a unique, non-empty id and a
/// positive stake. The registry itself may be empty; consumers that need
/// at least one validator (stake-weighted selection) enforce that at
/// their own boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
}

impl ValidatorRegistry {
    pub fn new(validators: Vec<Validator>) -> Result<Self> {
        for (position, validator) in validators.iter().enumerate() {
            if validator.id.is_empty() {
                return Err(ChainError::InvalidConfiguration(
                    "validator id must not be empty".to_string(),
                ));
            }
            if validator.stake == 0 {
                return Err(ChainError::InvalidConfiguration(format!(
                    "validator '{}' must stake a positive amount",
                    validator.id
                )));
            }
            // A duplicate id would draw with doubled weight.
            if validators[..position].iter().any(|v| v.id == validator.id) {
                return Err(ChainError::InvalidConfiguration(format!(
                    "validator '{}' is registered twice",
                    validator.id
                )));
            }
        }
        Ok(ValidatorRegistry { validators })
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Sum of all registered stakes.
    pub fn total_stake(&self) -> u64 {
        self.validators.iter().map(|v| v.stake).sum()
    }

    /// True when `id` is registered with a positive stake.
    pub fn contains_with_stake(&self, id: &str) -> bool {
        self.validators
            .iter()
            .any(|v| v.id == id && v.stake > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_accepts_valid_entries() {
        let registry = ValidatorRegistry::new(vec![
            Validator::new("V1", 50),
            Validator::new("V2", 30),
            Validator::new("V3", 20),
        ])
        .unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.total_stake(), 100);
    }

    #[test]
    fn test_registry_rejects_zero_stake() {
        let err = ValidatorRegistry::new(vec![Validator::new("V1", 0)]).unwrap_err();
        assert!(matches!(err, ChainError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_registry_rejects_empty_id() {
        let err = ValidatorRegistry::new(vec![Validator::new("", 10)]).unwrap_err();
        assert!(matches!(err, ChainError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let err = ValidatorRegistry::new(vec![
            Validator::new("V1", 50),
            Validator::new("V1", 10),
        ])
        .unwrap_err();
        assert!(matches!(err, ChainError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_empty_registry_is_allowed_here() {
        let registry = ValidatorRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.total_stake(), 0);
    }

    #[test]
    fn test_contains_with_stake() {
        let registry =
            ValidatorRegistry::new(vec![Validator::new("V1", 50), Validator::new("V2", 30)])
                .unwrap();
        assert!(registry.contains_with_stake("V1"));
        assert!(registry.contains_with_stake("V2"));
        assert!(!registry.contains_with_stake("V3"));
        assert!(!registry.contains_with_stake(""));
    }
}
