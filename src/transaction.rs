//! Transfer records summarized into block payloads

use serde::{Deserialize, Serialize};

/// A single transfer between two parties.
///
/// Transactions are not signed or balance-checked here; they are payload
/// records whose encodings become Merkle leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
    ) -> Self {
        Transaction {
            id: id.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Canonical string form hashed into a Merkle leaf: id, sender,
    /// receiver, and amount concatenated in that order.
    pub fn encode(&self) -> String {
        format!("{}{}{}{}", self.id, self.sender, self.receiver, self.amount)
    }

    /// A transaction is well formed when id, sender, and receiver are all
    /// non-empty. Zero amounts are allowed.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.sender.is_empty() && !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_concatenates_fields_in_order() {
        let tx = Transaction::new("tx1", "Alice", "Bob", 50);
        assert_eq!(tx.encode(), "tx1AliceBob50");
    }

    #[test]
    fn test_well_formed_transaction_is_valid() {
        let tx = Transaction::new("tx1", "Alice", "Bob", 0);
        assert!(tx.is_valid());
    }

    #[test]
    fn test_missing_fields_invalidate() {
        assert!(!Transaction::new("", "Alice", "Bob", 10).is_valid());
        assert!(!Transaction::new("tx1", "", "Bob", 10).is_valid());
        assert!(!Transaction::new("tx1", "Alice", "", 10).is_valid());
    }
}
