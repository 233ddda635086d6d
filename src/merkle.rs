//! Merkle tree summarizing an ordered batch of transaction payloads
//!
//! The tree is built once from the batch and never mutated: every node's
//! hash is a pure function of the leaf payloads underneath it. Parents own
//! their children exclusively, so dropping the tree drops every node and
//! no node is ever shared between trees.

use serde::{Deserialize, Serialize};

use crate::crypto::{sha256_hex, HexDigest};

/// A single node in the tree. Leaves own no children; internal nodes own
/// exactly two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleNode {
    pub hash: HexDigest,
    pub left: Option<Box<MerkleNode>>,
    pub right: Option<Box<MerkleNode>>,
}

impl MerkleNode {
    /// Leaf node: hash = digest of the raw payload.
    fn leaf(payload: &str) -> Self {
        MerkleNode {
            hash: sha256_hex(payload),
            left: None,
            right: None,
        }
    }

    /// Internal node: hash = digest of the children's concatenated hashes.
    fn parent(left: MerkleNode, right: MerkleNode) -> Self {
        let combined = format!("{}{}", left.hash, right.hash);
        MerkleNode {
            hash: sha256_hex(combined),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn contains(&self, target: &str) -> bool {
        if self.hash == target {
            return true;
        }
        self.left.as_deref().is_some_and(|n| n.contains(target))
            || self.right.as_deref().is_some_and(|n| n.contains(target))
    }
}

/// Binary hash tree over an ordered list of payload strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    pub root: Option<MerkleNode>,
}

impl MerkleTree {
    /// Build a tree from ordered leaf payloads.
    ///
    /// An empty batch yields a rootless tree (see [`MerkleTree::root_hash`]),
    /// not an error. A single payload yields a single leaf node whose hash
    /// is the payload digest, with no combination step.
    pub fn build<S: AsRef<str>>(leaves: &[S]) -> Self {
        let mut level: Vec<MerkleNode> = leaves
            .iter()
            .map(|payload| MerkleNode::leaf(payload.as_ref()))
            .collect();

        while level.len() > 1 {
            let mut parents = Vec::with_capacity((level.len() + 1) / 2);
            let mut nodes = level.into_iter();
            while let Some(left) = nodes.next() {
                // An odd-length level pairs its trailing node with a clone of
                // itself; dropping it instead would change every ancestor hash.
                let right = nodes.next().unwrap_or_else(|| left.clone());
                parents.push(MerkleNode::parent(left, right));
            }
            level = parents;
        }

        MerkleTree { root: level.pop() }
    }

    pub fn root(&self) -> Option<&MerkleNode> {
        self.root.as_ref()
    }

    /// Root digest of the batch, or the empty-string sentinel for a tree
    /// built from zero leaves.
    pub fn root_hash(&self) -> &str {
        self.root.as_ref().map_or("", |node| node.hash.as_str())
    }

    /// Check whether `candidate`'s digest appears anywhere in the tree.
    ///
    /// This searches the whole tree for a matching hash rather than walking
    /// a sibling path, so it certifies presence of the digest, not its
    /// position. A leaf digest colliding with an internal node's hash would
    /// match spuriously; with SHA-256 that is astronomically unlikely and
    /// accepted as part of this contract.
    pub fn verify_membership(&self, candidate: &str) -> bool {
        let target = sha256_hex(candidate);
        self.root
            .as_ref()
            .is_some_and(|node| node.contains(&target))
    }
}
