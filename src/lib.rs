//! MerkleChain - An append-only ledger with pluggable consensus
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`chain`] - Chain assembly and integrity auditing
//! - [`block`] - Block structure and hashing
//! - [`merkle`] - Merkle tree payload summaries
//! - [`transaction`] - Transfer records
//!
//! ## Consensus
//! - [`consensus`] - Proof-of-work and proof-of-stake sealing
//! - [`validator`] - Validator identities and the stake registry
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 hashing primitives
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`timing`] - Wall-clock timing helpers

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod chain;
pub mod merkle;
pub mod transaction;

// ============================================================================
// Consensus
// ============================================================================
pub mod consensus;
pub mod validator;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod timing;
