//! Common types module for the meta-transaction forwarder.
//!
//! This module defines the core data types and structures shared across
//! the forwarder components: the signing domain, the forward request,
//! the ledger-facing call types, and the structured-data encoding
//! utilities they all hash with.

/// Ledger-facing call and outcome types.
pub mod call;
/// Signing domain, present-field set, and domain separator.
pub mod domain;
/// EIP-712 structured-data encoding utilities.
pub mod eip712;
/// The signed forward request and its struct hash.
pub mod request;

// Re-export all types for convenient access
pub use call::*;
pub use domain::*;
pub use eip712::*;
pub use request::*;
