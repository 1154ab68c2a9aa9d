//! Core module of the meta-transaction forwarder.
//!
//! This module orchestrates the forwarding protocol: a relay accepts a
//! signed [`ForwardRequest`](forwarder_types::ForwardRequest), verifies
//! the signature against its EIP-712 digest, enforces replay and expiry
//! constraints, and dispatches the payload to the target with the
//! verified signer identity injected so the target can recover it.

use alloy_primitives::{Address, Bytes};
use thiserror::Error;

/// TOML configuration for the forwarder.
pub mod config;
/// The verification-and-dispatch orchestrator.
pub mod forwarder;
/// Ordered batch dispatch against a single target.
pub mod multicall;
/// Active signing domain with build-once separator caching.
pub mod registry;
/// Per-signer sequential nonce tracking.
pub mod replay;
/// Signature recovery and verification.
pub mod verifier;

pub use config::{Config, ConfigError, DomainConfig, ForwarderConfig};
pub use forwarder::Forwarder;
pub use multicall::{FailurePolicy, MulticallDispatcher};
pub use registry::DomainRegistry;
pub use replay::ReplayGuard;
pub use verifier::{SignatureVerifier, SigningScheme};

/// Errors that can occur while verifying or executing a forward request.
///
/// All variants are per-request rejections: none is fatal to the
/// forwarder, and except for [`ForwarderError::DispatchFailure`] none
/// mutates forwarder state.
#[derive(Debug, Error)]
pub enum ForwarderError {
	/// The signature is malformed or does not match the request signer.
	#[error("Invalid signature")]
	InvalidSignature,
	/// The provided nonce is not the signer's next expected nonce.
	#[error("Nonce mismatch for {signer}: expected {expected}, got {provided}")]
	NonceMismatch {
		signer: Address,
		expected: u64,
		provided: u64,
	},
	/// The request deadline has passed.
	#[error("Request expired: deadline {deadline}, current time {now}")]
	Expired { deadline: u64, now: u64 },
	/// The target call reverted. The nonce consumed for this request
	/// stays consumed; revert data is surfaced, not swallowed.
	#[error("Dispatch failed: target reverted with {output}")]
	DispatchFailure { output: Bytes },
	/// A multicall batch entry reverted under fail-fast policy.
	#[error("Batch entry {index} reverted with {output}")]
	BatchEntryFailed { index: usize, output: Bytes },
	/// Error from the underlying ledger, before the target ran.
	#[error("Ledger error: {0}")]
	Ledger(#[from] forwarder_ledger::LedgerError),
	/// The forwarder was configured inconsistently.
	#[error("Configuration error: {0}")]
	Configuration(String),
}
