//! Ledger seam for the meta-transaction forwarder.
//!
//! The forwarder treats "execute this payload against that target" as one
//! atomic external operation. This module defines that seam: an async
//! interface supplying the chain identifier, the current time bound, and
//! payload execution, plus an in-memory implementation for tests and
//! development.

use async_trait::async_trait;
use forwarder_types::{CallOutcome, DispatchedCall};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

pub use implementations::memory::{
	forwarded_sender, CallContext, MemoryLedger, TargetContract,
};

/// Errors that can occur when interacting with the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// Error that occurs when the target is unknown to the ledger.
	#[error("Unknown target: {0}")]
	UnknownTarget(alloy_primitives::Address),
	/// Error that occurs during ledger-level execution, before the
	/// target itself runs (distinct from a target revert).
	#[error("Execution error: {0}")]
	Execution(String),
}

/// Trait defining the interface to the ledger that finalizes calls.
///
/// All operations are synchronous request/response from the forwarder's
/// point of view: there is no background retry or scheduling. A caller
/// that wants a timeout treats the `execute` call itself as the
/// cancellable unit.
#[async_trait]
pub trait LedgerInterface: Send + Sync {
	/// The ledger-assigned chain identifier.
	async fn chain_id(&self) -> Result<u64, LedgerError>;

	/// The current time/block bound deadlines are checked against.
	async fn timestamp(&self) -> Result<u64, LedgerError>;

	/// Executes a payload against a target atomically and reports the
	/// outcome. A target revert is a successful `execute` returning
	/// `CallOutcome { success: false, .. }` with the revert data.
	async fn execute(&self, call: DispatchedCall) -> Result<CallOutcome, LedgerError>;
}
