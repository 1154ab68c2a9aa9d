//! In-memory ledger implementation.
//!
//! This module provides a memory-based implementation of the
//! LedgerInterface trait, useful for tests and development where no real
//! ledger is available. Targets are plain Rust values registered under an
//! address; the clock is settable so deadline behavior can be exercised
//! deterministically.

use crate::{LedgerError, LedgerInterface};
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use forwarder_types::{CallOutcome, DispatchedCall};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Splits the effective sender out of a forwarded payload.
///
/// When `caller` is the trusted forwarder and the payload is long enough,
/// the effective sender is the trailing 20-byte suffix the forwarder
/// appended after verification, and the functional payload is everything
/// before it. Otherwise the transport-level caller stands as the sender
/// and the payload is untouched. This is the target-side sender-assertion
/// accessor: the only channel by which a target learns the true signer.
pub fn forwarded_sender<'a>(
	caller: Address,
	trusted_forwarder: Address,
	payload: &'a [u8],
) -> (Address, &'a [u8]) {
	if caller == trusted_forwarder && payload.len() >= 20 {
		let split = payload.len() - 20;
		let sender = Address::from_slice(&payload[split..]);
		(sender, &payload[..split])
	} else {
		(caller, payload)
	}
}

/// Transport-level context a target observes for one call.
#[derive(Debug, Clone)]
pub struct CallContext {
	/// The immediate caller (the forwarder for forwarded calls).
	pub caller: Address,
	/// Native value carried by the call.
	pub value: U256,
	/// Gas bound for the call.
	pub gas_limit: u64,
}

/// A target registered with the in-memory ledger.
///
/// `call` returns the target's output, or the revert reason as `Err`.
pub trait TargetContract: Send + Sync {
	fn call(&self, ctx: &CallContext, payload: &[u8]) -> Result<Bytes, Bytes>;
}

/// In-memory ledger implementation.
pub struct MemoryLedger {
	chain_id: u64,
	timestamp: AtomicU64,
	targets: RwLock<HashMap<Address, Arc<dyn TargetContract>>>,
}

impl MemoryLedger {
	/// Creates a new MemoryLedger for the given chain id, with the clock
	/// at zero.
	pub fn new(chain_id: u64) -> Self {
		Self {
			chain_id,
			timestamp: AtomicU64::new(0),
			targets: RwLock::new(HashMap::new()),
		}
	}

	/// Sets the ledger clock.
	pub fn set_timestamp(&self, timestamp: u64) {
		self.timestamp.store(timestamp, Ordering::SeqCst);
	}

	/// Registers a target under an address, replacing any previous
	/// registration.
	pub async fn register_target(&self, address: Address, target: Arc<dyn TargetContract>) {
		let mut targets = self.targets.write().await;
		targets.insert(address, target);
	}
}

#[async_trait]
impl LedgerInterface for MemoryLedger {
	async fn chain_id(&self) -> Result<u64, LedgerError> {
		Ok(self.chain_id)
	}

	async fn timestamp(&self) -> Result<u64, LedgerError> {
		Ok(self.timestamp.load(Ordering::SeqCst))
	}

	async fn execute(&self, call: DispatchedCall) -> Result<CallOutcome, LedgerError> {
		let target = {
			let targets = self.targets.read().await;
			targets
				.get(&call.target)
				.cloned()
				.ok_or(LedgerError::UnknownTarget(call.target))?
		};
		let ctx = CallContext {
			caller: call.caller,
			value: call.value,
			gas_limit: call.gas_limit,
		};
		let outcome = match target.call(&ctx, &call.payload) {
			Ok(output) => CallOutcome::succeeded(output),
			Err(reason) => {
				tracing::debug!(target_address = %call.target, "target call reverted");
				CallOutcome::reverted(reason)
			}
		};
		Ok(outcome)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	/// Echoes the effective sender back as the call output.
	struct SenderEcho {
		trusted_forwarder: Address,
	}

	impl TargetContract for SenderEcho {
		fn call(&self, ctx: &CallContext, payload: &[u8]) -> Result<Bytes, Bytes> {
			let (sender, _rest) = forwarded_sender(ctx.caller, self.trusted_forwarder, payload);
			Ok(Bytes::from(sender.to_vec()))
		}
	}

	const FORWARDER: Address = address!("00000000000000000000000000000000000000f0");
	const SIGNER: Address = address!("00000000000000000000000000000000000000aa");
	const TARGET: Address = address!("00000000000000000000000000000000000000bb");

	fn forwarded_call(payload: Vec<u8>, caller: Address) -> DispatchedCall {
		DispatchedCall {
			target: TARGET,
			caller,
			value: U256::ZERO,
			gas_limit: 1_000_000,
			payload: Bytes::from(payload),
		}
	}

	#[tokio::test]
	async fn test_forwarded_sender_split() {
		let mut payload = b"ping".to_vec();
		payload.extend_from_slice(SIGNER.as_slice());

		let (sender, rest) = forwarded_sender(FORWARDER, FORWARDER, &payload);
		assert_eq!(sender, SIGNER);
		assert_eq!(rest, b"ping");
	}

	#[tokio::test]
	async fn test_untrusted_caller_keeps_transport_sender() {
		let other = address!("00000000000000000000000000000000000000cc");
		let mut payload = b"ping".to_vec();
		payload.extend_from_slice(SIGNER.as_slice());

		// Suffix is only honored when the caller is the trusted forwarder.
		let (sender, rest) = forwarded_sender(other, FORWARDER, &payload);
		assert_eq!(sender, other);
		assert_eq!(rest.len(), payload.len());
	}

	#[tokio::test]
	async fn test_execute_reaches_registered_target() {
		let ledger = MemoryLedger::new(1);
		ledger
			.register_target(
				TARGET,
				Arc::new(SenderEcho {
					trusted_forwarder: FORWARDER,
				}),
			)
			.await;

		let mut payload = b"ping".to_vec();
		payload.extend_from_slice(SIGNER.as_slice());
		let outcome = ledger
			.execute(forwarded_call(payload, FORWARDER))
			.await
			.unwrap();
		assert!(outcome.success);
		assert_eq!(outcome.output.as_ref(), SIGNER.as_slice());
	}

	#[tokio::test]
	async fn test_execute_unknown_target() {
		let ledger = MemoryLedger::new(1);
		let result = ledger.execute(forwarded_call(vec![], FORWARDER)).await;
		assert!(matches!(result, Err(LedgerError::UnknownTarget(_))));
	}

	#[tokio::test]
	async fn test_settable_clock() {
		let ledger = MemoryLedger::new(1);
		assert_eq!(ledger.timestamp().await.unwrap(), 0);
		ledger.set_timestamp(1_000);
		assert_eq!(ledger.timestamp().await.unwrap(), 1_000);
		assert_eq!(ledger.chain_id().await.unwrap(), 1);
	}
}
