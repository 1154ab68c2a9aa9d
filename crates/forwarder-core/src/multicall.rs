//! Ordered batch dispatch against a single target.
//!
//! A forwarded call can be decomposed into a batch of sub-calls, each
//! carrying its own packed sender-assertion suffix after the functional
//! payload. The dispatcher executes entries strictly in order and is
//! transport-agnostic: it appends the forwarder-injected identity to each
//! entry but never compares assertions itself; the target does.

use crate::ForwarderError;
use alloy_primitives::{Address, Bytes, U256};
use forwarder_ledger::LedgerInterface;
use forwarder_types::{CallOutcome, DispatchedCall};
use std::sync::Arc;

/// What to do when a batch entry fails.
///
/// Fail-fast is the default: partial application of a batch of stateful
/// calls is the riskier failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
	/// Abort the whole batch on the first failed entry.
	#[default]
	FailFast,
	/// Record every entry's outcome, failures included.
	CollectAll,
}

/// Dispatches an ordered batch of payloads against one target.
pub struct MulticallDispatcher {
	ledger: Arc<dyn LedgerInterface>,
	policy: FailurePolicy,
}

impl MulticallDispatcher {
	pub fn new(ledger: Arc<dyn LedgerInterface>) -> Self {
		Self {
			ledger,
			policy: FailurePolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn policy(&self) -> FailurePolicy {
		self.policy
	}

	/// Packs a batch entry: the functional payload followed by the
	/// fixed-offset sender assertion the target checks.
	pub fn encode_entry(payload: &[u8], asserted_sender: Address) -> Bytes {
		let mut entry = Vec::with_capacity(payload.len() + 20);
		entry.extend_from_slice(payload);
		entry.extend_from_slice(asserted_sender.as_slice());
		entry.into()
	}

	/// Executes each entry strictly in order as its own ledger call,
	/// with the verified signer appended to every entry.
	///
	/// Under fail-fast the first failed entry aborts the batch with
	/// [`ForwarderError::BatchEntryFailed`]; under collect-all every
	/// outcome is returned in entry order.
	pub async fn dispatch(
		&self,
		target: Address,
		caller: Address,
		verified_signer: Address,
		gas_limit: u64,
		entries: &[Bytes],
	) -> Result<Vec<CallOutcome>, ForwarderError> {
		let mut outcomes = Vec::with_capacity(entries.len());
		for (index, entry) in entries.iter().enumerate() {
			let mut payload = entry.to_vec();
			payload.extend_from_slice(verified_signer.as_slice());
			let call = DispatchedCall {
				target,
				caller,
				value: U256::ZERO,
				gas_limit,
				payload: payload.into(),
			};
			let outcome = self.ledger.execute(call).await?;
			if !outcome.success && self.policy == FailurePolicy::FailFast {
				tracing::debug!(index, "aborting batch on failed entry");
				return Err(ForwarderError::BatchEntryFailed {
					index,
					output: outcome.output,
				});
			}
			outcomes.push(outcome);
		}
		Ok(outcomes)
	}
}
