//! Ledger-facing call types.
//!
//! These types cross the seam between the forwarder and the ledger that
//! actually executes payloads: a dispatched call going out, an outcome
//! coming back.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A fully-resolved call handed to the ledger for atomic execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedCall {
	/// The contract/service the payload is executed against.
	pub target: Address,
	/// The transport-level caller the target observes (the forwarder
	/// itself for forwarded calls, never the original signer).
	pub caller: Address,
	/// Native value carried by the call.
	pub value: U256,
	/// Gas bound for the call.
	pub gas_limit: u64,
	/// The encoded payload, including any appended sender suffix.
	pub payload: Bytes,
}

/// Terminal result of a dispatched call.
///
/// `success == false` carries the revert reason in `output`; revert data
/// is surfaced to the caller, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
	pub success: bool,
	pub output: Bytes,
}

impl CallOutcome {
	pub fn succeeded(output: impl Into<Bytes>) -> Self {
		Self {
			success: true,
			output: output.into(),
		}
	}

	pub fn reverted(reason: impl Into<Bytes>) -> Self {
		Self {
			success: false,
			output: reason.into(),
		}
	}
}
