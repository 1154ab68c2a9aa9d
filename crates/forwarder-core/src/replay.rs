//! Per-signer sequential nonce tracking.
//!
//! The nonce table maps each signer identity to its next expected nonce,
//! starting at 0 and strictly increasing by 1 per successfully executed
//! request. Entries persist for the lifetime of the forwarder and never
//! shrink.

use crate::ForwarderError;
use alloy_primitives::Address;
use dashmap::DashMap;

/// Tracks per-signer monotonic nonces and arbitrates replay.
#[derive(Debug, Default)]
pub struct ReplayGuard {
	nonces: DashMap<Address, u64>,
}

impl ReplayGuard {
	pub fn new() -> Self {
		Self::default()
	}

	/// The next expected nonce for a signer; 0 for unseen identities.
	/// Read-only.
	pub fn next_nonce(&self, signer: Address) -> u64 {
		self.nonces.get(&signer).map(|n| *n).unwrap_or(0)
	}

	/// Atomically consumes a nonce: succeeds and increments the stored
	/// nonce only if `provided` equals the next expected nonce,
	/// otherwise fails with `NonceMismatch` and performs no mutation.
	///
	/// The map entry holds a per-key lock for the duration of the
	/// compare-and-increment, so two concurrent calls with the same
	/// nonce admit exactly one. Distinct signers never contend.
	pub fn consume(&self, signer: Address, provided: u64) -> Result<(), ForwarderError> {
		let mut entry = self.nonces.entry(signer).or_insert(0);
		let expected = *entry;
		if provided != expected {
			return Err(ForwarderError::NonceMismatch {
				signer,
				expected,
				provided,
			});
		}
		*entry = expected + 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;
	use std::sync::{Arc, Barrier};

	const SIGNER: Address = address!("00000000000000000000000000000000000000aa");

	#[test]
	fn test_starts_at_zero() {
		let guard = ReplayGuard::new();
		assert_eq!(guard.next_nonce(SIGNER), 0);
	}

	#[test]
	fn test_sequential_consume() {
		let guard = ReplayGuard::new();
		for nonce in 0..5 {
			guard.consume(SIGNER, nonce).unwrap();
			assert_eq!(guard.next_nonce(SIGNER), nonce + 1);
		}
	}

	#[test]
	fn test_replay_rejected() {
		let guard = ReplayGuard::new();
		guard.consume(SIGNER, 0).unwrap();
		let err = guard.consume(SIGNER, 0).unwrap_err();
		assert!(matches!(
			err,
			ForwarderError::NonceMismatch {
				expected: 1,
				provided: 0,
				..
			}
		));
		assert_eq!(guard.next_nonce(SIGNER), 1);
	}

	#[test]
	fn test_gaps_rejected_not_skipped() {
		let guard = ReplayGuard::new();
		assert!(guard.consume(SIGNER, 2).is_err());
		// The failed attempt must not have advanced anything.
		assert_eq!(guard.next_nonce(SIGNER), 0);
		guard.consume(SIGNER, 0).unwrap();
	}

	#[test]
	fn test_signers_independent() {
		let guard = ReplayGuard::new();
		let other = address!("00000000000000000000000000000000000000bb");
		guard.consume(SIGNER, 0).unwrap();
		assert_eq!(guard.next_nonce(other), 0);
		guard.consume(other, 0).unwrap();
	}

	#[test]
	fn test_concurrent_consume_single_winner() {
		let guard = Arc::new(ReplayGuard::new());
		let barrier = Arc::new(Barrier::new(2));

		let handles: Vec<_> = (0..2)
			.map(|_| {
				let guard = Arc::clone(&guard);
				let barrier = Arc::clone(&barrier);
				std::thread::spawn(move || {
					barrier.wait();
					guard.consume(SIGNER, 0).is_ok()
				})
			})
			.collect();

		let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
		assert_eq!(guard.next_nonce(SIGNER), 1);
	}
}
