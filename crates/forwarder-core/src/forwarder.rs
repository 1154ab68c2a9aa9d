//! The forwarding orchestrator.
//!
//! Per request the forwarder runs a terminal state machine: compute the
//! digest from the active domain, check the signature, check the nonce,
//! check the deadline, then consume the nonce and dispatch the payload
//! with the verified signer appended so the target can recover it. Any
//! rejection is per-request and typed; none crashes the forwarder.
//!
//! Policy: the nonce is consumed immediately before dispatch, so a
//! reverting target still burns it. Verification rejections never touch
//! the nonce table.

use crate::config::Config;
use crate::registry::DomainRegistry;
use crate::replay::ReplayGuard;
use crate::verifier::{SignatureVerifier, SigningScheme};
use crate::ForwarderError;
use alloy_primitives::{Address, B256};
use forwarder_ledger::LedgerInterface;
use forwarder_types::{signing_digest, CallOutcome, DispatchedCall, Domain, ForwardRequest};
use std::sync::Arc;

/// Verifies and dispatches signed forward requests.
pub struct Forwarder {
	/// The forwarder's own address: the transport-level caller targets
	/// observe, and the trusted-forwarder identity they check against.
	address: Address,
	registry: DomainRegistry,
	replay: ReplayGuard,
	verifier: SignatureVerifier,
	ledger: Arc<dyn LedgerInterface>,
}

impl Forwarder {
	pub fn new(
		address: Address,
		domain: Domain,
		scheme: SigningScheme,
		ledger: Arc<dyn LedgerInterface>,
	) -> Result<Self, ForwarderError> {
		Ok(Self {
			address,
			registry: DomainRegistry::new(domain)?,
			replay: ReplayGuard::new(),
			verifier: SignatureVerifier::new(scheme),
			ledger,
		})
	}

	/// Like [`Forwarder::new`], but resolves the domain's chain id from
	/// the ledger, exactly once at construction.
	pub async fn with_ledger_chain_id(
		address: Address,
		mut domain: Domain,
		scheme: SigningScheme,
		ledger: Arc<dyn LedgerInterface>,
	) -> Result<Self, ForwarderError> {
		domain.chain_id = Some(ledger.chain_id().await?);
		Self::new(address, domain, scheme, ledger)
	}

	pub fn from_config(
		config: &Config,
		ledger: Arc<dyn LedgerInterface>,
	) -> Result<Self, ForwarderError> {
		Self::new(
			config.forwarder.address,
			config.forwarder.domain.to_domain(),
			config.forwarder.scheme,
			ledger,
		)
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// The stable domain-descriptor accessor: the wire bitmask of
	/// present fields together with the active domain, exactly the
	/// subset signing clients must reconstruct.
	pub fn eip712_domain(&self) -> (u8, Domain) {
		(
			self.registry.fields().bitmask(),
			self.registry.active_domain(),
		)
	}

	pub fn domain_separator(&self) -> B256 {
		self.registry.separator()
	}

	/// Explicit re-configuration of the signing domain.
	pub fn rebuild_domain(&self, domain: Domain) -> Result<(), ForwarderError> {
		self.registry.rebuild(domain)
	}

	/// The signer's next expected nonce.
	pub fn next_nonce(&self, signer: Address) -> u64 {
		self.replay.next_nonce(signer)
	}

	/// The EIP-712 signing digest of a request under the active domain.
	pub fn digest(&self, request: &ForwardRequest) -> B256 {
		signing_digest(&self.registry.separator(), &request.struct_hash())
	}

	/// Steps 1-4 of the request state machine, read-only: digest,
	/// signature, nonce equality, closed-bound deadline.
	async fn check(
		&self,
		request: &ForwardRequest,
		signature: &[u8],
	) -> Result<(), ForwarderError> {
		let digest = self.digest(request);
		if !self.verifier.verify(&digest, signature, request.from) {
			tracing::debug!(signer = %request.from, "signature verification failed");
			return Err(ForwarderError::InvalidSignature);
		}
		let expected = self.replay.next_nonce(request.from);
		if request.nonce != expected {
			tracing::debug!(
				signer = %request.from,
				expected,
				provided = request.nonce,
				"nonce mismatch"
			);
			return Err(ForwarderError::NonceMismatch {
				signer: request.from,
				expected,
				provided: request.nonce,
			});
		}
		let now = self.ledger.timestamp().await?;
		// Closed bound: a request expiring exactly now is still valid.
		if now > request.deadline {
			tracing::debug!(deadline = request.deadline, now, "request expired");
			return Err(ForwarderError::Expired {
				deadline: request.deadline,
				now,
			});
		}
		Ok(())
	}

	/// Pre-flight verification. Idempotent and side-effect-free: never
	/// consumes a nonce, never dispatches.
	pub async fn verify(&self, request: &ForwardRequest, signature: &[u8]) -> bool {
		self.check(request, signature).await.is_ok()
	}

	/// Verifies and dispatches a request.
	///
	/// On success returns the target's outcome. A reverting target is a
	/// [`ForwarderError::DispatchFailure`] carrying the revert data; the
	/// nonce consumed for the request stays consumed either way, and
	/// there is no automatic retry.
	pub async fn execute(
		&self,
		request: &ForwardRequest,
		signature: &[u8],
	) -> Result<CallOutcome, ForwarderError> {
		self.check(request, signature).await?;
		// The atomic compare-and-increment arbitrates concurrent
		// requests: the race loser fails here with NonceMismatch.
		self.replay.consume(request.from, request.nonce)?;

		let mut payload = request.data.to_vec();
		payload.extend_from_slice(request.from.as_slice());
		let call = DispatchedCall {
			target: request.to,
			caller: self.address,
			value: request.value,
			gas_limit: request.gas,
			payload: payload.into(),
		};
		tracing::debug!(
			signer = %request.from,
			target = %request.to,
			nonce = request.nonce,
			"dispatching forwarded call"
		);
		let outcome = self.ledger.execute(call).await?;
		if !outcome.success {
			tracing::warn!(
				signer = %request.from,
				target = %request.to,
				"forwarded call reverted"
			);
			return Err(ForwarderError::DispatchFailure {
				output: outcome.output,
			});
		}
		Ok(outcome)
	}
}
