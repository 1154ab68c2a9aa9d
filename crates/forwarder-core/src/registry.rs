//! Domain registry: the active signing domain and its cached separator.
//!
//! The domain is computed once at construction and is immutable
//! thereafter; [`DomainRegistry::rebuild`] is the distinct, explicit
//! re-configuration operation. Reads are lock-free snapshots so
//! verification never contends with a rebuild.

use crate::ForwarderError;
use arc_swap::ArcSwap;
use forwarder_types::{Domain, DomainFieldSet};
use alloy_primitives::B256;
use std::sync::Arc;

struct DomainSnapshot {
	domain: Domain,
	separator: B256,
	fields: DomainFieldSet,
}

impl DomainSnapshot {
	fn build(domain: Domain) -> Result<Self, ForwarderError> {
		let fields = domain.fields();
		if fields.is_empty() {
			return Err(ForwarderError::Configuration(
				"domain has no present fields".to_string(),
			));
		}
		let separator = domain.separator();
		Ok(Self {
			domain,
			separator,
			fields,
		})
	}
}

/// Holds the last-built domain together with its separator and explicit
/// present-field set.
pub struct DomainRegistry {
	active: ArcSwap<DomainSnapshot>,
}

impl DomainRegistry {
	/// Builds the registry for a domain, caching its separator and
	/// field set. Fails with a configuration error when the domain has
	/// no present fields.
	pub fn new(domain: Domain) -> Result<Self, ForwarderError> {
		let snapshot = DomainSnapshot::build(domain)?;
		Ok(Self {
			active: ArcSwap::from_pointee(snapshot),
		})
	}

	/// The cached separator of the active domain.
	pub fn separator(&self) -> B256 {
		self.active.load().separator
	}

	/// The explicit set of fields present on the active domain.
	pub fn fields(&self) -> DomainFieldSet {
		self.active.load().fields
	}

	/// The last-built domain, exactly the subset used at build time.
	/// Signing clients must reconstruct this subset or verification
	/// will fail.
	pub fn active_domain(&self) -> Domain {
		self.active.load().domain.clone()
	}

	/// Explicitly replaces the active domain.
	///
	/// Signatures produced against the previous domain stop verifying
	/// after this; a rebuild with a field set signing clients do not
	/// expect is indistinguishable from a bad signature downstream.
	pub fn rebuild(&self, domain: Domain) -> Result<(), ForwarderError> {
		let snapshot = DomainSnapshot::build(domain)?;
		tracing::info!(
			fields = snapshot.fields.bitmask(),
			"rebuilding active signing domain"
		);
		self.active.store(Arc::new(snapshot));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn domain(version: &str) -> Domain {
		Domain::new(
			"Forwarder",
			version,
			1,
			address!("00000000000000000000000000000000000000f0"),
		)
	}

	#[test]
	fn test_separator_cached_and_stable() {
		let registry = DomainRegistry::new(domain("1")).unwrap();
		assert_eq!(registry.separator(), domain("1").separator());
		assert_eq!(registry.separator(), registry.separator());
		assert_eq!(registry.active_domain(), domain("1"));
		assert_eq!(registry.fields().bitmask(), 0b01111);
	}

	#[test]
	fn test_rebuild_swaps_separator() {
		let registry = DomainRegistry::new(domain("1")).unwrap();
		let before = registry.separator();
		registry.rebuild(domain("2")).unwrap();
		assert_ne!(registry.separator(), before);
		assert_eq!(registry.active_domain(), domain("2"));
	}

	#[test]
	fn test_empty_domain_rejected() {
		let empty = Domain {
			name: None,
			version: None,
			chain_id: None,
			verifying_contract: None,
			salt: None,
		};
		assert!(matches!(
			DomainRegistry::new(empty),
			Err(ForwarderError::Configuration(_))
		));
	}
}
