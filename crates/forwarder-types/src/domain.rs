//! The EIP-712 signing domain and its present-field set.
//!
//! A deployment may omit any of the five domain attributes (commonly the
//! salt, sometimes the chain id). The set of present fields is captured
//! once, as an explicit [`DomainFieldSet`], and communicated on the wire
//! as a bitmask (bit i set = field i present, in canonical order) so that
//! signing clients can reconstruct exactly the fields that were hashed.

use crate::eip712::{type_hash, Eip712Encoder};
use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// One of the five canonical EIP-712 domain attributes.
///
/// The canonical order is name, version, chainId, verifyingContract, salt;
/// both the type descriptor and the wire bitmask follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainField {
	Name,
	Version,
	ChainId,
	VerifyingContract,
	Salt,
}

impl DomainField {
	/// All fields in canonical order.
	pub const CANONICAL: [DomainField; 5] = [
		DomainField::Name,
		DomainField::Version,
		DomainField::ChainId,
		DomainField::VerifyingContract,
		DomainField::Salt,
	];

	/// The `type name` fragment this field contributes to the domain
	/// type descriptor.
	pub fn type_fragment(self) -> &'static str {
		match self {
			DomainField::Name => "string name",
			DomainField::Version => "string version",
			DomainField::ChainId => "uint256 chainId",
			DomainField::VerifyingContract => "address verifyingContract",
			DomainField::Salt => "bytes32 salt",
		}
	}

	fn index(self) -> usize {
		match self {
			DomainField::Name => 0,
			DomainField::Version => 1,
			DomainField::ChainId => 2,
			DomainField::VerifyingContract => 3,
			DomainField::Salt => 4,
		}
	}
}

/// The explicit set of domain fields present in a deployment.
///
/// Built once at domain-build time; call sites query it instead of
/// bit-testing a raw mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainFieldSet {
	present: [bool; 5],
}

impl DomainFieldSet {
	pub fn insert(&mut self, field: DomainField) {
		self.present[field.index()] = true;
	}

	pub fn contains(&self, field: DomainField) -> bool {
		self.present[field.index()]
	}

	pub fn is_empty(&self) -> bool {
		self.present.iter().all(|p| !p)
	}

	pub fn len(&self) -> usize {
		self.present.iter().filter(|p| **p).count()
	}

	/// Present fields in canonical order.
	pub fn iter(&self) -> impl Iterator<Item = DomainField> + '_ {
		DomainField::CANONICAL
			.into_iter()
			.filter(|f| self.contains(*f))
	}

	/// Wire bitmask: bit i set iff canonical field i is present.
	pub fn bitmask(&self) -> u8 {
		DomainField::CANONICAL
			.into_iter()
			.enumerate()
			.fold(0u8, |mask, (i, f)| {
				if self.contains(f) {
					mask | (1 << i)
				} else {
					mask
				}
			})
	}

	/// Reconstructs the set from a wire bitmask. Bits above the five
	/// canonical fields are ignored.
	pub fn from_bitmask(mask: u8) -> Self {
		let mut set = Self::default();
		for (i, field) in DomainField::CANONICAL.into_iter().enumerate() {
			if mask & (1 << i) != 0 {
				set.insert(field);
			}
		}
		set
	}
}

/// An EIP-712 signing domain.
///
/// Immutable once computed into a separator: the separator is a pure
/// deterministic function of the present fields in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chain_id: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verifying_contract: Option<Address>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub salt: Option<B256>,
}

impl Domain {
	/// A domain with the four commonly-present fields and no salt.
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		chain_id: u64,
		verifying_contract: Address,
	) -> Self {
		Self {
			name: Some(name.into()),
			version: Some(version.into()),
			chain_id: Some(chain_id),
			verifying_contract: Some(verifying_contract),
			salt: None,
		}
	}

	pub fn with_salt(mut self, salt: B256) -> Self {
		self.salt = Some(salt);
		self
	}

	/// The explicit set of fields present on this domain.
	pub fn fields(&self) -> DomainFieldSet {
		let mut set = DomainFieldSet::default();
		if self.name.is_some() {
			set.insert(DomainField::Name);
		}
		if self.version.is_some() {
			set.insert(DomainField::Version);
		}
		if self.chain_id.is_some() {
			set.insert(DomainField::ChainId);
		}
		if self.verifying_contract.is_some() {
			set.insert(DomainField::VerifyingContract);
		}
		if self.salt.is_some() {
			set.insert(DomainField::Salt);
		}
		set
	}

	/// Canonical type descriptor over the present fields only, e.g.
	/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`.
	pub fn type_descriptor(&self) -> String {
		let fragments: Vec<&str> = self.fields().iter().map(|f| f.type_fragment()).collect();
		format!("EIP712Domain({})", fragments.join(","))
	}

	/// The domain separator: keccak256(typeHash || encoded present fields
	/// in canonical order). String fields are hashed before inclusion.
	pub fn separator(&self) -> B256 {
		let mut enc = Eip712Encoder::new();
		enc.push_b256(&type_hash(&self.type_descriptor()));
		if let Some(name) = &self.name {
			enc.push_b256(&keccak256(name.as_bytes()));
		}
		if let Some(version) = &self.version {
			enc.push_b256(&keccak256(version.as_bytes()));
		}
		if let Some(chain_id) = self.chain_id {
			enc.push_u256(U256::from(chain_id));
		}
		if let Some(verifying_contract) = &self.verifying_contract {
			enc.push_address(verifying_contract);
		}
		if let Some(salt) = &self.salt {
			enc.push_b256(salt);
		}
		keccak256(enc.finish())
	}
}
