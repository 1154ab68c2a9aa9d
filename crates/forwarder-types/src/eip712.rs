//! EIP-712 structured-data encoding utilities shared across the forwarder.
//!
//! These helpers provide:
//! - Type-descriptor hashing (keccak256 of the canonical type string)
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - A minimal ABI encoder for the static EIP-712 word types used here

use alloy_primitives::{keccak256, Address, B256, U256};

/// Compute the hash of a canonical type descriptor string, e.g.
/// `ForwardRequest(address from,...)`.
pub fn type_hash(descriptor: &str) -> B256 {
	keccak256(descriptor.as_bytes())
}

/// Compute the final EIP-712 signing digest:
/// keccak256(0x19 || 0x01 || domainSeparator || structHash).
pub fn signing_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_separator.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
///
/// Every pushed value occupies exactly one 32-byte word. Dynamic-length
/// values (bytes, string) must be hashed by the caller and pushed as a
/// `B256` word; they are never embedded verbatim.
pub struct Eip712Encoder {
	buf: Vec<u8>,
}

impl Default for Eip712Encoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712Encoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u64(&mut self, v: u64) {
		let mut word = [0u8; 32];
		word[24..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
