//! The signed forward request.
//!
//! A [`ForwardRequest`] is constructed per call, signed off-band over its
//! EIP-712 digest, and consumed exactly once by a successful execute.

use crate::eip712::{type_hash, Eip712Encoder};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Canonical type descriptor for the forward request struct.
pub const FORWARD_REQUEST_TYPE: &str = "ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,uint256 deadline,bytes data)";

/// A meta-transaction request: a call to `to` authorized by `from`'s
/// signature, relayed by the forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
	/// The original signer whose identity is forwarded to the target.
	pub from: Address,
	/// The target the payload is dispatched against.
	pub to: Address,
	/// Native value carried by the dispatched call.
	pub value: U256,
	/// Gas bound for the dispatched call.
	pub gas: u64,
	/// Sequential per-signer nonce; must equal the signer's next
	/// expected nonce.
	pub nonce: u64,
	/// Closed upper time bound: the request is valid while
	/// `now <= deadline`.
	pub deadline: u64,
	/// Opaque call payload for the target.
	pub data: Bytes,
}

impl ForwardRequest {
	/// EIP-712 struct hash: keccak256(typeHash || encoded fields in
	/// declared order). The dynamic `data` field is hashed before
	/// inclusion, never embedded verbatim.
	pub fn struct_hash(&self) -> B256 {
		let mut enc = Eip712Encoder::new();
		enc.push_b256(&type_hash(FORWARD_REQUEST_TYPE));
		enc.push_address(&self.from);
		enc.push_address(&self.to);
		enc.push_u256(self.value);
		enc.push_u64(self.gas);
		enc.push_u64(self.nonce);
		enc.push_u64(self.deadline);
		enc.push_b256(&keccak256(&self.data));
		keccak256(enc.finish())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn base_request() -> ForwardRequest {
		ForwardRequest {
			from: address!("00000000000000000000000000000000000000aa"),
			to: address!("00000000000000000000000000000000000000bb"),
			value: U256::ZERO,
			gas: 1_000_000,
			nonce: 0,
			deadline: u64::MAX,
			data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
		}
	}

	#[test]
	fn test_struct_hash_deterministic() {
		let req = base_request();
		assert_eq!(req.struct_hash(), req.struct_hash());
	}

	#[test]
	fn test_struct_hash_sensitive_to_fields() {
		let base = base_request().struct_hash();

		let mut req = base_request();
		req.nonce = 1;
		assert_ne!(req.struct_hash(), base);

		let mut req = base_request();
		req.deadline = 1;
		assert_ne!(req.struct_hash(), base);

		let mut req = base_request();
		req.data = Bytes::from(vec![0xde, 0xad]);
		assert_ne!(req.struct_hash(), base);
	}

	#[test]
	fn test_data_hashed_not_embedded() {
		// The struct hash preimage is always 8 fixed words regardless of
		// payload length: the data field contributes keccak256(data).
		let req = base_request();
		let mut enc = Eip712Encoder::new();
		enc.push_b256(&type_hash(FORWARD_REQUEST_TYPE));
		enc.push_address(&req.from);
		enc.push_address(&req.to);
		enc.push_u256(req.value);
		enc.push_u64(req.gas);
		enc.push_u64(req.nonce);
		enc.push_u64(req.deadline);
		enc.push_b256(&keccak256(&req.data));
		let preimage = enc.finish();
		assert_eq!(preimage.len(), 8 * 32);
		assert_eq!(req.struct_hash(), keccak256(preimage));

		// A large payload still yields the same fixed-size preimage shape.
		let mut large = base_request();
		large.data = Bytes::from(vec![0x42; 4096]);
		assert_eq!(large.struct_hash(), {
			let mut enc = Eip712Encoder::new();
			enc.push_b256(&type_hash(FORWARD_REQUEST_TYPE));
			enc.push_address(&large.from);
			enc.push_address(&large.to);
			enc.push_u256(large.value);
			enc.push_u64(large.gas);
			enc.push_u64(large.nonce);
			enc.push_u64(large.deadline);
			enc.push_b256(&keccak256(&large.data));
			keccak256(enc.finish())
		});
	}
}
