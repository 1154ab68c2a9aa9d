//! Signature recovery and verification.
//!
//! Signatures are 65-byte recoverable blobs (r || s || v). The verifier
//! is tagged with the signing scheme that produced the digest, since a
//! legacy `personal_sign` client wraps the digest in the Ethereum
//! signed-message prefix before signing while a typed-data client signs
//! the digest directly.

use crate::ForwarderError;
use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};
use serde::{Deserialize, Serialize};

/// Which signing scheme produced the digest being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningScheme {
	/// Current typed-data scheme: the EIP-712 digest is signed directly.
	#[default]
	Eip712,
	/// Legacy scheme: the digest is wrapped in the
	/// `\x19Ethereum Signed Message:\n32` prefix before signing.
	EthSign,
}

/// Recovers and validates signer identities from digests and signature
/// blobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier {
	scheme: SigningScheme,
}

impl SignatureVerifier {
	pub fn new(scheme: SigningScheme) -> Self {
		Self { scheme }
	}

	pub fn scheme(&self) -> SigningScheme {
		self.scheme
	}

	/// The hash actually signed under the active scheme.
	fn prehash(&self, digest: &B256) -> B256 {
		match self.scheme {
			SigningScheme::Eip712 => *digest,
			SigningScheme::EthSign => {
				let mut buf = Vec::with_capacity(28 + 32);
				buf.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
				buf.extend_from_slice(digest.as_slice());
				keccak256(buf)
			}
		}
	}

	/// Recovers the signer identity from a digest and a 65-byte
	/// signature blob.
	///
	/// Fails with `InvalidSignature` when the blob has the wrong length,
	/// the recovery id is out of range, curve recovery fails, or the
	/// recovered identity is the zero address.
	pub fn recover(&self, digest: &B256, signature: &[u8]) -> Result<Address, ForwarderError> {
		if signature.len() != 65 {
			return Err(ForwarderError::InvalidSignature);
		}
		let r = U256::from_be_slice(&signature[0..32]);
		let s = U256::from_be_slice(&signature[32..64]);
		let y_parity = match signature[64] {
			0 | 27 => false,
			1 | 28 => true,
			_ => return Err(ForwarderError::InvalidSignature),
		};
		let sig = PrimitiveSignature::new(r, s, y_parity);
		let recovered = sig
			.recover_address_from_prehash(&self.prehash(digest))
			.map_err(|_| ForwarderError::InvalidSignature)?;
		if recovered == Address::ZERO {
			return Err(ForwarderError::InvalidSignature);
		}
		Ok(recovered)
	}

	/// Pure verification: true iff the signature recovers to the
	/// expected identity. Never raises; malformed input is false.
	pub fn verify(&self, digest: &B256, signature: &[u8], expected: Address) -> bool {
		matches!(self.recover(digest, signature), Ok(recovered) if recovered == expected)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;

	fn signed_digest(signer: &PrivateKeySigner) -> (B256, Vec<u8>) {
		let digest = keccak256(b"forward request digest");
		let sig = signer.sign_hash_sync(&digest).unwrap();
		(digest, sig.as_bytes().to_vec())
	}

	#[test]
	fn test_recover_round_trip() {
		let signer = PrivateKeySigner::random();
		let verifier = SignatureVerifier::new(SigningScheme::Eip712);
		let (digest, sig) = signed_digest(&signer);
		assert_eq!(verifier.recover(&digest, &sig).unwrap(), signer.address());
		assert!(verifier.verify(&digest, &sig, signer.address()));
	}

	#[test]
	fn test_wrong_signer_is_false_not_error() {
		let signer = PrivateKeySigner::random();
		let other = PrivateKeySigner::random();
		let verifier = SignatureVerifier::default();
		let (digest, sig) = signed_digest(&signer);
		assert!(!verifier.verify(&digest, &sig, other.address()));
	}

	#[test]
	fn test_malformed_length_rejected() {
		let verifier = SignatureVerifier::default();
		let digest = keccak256(b"digest");
		assert!(matches!(
			verifier.recover(&digest, &[0u8; 64]),
			Err(ForwarderError::InvalidSignature)
		));
		assert!(matches!(
			verifier.recover(&digest, &[0u8; 66]),
			Err(ForwarderError::InvalidSignature)
		));
		assert!(!verifier.verify(&digest, &[], Address::ZERO));
	}

	#[test]
	fn test_recovery_id_out_of_range() {
		let signer = PrivateKeySigner::random();
		let verifier = SignatureVerifier::default();
		let (digest, mut sig) = signed_digest(&signer);
		sig[64] = 29;
		assert!(matches!(
			verifier.recover(&digest, &sig),
			Err(ForwarderError::InvalidSignature)
		));
	}

	#[test]
	fn test_legacy_v_values_accepted() {
		let signer = PrivateKeySigner::random();
		let verifier = SignatureVerifier::default();
		let (digest, mut sig) = signed_digest(&signer);
		// Normalize between 27/28 and 0/1 encodings of the recovery id.
		sig[64] = match sig[64] {
			27 => 0,
			28 => 1,
			v => v % 2,
		};
		assert_eq!(verifier.recover(&digest, &sig).unwrap(), signer.address());
	}

	#[test]
	fn test_eth_sign_scheme_changes_prehash() {
		let signer = PrivateKeySigner::random();
		let (digest, sig) = signed_digest(&signer);
		// A signature over the bare digest does not verify under the
		// prefixed legacy scheme.
		let legacy = SignatureVerifier::new(SigningScheme::EthSign);
		assert!(!legacy.verify(&digest, &sig, signer.address()));

		// Signing the prefixed hash does.
		let mut buf = Vec::new();
		buf.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
		buf.extend_from_slice(digest.as_slice());
		let prefixed_sig = signer.sign_hash_sync(&keccak256(buf)).unwrap();
		assert!(legacy.verify(&digest, &prefixed_sig.as_bytes(), signer.address()));
	}
}
