//! Configuration module for the forwarder.
//!
//! Supports loading configuration from TOML and validating it before any
//! component is constructed. The chain id is a single explicit parameter
//! here; it is threaded into domain construction once, never re-guessed
//! per call.
//!
//! ```toml
//! [forwarder]
//! address = "0x00000000000000000000000000000000000000f0"
//! scheme = "eip712"
//!
//! [forwarder.domain]
//! name = "Forwarder"
//! version = "1"
//! chain_id = 1
//! verifying_contract = "0x00000000000000000000000000000000000000f0"
//! ```

use crate::verifier::SigningScheme;
use alloy_primitives::{Address, B256};
use forwarder_types::Domain;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	pub forwarder: ForwarderConfig,
}

/// Configuration for the forwarder instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwarderConfig {
	/// The forwarder's own address.
	pub address: Address,
	/// Signing scheme verified against; defaults to eip712.
	#[serde(default)]
	pub scheme: SigningScheme,
	/// The signing domain, each field optional per deployment.
	pub domain: DomainConfig,
}

/// Domain configuration for EIP-712 signatures.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DomainConfig {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub chain_id: Option<u64>,
	#[serde(default)]
	pub verifying_contract: Option<Address>,
	#[serde(default)]
	pub salt: Option<B256>,
}

impl DomainConfig {
	pub fn to_domain(&self) -> Domain {
		Domain {
			name: self.name.clone(),
			version: self.version.clone(),
			chain_id: self.chain_id,
			verifying_contract: self.verifying_contract,
			salt: self.salt,
		}
	}
}

impl Config {
	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads, parses, and validates configuration from a file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml_str(&raw)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let domain = self.forwarder.domain.to_domain();
		if domain.fields().is_empty() {
			return Err(ConfigError::Validation(
				"forwarder.domain must declare at least one field".to_string(),
			));
		}
		if let Some(verifying_contract) = domain.verifying_contract {
			if verifying_contract != self.forwarder.address {
				return Err(ConfigError::Validation(format!(
					"forwarder.domain.verifying_contract {} does not match forwarder.address {}",
					verifying_contract, self.forwarder.address
				)));
			}
		}
		Ok(())
	}
}
