//! Harness configuration.

use std::path::{Path, PathBuf};

use atomvar_primitives::{ByteOrder, PrimType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::invoker::InvokerKind;
use crate::oracle::RetryPolicy;

/// Errors raised while loading a [`HarnessConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	/// A count or length that must be positive is zero.
	#[error("`{0}` must be greater than zero")]
	Zero(&'static str),

	#[error("buffer_length {0} is shorter than the widest view (8 bytes)")]
	BufferTooShort(usize),

	#[error("`{0}` selects nothing")]
	EmptySelection(&'static str),
}

/// Knobs of a matrix run. Every field has a default, so an empty document is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
	/// Repeat count of access scenarios.
	pub iterations: u32,
	/// Attempt budget of a weak compare-and-set expected to succeed.
	pub weak_cas_attempts: u32,
	pub yield_between_attempts: bool,
	pub array_length: usize,
	pub buffer_length: usize,
	pub types: Vec<PrimType>,
	pub byte_orders: Vec<ByteOrder>,
	pub invokers: Vec<InvokerKind>,
}

impl Default for HarnessConfig {
	fn default() -> Self {
		Self {
			iterations: 10,
			weak_cas_attempts: 10,
			yield_between_attempts: false,
			array_length: 10,
			buffer_length: 16,
			types: PrimType::all().collect(),
			byte_orders: vec![ByteOrder::BigEndian, ByteOrder::LittleEndian],
			invokers: InvokerKind::all().collect(),
		}
	}
}

impl HarnessConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let source =
			std::fs::read_to_string(path).map_err(|error| ConfigError::Io { path: path.to_path_buf(), error })?;
		Self::from_toml(&source)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		for (name, value) in [
			("iterations", self.iterations as usize),
			("weak_cas_attempts", self.weak_cas_attempts as usize),
			("array_length", self.array_length),
		] {
			if value == 0 {
				return Err(ConfigError::Zero(name));
			}
		}
		if self.buffer_length < 8 {
			return Err(ConfigError::BufferTooShort(self.buffer_length));
		}
		if self.types.is_empty() {
			return Err(ConfigError::EmptySelection("types"));
		}
		if self.byte_orders.is_empty() {
			return Err(ConfigError::EmptySelection("byte_orders"));
		}
		if self.invokers.is_empty() {
			return Err(ConfigError::EmptySelection("invokers"));
		}
		Ok(())
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy { attempts: self.weak_cas_attempts, yield_between: self.yield_between_attempts }
	}
}

#[cfg(test)]
mod tests;
