use atomvar_access::{AccessError, ErrorKind};
use atomvar_primitives::{AccessMode, ReturnShape, Value};
use thiserror::Error;

/// Why a test case failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
	#[error("cannot resolve {target}: {error}")]
	Resolve { target: String, error: AccessError },

	#[error("{mode}: expected {expected}, got {actual}")]
	ValueMismatch { mode: AccessMode, expected: Value, actual: Value },

	#[error("{mode}: expected witness {expected}, got {actual}")]
	WitnessMismatch { mode: AccessMode, expected: bool, actual: bool },

	#[error("{mode}: expected a {expected:?} result, got {actual:?}")]
	ShapeMismatch { mode: AccessMode, expected: ReturnShape, actual: ReturnShape },

	#[error("{mode}: unexpected error: {error}")]
	UnexpectedError { mode: AccessMode, error: AccessError },

	#[error("{mode}: expected a {expected} failure, but the call succeeded")]
	MissingError { mode: AccessMode, expected: ErrorKind },

	#[error("{mode}: expected a {expected} failure, got {actual}")]
	WrongErrorKind { mode: AccessMode, expected: ErrorKind, actual: AccessError },

	#[error("{mode}: weak CAS never succeeded in {attempts} attempts")]
	WeakCasExhausted { mode: AccessMode, attempts: u32 },

	#[error("{mode}: failing call changed the location from {before} to {after}")]
	Mutated { mode: AccessMode, before: String, after: String },

	#[error("{mode}: direct and {invoker} paths diverge: {detail}")]
	PathDivergence { mode: AccessMode, invoker: &'static str, detail: String },

	#[error("capability of {mode}: runtime reports {runtime}, expected {expected}")]
	CapabilityMismatch { mode: AccessMode, runtime: bool, expected: bool },

	#[error("descriptor mismatch: {0}")]
	Descriptor(String),

	#[error("identity violated: {0}")]
	Identity(String),

	#[error("lazy initialization: {0}")]
	LazyInit(String),
}

impl Failure {
	/// Checks an invocation result against an expected failure kind.
	pub fn expect_error<T>(mode: AccessMode, expected: ErrorKind, result: Result<T, AccessError>) -> Result<(), Self> {
		match result {
			Ok(_) => Err(Self::MissingError { mode, expected }),
			Err(error) if error.kind() == expected => Ok(()),
			Err(actual) => Err(Self::WrongErrorKind { mode, expected, actual }),
		}
	}

	pub fn expect_value(mode: AccessMode, expected: Value, actual: Value) -> Result<(), Self> {
		if expected == actual { Ok(()) } else { Err(Self::ValueMismatch { mode, expected, actual }) }
	}

	pub fn expect_witness(mode: AccessMode, expected: bool, actual: bool) -> Result<(), Self> {
		if expected == actual { Ok(()) } else { Err(Self::WitnessMismatch { mode, expected, actual }) }
	}
}
