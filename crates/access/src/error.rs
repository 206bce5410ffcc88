use atomvar_primitives::{AccessMode, PrimType};
use strum::IntoStaticStr;
use thiserror::Error;

/// Failure raised by an access-point lookup or invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
	#[error("{mode} is not supported by {target}")]
	Unsupported { mode: AccessMode, target: String },

	#[error("index {index} out of bounds for length {length}")]
	ArrayIndexOutOfBounds { index: i32, length: usize },

	#[error("index {index} out of bounds for {size}-byte access with limit {limit}")]
	IndexOutOfBounds { index: i32, size: usize, limit: usize },

	#[error("null {0} argument")]
	NullReference(&'static str),

	#[error("{mode} writes to a read-only buffer")]
	ReadOnly { mode: AccessMode },

	#[error("{mode} requires a direct buffer")]
	HeapAtomicAccess { mode: AccessMode },

	#[error("{mode} at offset {offset} is not aligned to {size} bytes")]
	MisalignedAccess { mode: AccessMode, offset: usize, size: usize },

	#[error("no field `{name}` in {class}")]
	NoSuchField { class: String, name: String },

	#[error("field `{name}` in {class} is {}", field_kind(.is_static))]
	FieldKindMismatch { class: String, name: String, is_static: bool },

	#[error("field `{name}` in {class} has type {actual}, not {expected}")]
	FieldTypeMismatch { class: String, name: String, expected: PrimType, actual: PrimType },

	#[error("byte-buffer views of {0} are not supported")]
	UnsupportedView(PrimType),

	#[error("wrong method type for {mode}: {detail}")]
	WrongMethodType { mode: AccessMode, detail: String },

	#[error("cannot cast {found} to {expected}")]
	ClassCast { expected: String, found: String },
}

/// Coarse classification of an [`AccessError`].
///
/// Conformance checks compare kinds, never messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
	UnsupportedOperation,
	ArrayIndexOutOfBounds,
	IndexOutOfBounds,
	NullReference,
	ReadOnly,
	IllegalState,
	Lookup,
	WrongMethodType,
	ClassCast,
}

impl AccessError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Unsupported { .. } => ErrorKind::UnsupportedOperation,
			Self::ArrayIndexOutOfBounds { .. } => ErrorKind::ArrayIndexOutOfBounds,
			Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
			Self::NullReference(_) => ErrorKind::NullReference,
			Self::ReadOnly { .. } => ErrorKind::ReadOnly,
			Self::HeapAtomicAccess { .. } | Self::MisalignedAccess { .. } => ErrorKind::IllegalState,
			Self::NoSuchField { .. }
			| Self::FieldKindMismatch { .. }
			| Self::FieldTypeMismatch { .. }
			| Self::UnsupportedView(_) => ErrorKind::Lookup,
			Self::WrongMethodType { .. } => ErrorKind::WrongMethodType,
			Self::ClassCast { .. } => ErrorKind::ClassCast,
		}
	}

	pub(crate) fn wrong_type(mode: AccessMode, detail: impl Into<String>) -> Self {
		Self::WrongMethodType { mode, detail: detail.into() }
	}
}

fn field_kind(is_static: &bool) -> &'static str {
	if *is_static { "static" } else { "an instance field" }
}

impl ErrorKind {
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
