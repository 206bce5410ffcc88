//! Expected capability of every access mode on a variable source.
//!
//! These tables are written independently of the runtime's enforcement so
//! the two check each other. Everything here is a pure function of the
//! source's static [`Profile`].

use atomvar_access::ErrorKind;
use atomvar_primitives::{AccessFamily, AccessMode, MemoryMode, PrimType};

/// Kind of variable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
	InstanceField,
	StaticField,
	ArrayElement,
	BufferView,
}

/// Static properties of a variable source that decide its capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
	pub kind: SourceKind,
	pub ty: PrimType,
	pub is_final: bool,
	/// Memory mode of a buffer view.
	pub memory: Option<MemoryMode>,
	/// Array length or buffer limit.
	pub length: Option<usize>,
}

bitflags::bitflags! {
	/// Runtime gates a conditional mode is subject to, checked in
	/// declaration order.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct GateSet: u8 {
		/// Heap backing fails with an illegal-state error.
		const DIRECT = 1 << 0;
		/// An offset that is not a multiple of the type size fails with an
		/// illegal-state error.
		const ALIGNED = 1 << 1;
		/// A read-only buffer fails with a read-only violation.
		const WRITABLE = 1 << 2;
	}
}

/// Declared support of one access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
	Supported,
	Unsupported,
	/// Supported subject to the given runtime gates.
	Conditional(GateSet),
}

impl Support {
	pub fn gates(self) -> GateSet {
		match self {
			Self::Conditional(gates) => gates,
			Self::Supported | Self::Unsupported => GateSet::empty(),
		}
	}
}

/// Whether `family` applies to values of `ty` at all.
fn family_applies(ty: PrimType, family: AccessFamily) -> bool {
	match family {
		AccessFamily::GetAndAdd => !matches!(ty, PrimType::Boolean),
		AccessFamily::GetAndBitwise => !matches!(ty, PrimType::Float | PrimType::Double),
		_ => true,
	}
}

pub fn is_supported(profile: &Profile, mode: AccessMode) -> Support {
	let family = mode.family();
	if !family_applies(profile.ty, family) {
		return Support::Unsupported;
	}
	match profile.kind {
		SourceKind::InstanceField | SourceKind::StaticField => {
			if profile.is_final && family != AccessFamily::Read {
				Support::Unsupported
			} else {
				Support::Supported
			}
		}
		SourceKind::ArrayElement => Support::Supported,
		SourceKind::BufferView => {
			let read_only = profile.memory.is_some_and(MemoryMode::is_read_only);
			let mut gates = GateSet::empty();
			if !mode.is_plain_access() {
				if !profile.ty.view_supports_atomic_access() {
					return Support::Unsupported;
				}
				gates |= GateSet::DIRECT | GateSet::ALIGNED;
			}
			if read_only && family.mutates() {
				gates |= GateSet::WRITABLE;
			}
			if gates.is_empty() { Support::Supported } else { Support::Conditional(gates) }
		}
	}
}

/// Resolves the alignment gate for an access at byte `offset`.
///
/// Not cached: every access is checked against its own offset.
pub fn is_aligned(profile: &Profile, mode: AccessMode, offset: usize) -> bool {
	!is_supported(profile, mode).gates().contains(GateSet::ALIGNED) || offset % profile.ty.size() == 0
}

/// The failure a well-formed call of `mode` at `index` must report, or
/// `None` if it must succeed.
///
/// Capability is checked first, then bounds, then the gates in order.
pub fn expected_failure(profile: &Profile, mode: AccessMode, index: i32) -> Option<ErrorKind> {
	let gates = match is_supported(profile, mode) {
		Support::Unsupported => return Some(ErrorKind::UnsupportedOperation),
		support => support.gates(),
	};

	let offset = usize::try_from(index).ok();
	if let Some(length) = profile.length {
		match profile.kind {
			SourceKind::ArrayElement if offset.is_none_or(|i| i >= length) => {
				return Some(ErrorKind::ArrayIndexOutOfBounds);
			}
			SourceKind::BufferView if offset.is_none_or(|i| i + profile.ty.size() > length) => {
				return Some(ErrorKind::IndexOutOfBounds);
			}
			_ => {}
		}
	}

	let memory = profile.memory.unwrap_or_default();
	if gates.contains(GateSet::DIRECT) && !memory.is_direct() {
		return Some(ErrorKind::IllegalState);
	}
	if offset.is_some_and(|offset| !is_aligned(profile, mode, offset)) {
		return Some(ErrorKind::IllegalState);
	}
	if gates.contains(GateSet::WRITABLE) && memory.is_read_only() {
		return Some(ErrorKind::ReadOnly);
	}
	None
}
