use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Primitive element type of a variable location.
///
/// The descriptor answers every type-dependent question the runtime and the
/// harness ask: width, signedness, and which update families apply.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrimType {
	Boolean,
	Byte,
	Short,
	/// Unsigned 16-bit code unit.
	Char,
	Int,
	Long,
	Float,
	Double,
}

impl PrimType {
	/// Iterates over every primitive type.
	pub fn all() -> impl Iterator<Item = PrimType> {
		Self::iter()
	}

	/// Lowercase type name.
	pub fn name(self) -> &'static str {
		self.into()
	}

	/// Width in bytes.
	pub const fn size(self) -> usize {
		match self {
			Self::Boolean | Self::Byte => 1,
			Self::Short | Self::Char => 2,
			Self::Int | Self::Float => 4,
			Self::Long | Self::Double => 8,
		}
	}

	/// Width in bits.
	pub const fn bit_width(self) -> u32 {
		(self.size() * 8) as u32
	}

	/// Mask selecting the low `bit_width` bits of a raw 64-bit pattern.
	pub const fn mask(self) -> u64 {
		match self.size() {
			8 => u64::MAX,
			n => (1u64 << (n * 8)) - 1,
		}
	}

	pub const fn is_integral(self) -> bool {
		matches!(self, Self::Byte | Self::Short | Self::Char | Self::Int | Self::Long)
	}

	pub const fn is_floating(self) -> bool {
		matches!(self, Self::Float | Self::Double)
	}

	pub const fn is_numeric(self) -> bool {
		self.is_integral() || self.is_floating()
	}

	/// Two's-complement signed integral.
	pub const fn is_signed(self) -> bool {
		matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
	}

	/// Whether the `GET_AND_ADD` family applies to this type.
	pub const fn supports_add(self) -> bool {
		self.is_numeric()
	}

	/// Whether the `GET_AND_BITWISE` family applies to this type.
	pub const fn supports_bitwise(self) -> bool {
		matches!(self, Self::Boolean) || self.is_integral()
	}

	/// Whether a byte-buffer view of this type can be constructed.
	///
	/// Single-byte types have no byte-order dependent interpretation and are
	/// rejected at lookup.
	pub const fn supports_buffer_view(self) -> bool {
		self.size() > 1
	}

	/// Whether a byte-buffer view of this type supports more than plain
	/// `GET`/`SET`.
	///
	/// Views narrower than four bytes are never atomic; eight-byte views need
	/// hardware 64-bit atomics.
	pub const fn view_supports_atomic_access(self) -> bool {
		match self.size() {
			4 => true,
			8 => cfg!(target_has_atomic = "64"),
			_ => false,
		}
	}
}

impl std::fmt::Display for PrimType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests;
