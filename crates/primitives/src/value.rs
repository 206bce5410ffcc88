use std::hash::{Hash, Hasher};

use crate::access_mode::BitwiseOp;
use crate::prim::PrimType;

/// A typed primitive value.
///
/// Equality is bit-pattern equality within the same type, so a NaN compares
/// equal to an identical NaN and `0.0` differs from `-0.0`. This is the
/// comparison compare-and-set performs.
#[derive(Debug, Clone, Copy)]
pub enum Value {
	Boolean(bool),
	Byte(i8),
	Short(i16),
	Char(u16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
}

impl Value {
	/// The zero (default) value of `ty`.
	pub const fn zero(ty: PrimType) -> Self {
		Self::from_bits(ty, 0)
	}

	pub const fn ty(self) -> PrimType {
		match self {
			Self::Boolean(_) => PrimType::Boolean,
			Self::Byte(_) => PrimType::Byte,
			Self::Short(_) => PrimType::Short,
			Self::Char(_) => PrimType::Char,
			Self::Int(_) => PrimType::Int,
			Self::Long(_) => PrimType::Long,
			Self::Float(_) => PrimType::Float,
			Self::Double(_) => PrimType::Double,
		}
	}

	/// Raw bit pattern, zero-extended to 64 bits.
	pub const fn to_bits(self) -> u64 {
		match self {
			Self::Boolean(v) => v as u64,
			Self::Byte(v) => v as u8 as u64,
			Self::Short(v) => v as u16 as u64,
			Self::Char(v) => v as u64,
			Self::Int(v) => v as u32 as u64,
			Self::Long(v) => v as u64,
			Self::Float(v) => v.to_bits() as u64,
			Self::Double(v) => v.to_bits(),
		}
	}

	/// Reinterprets the low `ty.bit_width()` bits of `bits` as a value of `ty`.
	///
	/// A boolean is true iff its byte is non-zero.
	pub const fn from_bits(ty: PrimType, bits: u64) -> Self {
		match ty {
			PrimType::Boolean => Self::Boolean(bits & 0xff != 0),
			PrimType::Byte => Self::Byte(bits as u8 as i8),
			PrimType::Short => Self::Short(bits as u16 as i16),
			PrimType::Char => Self::Char(bits as u16),
			PrimType::Int => Self::Int(bits as u32 as i32),
			PrimType::Long => Self::Long(bits as i64),
			PrimType::Float => Self::Float(f32::from_bits(bits as u32)),
			PrimType::Double => Self::Double(f64::from_bits(bits)),
		}
	}

	/// `self + rhs` with the type's exact-width arithmetic.
	///
	/// Integrals wrap on overflow; floats use IEEE addition. Returns `None`
	/// for booleans and for operands of different types.
	pub fn wrapping_add(self, rhs: Value) -> Option<Value> {
		Some(match (self, rhs) {
			(Self::Byte(a), Self::Byte(b)) => Self::Byte(a.wrapping_add(b)),
			(Self::Short(a), Self::Short(b)) => Self::Short(a.wrapping_add(b)),
			(Self::Char(a), Self::Char(b)) => Self::Char(a.wrapping_add(b)),
			(Self::Int(a), Self::Int(b)) => Self::Int(a.wrapping_add(b)),
			(Self::Long(a), Self::Long(b)) => Self::Long(a.wrapping_add(b)),
			(Self::Float(a), Self::Float(b)) => Self::Float(a + b),
			(Self::Double(a), Self::Double(b)) => Self::Double(a + b),
			_ => return None,
		})
	}

	/// `self OP rhs` for booleans and integrals.
	///
	/// Returns `None` for floats and for operands of different types.
	pub fn bitwise(self, op: BitwiseOp, rhs: Value) -> Option<Value> {
		fn apply<T>(op: BitwiseOp, a: T, b: T) -> T
		where
			T: std::ops::BitOr<Output = T> + std::ops::BitAnd<Output = T> + std::ops::BitXor<Output = T>,
		{
			match op {
				BitwiseOp::Or => a | b,
				BitwiseOp::And => a & b,
				BitwiseOp::Xor => a ^ b,
			}
		}

		Some(match (self, rhs) {
			(Self::Boolean(a), Self::Boolean(b)) => Self::Boolean(apply(op, a, b)),
			(Self::Byte(a), Self::Byte(b)) => Self::Byte(apply(op, a, b)),
			(Self::Short(a), Self::Short(b)) => Self::Short(apply(op, a, b)),
			(Self::Char(a), Self::Char(b)) => Self::Char(apply(op, a, b)),
			(Self::Int(a), Self::Int(b)) => Self::Int(apply(op, a, b)),
			(Self::Long(a), Self::Long(b)) => Self::Long(apply(op, a, b)),
			_ => return None,
		})
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		self.ty() == other.ty() && self.to_bits() == other.to_bits()
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.ty().hash(state);
		self.to_bits().hash(state);
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Boolean(v) => write!(f, "{v}"),
			Self::Byte(v) => write!(f, "{v}b"),
			Self::Short(v) => write!(f, "{v}s"),
			Self::Char(v) => write!(f, "'\\u{v:04x}'"),
			Self::Int(v) => write!(f, "{v:#x}"),
			Self::Long(v) => write!(f, "{v:#x}L"),
			Self::Float(v) => write!(f, "{v:?}f"),
			Self::Double(v) => write!(f, "{v:?}d"),
		}
	}
}

macro_rules! value_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(v: $ty) -> Self {
					Self::$variant(v)
				}
			}
		)*
	};
}

value_from! {
	bool => Boolean,
	i8 => Byte,
	i16 => Short,
	u16 => Char,
	i32 => Int,
	i64 => Long,
	f32 => Float,
	f64 => Double,
}

#[cfg(test)]
mod tests;
