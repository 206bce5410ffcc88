use atomvar_primitives::{ByteOrder, PrimType, Value};

/// Three distinct literal values of one type.
///
/// Probes set `first`, then exchange it for `second`; `third` never equals
/// the value it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSet {
	pub first: Value,
	pub second: Value,
	pub third: Value,
}

/// The literal table for `ty`.
pub fn values(ty: PrimType) -> ValueSet {
	let (first, second, third) = match ty {
		PrimType::Boolean => (Value::Boolean(true), Value::Boolean(false), Value::Boolean(true)),
		PrimType::Byte => (Value::Byte(0x01), Value::Byte(0x23), Value::Byte(0x45)),
		PrimType::Short => (Value::Short(0x0123), Value::Short(0x4567), Value::Short(0x89ab_u16 as i16)),
		PrimType::Char => (Value::Char(0x0123), Value::Char(0x4567), Value::Char(0x89ab)),
		PrimType::Int => (
			Value::Int(0x0123_4567),
			Value::Int(0x89ab_cdef_u32 as i32),
			Value::Int(0xcafe_babe_u32 as i32),
		),
		PrimType::Long => (
			Value::Long(0x0123_4567_89ab_cdef),
			Value::Long(0xcafe_babe_cafe_babe_u64 as i64),
			Value::Long(0xdead_beef_dead_beef_u64 as i64),
		),
		PrimType::Float => (Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)),
		PrimType::Double => (Value::Double(1.0), Value::Double(2.0), Value::Double(3.0)),
	};
	ValueSet { first, second, third }
}

/// Operands of a `GET_AND_ADD` that crosses the top of an integral type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
	pub max: Value,
	pub step: Value,
	/// `max + step` after wraparound.
	pub wrapped: Value,
}

/// Wraparound operands of `ty`, or `None` for booleans and floats.
pub fn overflow(ty: PrimType) -> Option<Overflow> {
	let (max, step, wrapped) = match ty {
		PrimType::Byte => (Value::Byte(i8::MAX), Value::Byte(1), Value::Byte(i8::MIN)),
		PrimType::Short => (Value::Short(i16::MAX), Value::Short(2), Value::Short(i16::MIN + 1)),
		PrimType::Char => (Value::Char(u16::MAX), Value::Char(1), Value::Char(0)),
		PrimType::Int => (Value::Int(i32::MAX), Value::Int(1), Value::Int(i32::MIN)),
		PrimType::Long => (Value::Long(i64::MAX), Value::Long(3), Value::Long(i64::MIN + 2)),
		PrimType::Boolean | PrimType::Float | PrimType::Double => return None,
	};
	Some(Overflow { max, step, wrapped })
}

/// A type whose values never match `ty` in a method-type check.
pub fn other_type(ty: PrimType) -> PrimType {
	if ty == PrimType::Int { PrimType::Long } else { PrimType::Int }
}

/// Memory bytes of `value` in `order`.
pub fn encode(value: Value, order: ByteOrder) -> Vec<u8> {
	let mut bytes = value.to_bits().to_le_bytes()[..value.ty().size()].to_vec();
	if order == ByteOrder::BigEndian {
		bytes.reverse();
	}
	bytes
}

#[cfg(test)]
mod tests;
