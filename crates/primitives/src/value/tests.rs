use proptest::prelude::*;
use rstest::rstest;

use super::*;

#[rstest]
#[case(Value::Boolean(true), 1)]
#[case(Value::Byte(-1), 0xff)]
#[case(Value::Short(-2), 0xfffe)]
#[case(Value::Char(0x89ab), 0x89ab)]
#[case(Value::Int(-1), 0xffff_ffff)]
#[case(Value::Long(-1), u64::MAX)]
#[case(Value::Float(1.0), 0x3f80_0000)]
#[case(Value::Double(-0.0), 0x8000_0000_0000_0000)]
fn bits_are_zero_extended(#[case] value: Value, #[case] bits: u64) {
	assert_eq!(value.to_bits(), bits);
	assert_eq!(Value::from_bits(value.ty(), bits), value);
}

#[test]
fn equality_is_bitwise() {
	let nan = Value::Float(f32::NAN);
	assert_eq!(nan, nan);
	assert_ne!(Value::Double(0.0), Value::Double(-0.0));
	assert_ne!(Value::Int(1), Value::Long(1));
	assert_ne!(Value::Short(1), Value::Char(1));
}

#[test]
fn zero_values() {
	for ty in PrimType::all() {
		let zero = Value::zero(ty);
		assert_eq!(zero.ty(), ty);
		assert_eq!(zero.to_bits(), 0);
	}
	assert_eq!(Value::zero(PrimType::Boolean), Value::Boolean(false));
}

#[test]
fn add_wraps_at_type_width() {
	assert_eq!(Value::Byte(i8::MAX).wrapping_add(Value::Byte(1)), Some(Value::Byte(i8::MIN)));
	assert_eq!(Value::Char(u16::MAX).wrapping_add(Value::Char(2)), Some(Value::Char(1)));
	assert_eq!(Value::Int(i32::MAX).wrapping_add(Value::Int(1)), Some(Value::Int(i32::MIN)));
	assert_eq!(Value::Double(1.5).wrapping_add(Value::Double(2.0)), Some(Value::Double(3.5)));
}

#[test]
fn add_rejects_booleans_and_mixed_types() {
	assert_eq!(Value::Boolean(true).wrapping_add(Value::Boolean(true)), None);
	assert_eq!(Value::Int(1).wrapping_add(Value::Long(1)), None);
}

#[rstest]
#[case(BitwiseOp::Or, Value::Boolean(false), Value::Boolean(true), Value::Boolean(true))]
#[case(BitwiseOp::And, Value::Boolean(true), Value::Boolean(false), Value::Boolean(false))]
#[case(BitwiseOp::Xor, Value::Boolean(true), Value::Boolean(true), Value::Boolean(false))]
#[case(BitwiseOp::Or, Value::Short(0x0123), Value::Short(0x4567), Value::Short(0x4567))]
#[case(BitwiseOp::And, Value::Char(0x0123), Value::Char(0x4567), Value::Char(0x0123))]
#[case(BitwiseOp::Xor, Value::Int(0x0f0f), Value::Int(0x00ff), Value::Int(0x0ff0))]
fn bitwise_table(#[case] op: BitwiseOp, #[case] lhs: Value, #[case] rhs: Value, #[case] expected: Value) {
	assert_eq!(lhs.bitwise(op, rhs), Some(expected));
}

#[test]
fn bitwise_absent_for_floats() {
	assert_eq!(Value::Float(1.0).bitwise(BitwiseOp::Or, Value::Float(2.0)), None);
	assert_eq!(Value::Double(1.0).bitwise(BitwiseOp::Xor, Value::Double(2.0)), None);
}

#[test]
fn descriptor_families_match_algebra() {
	for ty in PrimType::all() {
		let zero = Value::zero(ty);
		assert_eq!(zero.wrapping_add(zero).is_some(), ty.supports_add(), "{ty}");
		assert_eq!(zero.bitwise(BitwiseOp::Or, zero).is_some(), ty.supports_bitwise(), "{ty}");
	}
}

proptest! {
	/// Integral addition agrees with 64-bit addition truncated to the type's width.
	#[test]
	fn prop_add_is_truncated_wide_add(a in any::<u64>(), b in any::<u64>()) {
		for ty in PrimType::all().filter(|ty| ty.is_integral()) {
			let lhs = Value::from_bits(ty, a);
			let rhs = Value::from_bits(ty, b);
			let sum = lhs.wrapping_add(rhs).unwrap();
			prop_assert_eq!(sum.to_bits(), a.wrapping_add(b) & ty.mask());
		}
	}

	/// Bitwise operators agree with the same operator on raw bits.
	#[test]
	fn prop_bitwise_matches_raw_bits(a in any::<u64>(), b in any::<u64>()) {
		for ty in PrimType::all().filter(|ty| ty.is_integral()) {
			let lhs = Value::from_bits(ty, a);
			let rhs = Value::from_bits(ty, b);
			prop_assert_eq!(lhs.bitwise(BitwiseOp::Or, rhs).unwrap().to_bits(), (a | b) & ty.mask());
			prop_assert_eq!(lhs.bitwise(BitwiseOp::And, rhs).unwrap().to_bits(), (a & b) & ty.mask());
			prop_assert_eq!(lhs.bitwise(BitwiseOp::Xor, rhs).unwrap().to_bits(), (a ^ b) & ty.mask());
		}
	}

	/// `from_bits` followed by `to_bits` keeps exactly the low bits.
	#[test]
	fn prop_bits_roundtrip(bits in any::<u64>()) {
		for ty in PrimType::all().filter(|ty| *ty != PrimType::Boolean) {
			prop_assert_eq!(Value::from_bits(ty, bits).to_bits(), bits & ty.mask());
		}
	}
}
