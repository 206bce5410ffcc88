use rstest::rstest;

use super::*;

#[test]
fn every_type_has_distinct_neighbors() {
	for ty in PrimType::all() {
		let set = values(ty);
		assert!([set.first, set.second, set.third].iter().all(|v| v.ty() == ty), "{ty}");
		assert_ne!(set.first, set.second, "{ty}");
		assert_ne!(set.second, set.third, "{ty}");
	}
}

#[test]
fn other_type_always_differs() {
	for ty in PrimType::all() {
		assert_ne!(other_type(ty), ty);
	}
}

#[rstest]
#[case(Value::Int(0x0123_4567), ByteOrder::BigEndian, vec![0x01, 0x23, 0x45, 0x67])]
#[case(Value::Int(0x0123_4567), ByteOrder::LittleEndian, vec![0x67, 0x45, 0x23, 0x01])]
#[case(Value::Char(0x89ab), ByteOrder::BigEndian, vec![0x89, 0xab])]
#[case(Value::Double(1.0), ByteOrder::BigEndian, vec![0x3f, 0xf0, 0, 0, 0, 0, 0, 0])]
fn encoding(#[case] value: Value, #[case] order: ByteOrder, #[case] bytes: Vec<u8>) {
	assert_eq!(encode(value, order), bytes);
}

#[test]
fn overflow_operands_wrap() {
	for ty in PrimType::all() {
		match overflow(ty) {
			Some(edge) => {
				assert!(ty.is_integral(), "{ty}");
				assert_eq!(edge.max.wrapping_add(edge.step), Some(edge.wrapped), "{ty}");
				assert_eq!(edge.max.ty(), ty);
			}
			None => assert!(!ty.is_integral(), "{ty}"),
		}
	}
}
