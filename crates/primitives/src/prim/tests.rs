use rstest::rstest;

use super::*;

#[rstest]
#[case(PrimType::Boolean, 1, false, false)]
#[case(PrimType::Byte, 1, true, true)]
#[case(PrimType::Short, 2, true, true)]
#[case(PrimType::Char, 2, true, true)]
#[case(PrimType::Int, 4, true, true)]
#[case(PrimType::Long, 8, true, true)]
#[case(PrimType::Float, 4, true, false)]
#[case(PrimType::Double, 8, true, false)]
fn descriptor_table(#[case] ty: PrimType, #[case] size: usize, #[case] add: bool, #[case] integral: bool) {
	assert_eq!(ty.size(), size);
	assert_eq!(ty.supports_add(), add);
	assert_eq!(ty.is_integral(), integral);
}

#[test]
fn booleans_take_bitwise_but_not_add() {
	assert!(PrimType::Boolean.supports_bitwise());
	assert!(!PrimType::Boolean.supports_add());
}

#[test]
fn floats_take_add_but_not_bitwise() {
	for ty in [PrimType::Float, PrimType::Double] {
		assert!(ty.supports_add());
		assert!(!ty.supports_bitwise());
	}
}

#[test]
fn char_is_unsigned() {
	assert!(PrimType::Char.is_integral());
	assert!(!PrimType::Char.is_signed());
	assert!(PrimType::Short.is_signed());
}

#[test]
fn masks_cover_width() {
	assert_eq!(PrimType::Byte.mask(), 0xff);
	assert_eq!(PrimType::Char.mask(), 0xffff);
	assert_eq!(PrimType::Float.mask(), 0xffff_ffff);
	assert_eq!(PrimType::Double.mask(), u64::MAX);
}

#[test]
fn buffer_views() {
	assert!(!PrimType::Boolean.supports_buffer_view());
	assert!(!PrimType::Byte.supports_buffer_view());
	assert!(PrimType::Short.supports_buffer_view());
	assert!(!PrimType::Short.view_supports_atomic_access());
	assert!(!PrimType::Char.view_supports_atomic_access());
	assert!(PrimType::Int.view_supports_atomic_access());
	assert!(PrimType::Float.view_supports_atomic_access());
	assert_eq!(PrimType::Long.view_supports_atomic_access(), cfg!(target_has_atomic = "64"));
}

#[test]
fn names_are_lowercase() {
	assert_eq!(PrimType::Double.name(), "double");
	assert_eq!(PrimType::Char.to_string(), "char");
}
