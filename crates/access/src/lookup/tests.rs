use atomvar_primitives::ByteOrder;
use rstest::rstest;

use super::*;
use crate::error::ErrorKind;

fn fields() -> Arc<ClassDef> {
	ClassDef::builder("Fields").field("v", 1i32).static_field("s", 2i64).build()
}

#[test]
fn lookups_do_not_initialize() {
	let class = fields();
	find_var(&class, "v", PrimType::Int).unwrap();
	find_static_var(&class, "s", PrimType::Long).unwrap();
	assert!(!class.is_initialized());
}

#[rstest]
#[case("missing", PrimType::Int, false)]
#[case("v", PrimType::Long, false)]
#[case("s", PrimType::Long, false)]
#[case("v", PrimType::Int, true)]
fn bad_field_lookups(#[case] name: &str, #[case] ty: PrimType, #[case] is_static: bool) {
	let class = fields();
	let result = if is_static { find_static_var(&class, name, ty) } else { find_var(&class, name, ty) };
	assert_eq!(result.unwrap_err().kind(), ErrorKind::Lookup);
}

#[test]
fn single_byte_views_are_rejected() {
	let mode = MemoryMode::new(ByteOrder::BigEndian, false, true);
	for ty in PrimType::all() {
		let result = byte_buffer_view(ty, mode);
		assert_eq!(result.is_ok(), ty.size() > 1, "{ty}");
	}
	assert_eq!(byte_buffer_view(PrimType::Byte, mode).unwrap_err(), AccessError::UnsupportedView(PrimType::Byte));
}

#[test]
fn repeated_lookups_are_equal() {
	let class = fields();
	assert_eq!(find_var(&class, "v", PrimType::Int).unwrap(), find_var(&class, "v", PrimType::Int).unwrap());
	assert_eq!(array_element(PrimType::Short), array_element(PrimType::Short));
	assert_ne!(array_element(PrimType::Short), array_element(PrimType::Char));

	let other = ClassDef::builder("Fields").field("v", 1i32).build();
	assert_ne!(find_var(&class, "v", PrimType::Int).unwrap(), find_var(&other, "v", PrimType::Int).unwrap());
}
