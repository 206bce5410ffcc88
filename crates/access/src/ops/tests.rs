use rstest::rstest;

use super::*;

fn word(ty: PrimType, cell: &AtomicU64) -> Location<'_> {
	Location { ty, place: Place::Word(cell) }
}

#[test]
fn selection_covers_every_mode() {
	let cell = AtomicU64::new(Value::Int(6).to_bits());
	let location = word(PrimType::Int, &cell);
	for mode in AccessMode::all() {
		let values = vec![Value::Int(6); mode.value_arity()];
		assert_eq!(select(mode)(&location, mode, &values).shape(), mode.return_shape(), "{mode}");
	}
}

#[rstest]
#[case(AccessMode::GetAndBitwiseOr, 0b1110)]
#[case(AccessMode::GetAndBitwiseAndAcquire, 0b1000)]
#[case(AccessMode::GetAndBitwiseXorRelease, 0b0110)]
fn bitwise_updates(#[case] mode: AccessMode, #[case] expected: i32) {
	let cell = AtomicU64::new(Value::Int(0b1100).to_bits());
	let location = word(PrimType::Int, &cell);
	let previous = select(mode)(&location, mode, &[Value::Int(0b1010)]);
	assert_eq!(previous, Returned::Value(Value::Int(0b1100)));
	assert_eq!(select(AccessMode::Get)(&location, AccessMode::Get, &[]), Returned::Value(Value::Int(expected)));
}

#[rstest]
#[case(Value::Byte(i8::MAX), Value::Byte(1), Value::Byte(i8::MIN))]
#[case(Value::Char(u16::MAX), Value::Char(1), Value::Char(0))]
#[case(Value::Long(-1), Value::Long(2), Value::Long(1))]
#[case(Value::Float(1.5), Value::Float(-4.0), Value::Float(-2.5))]
#[case(Value::Double(0.25), Value::Double(0.5), Value::Double(0.75))]
fn add_uses_type_width(#[case] start: Value, #[case] delta: Value, #[case] expected: Value) {
	let cell = AtomicU64::new(start.to_bits());
	let location = word(start.ty(), &cell);
	assert_eq!(select(AccessMode::GetAndAdd)(&location, AccessMode::GetAndAdd, &[delta]), Returned::Value(start));
	assert_eq!(select(AccessMode::Get)(&location, AccessMode::Get, &[]), Returned::Value(expected));
	assert_eq!(start.wrapping_add(delta), Some(expected));
}

#[test]
fn compare_and_exchange_returns_witness_on_both_branches() {
	let cell = AtomicU64::new(Value::Long(1).to_bits());
	let location = word(PrimType::Long, &cell);
	let mode = AccessMode::CompareAndExchangeAcquire;
	let op = select(mode);
	assert_eq!(op(&location, mode, &[Value::Long(1), Value::Long(2)]), Returned::Value(Value::Long(1)));
	assert_eq!(op(&location, mode, &[Value::Long(1), Value::Long(3)]), Returned::Value(Value::Long(2)));
	assert_eq!(cell.into_inner(), 2);
}

#[test]
fn plain_buffer_access_works_unaligned() {
	let buffer = crate::ByteBuffer::allocate(8);
	let location =
		Location { ty: PrimType::Int, place: Place::Bytes { store: buffer.store(), offset: 3, order: ByteOrder::BigEndian } };
	select(AccessMode::Set)(&location, AccessMode::Set, &[Value::Int(0x0123_4567)]);
	assert_eq!(buffer.to_vec(), [0, 0, 0, 0x01, 0x23, 0x45, 0x67, 0]);
	assert_eq!(select(AccessMode::Get)(&location, AccessMode::Get, &[]), Returned::Value(Value::Int(0x0123_4567)));
}
