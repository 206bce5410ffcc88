use rstest::rstest;

use super::*;
use crate::buffer::ByteBuffer;

#[test]
fn word_slot_strong_exchange_reports_witness() {
	let cell = AtomicU64::new(5);
	let slot = WordSlot::new(&cell);
	assert_eq!(slot.compare_exchange(4, 9, OrderingFlavor::Volatile, false), Err(5));
	assert_eq!(slot.compare_exchange(5, 9, OrderingFlavor::Volatile, false), Ok(5));
	assert_eq!(slot.load(OrderingFlavor::Acquire), 9);
}

#[test]
fn fetch_update_returns_previous() {
	let cell = AtomicU64::new(40);
	let slot = WordSlot::new(&cell);
	assert_eq!(slot.fetch_update(OrderingFlavor::Release, &mut |bits| bits + 2), 40);
	assert_eq!(slot.load(OrderingFlavor::Plain), 42);
}

#[rstest]
#[case(ByteOrder::LittleEndian)]
#[case(ByteOrder::BigEndian)]
fn region_slot_leaves_neighbors_alone(#[case] order: ByteOrder) {
	let buffer = ByteBuffer::allocate_direct(16);
	buffer.fill_from(&[0xaa; 16]);
	let slot = RegionSlot::new(buffer.store(), 4, 4, order);

	slot.store(0x0123_4567, OrderingFlavor::Volatile);
	assert_eq!(slot.load(OrderingFlavor::Volatile), 0x0123_4567);
	assert_eq!(buffer.store().read_bytes(4, 4, order), 0x0123_4567);
	assert_eq!(buffer.to_vec()[..4], [0xaa; 4]);
	assert_eq!(buffer.to_vec()[8..], [0xaa; 8]);

	assert_eq!(slot.compare_exchange(0x0123_4567, 0x89ab_cdef, OrderingFlavor::Acquire, false), Ok(0x0123_4567));
	assert_eq!(slot.compare_exchange(0x0123_4567, 0, OrderingFlavor::Acquire, false), Err(0x89ab_cdef));
}

#[test]
fn region_slot_matches_byte_reads_for_full_words() {
	let buffer = ByteBuffer::allocate_direct(16);
	let slot = RegionSlot::new(buffer.store(), 8, 8, ByteOrder::BigEndian);
	slot.store(0xcafe_babe_cafe_babe, OrderingFlavor::Release);
	assert_eq!(buffer.to_vec()[8..12], [0xca, 0xfe, 0xba, 0xbe]);
	assert_eq!(buffer.store().read_bytes(8, 8, ByteOrder::BigEndian), 0xcafe_babe_cafe_babe);
}

#[test]
fn orderings_are_valid_for_their_operation() {
	use OrderingFlavor::*;
	for flavor in [Plain, Opaque, Acquire, Release, Volatile] {
		assert_ne!(load_ordering(flavor), Ordering::Release);
		assert_ne!(store_ordering(flavor), Ordering::Acquire);
		let (_, failure) = update_orderings(flavor);
		assert!(!matches!(failure, Ordering::Release | Ordering::AcqRel));
	}
}
