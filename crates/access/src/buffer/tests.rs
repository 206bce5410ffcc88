use rstest::rstest;

use super::*;

#[rstest]
#[case(ByteOrder::LittleEndian, [0x67, 0x45, 0x23, 0x01])]
#[case(ByteOrder::BigEndian, [0x01, 0x23, 0x45, 0x67])]
fn int_bytes_follow_byte_order(#[case] order: ByteOrder, #[case] bytes: [u8; 4]) {
	let buffer = ByteBuffer::allocate(8);
	buffer.store().write_bytes(2, 4, order, 0x0123_4567);
	assert_eq!(&buffer.to_vec()[2..6], &bytes);
	assert_eq!(buffer.store().read_bytes(2, 4, order), 0x0123_4567);
}

#[test]
fn byte_access_crosses_word_boundaries() {
	let buffer = ByteBuffer::allocate_direct(16);
	buffer.store().write_bytes(6, 8, ByteOrder::BigEndian, 0x0123_4567_89ab_cdef);
	assert_eq!(buffer.store().read_bytes(6, 8, ByteOrder::BigEndian), 0x0123_4567_89ab_cdef);
	assert_eq!(buffer.store().read_bytes(6, 8, ByteOrder::LittleEndian), 0xefcd_ab89_6745_2301);
	assert_eq!(buffer.to_vec()[..6], [0; 6]);
	assert_eq!(buffer.to_vec()[14..], [0; 2]);
}

#[test]
fn odd_length_rounds_storage_up() {
	let buffer = ByteBuffer::allocate(13);
	assert_eq!(buffer.limit(), 13);
	buffer.fill_from(&[0xff; 20]);
	assert_eq!(buffer.to_vec(), vec![0xff; 13]);
}

#[test]
fn read_only_view_shares_storage() {
	let buffer = ByteBuffer::allocate_direct(8);
	let view = buffer.as_read_only();
	buffer.fill_from(&[1, 2, 3]);
	assert_eq!(view.to_vec()[..3], [1, 2, 3]);
	assert!(view.is_read_only() && view.is_direct());
	assert!(!view.ptr_eq(&buffer));
	assert_eq!(view.memory_mode(ByteOrder::BigEndian), MemoryMode::all());
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(8)]
fn swap_is_an_involution(#[case] width: usize) {
	let bits = 0x0123_4567_89ab_cdef_u64 & (u64::MAX >> (64 - 8 * width));
	let swapped = to_memory_order(bits, width, ByteOrder::BigEndian);
	assert_eq!(from_memory_order(swapped, width, ByteOrder::BigEndian), bits);
}
