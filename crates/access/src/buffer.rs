//! Byte buffers backing multi-byte views.
//!
//! Storage is a run of 64-bit atomic words. Byte `k` of a word occupies bits
//! `8k..8k + 8`, so byte address `a` lives in word `a / 8` at shift
//! `(a % 8) * 8`. Byte-wise access works at any offset; a naturally aligned
//! region of up to eight bytes never straddles a word and can be updated with
//! a single word-sized compare-and-exchange.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use atomvar_primitives::{ByteOrder, MemoryMode};

pub(crate) struct ByteStore {
	words: Box<[AtomicU64]>,
	len: usize,
}

impl ByteStore {
	fn zeroed(len: usize) -> Self {
		let words = (0..len.div_ceil(8)).map(|_| AtomicU64::new(0)).collect();
		Self { words, len }
	}

	pub(crate) fn len(&self) -> usize {
		self.len
	}

	pub(crate) fn word(&self, addr: usize) -> &AtomicU64 {
		&self.words[addr / 8]
	}

	fn load_byte(&self, addr: usize) -> u8 {
		(self.word(addr).load(Ordering::Relaxed) >> byte_shift(addr)) as u8
	}

	fn store_byte(&self, addr: usize, byte: u8) {
		let shift = byte_shift(addr);
		let mask = 0xffu64 << shift;
		let _ = self.word(addr).fetch_update(Ordering::Relaxed, Ordering::Relaxed, |word| {
			Some((word & !mask) | (u64::from(byte) << shift))
		});
	}

	/// Reads `width` bytes starting at `addr`, one byte at a time.
	pub(crate) fn read_bytes(&self, addr: usize, width: usize, order: ByteOrder) -> u64 {
		let raw = (0..width).fold(0u64, |raw, k| raw | (u64::from(self.load_byte(addr + k)) << (8 * k)));
		from_memory_order(raw, width, order)
	}

	pub(crate) fn write_bytes(&self, addr: usize, width: usize, order: ByteOrder, bits: u64) {
		let raw = to_memory_order(bits, width, order);
		for k in 0..width {
			self.store_byte(addr + k, (raw >> (8 * k)) as u8);
		}
	}
}

pub(crate) fn byte_shift(addr: usize) -> u32 {
	((addr % 8) * 8) as u32
}

/// Converts `width` little-endian memory bytes into value bits.
pub(crate) fn from_memory_order(raw: u64, width: usize, order: ByteOrder) -> u64 {
	match order {
		ByteOrder::LittleEndian => raw,
		ByteOrder::BigEndian => raw.swap_bytes() >> (64 - 8 * width),
	}
}

/// Inverse of [`from_memory_order`]; the swap is its own inverse.
pub(crate) fn to_memory_order(bits: u64, width: usize, order: ByteOrder) -> u64 {
	from_memory_order(bits, width, order)
}

/// A byte buffer, heap or direct, optionally read-only.
///
/// Clones and read-only views share storage.
#[derive(Clone)]
pub struct ByteBuffer {
	store: Arc<ByteStore>,
	read_only: bool,
	direct: bool,
}

impl ByteBuffer {
	/// Zero-filled heap buffer.
	pub fn allocate(len: usize) -> Self {
		Self { store: Arc::new(ByteStore::zeroed(len)), read_only: false, direct: false }
	}

	/// Zero-filled direct buffer. Offset 0 is aligned to eight bytes.
	pub fn allocate_direct(len: usize) -> Self {
		Self { direct: true, ..Self::allocate(len) }
	}

	/// A read-only buffer sharing this buffer's storage.
	pub fn as_read_only(&self) -> Self {
		Self { read_only: true, ..self.clone() }
	}

	/// Number of addressable bytes.
	pub fn limit(&self) -> usize {
		self.store.len()
	}

	pub fn is_direct(&self) -> bool {
		self.direct
	}

	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// The buffer's backing and mutability, viewed in `order`.
	pub fn memory_mode(&self, order: ByteOrder) -> MemoryMode {
		MemoryMode::new(order, self.read_only, self.direct)
	}

	/// Copy of the current contents.
	pub fn to_vec(&self) -> Vec<u8> {
		(0..self.limit()).map(|addr| self.store.load_byte(addr)).collect()
	}

	/// Writes `bytes` at offset 0, ignoring the read-only flag. Extra bytes
	/// past the limit are dropped.
	pub fn fill_from(&self, bytes: &[u8]) {
		for (addr, byte) in bytes.iter().take(self.limit()).enumerate() {
			self.store.store_byte(addr, *byte);
		}
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.store, &other.store) && self.read_only == other.read_only
	}

	pub(crate) fn store(&self) -> &ByteStore {
		&self.store
	}
}

impl std::fmt::Debug for ByteBuffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ByteBuffer")
			.field("limit", &self.limit())
			.field("direct", &self.direct)
			.field("read_only", &self.read_only)
			.finish()
	}
}

#[cfg(test)]
mod tests;
