//! Atomic cells addressed by an access point.
//!
//! A [`Slot`] traffics in value bits: the zero-extended pattern of
//! [`Value::to_bits`](atomvar_primitives::Value::to_bits). Ordering flavors
//! map onto [`Ordering`]: plain and opaque are relaxed, volatile is
//! sequentially consistent.

use std::sync::atomic::{AtomicU64, Ordering};

use atomvar_primitives::{ByteOrder, OrderingFlavor};

use crate::buffer::{ByteStore, byte_shift, from_memory_order, to_memory_order};

pub(crate) const fn load_ordering(flavor: OrderingFlavor) -> Ordering {
	match flavor {
		OrderingFlavor::Acquire => Ordering::Acquire,
		OrderingFlavor::Volatile => Ordering::SeqCst,
		OrderingFlavor::Plain | OrderingFlavor::Opaque | OrderingFlavor::Release => Ordering::Relaxed,
	}
}

pub(crate) const fn store_ordering(flavor: OrderingFlavor) -> Ordering {
	match flavor {
		OrderingFlavor::Release => Ordering::Release,
		OrderingFlavor::Volatile => Ordering::SeqCst,
		OrderingFlavor::Plain | OrderingFlavor::Opaque | OrderingFlavor::Acquire => Ordering::Relaxed,
	}
}

/// Success and failure orderings of a read-modify-write.
pub(crate) const fn update_orderings(flavor: OrderingFlavor) -> (Ordering, Ordering) {
	match flavor {
		OrderingFlavor::Plain | OrderingFlavor::Opaque => (Ordering::Relaxed, Ordering::Relaxed),
		OrderingFlavor::Acquire => (Ordering::Acquire, Ordering::Acquire),
		OrderingFlavor::Release => (Ordering::Release, Ordering::Relaxed),
		OrderingFlavor::Volatile => (Ordering::SeqCst, Ordering::SeqCst),
	}
}

pub(crate) trait Slot {
	fn load(&self, flavor: OrderingFlavor) -> u64;

	fn store(&self, bits: u64, flavor: OrderingFlavor);

	/// Replaces `current` with `new`, returning the witness value in either
	/// case. A weak exchange may fail even when the witness equals `current`.
	fn compare_exchange(&self, current: u64, new: u64, flavor: OrderingFlavor, weak: bool) -> Result<u64, u64>;

	/// Atomically replaces the value with `f(value)`, returning the previous
	/// value.
	fn fetch_update(&self, flavor: OrderingFlavor, f: &mut dyn FnMut(u64) -> u64) -> u64 {
		let mut current = self.load(OrderingFlavor::Plain);
		loop {
			match self.compare_exchange(current, f(current), flavor, true) {
				Ok(previous) => return previous,
				Err(actual) => current = actual,
			}
		}
	}
}

/// A whole 64-bit word holding one value.
pub(crate) struct WordSlot<'a> {
	cell: &'a AtomicU64,
}

impl<'a> WordSlot<'a> {
	pub(crate) fn new(cell: &'a AtomicU64) -> Self {
		Self { cell }
	}
}

impl Slot for WordSlot<'_> {
	fn load(&self, flavor: OrderingFlavor) -> u64 {
		self.cell.load(load_ordering(flavor))
	}

	fn store(&self, bits: u64, flavor: OrderingFlavor) {
		self.cell.store(bits, store_ordering(flavor));
	}

	fn compare_exchange(&self, current: u64, new: u64, flavor: OrderingFlavor, weak: bool) -> Result<u64, u64> {
		let (success, failure) = update_orderings(flavor);
		if weak {
			self.cell.compare_exchange_weak(current, new, success, failure)
		} else {
			self.cell.compare_exchange(current, new, success, failure)
		}
	}
}

/// A naturally aligned region of a byte buffer, updated by exchanging the
/// containing word.
pub(crate) struct RegionSlot<'a> {
	word: &'a AtomicU64,
	shift: u32,
	mask: u64,
	width: usize,
	order: ByteOrder,
}

impl<'a> RegionSlot<'a> {
	/// `addr` must be a multiple of `width`, and `width` a power of two no
	/// larger than eight.
	pub(crate) fn new(store: &'a ByteStore, addr: usize, width: usize, order: ByteOrder) -> Self {
		debug_assert!(width.is_power_of_two() && width <= 8 && addr % width == 0);
		Self {
			word: store.word(addr),
			shift: byte_shift(addr),
			mask: u64::MAX >> (64 - 8 * width),
			width,
			order,
		}
	}

	fn decode(&self, word: u64) -> u64 {
		from_memory_order((word >> self.shift) & self.mask, self.width, self.order)
	}

	fn encode(&self, word: u64, bits: u64) -> u64 {
		let raw = to_memory_order(bits, self.width, self.order) & self.mask;
		(word & !(self.mask << self.shift)) | (raw << self.shift)
	}
}

impl Slot for RegionSlot<'_> {
	fn load(&self, flavor: OrderingFlavor) -> u64 {
		self.decode(self.word.load(load_ordering(flavor)))
	}

	fn store(&self, bits: u64, flavor: OrderingFlavor) {
		let _ = self.fetch_update(flavor, &mut |_| bits);
	}

	fn compare_exchange(&self, current: u64, new: u64, flavor: OrderingFlavor, weak: bool) -> Result<u64, u64> {
		let (success, failure) = update_orderings(flavor);
		let mut word = self.word.load(failure);
		loop {
			let witness = self.decode(word);
			if witness != current {
				return Err(witness);
			}
			let next = self.encode(word, new);
			let exchanged = if weak {
				self.word.compare_exchange_weak(word, next, success, failure)
			} else {
				self.word.compare_exchange(word, next, success, failure)
			};
			match exchanged {
				Ok(_) => return Ok(witness),
				// Neighboring bytes changing under a weak exchange count as a
				// spurious failure.
				Err(actual) if weak => return Err(self.decode(actual)),
				Err(actual) => word = actual,
			}
		}
	}
}

pub(crate) enum AnySlot<'a> {
	Word(WordSlot<'a>),
	Region(RegionSlot<'a>),
}

impl Slot for AnySlot<'_> {
	fn load(&self, flavor: OrderingFlavor) -> u64 {
		match self {
			Self::Word(slot) => slot.load(flavor),
			Self::Region(slot) => slot.load(flavor),
		}
	}

	fn store(&self, bits: u64, flavor: OrderingFlavor) {
		match self {
			Self::Word(slot) => slot.store(bits, flavor),
			Self::Region(slot) => slot.store(bits, flavor),
		}
	}

	fn compare_exchange(&self, current: u64, new: u64, flavor: OrderingFlavor, weak: bool) -> Result<u64, u64> {
		match self {
			Self::Word(slot) => slot.compare_exchange(current, new, flavor, weak),
			Self::Region(slot) => slot.compare_exchange(current, new, flavor, weak),
		}
	}
}

#[cfg(test)]
mod tests;
