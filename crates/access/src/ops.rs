//! Per-family operations on a resolved, validated location.

use std::sync::atomic::AtomicU64;

use atomvar_primitives::{AccessFamily, AccessMode, BitwiseOp, ByteOrder, PrimType, Value};

use crate::args::Returned;
use crate::buffer::ByteStore;
use crate::slot::{AnySlot, RegionSlot, Slot, WordSlot};

/// A family operation. `values` are the mode's value arguments, already
/// checked against the variable type.
pub(crate) type Op = fn(&Location<'_>, AccessMode, &[Value]) -> Returned;

pub(crate) struct Location<'a> {
	pub(crate) ty: PrimType,
	pub(crate) place: Place<'a>,
}

pub(crate) enum Place<'a> {
	Word(&'a AtomicU64),
	/// `offset` is in bounds. It is aligned unless the mode is plain.
	Bytes { store: &'a ByteStore, offset: usize, order: ByteOrder },
}

impl<'a> Location<'a> {
	fn slot(&self) -> AnySlot<'a> {
		match self.place {
			Place::Word(cell) => AnySlot::Word(WordSlot::new(cell)),
			Place::Bytes { store, offset, order } => AnySlot::Region(RegionSlot::new(store, offset, self.ty.size(), order)),
		}
	}

	fn value(&self, bits: u64) -> Returned {
		Returned::Value(Value::from_bits(self.ty, bits))
	}
}

/// Picks the operation implementing `mode`.
pub(crate) fn select(mode: AccessMode) -> Op {
	match (mode.family(), mode.bitwise_op()) {
		(AccessFamily::Read, _) => read,
		(AccessFamily::Write, _) => write,
		(AccessFamily::CompareAndSet, _) => compare_and_set,
		(AccessFamily::CompareAndExchange, _) => compare_and_exchange,
		(AccessFamily::GetAndSet, _) => get_and_set,
		(AccessFamily::GetAndAdd, _) => get_and_add,
		(AccessFamily::GetAndBitwise, Some(BitwiseOp::Or)) => get_and_bitwise_or,
		(AccessFamily::GetAndBitwise, Some(BitwiseOp::And)) => get_and_bitwise_and,
		(AccessFamily::GetAndBitwise, _) => get_and_bitwise_xor,
	}
}

fn read(location: &Location<'_>, mode: AccessMode, _: &[Value]) -> Returned {
	let bits = match location.place {
		Place::Bytes { store, offset, order } if mode.is_plain_access() => {
			store.read_bytes(offset, location.ty.size(), order)
		}
		_ => location.slot().load(mode.flavor()),
	};
	location.value(bits)
}

fn write(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let bits = values[0].to_bits();
	match location.place {
		Place::Bytes { store, offset, order } if mode.is_plain_access() => {
			store.write_bytes(offset, location.ty.size(), order, bits);
		}
		_ => location.slot().store(bits, mode.flavor()),
	}
	Returned::Unit
}

fn compare_and_set(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let exchanged =
		location.slot().compare_exchange(values[0].to_bits(), values[1].to_bits(), mode.flavor(), mode.is_weak());
	Returned::Witness(exchanged.is_ok())
}

fn compare_and_exchange(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let (Ok(witness) | Err(witness)) =
		location.slot().compare_exchange(values[0].to_bits(), values[1].to_bits(), mode.flavor(), false);
	location.value(witness)
}

fn get_and_set(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let bits = values[0].to_bits();
	update(location, mode, &mut |_| bits)
}

fn get_and_add(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let ty = location.ty;
	let delta = values[0].to_bits();
	update(location, mode, &mut |bits| add_bits(ty, bits, delta))
}

fn get_and_bitwise_or(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let operand = values[0].to_bits();
	update(location, mode, &mut |bits| bits | operand)
}

fn get_and_bitwise_and(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let operand = values[0].to_bits();
	update(location, mode, &mut |bits| bits & operand)
}

fn get_and_bitwise_xor(location: &Location<'_>, mode: AccessMode, values: &[Value]) -> Returned {
	let operand = values[0].to_bits();
	update(location, mode, &mut |bits| bits ^ operand)
}

fn update(location: &Location<'_>, mode: AccessMode, f: &mut dyn FnMut(u64) -> u64) -> Returned {
	location.value(location.slot().fetch_update(mode.flavor(), f))
}

/// Adds two value bit patterns of `ty`.
fn add_bits(ty: PrimType, a: u64, b: u64) -> u64 {
	match ty {
		PrimType::Float => u64::from((f32::from_bits(a as u32) + f32::from_bits(b as u32)).to_bits()),
		PrimType::Double => (f64::from_bits(a) + f64::from_bits(b)).to_bits(),
		_ => a.wrapping_add(b) & ty.mask(),
	}
}

#[cfg(test)]
mod tests;
