use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use atomvar_primitives::{PrimType, Value};

/// Fixed-length array of primitive elements.
///
/// Clones share storage; [`Array::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct Array {
	inner: Arc<ArrayData>,
}

struct ArrayData {
	ty: PrimType,
	cells: Box<[AtomicU64]>,
}

impl Array {
	/// Zero-filled array.
	pub fn new(ty: PrimType, len: usize) -> Self {
		Self::filled(Value::zero(ty), len)
	}

	pub fn filled(value: Value, len: usize) -> Self {
		let bits = value.to_bits();
		let cells = (0..len).map(|_| AtomicU64::new(bits)).collect();
		Self { inner: Arc::new(ArrayData { ty: value.ty(), cells }) }
	}

	pub fn elem_type(&self) -> PrimType {
		self.inner.ty
	}

	pub fn len(&self) -> usize {
		self.inner.cells.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.cells.is_empty()
	}

	/// Element at `index`, read without going through an access point.
	pub fn get(&self, index: usize) -> Option<Value> {
		let cell = self.inner.cells.get(index)?;
		Some(Value::from_bits(self.inner.ty, cell.load(Ordering::SeqCst)))
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Checks `index` against the array length.
	pub(crate) fn cell(&self, index: i32) -> Option<&AtomicU64> {
		usize::try_from(index).ok().and_then(|index| self.inner.cells.get(index))
	}
}

impl std::fmt::Debug for Array {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}[{}]", self.inner.ty, self.len())
	}
}
