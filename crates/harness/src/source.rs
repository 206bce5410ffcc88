//! Variable sources: where a probed value lives.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use atomvar_access::lookup;
use atomvar_access::{AccessError, AccessPoint, Arg, Array, ByteBuffer, ClassDef, ClassId, Instance, ParamType};
use atomvar_primitives::{MemoryMode, PrimType, Value};

use crate::capability::{Profile, SourceKind};
use crate::values::{encode, other_type, values};

pub const FIELD: &str = "v";
pub const FINAL_FIELD: &str = "final_v";
pub const STATIC_FIELD: &str = "static_v";
pub const STATIC_FINAL_FIELD: &str = "static_final_v";

/// A variable location together with its container.
///
/// Equality and hashing follow identity: declaring entity, element type and
/// memory mode. Stored values and container instances are ignored.
#[derive(Debug, Clone)]
pub enum VariableSource {
	InstanceField { receiver: Instance, name: &'static str, ty: PrimType, is_final: bool },
	StaticField { class: Arc<ClassDef>, name: &'static str, ty: PrimType, is_final: bool },
	ArrayElement { array: Array },
	BufferView { buffer: ByteBuffer, mode: MemoryMode, ty: PrimType },
}

impl VariableSource {
	/// A fresh array of `length` elements, each holding the first literal of
	/// `ty`.
	pub fn array(ty: PrimType, length: usize) -> Self {
		Self::ArrayElement { array: Array::filled(values(ty).first, length) }
	}

	/// A fresh buffer of `limit` bytes viewed as `ty` under `mode`.
	///
	/// Every aligned slot is seeded with the first literal of `ty`, so
	/// read-only views have a known value.
	pub fn buffer(ty: PrimType, mode: MemoryMode, limit: usize) -> Self {
		let buffer = if mode.is_direct() { ByteBuffer::allocate_direct(limit) } else { ByteBuffer::allocate(limit) };
		buffer.fill_from(&encode(values(ty).first, mode.byte_order()).repeat(limit.div_ceil(ty.size())));
		let buffer = if mode.is_read_only() { buffer.as_read_only() } else { buffer };
		Self::BufferView { buffer, mode, ty }
	}

	pub fn kind(&self) -> SourceKind {
		match self {
			Self::InstanceField { .. } => SourceKind::InstanceField,
			Self::StaticField { .. } => SourceKind::StaticField,
			Self::ArrayElement { .. } => SourceKind::ArrayElement,
			Self::BufferView { .. } => SourceKind::BufferView,
		}
	}

	pub fn ty(&self) -> PrimType {
		match self {
			Self::InstanceField { ty, .. } | Self::StaticField { ty, .. } | Self::BufferView { ty, .. } => *ty,
			Self::ArrayElement { array } => array.elem_type(),
		}
	}

	pub fn is_final(&self) -> bool {
		matches!(self, Self::InstanceField { is_final: true, .. } | Self::StaticField { is_final: true, .. })
	}

	pub fn memory_mode(&self) -> Option<MemoryMode> {
		match self {
			Self::BufferView { mode, .. } => Some(*mode),
			_ => None,
		}
	}

	/// Array length or buffer limit.
	pub fn length(&self) -> Option<usize> {
		match self {
			Self::ArrayElement { array } => Some(array.len()),
			Self::BufferView { buffer, .. } => Some(buffer.limit()),
			_ => None,
		}
	}

	pub fn profile(&self) -> Profile {
		Profile {
			kind: self.kind(),
			ty: self.ty(),
			is_final: self.is_final(),
			memory: self.memory_mode(),
			length: self.length(),
		}
	}

	/// Indices the access oracle runs at: the first and the last aligned
	/// slot of a container, or the single field location.
	pub fn access_indices(&self) -> Vec<i32> {
		let last = match self {
			Self::ArrayElement { array } => array.len().checked_sub(1),
			Self::BufferView { buffer, ty, .. } => (buffer.limit() / ty.size()).checked_sub(1).map(|slot| slot * ty.size()),
			_ => None,
		};
		let mut indices = vec![0];
		indices.extend(last.filter(|&last| last > 0).and_then(|last| i32::try_from(last).ok()));
		indices
	}

	/// Binds the source to an access point.
	pub fn resolve(&self) -> Result<AccessPoint, AccessError> {
		match self {
			Self::InstanceField { receiver, name, ty, .. } => lookup::find_var(receiver.class(), name, *ty),
			Self::StaticField { class, name, ty, .. } => lookup::find_static_var(class, name, *ty),
			Self::ArrayElement { array } => Ok(lookup::array_element(array.elem_type())),
			Self::BufferView { mode, ty, .. } => lookup::byte_buffer_view(*ty, *mode),
		}
	}

	/// Coordinate types an access point over this source must declare.
	pub fn coordinate_types(&self) -> Vec<ParamType> {
		match self {
			Self::InstanceField { receiver, .. } => vec![ParamType::Receiver(receiver.class().id())],
			Self::StaticField { .. } => Vec::new(),
			Self::ArrayElement { array } => vec![ParamType::Array(array.elem_type()), ParamType::Index],
			Self::BufferView { mode, .. } => vec![ParamType::Buffer(mode.backing()), ParamType::Index],
		}
	}

	/// Coordinate arguments addressing `index`. Fields ignore the index.
	pub fn coordinates(&self, index: i32) -> Vec<Arg> {
		match self {
			Self::InstanceField { receiver, .. } => vec![Arg::from(receiver.clone())],
			Self::StaticField { .. } => Vec::new(),
			Self::ArrayElement { array } => vec![Arg::from(array.clone()), Arg::Index(index)],
			Self::BufferView { buffer, .. } => vec![Arg::from(buffer.clone()), Arg::Index(index)],
		}
	}

	/// [`coordinates`](Self::coordinates) with a null container, or `None`
	/// for static fields, which have no container.
	pub fn with_null_container(&self, index: i32) -> Option<Vec<Arg>> {
		match self {
			Self::InstanceField { .. } => Some(vec![Arg::Receiver(None)]),
			Self::StaticField { .. } => None,
			Self::ArrayElement { .. } => Some(vec![Arg::Array(None), Arg::Index(index)]),
			Self::BufferView { .. } => Some(vec![Arg::Buffer(None), Arg::Index(index)]),
		}
	}

	/// Coordinates whose container has the wrong class: an unrelated
	/// receiver, an array of another element type, or a buffer with the
	/// other backing.
	pub fn with_foreign_container(&self, index: i32) -> Option<Vec<Arg>> {
		match self {
			Self::InstanceField { .. } => {
				let unrelated = ClassDef::builder("Unrelated").field(FIELD, values(self.ty()).first).build();
				Some(vec![Arg::from(Instance::new(&unrelated))])
			}
			Self::StaticField { .. } => None,
			Self::ArrayElement { array } => {
				let foreign = Array::new(other_type(array.elem_type()), array.len());
				Some(vec![Arg::from(foreign), Arg::Index(index)])
			}
			Self::BufferView { buffer, .. } => {
				let foreign =
					if buffer.is_direct() { ByteBuffer::allocate(buffer.limit()) } else { ByteBuffer::allocate_direct(buffer.limit()) };
				Some(vec![Arg::from(foreign), Arg::Index(index)])
			}
		}
	}

	/// A source of the same kind differing in exactly one identity
	/// component: another field, element type, or byte order.
	pub fn sibling(&self) -> Self {
		match self {
			Self::InstanceField { receiver, name, ty, .. } => {
				let (name, is_final) = if *name == FIELD { (FINAL_FIELD, true) } else { (FIELD, false) };
				Self::InstanceField { receiver: receiver.clone(), name, ty: *ty, is_final }
			}
			Self::StaticField { class, name, ty, .. } => {
				let (name, is_final) =
					if *name == STATIC_FIELD { (STATIC_FINAL_FIELD, true) } else { (STATIC_FIELD, false) };
				Self::StaticField { class: Arc::clone(class), name, ty: *ty, is_final }
			}
			Self::ArrayElement { array } => Self::array(other_type(array.elem_type()), array.len()),
			Self::BufferView { buffer, mode, ty } => {
				Self::buffer(*ty, mode.with_byte_order(mode.byte_order().reversed()), buffer.limit())
			}
		}
	}

	fn identity(&self) -> (SourceKind, Option<ClassId>, &str, PrimType, Option<MemoryMode>) {
		match self {
			Self::InstanceField { receiver, name, ty, .. } => {
				(SourceKind::InstanceField, Some(receiver.class().id()), name, *ty, None)
			}
			Self::StaticField { class, name, ty, .. } => (SourceKind::StaticField, Some(class.id()), name, *ty, None),
			Self::ArrayElement { array } => (SourceKind::ArrayElement, None, "", array.elem_type(), None),
			Self::BufferView { mode, ty, .. } => (SourceKind::BufferView, None, "", *ty, Some(*mode)),
		}
	}
}

impl PartialEq for VariableSource {
	fn eq(&self, other: &Self) -> bool {
		self.identity() == other.identity()
	}
}

impl Eq for VariableSource {}

impl Hash for VariableSource {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity().hash(state);
	}
}

impl std::fmt::Display for VariableSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let qualifier = if self.is_final() { "final " } else { "" };
		match self {
			Self::InstanceField { receiver, name, ty, .. } => {
				write!(f, "{qualifier}{ty} {}.{name}", receiver.class().name())
			}
			Self::StaticField { class, name, ty, .. } => write!(f, "{qualifier}static {ty} {}.{name}", class.name()),
			Self::ArrayElement { array } => write!(f, "{}[{}]", array.elem_type(), array.len()),
			Self::BufferView { buffer, mode, ty } => write!(f, "{ty} view {mode} [{}]", buffer.limit()),
		}
	}
}

/// Per-type class and instance shared by the field cases of one type.
///
/// Every field starts at the first literal of the type. Cases against the
/// mutable fields run in generation order.
#[derive(Debug, Clone)]
pub struct FieldFixture {
	ty: PrimType,
	class: Arc<ClassDef>,
	instance: Instance,
}

impl FieldFixture {
	pub fn new(ty: PrimType) -> Self {
		let first: Value = values(ty).first;
		let class = ClassDef::builder(format!("Fields<{ty}>"))
			.field(FIELD, first)
			.final_field(FINAL_FIELD, first)
			.static_field(STATIC_FIELD, first)
			.static_final_field(STATIC_FINAL_FIELD, first)
			.build();
		let instance = Instance::new(&class);
		Self { ty, class, instance }
	}

	pub fn instance_field(&self, is_final: bool) -> VariableSource {
		VariableSource::InstanceField {
			receiver: self.instance.clone(),
			name: if is_final { FINAL_FIELD } else { FIELD },
			ty: self.ty,
			is_final,
		}
	}

	pub fn static_field(&self, is_final: bool) -> VariableSource {
		VariableSource::StaticField {
			class: Arc::clone(&self.class),
			name: if is_final { STATIC_FINAL_FIELD } else { STATIC_FIELD },
			ty: self.ty,
			is_final,
		}
	}
}
