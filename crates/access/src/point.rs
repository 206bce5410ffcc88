//! Access points: typed handles onto a variable location.
//!
//! Invocation validates in a fixed order and never mutates before failing:
//! argument shapes and value types, null containers, container classes, mode
//! support, bounds, then the direct-backing, alignment and writability gates
//! of buffer views.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use atomvar_primitives::{AccessFamily, AccessMode, MemoryMode, PrimType, ReturnShape, Value};

use crate::args::{AccessType, Arg, ParamType, ReturnType, Returned};
use crate::array::Array;
use crate::buffer::ByteBuffer;
use crate::class::{ClassDef, ClassId, FieldDef, Instance};
use crate::error::AccessError;
use crate::handle::AccessHandle;
use crate::ops::{self, Location, Op, Place};

/// What kind of location an access point addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
	InstanceField,
	StaticField,
	ArrayElement,
	BufferView,
}

pub(crate) enum Target {
	InstanceField { class: Arc<ClassDef>, declaring: Arc<ClassDef>, field: FieldDef },
	StaticField { declaring: Arc<ClassDef>, field: FieldDef },
	ArrayElement(PrimType),
	BufferView { ty: PrimType, mode: MemoryMode },
}

/// Equality key: two lookups of the same location yield equal points.
#[derive(PartialEq, Eq, Hash)]
enum Identity {
	InstanceField { class: ClassId, declaring: ClassId, slot: usize, ty: PrimType },
	StaticField { declaring: ClassId, slot: usize, ty: PrimType },
	ArrayElement(PrimType),
	BufferView(PrimType, MemoryMode),
}

/// A handle onto a variable location supporting a set of access modes.
///
/// Clones are cheap and compare equal. Points obtained by separate lookups of
/// the same location also compare equal.
#[derive(Clone)]
pub struct AccessPoint {
	target: Arc<Target>,
}

/// Non-null coordinate arguments, shape-checked against the target.
enum Coordinates<'a> {
	Receiver(&'a Instance),
	Static,
	Element(&'a Array, i32),
	View(&'a ByteBuffer, i32),
}

impl AccessPoint {
	pub(crate) fn new(target: Target) -> Self {
		Self { target: Arc::new(target) }
	}

	pub fn kind(&self) -> PointKind {
		match &*self.target {
			Target::InstanceField { .. } => PointKind::InstanceField,
			Target::StaticField { .. } => PointKind::StaticField,
			Target::ArrayElement(_) => PointKind::ArrayElement,
			Target::BufferView { .. } => PointKind::BufferView,
		}
	}

	/// Type of the variable the point addresses.
	pub fn var_type(&self) -> PrimType {
		match &*self.target {
			Target::InstanceField { field, .. } | Target::StaticField { field, .. } => field.ty,
			Target::ArrayElement(ty) | Target::BufferView { ty, .. } => *ty,
		}
	}

	/// Declared memory mode of a buffer view.
	pub fn memory_mode(&self) -> Option<MemoryMode> {
		match &*self.target {
			Target::BufferView { mode, .. } => Some(*mode),
			_ => None,
		}
	}

	/// Parameter types locating the variable, in argument order.
	pub fn coordinate_types(&self) -> Vec<ParamType> {
		match &*self.target {
			Target::InstanceField { class, .. } => vec![ParamType::Receiver(class.id())],
			Target::StaticField { .. } => Vec::new(),
			Target::ArrayElement(ty) => vec![ParamType::Array(*ty), ParamType::Index],
			Target::BufferView { mode, .. } => vec![ParamType::Buffer(mode.backing()), ParamType::Index],
		}
	}

	/// Full parameter and return types of `mode`.
	pub fn access_type(&self, mode: AccessMode) -> AccessType {
		let ty = self.var_type();
		let mut params = self.coordinate_types();
		params.extend(std::iter::repeat_n(ParamType::Value(ty), mode.value_arity()));
		let ret = match mode.return_shape() {
			ReturnShape::Unit => ReturnType::Unit,
			ReturnShape::Value => ReturnType::Value(ty),
			ReturnShape::Witness => ReturnType::Witness,
		};
		AccessType { params, ret }
	}

	/// Whether `mode` is supported at all. Buffer views may still reject a
	/// supported mode at invocation, depending on the buffer and offset.
	pub fn is_supported(&self, mode: AccessMode) -> bool {
		let ty = self.var_type();
		let family_applies = match mode.family() {
			AccessFamily::GetAndAdd => ty.supports_add(),
			AccessFamily::GetAndBitwise => ty.supports_bitwise(),
			_ => true,
		};
		let target_allows = match &*self.target {
			Target::InstanceField { field, .. } | Target::StaticField { field, .. } => {
				!field.is_final || mode.family() == AccessFamily::Read
			}
			Target::ArrayElement(_) => true,
			Target::BufferView { ty, .. } => mode.is_plain_access() || ty.view_supports_atomic_access(),
		};
		family_applies && target_allows
	}

	/// Performs `mode` with the given coordinates and values.
	pub fn invoke(&self, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		self.run(mode, &self.access_type(mode), ops::select(mode), args)
	}

	/// A handle bound to `mode`.
	pub fn to_handle(&self, mode: AccessMode) -> AccessHandle {
		AccessHandle::new(self.clone(), mode, self.access_type(mode), ops::select(mode))
	}

	/// A handle bound to `mode` whose type must be exactly `expected`.
	pub fn to_exact_handle(&self, mode: AccessMode, expected: &AccessType) -> Result<AccessHandle, AccessError> {
		let actual = self.access_type(mode);
		if actual != *expected {
			return Err(AccessError::wrong_type(mode, format!("expected {expected}, actual {actual}")));
		}
		Ok(AccessHandle::new(self.clone(), mode, actual, ops::select(mode)))
	}

	pub(crate) fn run(
		&self,
		mode: AccessMode,
		access_type: &AccessType,
		op: Op,
		args: &[Arg],
	) -> Result<Returned, AccessError> {
		let result = self.prepare(mode, access_type, args).map(|(location, values)| op(&location, mode, &values));
		if let Err(error) = &result {
			tracing::trace!(point = %self, mode = %mode, kind = %error.kind(), "access.invoke.rejected");
		}
		result
	}

	fn prepare<'a>(
		&'a self,
		mode: AccessMode,
		access_type: &AccessType,
		args: &'a [Arg],
	) -> Result<(Location<'a>, Vec<Value>), AccessError> {
		if args.len() != access_type.params.len() {
			return Err(AccessError::wrong_type(
				mode,
				format!("{access_type} takes {} arguments, got {}", access_type.params.len(), args.len()),
			));
		}
		let (coordinates, values) = args.split_at(self.coordinate_types().len());
		let coordinates = self.shape_coordinates(mode, coordinates)?;
		let values = self.value_arguments(mode, values)?;
		let coordinates = coordinates.ok_or_else(|| AccessError::NullReference(self.container_name()))?;
		self.check_classes(&coordinates)?;
		if !self.is_supported(mode) {
			return Err(AccessError::Unsupported { mode, target: self.to_string() });
		}
		let location = self.locate(mode, coordinates)?;
		Ok((location, values))
	}

	/// Matches coordinate arguments against the target. `None` means a
	/// null container.
	fn shape_coordinates<'a>(
		&self,
		mode: AccessMode,
		args: &'a [Arg],
	) -> Result<Option<Coordinates<'a>>, AccessError> {
		Ok(match (&*self.target, args) {
			(Target::InstanceField { .. }, [Arg::Receiver(receiver)]) => receiver.as_ref().map(Coordinates::Receiver),
			(Target::StaticField { .. }, []) => Some(Coordinates::Static),
			(Target::ArrayElement(_), [Arg::Array(array), Arg::Index(index)]) => {
				array.as_ref().map(|array| Coordinates::Element(array, *index))
			}
			(Target::BufferView { .. }, [Arg::Buffer(buffer), Arg::Index(index)]) => {
				buffer.as_ref().map(|buffer| Coordinates::View(buffer, *index))
			}
			_ => {
				let found: Vec<String> = args.iter().map(Arg::describe).collect();
				let expected = self.coordinate_types().iter().map(ToString::to_string).collect::<Vec<_>>();
				return Err(AccessError::wrong_type(
					mode,
					format!("coordinates ({}) do not match ({})", found.join(", "), expected.join(", ")),
				));
			}
		})
	}

	fn value_arguments(&self, mode: AccessMode, args: &[Arg]) -> Result<Vec<Value>, AccessError> {
		let ty = self.var_type();
		args.iter()
			.map(|arg| match arg {
				Arg::Value(value) if value.ty() == ty => Ok(*value),
				other => Err(AccessError::wrong_type(mode, format!("expected {ty} value, got {}", other.describe()))),
			})
			.collect()
	}

	fn container_name(&self) -> &'static str {
		match &*self.target {
			Target::InstanceField { .. } | Target::StaticField { .. } => "receiver",
			Target::ArrayElement(_) => "array",
			Target::BufferView { .. } => "buffer",
		}
	}

	fn check_classes(&self, coordinates: &Coordinates<'_>) -> Result<(), AccessError> {
		let mismatch = |expected: String, found: String| Err(AccessError::ClassCast { expected, found });
		match (&*self.target, coordinates) {
			(Target::InstanceField { class, .. }, Coordinates::Receiver(object))
				if !object.class().is_subclass_of(class) =>
			{
				mismatch(class.name().to_string(), object.class().name().to_string())
			}
			(Target::ArrayElement(ty), Coordinates::Element(array, _)) if array.elem_type() != *ty => {
				mismatch(format!("{ty}[]"), format!("{}[]", array.elem_type()))
			}
			(Target::BufferView { mode, .. }, Coordinates::View(buffer, _)) => {
				let found = buffer.memory_mode(mode.byte_order());
				if found.backing() == mode.backing() {
					Ok(())
				} else {
					mismatch(format!("ByteBuffer({mode})"), format!("ByteBuffer({found})"))
				}
			}
			_ => Ok(()),
		}
	}

	fn locate<'a>(&'a self, mode: AccessMode, coordinates: Coordinates<'a>) -> Result<Location<'a>, AccessError> {
		let ty = self.var_type();
		let place = match (&*self.target, coordinates) {
			(Target::InstanceField { field, .. }, Coordinates::Receiver(object)) => Place::Word(object.cell(field.slot)),
			(Target::StaticField { declaring, field }, _) => {
				declaring.ensure_initialized();
				Place::Word(declaring.static_cell(field.slot))
			}
			(_, Coordinates::Element(array, index)) => match array.cell(index) {
				Some(cell) => Place::Word(cell),
				None => return Err(AccessError::ArrayIndexOutOfBounds { index, length: array.len() }),
			},
			(Target::BufferView { mode: memory, .. }, Coordinates::View(buffer, index)) => {
				let offset = view_offset(ty, buffer, index)?;
				check_view_gates(mode, ty, buffer, offset)?;
				Place::Bytes { store: buffer.store(), offset, order: memory.byte_order() }
			}
			_ => return Err(AccessError::wrong_type(mode, "coordinates do not match the target")),
		};
		Ok(Location { ty, place })
	}
}

/// Byte offset of a `ty`-sized access at `index`, if it lies within the
/// buffer's limit.
fn view_offset(ty: PrimType, buffer: &ByteBuffer, index: i32) -> Result<usize, AccessError> {
	let out_of_bounds = || AccessError::IndexOutOfBounds { index, size: ty.size(), limit: buffer.limit() };
	let offset = usize::try_from(index).map_err(|_| out_of_bounds())?;
	if offset + ty.size() > buffer.limit() {
		return Err(out_of_bounds());
	}
	Ok(offset)
}

fn check_view_gates(mode: AccessMode, ty: PrimType, buffer: &ByteBuffer, offset: usize) -> Result<(), AccessError> {
	if !mode.is_plain_access() {
		if !buffer.is_direct() {
			return Err(AccessError::HeapAtomicAccess { mode });
		}
		if offset % ty.size() != 0 {
			return Err(AccessError::MisalignedAccess { mode, offset, size: ty.size() });
		}
	}
	if mode.family().mutates() && buffer.is_read_only() {
		return Err(AccessError::ReadOnly { mode });
	}
	Ok(())
}

impl AccessPoint {
	fn identity(&self) -> Identity {
		match &*self.target {
			Target::InstanceField { class, declaring, field } => Identity::InstanceField {
				class: class.id(),
				declaring: declaring.id(),
				slot: field.slot,
				ty: field.ty,
			},
			Target::StaticField { declaring, field } => {
				Identity::StaticField { declaring: declaring.id(), slot: field.slot, ty: field.ty }
			}
			Target::ArrayElement(ty) => Identity::ArrayElement(*ty),
			Target::BufferView { ty, mode } => Identity::BufferView(*ty, *mode),
		}
	}
}

impl PartialEq for AccessPoint {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.target, &other.target) || self.identity() == other.identity()
	}
}

impl Eq for AccessPoint {}

impl Hash for AccessPoint {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity().hash(state);
	}
}

impl std::fmt::Display for AccessPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &*self.target {
			Target::InstanceField { declaring, field, .. } => {
				write!(f, "{} {}.{}", field.ty, declaring.name(), field.name)
			}
			Target::StaticField { declaring, field } => {
				write!(f, "static {} {}.{}", field.ty, declaring.name(), field.name)
			}
			Target::ArrayElement(ty) => write!(f, "{ty}[]"),
			Target::BufferView { ty, mode } => write!(f, "{ty} view of ByteBuffer({mode})"),
		}
	}
}

impl std::fmt::Debug for AccessPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "AccessPoint({self})")
	}
}
