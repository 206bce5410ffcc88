//! Access-point factories.
//!
//! Field lookups resolve the class but never initialize it.

use std::sync::Arc;

use atomvar_primitives::{MemoryMode, PrimType};

use crate::class::{ClassDef, FieldDef};
use crate::error::AccessError;
use crate::point::{AccessPoint, Target};

/// Access point for instance field `name` of `class` or an ancestor.
pub fn find_var(class: &Arc<ClassDef>, name: &str, ty: PrimType) -> Result<AccessPoint, AccessError> {
	let (declaring, field) = resolve(class, name, ty, false)?;
	tracing::trace!(class = class.name(), field = name, "access.lookup.instance");
	Ok(AccessPoint::new(Target::InstanceField { class: Arc::clone(class), declaring, field }))
}

/// Access point for static field `name` declared by `class` or an ancestor.
///
/// The point is bound to the declaring class: accessing it initializes that
/// class only.
pub fn find_static_var(class: &Arc<ClassDef>, name: &str, ty: PrimType) -> Result<AccessPoint, AccessError> {
	let (declaring, field) = resolve(class, name, ty, true)?;
	tracing::trace!(class = class.name(), declaring = declaring.name(), field = name, "access.lookup.static");
	Ok(AccessPoint::new(Target::StaticField { declaring, field }))
}

/// Access point for elements of `ty` arrays.
pub fn array_element(ty: PrimType) -> AccessPoint {
	AccessPoint::new(Target::ArrayElement(ty))
}

/// Access point viewing byte buffers of the given memory mode as `ty`
/// values.
///
/// Single-byte types are rejected.
pub fn byte_buffer_view(ty: PrimType, mode: MemoryMode) -> Result<AccessPoint, AccessError> {
	if !ty.supports_buffer_view() {
		return Err(AccessError::UnsupportedView(ty));
	}
	Ok(AccessPoint::new(Target::BufferView { ty, mode }))
}

fn resolve(
	class: &Arc<ClassDef>,
	name: &str,
	ty: PrimType,
	is_static: bool,
) -> Result<(Arc<ClassDef>, FieldDef), AccessError> {
	let (declaring, field) = class
		.resolve_field(name)
		.ok_or_else(|| AccessError::NoSuchField { class: class.name().to_string(), name: name.to_string() })?;
	if field.is_static != is_static {
		return Err(AccessError::FieldKindMismatch {
			class: declaring.name().to_string(),
			name: field.name,
			is_static: field.is_static,
		});
	}
	if field.ty != ty {
		return Err(AccessError::FieldTypeMismatch {
			class: declaring.name().to_string(),
			name: field.name,
			expected: ty,
			actual: field.ty,
		});
	}
	Ok((declaring, field))
}

#[cfg(test)]
mod tests;
