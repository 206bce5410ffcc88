use atomvar_primitives::AccessMode;

use crate::args::{AccessType, Arg, Returned};
use crate::error::AccessError;
use crate::ops::Op;
use crate::point::AccessPoint;

/// An access point bound to one access mode.
///
/// The operation is selected once, when the handle is created. Invocation
/// performs the same validation as [`AccessPoint::invoke`].
#[derive(Clone)]
pub struct AccessHandle {
	point: AccessPoint,
	mode: AccessMode,
	access_type: AccessType,
	op: Op,
}

impl AccessHandle {
	pub(crate) fn new(point: AccessPoint, mode: AccessMode, access_type: AccessType, op: Op) -> Self {
		Self { point, mode, access_type, op }
	}

	pub fn point(&self) -> &AccessPoint {
		&self.point
	}

	pub fn mode(&self) -> AccessMode {
		self.mode
	}

	pub fn access_type(&self) -> &AccessType {
		&self.access_type
	}

	pub fn invoke(&self, args: &[Arg]) -> Result<Returned, AccessError> {
		self.point.run(self.mode, &self.access_type, self.op, args)
	}
}

impl std::fmt::Debug for AccessHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AccessHandle")
			.field("point", &self.point)
			.field("mode", &self.mode)
			.field("access_type", &self.access_type)
			.finish_non_exhaustive()
	}
}
