//! Typed calls through an [`Invoker`], normalized to the family's shape.

use atomvar_access::{AccessError, AccessPoint, Arg, Array, Returned};
use atomvar_primitives::{AccessMode, ReturnShape, Value};

use crate::failure::Failure;
use crate::invoker::Invoker;
use crate::source::VariableSource;

/// Observable state of a source's location, for no-mutation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
	Field(Value),
	Elements(Vec<Value>),
	Bytes(Vec<u8>),
}

impl std::fmt::Display for Snapshot {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Field(value) => write!(f, "{value}"),
			Self::Elements(values) => write!(f, "{values:?}"),
			Self::Bytes(bytes) => write!(f, "{bytes:02x?}"),
		}
	}
}

#[derive(Clone, Copy)]
pub struct Driver<'a> {
	point: &'a AccessPoint,
	invoker: &'a dyn Invoker,
	source: &'a VariableSource,
}

impl<'a> Driver<'a> {
	pub fn new(point: &'a AccessPoint, invoker: &'a dyn Invoker, source: &'a VariableSource) -> Self {
		Self { point, invoker, source }
	}

	pub fn invoker(&self) -> &'a dyn Invoker {
		self.invoker
	}

	pub fn point(&self) -> &'a AccessPoint {
		self.point
	}

	/// Coordinates for `index` followed by `values`.
	pub fn args(&self, index: i32, values: &[Value]) -> Vec<Arg> {
		let mut args = self.source.coordinates(index);
		args.extend(values.iter().copied().map(Arg::Value));
		args
	}

	/// Raw call with arbitrary arguments.
	pub fn call_with(&self, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		self.invoker.invoke(self.point, mode, args)
	}

	pub fn call(&self, mode: AccessMode, index: i32, values: &[Value]) -> Result<Returned, AccessError> {
		self.call_with(mode, &self.args(index, values))
	}

	/// Calls `mode`, which must succeed with its family's return shape.
	pub fn expect_ok(&self, mode: AccessMode, index: i32, values: &[Value]) -> Result<Returned, Failure> {
		let returned = self.call(mode, index, values).map_err(|error| Failure::UnexpectedError { mode, error })?;
		let (expected, actual) = (mode.return_shape(), returned.shape());
		if expected != actual {
			return Err(Failure::ShapeMismatch { mode, expected, actual });
		}
		Ok(returned)
	}

	pub fn get(&self, mode: AccessMode, index: i32) -> Result<Value, Failure> {
		self.expect_value(mode, index, &[])
	}

	pub fn set(&self, mode: AccessMode, index: i32, value: Value) -> Result<(), Failure> {
		self.expect_ok(mode, index, &[value]).map(|_| ())
	}

	pub fn compare_and_set(&self, mode: AccessMode, index: i32, expected: Value, new: Value) -> Result<bool, Failure> {
		let returned = self.expect_ok(mode, index, &[expected, new])?;
		returned.witness().ok_or_else(|| Failure::ShapeMismatch { mode, expected: ReturnShape::Witness, actual: returned.shape() })
	}

	pub fn compare_and_exchange(&self, mode: AccessMode, index: i32, expected: Value, new: Value) -> Result<Value, Failure> {
		self.expect_value(mode, index, &[expected, new])
	}

	/// Any `GET_AND_*` mode; returns the previous value.
	pub fn get_and_update(&self, mode: AccessMode, index: i32, operand: Value) -> Result<Value, Failure> {
		self.expect_value(mode, index, &[operand])
	}

	fn expect_value(&self, mode: AccessMode, index: i32, values: &[Value]) -> Result<Value, Failure> {
		let returned = self.expect_ok(mode, index, values)?;
		returned.value().ok_or_else(|| Failure::ShapeMismatch { mode, expected: ReturnShape::Value, actual: returned.shape() })
	}

	/// Current state of the location. Fields are read with plain `GET`.
	pub fn snapshot(&self) -> Result<Snapshot, Failure> {
		Ok(match self.source {
			VariableSource::ArrayElement { array } => Snapshot::Elements(elements(array)),
			VariableSource::BufferView { buffer, .. } => Snapshot::Bytes(buffer.to_vec()),
			VariableSource::InstanceField { .. } | VariableSource::StaticField { .. } => {
				Snapshot::Field(self.get(AccessMode::Get, 0)?)
			}
		})
	}

	/// Runs `f`, then fails with [`Failure::Mutated`] if the location changed.
	pub fn unchanged<T>(&self, mode: AccessMode, f: impl FnOnce() -> Result<T, Failure>) -> Result<T, Failure> {
		let before = self.snapshot()?;
		let result = f()?;
		let after = self.snapshot()?;
		if before != after {
			return Err(Failure::Mutated { mode, before: before.to_string(), after: after.to_string() });
		}
		Ok(result)
	}
}

fn elements(array: &Array) -> Vec<Value> {
	(0..array.len()).filter_map(|index| array.get(index)).collect()
}
