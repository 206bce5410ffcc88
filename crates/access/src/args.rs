use atomvar_primitives::{MemoryMode, PrimType, ReturnShape, Value};

use crate::array::Array;
use crate::buffer::ByteBuffer;
use crate::class::{ClassId, Instance};

/// One invocation argument.
///
/// Container arguments are optional so that null references can be passed
/// and rejected.
#[derive(Debug, Clone)]
pub enum Arg {
	Receiver(Option<Instance>),
	Array(Option<Array>),
	Buffer(Option<ByteBuffer>),
	Index(i32),
	Value(Value),
}

impl Arg {
	pub(crate) fn describe(&self) -> String {
		match self {
			Self::Receiver(Some(object)) => format!("receiver {}", object.class().name()),
			Self::Receiver(None) => "null receiver".to_string(),
			Self::Array(Some(array)) => format!("{}[]", array.elem_type()),
			Self::Array(None) => "null array".to_string(),
			Self::Buffer(_) => "byte buffer".to_string(),
			Self::Index(_) => "index".to_string(),
			Self::Value(value) => format!("{} value", value.ty()),
		}
	}
}

impl From<Instance> for Arg {
	fn from(object: Instance) -> Self {
		Self::Receiver(Some(object))
	}
}

impl From<Array> for Arg {
	fn from(array: Array) -> Self {
		Self::Array(Some(array))
	}
}

impl From<ByteBuffer> for Arg {
	fn from(buffer: ByteBuffer) -> Self {
		Self::Buffer(Some(buffer))
	}
}

impl From<Value> for Arg {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

/// Result of a successful invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returned {
	Unit,
	Value(Value),
	/// Success flag of a compare-and-set.
	Witness(bool),
}

impl Returned {
	pub fn shape(self) -> ReturnShape {
		match self {
			Self::Unit => ReturnShape::Unit,
			Self::Value(_) => ReturnShape::Value,
			Self::Witness(_) => ReturnShape::Witness,
		}
	}

	pub fn value(self) -> Option<Value> {
		match self {
			Self::Value(value) => Some(value),
			_ => None,
		}
	}

	pub fn witness(self) -> Option<bool> {
		match self {
			Self::Witness(success) => Some(success),
			_ => None,
		}
	}
}

/// Declared type of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
	/// An instance of the class or a subclass.
	Receiver(ClassId),
	Array(PrimType),
	/// A byte buffer with the given backing and mutability.
	Buffer(MemoryMode),
	Index,
	Value(PrimType),
}

impl std::fmt::Display for ParamType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Receiver(class) => write!(f, "{class}"),
			Self::Array(ty) => write!(f, "{ty}[]"),
			Self::Buffer(mode) => write!(f, "ByteBuffer({mode})"),
			Self::Index => f.write_str("int"),
			Self::Value(ty) => write!(f, "{ty}"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
	Unit,
	Value(PrimType),
	Witness,
}

impl std::fmt::Display for ReturnType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unit => f.write_str("void"),
			Self::Value(ty) => write!(f, "{ty}"),
			Self::Witness => f.write_str("boolean"),
		}
	}
}

/// Parameter and return types of one access mode on one access point:
/// the coordinates, then the mode's value arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessType {
	pub params: Vec<ParamType>,
	pub ret: ReturnType,
}

impl std::fmt::Display for AccessType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("(")?;
		for (i, param) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{param}")?;
		}
		write!(f, ") -> {}", self.ret)
	}
}
