use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// A named operation an access point may support.
///
/// The set is closed. Each mode belongs to exactly one [`AccessFamily`], which
/// fixes its value arity and return shape, and carries an [`OrderingFlavor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum AccessMode {
	Get,
	Set,
	GetVolatile,
	SetVolatile,
	GetAcquire,
	SetRelease,
	GetOpaque,
	SetOpaque,
	CompareAndSet,
	CompareAndExchange,
	CompareAndExchangeAcquire,
	CompareAndExchangeRelease,
	WeakCompareAndSetPlain,
	WeakCompareAndSet,
	WeakCompareAndSetAcquire,
	WeakCompareAndSetRelease,
	GetAndSet,
	GetAndSetAcquire,
	GetAndSetRelease,
	GetAndAdd,
	GetAndAddAcquire,
	GetAndAddRelease,
	GetAndBitwiseOr,
	GetAndBitwiseOrAcquire,
	GetAndBitwiseOrRelease,
	GetAndBitwiseAnd,
	GetAndBitwiseAndAcquire,
	GetAndBitwiseAndRelease,
	GetAndBitwiseXor,
	GetAndBitwiseXorAcquire,
	GetAndBitwiseXorRelease,
}

/// Grouping of access modes by argument and return shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessFamily {
	Read,
	Write,
	CompareAndSet,
	CompareAndExchange,
	GetAndSet,
	GetAndAdd,
	GetAndBitwise,
}

/// Memory-ordering flavor of an access mode.
///
/// Flavors never change the data result of a sequential access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum OrderingFlavor {
	Plain,
	Opaque,
	Acquire,
	Release,
	Volatile,
}

/// Bitwise operator applied by the `GET_AND_BITWISE` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BitwiseOp {
	Or,
	And,
	Xor,
}

/// What an invocation of a family hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
	/// No value (write family).
	Unit,
	/// A value of the variable's type.
	Value,
	/// A success witness (compare-and-set family).
	Witness,
}

impl AccessMode {
	/// Returns the camelCase method name, e.g. `weakCompareAndSetPlain`.
	pub fn method_name(self) -> &'static str {
		self.into()
	}

	/// Iterates over every access mode in declaration order.
	pub fn all() -> impl Iterator<Item = AccessMode> {
		Self::iter()
	}

	/// Returns the family this mode belongs to.
	pub const fn family(self) -> AccessFamily {
		use AccessMode::*;
		match self {
			Get | GetVolatile | GetAcquire | GetOpaque => AccessFamily::Read,
			Set | SetVolatile | SetRelease | SetOpaque => AccessFamily::Write,
			CompareAndSet
			| WeakCompareAndSetPlain
			| WeakCompareAndSet
			| WeakCompareAndSetAcquire
			| WeakCompareAndSetRelease => AccessFamily::CompareAndSet,
			CompareAndExchange | CompareAndExchangeAcquire | CompareAndExchangeRelease => {
				AccessFamily::CompareAndExchange
			}
			GetAndSet | GetAndSetAcquire | GetAndSetRelease => AccessFamily::GetAndSet,
			GetAndAdd | GetAndAddAcquire | GetAndAddRelease => AccessFamily::GetAndAdd,
			GetAndBitwiseOr
			| GetAndBitwiseOrAcquire
			| GetAndBitwiseOrRelease
			| GetAndBitwiseAnd
			| GetAndBitwiseAndAcquire
			| GetAndBitwiseAndRelease
			| GetAndBitwiseXor
			| GetAndBitwiseXorAcquire
			| GetAndBitwiseXorRelease => AccessFamily::GetAndBitwise,
		}
	}

	/// Returns the ordering flavor of this mode.
	pub const fn flavor(self) -> OrderingFlavor {
		use AccessMode::*;
		match self {
			Get | Set | WeakCompareAndSetPlain => OrderingFlavor::Plain,
			GetOpaque | SetOpaque => OrderingFlavor::Opaque,
			GetAcquire
			| CompareAndExchangeAcquire
			| WeakCompareAndSetAcquire
			| GetAndSetAcquire
			| GetAndAddAcquire
			| GetAndBitwiseOrAcquire
			| GetAndBitwiseAndAcquire
			| GetAndBitwiseXorAcquire => OrderingFlavor::Acquire,
			SetRelease
			| CompareAndExchangeRelease
			| WeakCompareAndSetRelease
			| GetAndSetRelease
			| GetAndAddRelease
			| GetAndBitwiseOrRelease
			| GetAndBitwiseAndRelease
			| GetAndBitwiseXorRelease => OrderingFlavor::Release,
			GetVolatile
			| SetVolatile
			| CompareAndSet
			| CompareAndExchange
			| WeakCompareAndSet
			| GetAndSet
			| GetAndAdd
			| GetAndBitwiseOr
			| GetAndBitwiseAnd
			| GetAndBitwiseXor => OrderingFlavor::Volatile,
		}
	}

	/// Returns the bitwise operator for `GET_AND_BITWISE` modes.
	pub const fn bitwise_op(self) -> Option<BitwiseOp> {
		use AccessMode::*;
		match self {
			GetAndBitwiseOr | GetAndBitwiseOrAcquire | GetAndBitwiseOrRelease => Some(BitwiseOp::Or),
			GetAndBitwiseAnd | GetAndBitwiseAndAcquire | GetAndBitwiseAndRelease => Some(BitwiseOp::And),
			GetAndBitwiseXor | GetAndBitwiseXorAcquire | GetAndBitwiseXorRelease => Some(BitwiseOp::Xor),
			_ => None,
		}
	}

	/// Returns true for the weak compare-and-set variants, which may fail
	/// spuriously.
	pub const fn is_weak(self) -> bool {
		matches!(
			self,
			Self::WeakCompareAndSetPlain
				| Self::WeakCompareAndSet
				| Self::WeakCompareAndSetAcquire
				| Self::WeakCompareAndSetRelease
		)
	}

	/// Returns true for plain `GET` and `SET`, the only modes that tolerate
	/// misaligned or non-atomic storage.
	pub const fn is_plain_access(self) -> bool {
		matches!(self, Self::Get | Self::Set)
	}

	/// Number of value arguments following the coordinates.
	pub const fn value_arity(self) -> usize {
		self.family().value_arity()
	}

	/// Return shape of this mode.
	pub const fn return_shape(self) -> ReturnShape {
		self.family().return_shape()
	}
}

impl std::fmt::Display for AccessMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.method_name())
	}
}

impl AccessFamily {
	/// Iterates over the modes in this family.
	pub fn modes(self) -> impl Iterator<Item = AccessMode> {
		AccessMode::iter().filter(move |mode| mode.family() == self)
	}

	/// Number of value arguments following the coordinates.
	pub const fn value_arity(self) -> usize {
		match self {
			Self::Read => 0,
			Self::Write | Self::GetAndSet | Self::GetAndAdd | Self::GetAndBitwise => 1,
			Self::CompareAndSet | Self::CompareAndExchange => 2,
		}
	}

	/// Return shape of modes in this family.
	pub const fn return_shape(self) -> ReturnShape {
		match self {
			Self::Write => ReturnShape::Unit,
			Self::CompareAndSet => ReturnShape::Witness,
			Self::Read | Self::CompareAndExchange | Self::GetAndSet | Self::GetAndAdd | Self::GetAndBitwise => {
				ReturnShape::Value
			}
		}
	}

	/// Returns true for every family that mutates the location.
	pub const fn mutates(self) -> bool {
		!matches!(self, Self::Read)
	}

	/// Returns true for the read-modify-write families.
	pub const fn is_update(self) -> bool {
		!matches!(self, Self::Read | Self::Write)
	}
}

impl std::fmt::Display for AccessFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name: &'static str = (*self).into();
		f.write_str(name)
	}
}
