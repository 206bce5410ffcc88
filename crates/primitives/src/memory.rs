use serde::{Deserialize, Serialize};

/// Byte order used to interpret a multi-byte view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
	BigEndian,
	LittleEndian,
}

impl ByteOrder {
	/// Byte order of the target platform.
	pub const fn native() -> Self {
		if cfg!(target_endian = "big") { Self::BigEndian } else { Self::LittleEndian }
	}

	/// The other byte order.
	pub const fn reversed(self) -> Self {
		match self {
			Self::BigEndian => Self::LittleEndian,
			Self::LittleEndian => Self::BigEndian,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BigEndian => "BIG_ENDIAN",
			Self::LittleEndian => "LITTLE_ENDIAN",
		}
	}
}

bitflags::bitflags! {
	/// Memory-mode set of a byte-buffer view.
	///
	/// Each flag selects one side of a binary property; its absence selects
	/// the other (`LITTLE_ENDIAN`, `READ_WRITE`, `HEAP`).
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct MemoryMode: u8 {
		/// Big-endian interpretation.
		const BIG_ENDIAN = 1 << 0;
		/// Writes are rejected.
		const READ_ONLY = 1 << 1;
		/// Off-heap backing with stable, aligned addresses.
		const DIRECT = 1 << 2;
	}
}

impl MemoryMode {
	/// Builds a memory-mode set from its three properties.
	pub fn new(order: ByteOrder, read_only: bool, direct: bool) -> Self {
		let mut mode = Self::empty();
		mode.set(Self::BIG_ENDIAN, order == ByteOrder::BigEndian);
		mode.set(Self::READ_ONLY, read_only);
		mode.set(Self::DIRECT, direct);
		mode
	}

	pub fn byte_order(self) -> ByteOrder {
		if self.contains(Self::BIG_ENDIAN) { ByteOrder::BigEndian } else { ByteOrder::LittleEndian }
	}

	pub fn is_read_only(self) -> bool {
		self.contains(Self::READ_ONLY)
	}

	pub fn is_direct(self) -> bool {
		self.contains(Self::DIRECT)
	}

	/// Same set with a different byte order.
	pub fn with_byte_order(self, order: ByteOrder) -> Self {
		let mut mode = self;
		mode.set(Self::BIG_ENDIAN, order == ByteOrder::BigEndian);
		mode
	}

	/// The backing/mutability part of the set, ignoring byte order.
	pub fn backing(self) -> Self {
		self - Self::BIG_ENDIAN
	}
}

impl std::fmt::Display for MemoryMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}|{}|{}",
			self.byte_order().as_str(),
			if self.is_read_only() { "READ_ONLY" } else { "READ_WRITE" },
			if self.is_direct() { "DIRECT" } else { "HEAP" },
		)
	}
}
