//! Core vocabulary shared by the access-point runtime and the conformance
//! harness: access modes, primitive type descriptors, typed values and
//! buffer memory modes.

/// Access mode taxonomy and operation families.
pub mod access_mode;
/// Byte order and buffer memory-mode sets.
pub mod memory;
/// Primitive type descriptors.
pub mod prim;
/// Typed primitive values and their update algebra.
pub mod value;

pub use access_mode::{AccessFamily, AccessMode, BitwiseOp, OrderingFlavor, ReturnShape};
pub use memory::{ByteOrder, MemoryMode};
pub use prim::PrimType;
pub use value::Value;
