//! Runtime access points over primitive variables.
//!
//! An [`AccessPoint`] addresses an instance field, a static field, an array
//! element or a byte-buffer view, and performs any of the
//! [`AccessMode`](atomvar_primitives::AccessMode)s it supports. Obtain one
//! from the [`lookup`] functions, then either [`AccessPoint::invoke`] it
//! directly or bind an [`AccessHandle`] to a single mode.

mod args;
mod array;
mod buffer;
mod class;
mod error;
mod handle;
pub mod lookup;
mod ops;
mod point;
mod slot;

pub use args::{AccessType, Arg, ParamType, ReturnType, Returned};
pub use array::Array;
pub use buffer::ByteBuffer;
pub use class::{ClassBuilder, ClassDef, ClassId, FieldDef, Instance};
pub use error::{AccessError, ErrorKind};
pub use handle::AccessHandle;
pub use point::{AccessPoint, PointKind};
