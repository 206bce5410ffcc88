//! Interchangeable strategies for calling an access point.

use std::sync::Arc;

use atomvar_access::{AccessError, AccessPoint, Arg, Returned};
use atomvar_primitives::AccessMode;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Calls one access mode on an access point.
///
/// Implementations must be observationally identical, failures included.
pub trait Invoker: Send + Sync {
	fn name(&self) -> &'static str;

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError>;

	/// Whether this is the reference path other invokers are compared
	/// against.
	fn is_reference(&self) -> bool {
		false
	}
}

/// Generic dispatch through [`AccessPoint::invoke`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInvoker;

impl Invoker for DirectInvoker {
	fn name(&self) -> &'static str {
		"direct"
	}

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		point.invoke(mode, args)
	}

	fn is_reference(&self) -> bool {
		true
	}
}

/// Binds a mode-specialized handle, then calls through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandleInvoker;

impl Invoker for HandleInvoker {
	fn name(&self) -> &'static str {
		"handle"
	}

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		point.to_handle(mode).invoke(args)
	}
}

/// Configurable selection of the built-in invokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvokerKind {
	Direct,
	Handle,
}

impl InvokerKind {
	pub fn all() -> impl Iterator<Item = InvokerKind> {
		Self::iter()
	}

	pub fn build(self) -> Arc<dyn Invoker> {
		match self {
			Self::Direct => Arc::new(DirectInvoker),
			Self::Handle => Arc::new(HandleInvoker),
		}
	}
}
