//! Lazy class initialization, modeled as an explicit state machine.
//!
//! `Unresolved -> ResolvedLazy` on lookup, which must not initialize
//! anything; `ResolvedLazy -> Initialized` on the first dereference, which
//! must initialize the declaring class and nothing below it.

use std::sync::Arc;

use atomvar_access::{AccessPoint, ClassDef};
use atomvar_primitives::{AccessMode, PrimType, Value};

use crate::case::CaseContext;
use crate::driver::Driver;
use crate::failure::Failure;
use crate::invoker::Invoker;
use crate::source::{STATIC_FIELD, VariableSource};
use crate::values::values;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
	Unresolved,
	ResolvedLazy,
	Initialized,
}

/// A static field on a class nobody has touched yet.
///
/// With `inherited`, the field is declared by a superclass and accessed
/// through a subclass.
pub fn lazy_source(ty: PrimType, inherited: bool) -> VariableSource {
	let base = ClassDef::builder(format!("LazyBase<{ty}>")).static_field(STATIC_FIELD, values(ty).first).build();
	let class = if inherited { ClassDef::builder(format!("LazyDerived<{ty}>")).extends(&base).build() } else { base };
	VariableSource::StaticField { class, name: STATIC_FIELD, ty, is_final: false }
}

pub struct LazyInit<'a> {
	source: &'a VariableSource,
	class: Arc<ClassDef>,
	declaring: Arc<ClassDef>,
	state: InitState,
	point: Option<AccessPoint>,
}

impl<'a> LazyInit<'a> {
	pub fn new(source: &'a VariableSource) -> Result<Self, Failure> {
		let VariableSource::StaticField { class, name, .. } = source else {
			return Err(Failure::LazyInit(format!("{source} is not a static field")));
		};
		let (declaring, _) = class
			.resolve_field(name)
			.ok_or_else(|| Failure::LazyInit(format!("{} declares no field `{name}`", class.name())))?;
		let machine = Self { source, class: Arc::clone(class), declaring, state: InitState::Unresolved, point: None };
		machine.expect_untouched("before resolution")?;
		Ok(machine)
	}

	pub fn state(&self) -> InitState {
		self.state
	}

	fn expect_untouched(&self, phase: &str) -> Result<(), Failure> {
		match self.class.ancestry().find(|class| class.is_initialized()) {
			Some(class) => Err(Failure::LazyInit(format!("{} initialized {phase}", class.name()))),
			None => Ok(()),
		}
	}

	/// `Unresolved -> ResolvedLazy`.
	pub fn resolve(&mut self) -> Result<(), Failure> {
		if self.state != InitState::Unresolved {
			return Err(Failure::LazyInit(format!("resolve in state {:?}", self.state)));
		}
		let point = self.source.resolve().map_err(|error| Failure::Resolve { target: self.source.to_string(), error })?;
		self.expect_untouched("by resolution")?;
		self.point = Some(point);
		self.state = InitState::ResolvedLazy;
		Ok(())
	}

	/// Reads the field with plain `GET`; the first read moves
	/// `ResolvedLazy -> Initialized`.
	pub fn dereference(&mut self, invoker: &dyn Invoker) -> Result<Value, Failure> {
		let Some(point) = &self.point else {
			return Err(Failure::LazyInit("dereference before resolution".to_string()));
		};
		let first_access = self.state == InitState::ResolvedLazy;
		if first_access {
			self.expect_untouched("before the first access")?;
		}

		let value = Driver::new(point, invoker, self.source).get(AccessMode::Get, 0)?;

		if !self.declaring.is_initialized() {
			return Err(Failure::LazyInit(format!("{} not initialized by access", self.declaring.name())));
		}
		if self.class.id() != self.declaring.id() && self.class.is_initialized() {
			return Err(Failure::LazyInit(format!(
				"{} initialized by access to a field inherited from {}",
				self.class.name(),
				self.declaring.name()
			)));
		}
		if first_access {
			tracing::debug!(class = self.declaring.name(), "harness.lazy_init.initialized");
			self.state = InitState::Initialized;
		}
		Ok(value)
	}
}

pub fn probe_lazy_init(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let mut machine = LazyInit::new(ctx.source)?;
	machine.resolve()?;
	for _ in 0..2 {
		let value = machine.dereference(ctx.invoker)?;
		Failure::expect_value(AccessMode::Get, ctx.values.first, value)?;
	}
	Ok(())
}
