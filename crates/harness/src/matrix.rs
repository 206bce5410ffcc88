//! Case matrix generation.
//!
//! Field cases of one type share a [`FieldFixture`] and run in generation
//! order. Array, buffer and lazy-initialization cases each get a fresh
//! source.

use std::sync::Arc;

use atomvar_primitives::{MemoryMode, PrimType};

use crate::case::{Scenario, TestCase};
use crate::config::HarnessConfig;
use crate::invoker::Invoker;
use crate::lazy_init::lazy_source;
use crate::source::{FieldFixture, VariableSource};

/// Scenarios run through every invoker against `source`.
fn per_invoker(source: &VariableSource) -> Vec<Scenario> {
	let mut scenarios = vec![Scenario::Access, Scenario::Unsupported, Scenario::MethodType];
	if source.with_null_container(0).is_some() {
		scenarios.push(Scenario::NullContainer);
	}
	if source.length().is_some() {
		scenarios.push(Scenario::Bounds);
	}
	if source.memory_mode().is_some() {
		scenarios.push(Scenario::Gates);
	}
	scenarios
}

struct Builder<'a> {
	config: &'a HarnessConfig,
	invokers: &'a [Arc<dyn Invoker>],
	cases: Vec<TestCase>,
}

impl Builder<'_> {
	fn push(&mut self, source: VariableSource, scenario: Scenario, invoker: &Arc<dyn Invoker>) {
		let iterations = if scenario == Scenario::Access { self.config.iterations } else { 1 };
		let expect_supported = !source.is_final();
		self.cases.push(TestCase {
			id: self.cases.len(),
			source,
			scenario,
			expect_supported,
			invoker: Arc::clone(invoker),
			iterations,
		});
	}

	/// Adds every scenario applicable to the sources `make` produces,
	/// calling it once per case.
	fn source(&mut self, make: impl Fn() -> VariableSource) {
		let invokers = self.invokers;
		let Some(first) = invokers.first() else {
			return;
		};
		let scenarios = per_invoker(&make());
		for invoker in invokers {
			for &scenario in &scenarios {
				self.push(make(), scenario, invoker);
			}
			if !invoker.is_reference() {
				self.push(make(), Scenario::PathParity, invoker);
			}
		}
		self.push(make(), Scenario::Descriptors, first);
		self.push(make(), Scenario::Identity, first);
	}

	fn lazy_init(&mut self, ty: PrimType) {
		let invokers = self.invokers;
		for inherited in [false, true] {
			for invoker in invokers {
				self.push(lazy_source(ty, inherited), Scenario::LazyInit, invoker);
			}
		}
	}

	fn buffer_modes(&self) -> Vec<MemoryMode> {
		let mut modes = Vec::new();
		for &order in &self.config.byte_orders {
			for (read_only, direct) in [(false, true), (false, false), (true, true), (true, false)] {
				modes.push(MemoryMode::new(order, read_only, direct));
			}
		}
		modes
	}
}

/// Every case for the configured types, byte orders and `invokers`.
pub fn generate(config: &HarnessConfig, invokers: &[Arc<dyn Invoker>]) -> Vec<TestCase> {
	let mut builder = Builder { config, invokers, cases: Vec::new() };
	let modes = builder.buffer_modes();

	for &ty in &config.types {
		let fixture = FieldFixture::new(ty);
		for is_final in [false, true] {
			builder.source(|| fixture.instance_field(is_final));
			builder.source(|| fixture.static_field(is_final));
		}

		let length = config.array_length;
		builder.source(|| VariableSource::array(ty, length));

		if ty.supports_buffer_view() {
			let limit = config.buffer_length;
			for &mode in &modes {
				builder.source(|| VariableSource::buffer(ty, mode, limit));
			}
		}

		builder.lazy_init(ty);
	}
	builder.cases
}
