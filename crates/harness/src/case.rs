use std::sync::Arc;

use atomvar_access::AccessPoint;
use strum::IntoStaticStr;

use crate::failure::Failure;
use crate::invoker::Invoker;
use crate::oracle::RetryPolicy;
use crate::source::VariableSource;
use crate::values::{ValueSet, values};
use crate::{lazy_init, oracle, probe};

/// Everything a probe needs to run one case.
pub struct CaseContext<'a> {
	pub source: &'a VariableSource,
	pub invoker: &'a dyn Invoker,
	pub values: ValueSet,
	pub policy: RetryPolicy,
	pub iterations: u32,
	pub expect_supported: bool,
}

impl CaseContext<'_> {
	pub fn resolve(&self) -> Result<AccessPoint, Failure> {
		self.source.resolve().map_err(|error| Failure::Resolve { target: self.source.to_string(), error })
	}
}

pub type Probe = fn(&CaseContext<'_>) -> Result<(), Failure>;

/// What a test case checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Scenario {
	/// Value semantics of every mode that must succeed.
	Access,
	Unsupported,
	Bounds,
	NullContainer,
	/// Direct-backing, alignment and writability gates of buffer views.
	Gates,
	MethodType,
	/// The case's invoker against direct invocation.
	PathParity,
	Descriptors,
	Identity,
	LazyInit,
}

impl Scenario {
	pub fn probe(self) -> Probe {
		match self {
			Self::Access => oracle::probe_access,
			Self::Unsupported => probe::probe_unsupported,
			Self::Bounds => probe::probe_bounds,
			Self::NullContainer => probe::probe_null_container,
			Self::Gates => probe::probe_gates,
			Self::MethodType => probe::probe_method_type,
			Self::PathParity => probe::probe_path_parity,
			Self::Descriptors => probe::probe_descriptors,
			Self::Identity => probe::probe_identity,
			Self::LazyInit => lazy_init::probe_lazy_init,
		}
	}

	pub fn as_str(self) -> &'static str {
		self.into()
	}
}

impl std::fmt::Display for Scenario {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.pad(self.as_str())
	}
}

/// One entry of the case matrix. Built at suite setup, run once.
#[derive(Clone)]
pub struct TestCase {
	pub id: usize,
	pub source: VariableSource,
	pub scenario: Scenario,
	/// Whether the source accepts writes at all.
	pub expect_supported: bool,
	pub invoker: Arc<dyn Invoker>,
	pub iterations: u32,
}

impl TestCase {
	pub fn label(&self) -> String {
		format!("{} {} via {}", self.scenario, self.source, self.invoker.name())
	}

	pub fn run(&self, policy: RetryPolicy) -> Result<(), Failure> {
		let ctx = CaseContext {
			source: &self.source,
			invoker: self.invoker.as_ref(),
			values: values(self.source.ty()),
			policy,
			iterations: self.iterations,
			expect_supported: self.expect_supported,
		};
		(self.scenario.probe())(&ctx)
	}
}

impl std::fmt::Debug for TestCase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "TestCase#{}({})", self.id, self.label())
	}
}
