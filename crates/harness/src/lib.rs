//! Conformance harness for atomic variable access points.
//!
//! The harness generates a case matrix over primitive types, variable
//! sources, scenarios and invokers, predicts every outcome from an
//! independent capability model, and collects the verdicts in a
//! [`SuiteReport`].

use std::sync::Arc;

pub mod capability;
pub mod case;
pub mod config;
pub mod driver;
pub mod failure;
pub mod invoker;
pub mod lazy_init;
pub mod matrix;
pub mod oracle;
pub mod probe;
pub mod report;
pub mod source;
pub mod values;

pub use capability::{GateSet, Profile, SourceKind, Support};
pub use case::{CaseContext, Scenario, TestCase};
pub use config::{ConfigError, HarnessConfig};
pub use failure::Failure;
pub use invoker::{DirectInvoker, HandleInvoker, Invoker, InvokerKind};
pub use lazy_init::{InitState, LazyInit};
pub use oracle::RetryPolicy;
pub use report::{CaseResult, Outcome, ScenarioCount, SuiteReport};
pub use source::{FieldFixture, VariableSource};

/// A configured matrix run.
pub struct Harness {
	config: HarnessConfig,
	invokers: Vec<Arc<dyn Invoker>>,
}

impl Harness {
	/// Validates `config` and uses the invokers it selects.
	pub fn new(config: HarnessConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		let invokers = config.invokers.iter().map(|kind| kind.build()).collect();
		Ok(Self { config, invokers })
	}

	/// Replaces the invoker set, e.g. with a custom strategy under test.
	pub fn with_invokers(mut self, invokers: Vec<Arc<dyn Invoker>>) -> Self {
		self.invokers = invokers;
		self
	}

	pub fn config(&self) -> &HarnessConfig {
		&self.config
	}

	pub fn cases(&self) -> Vec<TestCase> {
		matrix::generate(&self.config, &self.invokers)
	}

	/// Runs every case in generation order. A failing case never stops the
	/// run.
	pub fn run(&self) -> SuiteReport {
		let policy = self.config.retry_policy();
		let mut report = SuiteReport::default();
		for case in self.cases() {
			tracing::trace!(case = case.id, scenario = %case.scenario, source = %case.source, "harness.case.start");
			let outcome = match case.run(policy) {
				Ok(()) => Outcome::Passed,
				Err(failure) => {
					tracing::warn!(case = case.id, scenario = %case.scenario, error = %failure, "harness.case.failed");
					Outcome::Failed(failure)
				}
			};
			report.push(CaseResult {
				id: case.id,
				label: case.label(),
				scenario: case.scenario,
				invoker: case.invoker.name(),
				outcome,
			});
		}
		tracing::info!(
			cases = report.case_count(),
			passed = report.pass_count(),
			"harness.suite.finished"
		);
		report
	}
}

/// Runs the full matrix `config` describes.
pub fn run_matrix(config: &HarnessConfig) -> Result<SuiteReport, ConfigError> {
	Ok(Harness::new(config.clone())?.run())
}
