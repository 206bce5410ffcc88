use std::collections::BTreeMap;

use crate::case::Scenario;
use crate::failure::Failure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Passed,
	Failed(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
	pub id: usize,
	pub label: String,
	pub scenario: Scenario,
	pub invoker: &'static str,
	pub outcome: Outcome,
}

impl CaseResult {
	pub fn passed(&self) -> bool {
		self.outcome == Outcome::Passed
	}

	pub fn failure(&self) -> Option<&Failure> {
		match &self.outcome {
			Outcome::Failed(failure) => Some(failure),
			Outcome::Passed => None,
		}
	}
}

/// Passed and total case counts of one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioCount {
	pub passed: usize,
	pub total: usize,
}

/// Per-case results of a matrix run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
	results: Vec<CaseResult>,
}

impl SuiteReport {
	pub fn push(&mut self, result: CaseResult) {
		self.results.push(result);
	}

	pub fn results(&self) -> &[CaseResult] {
		&self.results
	}

	pub fn case_count(&self) -> usize {
		self.results.len()
	}

	pub fn pass_count(&self) -> usize {
		self.results.iter().filter(|result| result.passed()).count()
	}

	pub fn all_passed(&self) -> bool {
		self.results.iter().all(CaseResult::passed)
	}

	pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
		self.results.iter().filter(|result| !result.passed())
	}

	pub fn scenario_counts(&self) -> BTreeMap<Scenario, ScenarioCount> {
		let mut counts = BTreeMap::<Scenario, ScenarioCount>::new();
		for result in &self.results {
			let count = counts.entry(result.scenario).or_default();
			count.total += 1;
			count.passed += usize::from(result.passed());
		}
		counts
	}
}

impl std::fmt::Display for SuiteReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{}/{} cases passed", self.pass_count(), self.case_count())?;
		for (scenario, count) in self.scenario_counts() {
			writeln!(f, "  {scenario:<16} {}/{}", count.passed, count.total)?;
		}
		for result in self.failures() {
			if let Some(failure) = result.failure() {
				writeln!(f, "FAILED #{} {}: {failure}", result.id, result.label)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
