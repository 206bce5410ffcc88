use atomvar_primitives::{AccessMode, Value};
use pretty_assertions::assert_eq;

use super::*;

fn result(id: usize, scenario: Scenario, outcome: Outcome) -> CaseResult {
	CaseResult { id, label: format!("case {id}"), scenario, invoker: "direct", outcome }
}

#[test]
fn counts_and_summary() {
	let mismatch = Failure::ValueMismatch { mode: AccessMode::Get, expected: Value::Int(1), actual: Value::Int(2) };
	let mut report = SuiteReport::default();
	report.push(result(0, Scenario::Access, Outcome::Passed));
	report.push(result(1, Scenario::Access, Outcome::Failed(mismatch)));
	report.push(result(2, Scenario::Bounds, Outcome::Passed));

	assert_eq!(report.case_count(), 3);
	assert_eq!(report.pass_count(), 2);
	assert!(!report.all_passed());
	assert_eq!(report.failures().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
	assert_eq!(report.scenario_counts()[&Scenario::Access], ScenarioCount { passed: 1, total: 2 });
	assert_eq!(
		report.to_string(),
		"2/3 cases passed\n  access           1/2\n  bounds           1/1\nFAILED #1 case 1: get: expected 0x1, got 0x2\n"
	);
}

#[test]
fn empty_report_passes() {
	assert!(SuiteReport::default().all_passed());
}
