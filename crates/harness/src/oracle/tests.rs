use std::sync::atomic::{AtomicU32, Ordering};

use atomvar_access::{AccessError, AccessPoint, Arg, Returned};
use atomvar_primitives::{ByteOrder, MemoryMode, PrimType};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::invoker::{DirectInvoker, HandleInvoker, Invoker};
use crate::source::{FieldFixture, VariableSource};
use crate::values::{overflow, values};

fn context<'a>(source: &'a VariableSource, invoker: &'a dyn Invoker) -> CaseContext<'a> {
	CaseContext {
		source,
		invoker,
		values: values(source.ty()),
		policy: RetryPolicy::default(),
		iterations: 2,
		expect_supported: !source.is_final(),
	}
}

/// Weak compare-and-set never succeeds.
struct Hopeless;

impl Invoker for Hopeless {
	fn name(&self) -> &'static str {
		"hopeless"
	}

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		if mode.is_weak() { Ok(Returned::Witness(false)) } else { point.invoke(mode, args) }
	}
}

/// Weak compare-and-set fails spuriously a fixed number of times, then
/// behaves.
struct Flaky {
	failures_left: AtomicU32,
}

impl Flaky {
	fn new(failures: u32) -> Self {
		Self { failures_left: AtomicU32::new(failures) }
	}
}

impl Invoker for Flaky {
	fn name(&self) -> &'static str {
		"flaky"
	}

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		let spurious = mode.is_weak()
			&& self.failures_left.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1)).is_ok();
		if spurious { Ok(Returned::Witness(false)) } else { point.invoke(mode, args) }
	}
}

/// `GET_AND_ADD` that sticks at the type's maximum instead of wrapping.
struct Saturating;

impl Invoker for Saturating {
	fn name(&self) -> &'static str {
		"saturating"
	}

	fn invoke(&self, point: &AccessPoint, mode: AccessMode, args: &[Arg]) -> Result<Returned, AccessError> {
		if mode.family() == AccessFamily::GetAndAdd {
			let current = point.invoke(AccessMode::Get, &args[..args.len() - 1])?;
			if current == Returned::Value(Value::Int(i32::MAX)) {
				return Ok(current);
			}
		}
		point.invoke(mode, args)
	}
}

#[rstest]
#[case(PrimType::Boolean)]
#[case(PrimType::Byte)]
#[case(PrimType::Char)]
#[case(PrimType::Long)]
#[case(PrimType::Double)]
fn access_passes_on_every_source_kind(#[case] ty: PrimType) {
	let fixture = FieldFixture::new(ty);
	let mut sources = vec![
		fixture.instance_field(false),
		fixture.instance_field(true),
		fixture.static_field(false),
		fixture.static_field(true),
		VariableSource::array(ty, 10),
	];
	if ty.supports_buffer_view() {
		sources.push(VariableSource::buffer(ty, MemoryMode::new(ByteOrder::BigEndian, false, true), 16));
		sources.push(VariableSource::buffer(ty, MemoryMode::new(ByteOrder::LittleEndian, true, false), 16));
	}
	for source in &sources {
		for invoker in [&DirectInvoker as &dyn Invoker, &HandleInvoker] {
			assert_eq!(probe_access(&context(source, invoker)), Ok(()), "{source}");
		}
	}
}

#[test]
fn wrong_support_expectation_is_a_capability_mismatch() {
	let source = FieldFixture::new(PrimType::Int).instance_field(true);
	let ctx = CaseContext { expect_supported: true, ..context(&source, &DirectInvoker) };
	assert_eq!(
		probe_access(&ctx),
		Err(Failure::CapabilityMismatch { mode: AccessMode::Set, runtime: false, expected: true })
	);
}

#[test]
fn exhausted_weak_cas_reports_the_budget() {
	let source = VariableSource::array(PrimType::Int, 4);
	let point = source.resolve().unwrap();
	let driver = Driver::new(&point, &Hopeless, &source);
	let policy = RetryPolicy { attempts: 3, yield_between: true };
	let result = check_weak_compare_and_set(&driver, 0, &values(PrimType::Int), &[AccessMode::WeakCompareAndSet], policy);
	assert_eq!(result, Err(Failure::WeakCasExhausted { mode: AccessMode::WeakCompareAndSet, attempts: 3 }));
}

#[test]
fn read_only_reads_must_see_the_seed() {
	let source = VariableSource::array(PrimType::Short, 2);
	let point = source.resolve().unwrap();
	let driver = Driver::new(&point, &DirectInvoker, &source);
	let set = values(PrimType::Short);
	driver.set(AccessMode::Set, 1, set.third).unwrap();
	assert_eq!(
		check_read_write(&driver, 1, &set, &[], &[AccessMode::GetOpaque]),
		Err(Failure::ValueMismatch { mode: AccessMode::GetOpaque, expected: set.first, actual: set.third })
	);
}

#[rstest]
#[case(AccessMode::GetAndAdd, Value::Int(i32::MAX), Value::Int(1), Some(Value::Int(i32::MIN)))]
#[case(AccessMode::GetAndAddRelease, Value::Byte(-128), Value::Byte(-1), Some(Value::Byte(127)))]
#[case(AccessMode::GetAndBitwiseXor, Value::Short(0b1100), Value::Short(0b1010), Some(Value::Short(0b0110)))]
#[case(AccessMode::GetAndBitwiseAndAcquire, Value::Boolean(true), Value::Boolean(false), Some(Value::Boolean(false)))]
#[case(AccessMode::GetAndAdd, Value::Double(1.5), Value::Double(2.0), Some(Value::Double(3.5)))]
#[case(AccessMode::GetAndSetAcquire, Value::Long(1), Value::Long(2), Some(Value::Long(2)))]
#[case(AccessMode::GetAndBitwiseOr, Value::Float(1.0), Value::Float(2.0), None)]
#[case(AccessMode::Get, Value::Int(1), Value::Int(2), None)]
fn update_algebra(#[case] mode: AccessMode, #[case] current: Value, #[case] operand: Value, #[case] expected: Option<Value>) {
	assert_eq!(updated(mode, current, operand), expected);
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(9)]
fn weak_cas_succeeds_after_spurious_failures(#[case] failures: u32) {
	let source = VariableSource::array(PrimType::Int, 4);
	let point = source.resolve().unwrap();
	let flaky = Flaky::new(failures);
	let driver = Driver::new(&point, &flaky, &source);
	let set = values(PrimType::Int);
	let modes: Vec<_> = AccessFamily::CompareAndSet.modes().filter(|mode| mode.is_weak()).collect();

	assert_eq!(check_weak_compare_and_set(&driver, 2, &set, &modes, RetryPolicy::default()), Ok(()));
	assert_eq!(flaky.failures_left.load(Ordering::Relaxed), 0);
	assert_eq!(driver.get(AccessMode::Get, 2).unwrap(), set.second);
}

#[test]
fn weak_cas_budget_counts_every_attempt() {
	let source = VariableSource::array(PrimType::Long, 2);
	let point = source.resolve().unwrap();
	let flaky = Flaky::new(10);
	let driver = Driver::new(&point, &flaky, &source);
	let result = check_weak_compare_and_set(&driver, 0, &values(PrimType::Long), &[AccessMode::WeakCompareAndSetPlain], RetryPolicy::default());
	assert_eq!(result, Err(Failure::WeakCasExhausted { mode: AccessMode::WeakCompareAndSetPlain, attempts: 10 }));
}

#[test]
fn access_tolerates_spurious_weak_failures() {
	let source = VariableSource::buffer(PrimType::Int, MemoryMode::new(ByteOrder::BigEndian, false, true), 16);
	let flaky = Flaky::new(3);
	assert_eq!(probe_access(&context(&source, &flaky)), Ok(()));
}

#[rstest]
#[case(PrimType::Byte)]
#[case(PrimType::Short)]
#[case(PrimType::Char)]
#[case(PrimType::Int)]
#[case(PrimType::Long)]
fn get_and_add_wraps_at_the_top(#[case] ty: PrimType) {
	let source = VariableSource::array(ty, 3);
	let point = source.resolve().unwrap();
	let edge = overflow(ty).unwrap();
	for invoker in [&DirectInvoker as &dyn Invoker, &HandleInvoker] {
		let driver = Driver::new(&point, invoker, &source);
		assert_eq!(check_wraparound(&driver, 1, edge, &AccessFamily::GetAndAdd.modes().collect::<Vec<_>>()), Ok(()));
		assert_eq!(driver.get(AccessMode::Get, 1).unwrap(), edge.wrapped);
	}
}

#[test]
fn saturating_add_is_caught() {
	let source = VariableSource::array(PrimType::Int, 2);
	let point = source.resolve().unwrap();
	let driver = Driver::new(&point, &Saturating, &source);
	let edge = overflow(PrimType::Int).unwrap();
	assert_eq!(
		check_wraparound(&driver, 0, edge, &[AccessMode::GetAndAddAcquire]),
		Err(Failure::ValueMismatch { mode: AccessMode::GetAndAddAcquire, expected: edge.wrapped, actual: edge.max })
	);
	assert_eq!(
		probe_access(&context(&source, &Saturating)),
		Err(Failure::ValueMismatch { mode: AccessMode::GetAndAdd, expected: edge.wrapped, actual: edge.max })
	);
}
