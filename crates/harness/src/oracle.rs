//! Value-level verification of every supported access mode.
//!
//! Each check starts from a known value written with plain `SET`, applies
//! one mode, and compares both the returned value and the value left behind
//! with what the mode's family promises.

use atomvar_primitives::{AccessFamily, AccessMode, Value};

use crate::capability::expected_failure;
use crate::case::CaseContext;
use crate::driver::Driver;
use crate::failure::Failure;
use crate::values::{Overflow, ValueSet, overflow};

/// Bounded retry for weak compare-and-set expected to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub attempts: u32,
	pub yield_between: bool,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self { attempts: 10, yield_between: false }
	}
}

/// Runs every check whose modes must succeed on the source, at each access
/// index, `iterations` times.
pub fn probe_access(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let runtime = point.is_supported(AccessMode::Set);
	if runtime != ctx.expect_supported {
		return Err(Failure::CapabilityMismatch { mode: AccessMode::Set, runtime, expected: ctx.expect_supported });
	}

	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	let profile = ctx.source.profile();
	for _ in 0..ctx.iterations {
		for index in ctx.source.access_indices() {
			let usable = |family: AccessFamily| -> Vec<AccessMode> {
				family.modes().filter(|&mode| expected_failure(&profile, mode, index).is_none()).collect()
			};
			let (weak, strong): (Vec<_>, Vec<_>) =
				usable(AccessFamily::CompareAndSet).into_iter().partition(|mode| mode.is_weak());

			check_read_write(&driver, index, &ctx.values, &usable(AccessFamily::Write), &usable(AccessFamily::Read))?;
			check_compare_and_set(&driver, index, &ctx.values, &strong)?;
			check_weak_compare_and_set(&driver, index, &ctx.values, &weak, ctx.policy)?;
			check_compare_and_exchange(&driver, index, &ctx.values, &usable(AccessFamily::CompareAndExchange))?;
			for family in [AccessFamily::GetAndSet, AccessFamily::GetAndAdd, AccessFamily::GetAndBitwise] {
				check_get_and_update(&driver, index, &ctx.values, &usable(family))?;
			}
			if let Some(edge) = overflow(ctx.source.ty()) {
				check_wraparound(&driver, index, edge, &usable(AccessFamily::GetAndAdd))?;
			}
		}
	}
	Ok(())
}

/// Every read flavor observes every write flavor. Without usable writes the
/// location is immutable and every read must see `values.first`.
pub fn check_read_write(
	driver: &Driver<'_>,
	index: i32,
	values: &ValueSet,
	writes: &[AccessMode],
	reads: &[AccessMode],
) -> Result<(), Failure> {
	if writes.is_empty() {
		for &read in reads {
			Failure::expect_value(read, values.first, driver.get(read, index)?)?;
		}
		return Ok(());
	}

	let mut flip = false;
	for &write in writes {
		for &read in reads {
			flip = !flip;
			let value = if flip { values.second } else { values.first };
			driver.set(write, index, value)?;
			Failure::expect_value(read, value, driver.get(read, index)?)?;
		}
	}
	Ok(())
}

fn reset(driver: &Driver<'_>, index: i32, value: Value) -> Result<(), Failure> {
	driver.set(AccessMode::Set, index, value)
}

fn expect_current(driver: &Driver<'_>, mode: AccessMode, index: i32, expected: Value) -> Result<(), Failure> {
	let actual = driver.get(AccessMode::Get, index)?;
	Failure::expect_value(mode, expected, actual)
}

/// Strong compare-and-set: succeeds and updates iff the witness matches.
pub fn check_compare_and_set(
	driver: &Driver<'_>,
	index: i32,
	values: &ValueSet,
	modes: &[AccessMode],
) -> Result<(), Failure> {
	for &mode in modes {
		reset(driver, index, values.first)?;
		Failure::expect_witness(mode, true, driver.compare_and_set(mode, index, values.first, values.second)?)?;
		expect_current(driver, mode, index, values.second)?;

		Failure::expect_witness(mode, false, driver.compare_and_set(mode, index, values.first, values.third)?)?;
		expect_current(driver, mode, index, values.second)?;
	}
	Ok(())
}

/// Weak compare-and-set: a matching witness must succeed within the retry
/// budget; a mismatching one must fail on its first attempt.
pub fn check_weak_compare_and_set(
	driver: &Driver<'_>,
	index: i32,
	values: &ValueSet,
	modes: &[AccessMode],
	policy: RetryPolicy,
) -> Result<(), Failure> {
	for &mode in modes {
		reset(driver, index, values.first)?;
		let mut attempts = 0;
		loop {
			attempts += 1;
			if driver.compare_and_set(mode, index, values.first, values.second)? {
				break;
			}
			if attempts >= policy.attempts {
				return Err(Failure::WeakCasExhausted { mode, attempts });
			}
			tracing::debug!(mode = %mode, attempt = attempts, "harness.weak_cas.retry");
			if policy.yield_between {
				std::thread::yield_now();
			}
		}
		expect_current(driver, mode, index, values.second)?;

		Failure::expect_witness(mode, false, driver.compare_and_set(mode, index, values.first, values.third)?)?;
		expect_current(driver, mode, index, values.second)?;
	}
	Ok(())
}

/// Compare-and-exchange returns the previous value on both branches.
pub fn check_compare_and_exchange(
	driver: &Driver<'_>,
	index: i32,
	values: &ValueSet,
	modes: &[AccessMode],
) -> Result<(), Failure> {
	for &mode in modes {
		reset(driver, index, values.first)?;
		let witness = driver.compare_and_exchange(mode, index, values.first, values.second)?;
		Failure::expect_value(mode, values.first, witness)?;
		expect_current(driver, mode, index, values.second)?;

		let witness = driver.compare_and_exchange(mode, index, values.first, values.third)?;
		Failure::expect_value(mode, values.second, witness)?;
		expect_current(driver, mode, index, values.second)?;
	}
	Ok(())
}

/// `GET_AND_<OP>(x)` returns the previous value and stores `previous OP x`.
pub fn check_get_and_update(
	driver: &Driver<'_>,
	index: i32,
	values: &ValueSet,
	modes: &[AccessMode],
) -> Result<(), Failure> {
	for &mode in modes {
		let expected = updated(mode, values.first, values.second).ok_or_else(|| {
			Failure::Descriptor(format!("{mode} has no value semantics for {}", values.first.ty()))
		})?;
		reset(driver, index, values.first)?;
		Failure::expect_value(mode, values.first, driver.get_and_update(mode, index, values.second)?)?;
		expect_current(driver, mode, index, expected)?;
	}
	Ok(())
}

/// `GET_AND_ADD` across the type's maximum returns the maximum and stores
/// the wrapped sum.
pub fn check_wraparound(driver: &Driver<'_>, index: i32, edge: Overflow, modes: &[AccessMode]) -> Result<(), Failure> {
	for &mode in modes {
		reset(driver, index, edge.max)?;
		Failure::expect_value(mode, edge.max, driver.get_and_update(mode, index, edge.step)?)?;
		expect_current(driver, mode, index, edge.wrapped)?;
	}
	Ok(())
}

/// Value `mode` leaves behind when applied to `current` with `operand`.
pub fn updated(mode: AccessMode, current: Value, operand: Value) -> Option<Value> {
	match mode.family() {
		AccessFamily::GetAndSet => Some(operand),
		AccessFamily::GetAndAdd => current.wrapping_add(operand),
		AccessFamily::GetAndBitwise => current.bitwise(mode.bitwise_op()?, operand),
		_ => None,
	}
}

#[cfg(test)]
mod tests;
