//! Boundary and error probes.
//!
//! A probe call that must fail is also checked for leaving the location
//! unchanged.

use std::hash::{DefaultHasher, Hash, Hasher};

use atomvar_access::{AccessType, Arg, ErrorKind, ParamType, ReturnType, Returned};
use atomvar_primitives::{AccessMode, PrimType, ReturnShape, Value};

use crate::capability::{SourceKind, Support, expected_failure, is_supported};
use crate::case::CaseContext;
use crate::driver::{Driver, Snapshot};
use crate::failure::Failure;
use crate::invoker::DirectInvoker;
use crate::oracle::RetryPolicy;
use crate::values::{ValueSet, other_type};

/// Value arguments for a well-formed call of `mode`.
pub fn operands(mode: AccessMode, values: &ValueSet) -> Vec<Value> {
	match mode.value_arity() {
		0 => Vec::new(),
		1 => vec![values.second],
		_ => vec![values.first, values.second],
	}
}

fn value_args(mode: AccessMode, values: &ValueSet) -> impl Iterator<Item = Arg> {
	operands(mode, values).into_iter().map(Arg::Value)
}

/// Every unsupported mode fails without touching the location.
pub fn probe_unsupported(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	let profile = ctx.source.profile();
	for mode in AccessMode::all().filter(|&mode| is_supported(&profile, mode) == Support::Unsupported) {
		let operands = operands(mode, &ctx.values);
		driver.unchanged(mode, || {
			Failure::expect_error(mode, ErrorKind::UnsupportedOperation, driver.call(mode, 0, &operands))
		})?;
	}
	Ok(())
}

/// Indices outside a container fail for every mode.
///
/// Buffer views check the whole `[index, index + size)` region, so the
/// in-limit indices within one width of the end fail too.
pub fn probe_bounds(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let Some(length) = ctx.source.length() else {
		return Ok(());
	};
	let point = ctx.resolve()?;
	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	let profile = ctx.source.profile();

	let length = i32::try_from(length).unwrap_or(i32::MAX);
	let mut indices = vec![-1, i32::MIN, length, length.saturating_add(1), i32::MAX];
	if profile.kind == SourceKind::BufferView {
		let size = profile.ty.size() as i32;
		indices.extend((length - size + 1).max(0)..length);
	}

	for index in indices {
		for mode in AccessMode::all() {
			let Some(expected) = expected_failure(&profile, mode, index) else {
				return Err(Failure::Descriptor(format!("{mode} at index {index} is expected to succeed")));
			};
			let operands = operands(mode, &ctx.values);
			driver.unchanged(mode, || Failure::expect_error(mode, expected, driver.call(mode, index, &operands)))?;
		}
	}
	Ok(())
}

/// A null container fails every mode.
pub fn probe_null_container(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	for mode in AccessMode::all() {
		let Some(mut args) = ctx.source.with_null_container(0) else {
			return Ok(());
		};
		args.extend(value_args(mode, &ctx.values));
		driver.unchanged(mode, || Failure::expect_error(mode, ErrorKind::NullReference, driver.call_with(mode, &args)))?;
	}
	Ok(())
}

/// Every mode at every in-bounds offset of a buffer view either succeeds or
/// fails exactly as the gate set predicts.
pub fn probe_gates(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let (Some(limit), SourceKind::BufferView) = (ctx.source.length(), ctx.source.kind()) else {
		return Ok(());
	};
	let point = ctx.resolve()?;
	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	let profile = ctx.source.profile();

	let last = limit.saturating_sub(profile.ty.size());
	for offset in 0..=i32::try_from(last).unwrap_or(i32::MAX) {
		for mode in AccessMode::all() {
			let operands = operands(mode, &ctx.values);
			match expected_failure(&profile, mode, offset) {
				Some(expected) => driver.unchanged(mode, || {
					Failure::expect_error(mode, expected, driver.call(mode, offset, &operands))
				})?,
				None => {
					driver.expect_ok(mode, offset, &operands)?;
				}
			}
		}
	}
	Ok(())
}

/// Malformed calls fail with a method-type or class-cast error, and exact
/// handles reject any other access type.
pub fn probe_method_type(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let driver = Driver::new(&point, ctx.invoker, ctx.source);
	let ty = ctx.source.ty();
	let coordinates = ctx.source.coordinate_types().len();

	for mode in AccessMode::all() {
		let well_formed = driver.args(0, &operands(mode, &ctx.values));
		let wrong_type = |args: &[Arg]| Failure::expect_error(mode, ErrorKind::WrongMethodType, driver.call_with(mode, args));

		driver.unchanged(mode, || {
			if !well_formed.is_empty() {
				wrong_type(&[])?;
			}

			let mut extra = well_formed.clone();
			extra.push(Arg::Value(ctx.values.first));
			wrong_type(&extra)?;

			if let Some(last) = well_formed.len().checked_sub(1).filter(|_| mode.value_arity() > 0) {
				let mut mistyped = well_formed.clone();
				mistyped[last] = Arg::Value(Value::zero(other_type(ty)));
				wrong_type(&mistyped)?;
			}

			if coordinates > 0 {
				let mut misplaced = well_formed.clone();
				misplaced[0] = Arg::Index(0);
				wrong_type(&misplaced)?;
			}

			if let Some(mut foreign) = ctx.source.with_foreign_container(0) {
				foreign.extend(value_args(mode, &ctx.values));
				Failure::expect_error(mode, ErrorKind::ClassCast, driver.call_with(mode, &foreign))?;
			}
			Ok(())
		})?;

		let exact = point.access_type(mode);
		point.to_exact_handle(mode, &exact).map_err(|error| Failure::UnexpectedError { mode, error })?;
		let other_return = AccessType { ret: mismatched_return(exact.ret, ty), ..exact.clone() };
		Failure::expect_error(mode, ErrorKind::WrongMethodType, point.to_exact_handle(mode, &other_return))?;
		let mut longer = exact.clone();
		longer.params.push(ParamType::Value(ty));
		Failure::expect_error(mode, ErrorKind::WrongMethodType, point.to_exact_handle(mode, &longer))?;
	}
	Ok(())
}

fn mismatched_return(ret: ReturnType, ty: PrimType) -> ReturnType {
	match ret {
		ReturnType::Unit | ReturnType::Witness => ReturnType::Value(ty),
		ReturnType::Value(_) => ReturnType::Value(other_type(ty)),
	}
}

type Observation = (Result<Returned, ErrorKind>, Snapshot);

/// Performs `mode` from a freshly reset location and records the outcome.
///
/// Weak compare-and-set is retried within the budget, so a spurious failure
/// on one path is not mistaken for a divergence.
fn observe(
	driver: &Driver<'_>,
	ctx: &CaseContext<'_>,
	mode: AccessMode,
	index: i32,
	policy: RetryPolicy,
) -> Result<Observation, Failure> {
	let profile = ctx.source.profile();
	if expected_failure(&profile, AccessMode::Set, index).is_none() {
		driver.set(AccessMode::Set, index, ctx.values.first)?;
	}
	let operands = operands(mode, &ctx.values);
	let mut outcome = driver.call(mode, index, &operands);
	let mut attempts = 1;
	while mode.is_weak() && outcome == Ok(Returned::Witness(false)) && attempts < policy.attempts {
		outcome = driver.call(mode, index, &operands);
		attempts += 1;
	}
	Ok((outcome.map_err(|error| error.kind()), driver.snapshot()?))
}

/// The case's invoker agrees with direct invocation on results, failure
/// kinds and the state left behind, in bounds and out of bounds.
pub fn probe_path_parity(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let reference = Driver::new(&point, &DirectInvoker, ctx.source);
	let candidate = Driver::new(&point, ctx.invoker, ctx.source);

	let mut indices = ctx.source.access_indices();
	if let Some(length) = ctx.source.length() {
		indices.push(i32::try_from(length).unwrap_or(i32::MAX));
	}
	for index in indices {
		for mode in AccessMode::all() {
			let expected = observe(&reference, ctx, mode, index, ctx.policy)?;
			let actual = observe(&candidate, ctx, mode, index, ctx.policy)?;
			if expected != actual {
				return Err(Failure::PathDivergence {
					mode,
					invoker: ctx.invoker.name(),
					detail: format!("at index {index}: direct {expected:?}, {} {actual:?}", ctx.invoker.name()),
				});
			}
		}
	}
	Ok(())
}

/// Static descriptors of the resolved point match the source.
pub fn probe_descriptors(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let point = ctx.resolve()?;
	let ty = ctx.source.ty();
	let profile = ctx.source.profile();

	if point.var_type() != ty {
		return Err(Failure::Descriptor(format!("variable type {} instead of {ty}", point.var_type())));
	}
	let coordinates = ctx.source.coordinate_types();
	if point.coordinate_types() != coordinates {
		return Err(Failure::Descriptor(format!("coordinates {:?} instead of {coordinates:?}", point.coordinate_types())));
	}
	if point.memory_mode() != ctx.source.memory_mode() {
		return Err(Failure::Descriptor(format!("memory mode {:?}", point.memory_mode())));
	}

	for mode in AccessMode::all() {
		let mut params = coordinates.clone();
		params.extend(std::iter::repeat_n(ParamType::Value(ty), mode.value_arity()));
		let ret = match mode.return_shape() {
			ReturnShape::Unit => ReturnType::Unit,
			ReturnShape::Value => ReturnType::Value(ty),
			ReturnShape::Witness => ReturnType::Witness,
		};
		let expected = AccessType { params, ret };
		let actual = point.access_type(mode);
		if actual != expected {
			return Err(Failure::Descriptor(format!("{mode} has type {actual}, expected {expected}")));
		}

		let runtime = point.is_supported(mode);
		let declared = is_supported(&profile, mode) != Support::Unsupported;
		if runtime != declared {
			return Err(Failure::CapabilityMismatch { mode, runtime, expected: declared });
		}
	}
	Ok(())
}

fn hash_of(value: &impl Hash) -> u64 {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	hasher.finish()
}

/// Points resolved from equal sources are equal; a sibling source differing
/// in one identity component yields an unequal point.
pub fn probe_identity(ctx: &CaseContext<'_>) -> Result<(), Failure> {
	let first = ctx.resolve()?;
	let second = ctx.resolve()?;
	if first != second || hash_of(&first) != hash_of(&second) {
		return Err(Failure::Identity(format!("two resolutions of {} differ", ctx.source)));
	}
	if *ctx.source != ctx.source.clone() {
		return Err(Failure::Identity(format!("{} differs from its clone", ctx.source)));
	}

	let sibling = ctx.source.sibling();
	if sibling == *ctx.source {
		return Err(Failure::Identity(format!("{sibling} equals {}", ctx.source)));
	}
	let other = sibling.resolve().map_err(|error| Failure::Resolve { target: sibling.to_string(), error })?;
	if other == first {
		return Err(Failure::Identity(format!("point over {sibling} equals point over {}", ctx.source)));
	}
	Ok(())
}
