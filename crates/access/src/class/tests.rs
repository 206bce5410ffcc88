use std::sync::atomic::AtomicUsize;

use super::*;

#[test]
fn builder_assigns_slots_after_inherited_fields() {
	let base = ClassDef::builder("Base").field("a", 1i32).static_field("s", 2i64).build();
	let derived = ClassDef::builder("Derived").extends(&base).field("b", 3i32).static_field("t", 4i64).build();

	let b = &derived.declared_fields()[0];
	assert_eq!(b.slot, 1);
	let t = &derived.declared_fields()[1];
	assert_eq!(t.slot, 0);
	assert_eq!(derived.instance_slot_count(), 2);
}

#[test]
fn resolve_field_finds_nearest_declaration() {
	let base = ClassDef::builder("Base").field("v", 1i32).static_field("s", 1i32).build();
	let derived = ClassDef::builder("Derived").extends(&base).field("w", 2i32).build();

	let (owner, field) = derived.resolve_field("s").unwrap();
	assert_eq!(owner.id(), base.id());
	assert!(field.is_static);
	assert_eq!(derived.resolve_field("w").unwrap().0.id(), derived.id());
	assert!(derived.resolve_field("missing").is_none());
}

#[test]
fn subclass_relation() {
	let base = ClassDef::builder("Base").build();
	let derived = ClassDef::builder("Derived").extends(&base).build();
	let other = ClassDef::builder("Other").build();

	assert!(derived.is_subclass_of(&base));
	assert!(derived.is_subclass_of(&derived));
	assert!(!base.is_subclass_of(&derived));
	assert!(!other.is_subclass_of(&base));
}

#[test]
fn initializer_runs_once_and_superclass_first() {
	static ORDER: AtomicUsize = AtomicUsize::new(0);
	static BASE_AT: AtomicUsize = AtomicUsize::new(usize::MAX);
	static DERIVED_AT: AtomicUsize = AtomicUsize::new(usize::MAX);

	let base = ClassDef::builder("Base")
		.on_initialize(|_| BASE_AT.store(ORDER.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst))
		.build();
	let derived = ClassDef::builder("Derived")
		.extends(&base)
		.on_initialize(|_| DERIVED_AT.store(ORDER.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst))
		.build();

	assert!(!base.is_initialized());
	assert!(!derived.is_initialized());
	derived.ensure_initialized();
	derived.ensure_initialized();

	assert!(base.is_initialized() && derived.is_initialized());
	assert!(BASE_AT.load(Ordering::SeqCst) < DERIVED_AT.load(Ordering::SeqCst));
	assert_eq!(ORDER.load(Ordering::SeqCst), 2);
}

#[test]
fn statics_are_assigned_during_initialization() {
	let class = ClassDef::builder("Holder").static_field("s", 7i32).build();
	assert_eq!(class.static_cell(0).load(Ordering::SeqCst), 0);
	class.ensure_initialized();
	assert_eq!(class.static_cell(0).load(Ordering::SeqCst), 7);
}

#[test]
fn instance_initializes_class_and_fields() {
	let base = ClassDef::builder("Base").field("a", 5i32).build();
	let derived = ClassDef::builder("Derived").extends(&base).field("b", true).build();

	let object = Instance::new(&derived);
	assert!(base.is_initialized());
	assert_eq!(object.cell(0).load(Ordering::Relaxed), 5);
	assert_eq!(object.cell(1).load(Ordering::Relaxed), 1);
	assert!(object.ptr_eq(&object.clone()));
	assert!(!object.ptr_eq(&Instance::new(&derived)));
}
