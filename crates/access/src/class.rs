//! Class definitions, instances and lazy class initialization.
//!
//! A class is created in the unresolved state. Looking up one of its fields
//! resolves it without running its initializer; the initializer runs on the
//! first instantiation or the first access to one of its static fields, at
//! most once per class. Superclasses initialize before their subclasses.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use atomvar_primitives::{PrimType, Value};
use parking_lot::Once;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique class identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
	fn next() -> Self {
		Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl std::fmt::Display for ClassId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "class#{}", self.0)
	}
}

/// A field declared by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
	pub name: String,
	pub ty: PrimType,
	pub is_static: bool,
	pub is_final: bool,
	pub initial: Value,
	/// Index into the instance slot table or the declaring class's statics.
	pub(crate) slot: usize,
}

type InitHook = Box<dyn Fn(&ClassDef) + Send + Sync>;

/// Runtime class definition.
///
/// Build one with [`ClassDef::builder`].
pub struct ClassDef {
	id: ClassId,
	name: String,
	superclass: Option<Arc<ClassDef>>,
	fields: Vec<FieldDef>,
	instance_slots: usize,
	statics: Box<[AtomicU64]>,
	init: Once,
	on_initialize: Option<InitHook>,
}

impl ClassDef {
	pub fn builder(name: impl Into<String>) -> ClassBuilder {
		ClassBuilder {
			name: name.into(),
			superclass: None,
			fields: Vec::new(),
			on_initialize: None,
		}
	}

	pub fn id(&self) -> ClassId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn superclass(&self) -> Option<&Arc<ClassDef>> {
		self.superclass.as_ref()
	}

	/// Fields declared by this class, excluding inherited ones.
	pub fn declared_fields(&self) -> &[FieldDef] {
		&self.fields
	}

	/// Whether `self` is `other` or one of its subclasses.
	pub fn is_subclass_of(&self, other: &ClassDef) -> bool {
		self.ancestry().any(|class| class.id == other.id)
	}

	/// This class followed by each superclass up to the root.
	pub fn ancestry(&self) -> impl Iterator<Item = &ClassDef> {
		std::iter::successors(Some(self), |class| class.superclass.as_deref())
	}

	/// Finds a field by name in this class or the nearest superclass
	/// declaring it, together with its declaring class.
	pub fn resolve_field(self: &Arc<Self>, name: &str) -> Option<(Arc<ClassDef>, FieldDef)> {
		let mut class = Arc::clone(self);
		loop {
			let found = class.fields.iter().find(|field| field.name == name).cloned();
			if let Some(field) = found {
				return Some((class, field));
			}
			class = Arc::clone(class.superclass.as_ref()?);
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.init.state().done()
	}

	/// Runs the class initializer if it has not run yet.
	///
	/// Superclasses are initialized first. The initializer hook must not
	/// access the class it initializes.
	pub fn ensure_initialized(&self) {
		if let Some(superclass) = &self.superclass {
			superclass.ensure_initialized();
		}
		self.init.call_once(|| {
			for field in self.fields.iter().filter(|field| field.is_static) {
				self.statics[field.slot].store(field.initial.to_bits(), Ordering::SeqCst);
			}
			tracing::debug!(class = %self.name, class_id = %self.id, "access.class.initialize");
			if let Some(hook) = &self.on_initialize {
				hook(self);
			}
		});
	}

	pub(crate) fn static_cell(&self, slot: usize) -> &AtomicU64 {
		&self.statics[slot]
	}

	/// Total instance slots including inherited fields.
	fn instance_slot_count(&self) -> usize {
		self.instance_slots
	}
}

impl std::fmt::Debug for ClassDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClassDef")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("superclass", &self.superclass.as_ref().map(|class| class.name()))
			.field("fields", &self.fields)
			.field("initialized", &self.is_initialized())
			.finish_non_exhaustive()
	}
}

/// Builder for [`ClassDef`].
pub struct ClassBuilder {
	name: String,
	superclass: Option<Arc<ClassDef>>,
	fields: Vec<(String, Value, bool, bool)>,
	on_initialize: Option<InitHook>,
}

impl ClassBuilder {
	pub fn extends(mut self, superclass: &Arc<ClassDef>) -> Self {
		self.superclass = Some(Arc::clone(superclass));
		self
	}

	/// Mutable instance field with the given initial value.
	pub fn field(self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
		self.declare(name.into(), initial.into(), false, false)
	}

	pub fn final_field(self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
		self.declare(name.into(), initial.into(), false, true)
	}

	/// Mutable static field, assigned `initial` when the class initializes.
	pub fn static_field(self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
		self.declare(name.into(), initial.into(), true, false)
	}

	pub fn static_final_field(self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
		self.declare(name.into(), initial.into(), true, true)
	}

	/// Hook run once, after static fields are assigned, when the class
	/// initializes.
	pub fn on_initialize(mut self, hook: impl Fn(&ClassDef) + Send + Sync + 'static) -> Self {
		self.on_initialize = Some(Box::new(hook));
		self
	}

	fn declare(mut self, name: String, initial: Value, is_static: bool, is_final: bool) -> Self {
		self.fields.push((name, initial, is_static, is_final));
		self
	}

	pub fn build(self) -> Arc<ClassDef> {
		let mut next_instance = self.superclass.as_ref().map_or(0, |class| class.instance_slot_count());
		let mut next_static = 0;
		let fields: Vec<FieldDef> = self
			.fields
			.into_iter()
			.map(|(name, initial, is_static, is_final)| {
				let counter = if is_static { &mut next_static } else { &mut next_instance };
				let slot = *counter;
				*counter += 1;
				FieldDef { name, ty: initial.ty(), is_static, is_final, initial, slot }
			})
			.collect();

		Arc::new(ClassDef {
			id: ClassId::next(),
			name: self.name,
			superclass: self.superclass,
			fields,
			instance_slots: next_instance,
			statics: (0..next_static).map(|_| AtomicU64::new(0)).collect(),
			init: Once::new(),
			on_initialize: self.on_initialize,
		})
	}
}

/// A heap object: a reference to its class and one slot per instance field,
/// inherited fields included.
#[derive(Clone)]
pub struct Instance {
	inner: Arc<InstanceData>,
}

struct InstanceData {
	class: Arc<ClassDef>,
	slots: Box<[AtomicU64]>,
}

impl Instance {
	/// Instantiates `class`, initializing it first if needed.
	pub fn new(class: &Arc<ClassDef>) -> Self {
		class.ensure_initialized();
		let slots: Box<[AtomicU64]> = (0..class.instance_slot_count()).map(|_| AtomicU64::new(0)).collect();
		for field in class.ancestry().flat_map(|c| c.fields.iter()).filter(|field| !field.is_static) {
			slots[field.slot].store(field.initial.to_bits(), Ordering::Relaxed);
		}
		Self { inner: Arc::new(InstanceData { class: Arc::clone(class), slots }) }
	}

	pub fn class(&self) -> &Arc<ClassDef> {
		&self.inner.class
	}

	/// Reference identity.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub(crate) fn cell(&self, slot: usize) -> &AtomicU64 {
		&self.inner.slots[slot]
	}
}

impl std::fmt::Debug for Instance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}@{:p}", self.inner.class.name, Arc::as_ptr(&self.inner))
	}
}

#[cfg(test)]
mod tests;
