use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use zero_primitives::Key;

use crate::registry::SimpleRegistry;
use crate::{RegistryError, RegistryValue};

/// Staging map of values that a bootstrap loader registers in one go.
///
/// Keeps insertion order, so ids follow the order values were added. Putting
/// the same key twice keeps the first position and the last value.
pub struct RegistryLoader<T> {
	mappings: IndexMap<Key, Arc<T>, FxBuildHasher>,
}

impl<T: RegistryValue> RegistryLoader<T> {
	pub fn new() -> Self {
		Self {
			mappings: IndexMap::default(),
		}
	}

	/// Adds the value built from its own key.
	pub fn add(&mut self, key: Key, build: impl FnOnce(&Key) -> T) -> &mut Self {
		let value = build(&key);
		self.put(key, value)
	}

	pub fn put(&mut self, key: Key, value: impl Into<Arc<T>>) -> &mut Self {
		self.mappings.insert(key, value.into());
		self
	}

	pub fn for_each(&self, mut action: impl FnMut(&Key, &Arc<T>)) {
		for (key, value) in &self.mappings {
			action(key, value);
		}
	}

	pub fn len(&self) -> usize {
		self.mappings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}

	/// Registers every staged value into `registry`, stopping at the first error.
	///
	/// Intrusive registries get the provisional holder of each value created
	/// right before it is registered.
	pub fn register_all(self, registry: &SimpleRegistry<T>) -> Result<(), RegistryError> {
		for (key, value) in self.mappings {
			if registry.is_intrusive() {
				registry.create_intrusive_holder(&value)?;
			}
			registry.register_location(key, value)?;
		}
		Ok(())
	}
}

impl<T: RegistryValue> Default for RegistryLoader<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: RegistryValue> fmt::Debug for RegistryLoader<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.mappings.iter()).finish()
	}
}
