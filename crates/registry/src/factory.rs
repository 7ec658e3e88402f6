//! Explicit service locator keyed by type.
//!
//! Registries and holders never reach for a global factory; callers that need
//! a shared implementation of some capability register it here once and pass
//! the provider along.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
	#[error("factory {type_name} is already registered")]
	Duplicate { type_name: &'static str },

	#[error("no factory registered for {type_name}")]
	Type { type_name: &'static str },
}

struct Entry {
	name: &'static str,
	value: Arc<dyn Any + Send + Sync>,
}

/// One shared instance per type.
#[derive(Default)]
pub struct FactoryProvider {
	factories: RwLock<FxHashMap<TypeId, Entry>>,
}

impl FactoryProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `factory` as the instance of `F`. Each type can be registered once.
	pub fn register<F: Any + Send + Sync>(&self, factory: F) -> Result<(), FactoryError> {
		let mut factories = self.factories.write();
		let id = TypeId::of::<F>();
		if factories.contains_key(&id) {
			return Err(FactoryError::Duplicate {
				type_name: type_name::<F>(),
			});
		}
		factories.insert(
			id,
			Entry {
				name: type_name::<F>(),
				value: Arc::new(factory),
			},
		);
		tracing::debug!(factory = type_name::<F>(), "factory registered");
		Ok(())
	}

	pub fn provide<F: Any + Send + Sync>(&self) -> Result<Arc<F>, FactoryError> {
		let missing = || FactoryError::Type {
			type_name: type_name::<F>(),
		};
		let value = self
			.factories
			.read()
			.get(&TypeId::of::<F>())
			.map(|entry| entry.value.clone())
			.ok_or_else(missing)?;
		value.downcast().map_err(|_| missing())
	}

	pub fn contains<F: Any + Send + Sync>(&self) -> bool {
		self.factories.read().contains_key(&TypeId::of::<F>())
	}

	pub fn len(&self) -> usize {
		self.factories.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.read().is_empty()
	}
}

impl fmt::Debug for FactoryProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let factories = self.factories.read();
		let mut names: Vec<_> = factories.values().map(|entry| entry.name).collect();
		names.sort_unstable();
		f.debug_struct("FactoryProvider").field("factories", &names).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, PartialEq)]
	struct BlockFactory {
		prefix: &'static str,
	}

	trait Named: Send + Sync {
		fn name(&self) -> &str;
	}

	struct Fixed;

	impl Named for Fixed {
		fn name(&self) -> &str {
			"fixed"
		}
	}

	#[test]
	fn provide_returns_registered_instance() {
		let provider = FactoryProvider::new();
		provider
			.register(BlockFactory { prefix: "block" })
			.unwrap();

		let first = provider.provide::<BlockFactory>().unwrap();
		let second = provider.provide::<BlockFactory>().unwrap();
		assert_eq!(first.prefix, "block");
		assert!(Arc::ptr_eq(&first, &second));
		assert!(provider.contains::<BlockFactory>());
		assert_eq!(provider.len(), 1);
	}

	#[test]
	fn trait_objects_are_keyed_by_their_box_type() {
		let provider = FactoryProvider::new();
		provider
			.register::<Box<dyn Named>>(Box::new(Fixed) as Box<dyn Named>)
			.unwrap();

		let named = provider.provide::<Box<dyn Named>>().unwrap();
		assert_eq!(named.name(), "fixed");
	}

	#[test]
	fn duplicate_registration_fails() {
		let provider = FactoryProvider::new();
		provider.register(BlockFactory { prefix: "a" }).unwrap();
		let err = provider
			.register(BlockFactory { prefix: "b" })
			.unwrap_err();

		assert!(matches!(err, FactoryError::Duplicate { .. }));
		assert_eq!(provider.provide::<BlockFactory>().unwrap().prefix, "a");
	}

	#[test]
	fn unknown_type_fails() {
		let provider = FactoryProvider::new();
		let err = provider.provide::<BlockFactory>().unwrap_err();
		assert_eq!(
			err,
			FactoryError::Type {
				type_name: type_name::<BlockFactory>()
			}
		);
		assert!(provider.is_empty());
	}
}
