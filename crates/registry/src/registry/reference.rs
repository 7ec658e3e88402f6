use std::fmt;
use std::sync::Arc;

use zero_primitives::{Key, RegistryKey, ResourceKey};

use super::simple::SimpleRegistry;
use crate::access::{RegistryHolder, RegistryHolderExt};
use crate::{RegistryError, RegistryValue};

/// A key bound to a concrete registry, resolved on every [`get`](Self::get).
pub struct RegistryReference<T: RegistryValue> {
	registry: Arc<SimpleRegistry<T>>,
	key: ResourceKey<T>,
}

impl<T: RegistryValue> RegistryReference<T> {
	pub fn new(registry: Arc<SimpleRegistry<T>>, location: Key) -> Self {
		let key = registry.key().entry(location);
		Self { registry, key }
	}

	pub fn key(&self) -> &ResourceKey<T> {
		&self.key
	}

	pub fn get(&self) -> Result<Arc<T>, RegistryError> {
		self.registry
			.get_by_key(&self.key)
			.ok_or_else(|| RegistryError::MissingElement {
				key: self.key.to_string(),
			})
	}
}

impl<T: RegistryValue> Clone for RegistryReference<T> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
			key: self.key.clone(),
		}
	}
}

impl<T: RegistryValue> fmt::Debug for RegistryReference<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RegistryReference").field(&self.key).finish()
	}
}

/// A key resolved against whichever [`RegistryHolder`] is current.
pub struct DynamicRegistryReference<T> {
	registry: RegistryKey<T>,
	key: ResourceKey<T>,
}

impl<T: RegistryValue> DynamicRegistryReference<T> {
	pub fn new(registry: RegistryKey<T>, location: Key) -> Self {
		let key = registry.entry(location);
		Self { registry, key }
	}

	pub fn key(&self) -> &ResourceKey<T> {
		&self.key
	}

	pub fn get(&self, holder: &(impl RegistryHolder + ?Sized)) -> Result<Arc<T>, RegistryError> {
		holder
			.registry_or_err(&self.registry)?
			.get_by_key(&self.key)
			.ok_or_else(|| RegistryError::MissingElement {
				key: self.key.to_string(),
			})
	}
}

impl<T> Clone for DynamicRegistryReference<T> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
			key: self.key.clone(),
		}
	}
}

impl<T> fmt::Debug for DynamicRegistryReference<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DynamicRegistryReference").field(&self.key).finish()
	}
}
