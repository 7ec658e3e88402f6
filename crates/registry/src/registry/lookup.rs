//! Borrowed views over a [`SimpleRegistry`].

use std::sync::Arc;

use zero_primitives::{IntBiMap, RegistryKey, ResourceKey, TagKey};

use super::simple::SimpleRegistry;
use crate::holder::{Holder, HolderGetter, HolderLookup, NamedHolderSet};
use crate::{RegistryError, RegistryValue};

/// Read-only view; never mutates the registry.
#[derive(Debug)]
pub struct RegistryLookup<'a, T: RegistryValue> {
	registry: &'a SimpleRegistry<T>,
}

impl<'a, T: RegistryValue> RegistryLookup<'a, T> {
	pub(super) fn new(registry: &'a SimpleRegistry<T>) -> Self {
		Self { registry }
	}
}

impl<T: RegistryValue> Clone for RegistryLookup<'_, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T: RegistryValue> Copy for RegistryLookup<'_, T> {}

impl<T: RegistryValue> HolderGetter<T> for RegistryLookup<'_, T> {
	fn get(&self, key: &ResourceKey<T>) -> Option<Holder<T>> {
		self.registry.holder_by_key(key)
	}

	fn get_tag(&self, key: &TagKey<T>) -> Option<Arc<NamedHolderSet<T>>> {
		self.registry.get_tag(key)
	}
}

impl<T: RegistryValue> HolderLookup<T> for RegistryLookup<'_, T> {
	fn registry_key(&self) -> &RegistryKey<T> {
		self.registry.key()
	}

	fn list_elements(&self) -> Vec<Holder<T>> {
		self.registry.holders().to_vec()
	}

	fn list_tags(&self) -> Vec<Arc<NamedHolderSet<T>>> {
		self.registry
			.tag_entries()
			.into_iter()
			.map(|(_, set)| set)
			.collect()
	}
}

/// Lookup used while populating registries: unknown keys get a fresh unbound
/// holder and unknown tags a fresh empty set.
#[derive(Debug)]
pub struct RegistrationLookup<'a, T: RegistryValue> {
	registry: &'a SimpleRegistry<T>,
}

impl<'a, T: RegistryValue> RegistrationLookup<'a, T> {
	pub(super) fn new(registry: &'a SimpleRegistry<T>) -> Self {
		Self { registry }
	}

	/// The holder for `key`, created unbound if needed.
	pub fn get_or_create(&self, key: &ResourceKey<T>) -> Result<Holder<T>, RegistryError> {
		self.registry.get_or_create_holder(key)
	}

	/// The named set for `key`, created empty if needed.
	pub fn tag(&self, key: &TagKey<T>) -> Arc<NamedHolderSet<T>> {
		self.registry.get_or_create_tag(key)
	}
}

impl<T: RegistryValue> HolderGetter<T> for RegistrationLookup<'_, T> {
	fn get(&self, key: &ResourceKey<T>) -> Option<Holder<T>> {
		self.get_or_create(key).ok()
	}

	fn get_tag(&self, key: &TagKey<T>) -> Option<Arc<NamedHolderSet<T>>> {
		Some(self.tag(key))
	}

	fn get_or_err(&self, key: &ResourceKey<T>) -> Result<Holder<T>, RegistryError> {
		self.get_or_create(key)
	}

	fn get_tag_or_err(&self, key: &TagKey<T>) -> Result<Arc<NamedHolderSet<T>>, RegistryError> {
		Ok(self.tag(key))
	}
}

/// Read-only element lookup whose tag lookups create missing tags.
#[derive(Debug)]
pub struct TagAddingLookup<'a, T: RegistryValue> {
	registry: &'a SimpleRegistry<T>,
}

impl<'a, T: RegistryValue> TagAddingLookup<'a, T> {
	pub(super) fn new(registry: &'a SimpleRegistry<T>) -> Self {
		Self { registry }
	}
}

impl<T: RegistryValue> HolderGetter<T> for TagAddingLookup<'_, T> {
	fn get(&self, key: &ResourceKey<T>) -> Option<Holder<T>> {
		self.registry.holder_by_key(key)
	}

	fn get_tag(&self, key: &TagKey<T>) -> Option<Arc<NamedHolderSet<T>>> {
		Some(self.registry.get_or_create_tag(key))
	}
}

impl<T: RegistryValue> HolderLookup<T> for TagAddingLookup<'_, T> {
	fn registry_key(&self) -> &RegistryKey<T> {
		self.registry.key()
	}

	fn list_elements(&self) -> Vec<Holder<T>> {
		self.registry.holders().to_vec()
	}

	fn list_tags(&self) -> Vec<Arc<NamedHolderSet<T>>> {
		self.registry.as_lookup().list_tags()
	}
}

/// [`IntBiMap`] over the holders of a registry.
#[derive(Debug)]
pub struct HolderIdMap<'a, T: RegistryValue> {
	registry: &'a SimpleRegistry<T>,
}

impl<'a, T: RegistryValue> HolderIdMap<'a, T> {
	pub(super) fn new(registry: &'a SimpleRegistry<T>) -> Self {
		Self { registry }
	}
}

impl<T: RegistryValue> IntBiMap<Holder<T>> for HolderIdMap<'_, T> {
	fn len(&self) -> usize {
		self.registry.len()
	}

	fn get_by_id(&self, id: u32) -> Option<Holder<T>> {
		self.registry.holder_by_id(id)
	}

	fn get_id(&self, holder: &Holder<T>) -> Option<u32> {
		let value = holder.try_value()?;
		self.registry.get_id(&value)
	}

	fn values(&self) -> Vec<Holder<T>> {
		self.registry.holders().to_vec()
	}
}
