use std::sync::Arc;

use zero_primitives::{RegistryKey, ResourceKey, TagKey};

use super::{Holder, NamedHolderSet};
use crate::{RegistryError, RegistryValue};

/// Resolves keys and tag keys of one registry into holders.
pub trait HolderGetter<T: RegistryValue> {
	fn get(&self, key: &ResourceKey<T>) -> Option<Holder<T>>;

	fn get_tag(&self, key: &TagKey<T>) -> Option<Arc<NamedHolderSet<T>>>;

	fn get_or_err(&self, key: &ResourceKey<T>) -> Result<Holder<T>, RegistryError> {
		self.get(key).ok_or_else(|| RegistryError::MissingElement {
			key: key.to_string(),
		})
	}

	fn get_tag_or_err(&self, key: &TagKey<T>) -> Result<Arc<NamedHolderSet<T>>, RegistryError> {
		self.get_tag(key).ok_or_else(|| RegistryError::MissingTag {
			key: format!("{key:?}"),
		})
	}
}

/// A [`HolderGetter`] that can also enumerate its registry.
pub trait HolderLookup<T: RegistryValue>: HolderGetter<T> {
	fn registry_key(&self) -> &RegistryKey<T>;

	/// Every registered holder in id order.
	fn list_elements(&self) -> Vec<Holder<T>>;

	fn list_tags(&self) -> Vec<Arc<NamedHolderSet<T>>>;
}
