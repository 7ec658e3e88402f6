//! Tag binding.
//!
//! # Invariants
//!
//! - `bind_tags` validates every supplied holder before touching any state; a
//!   rejected call leaves tags exactly as they were.
//! - After a successful `bind_tags`, every holder's tag list and every named
//!   set reflect the supplied data only. Known sets that were not supplied are
//!   emptied.
//! - Tag keys can be introduced at any time, including after freezing.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use zero_primitives::{Key, TagKey};

use super::simple::SimpleRegistry;
use crate::holder::{Holder, HolderSet, NamedHolderSet, Reference};
use crate::value::Identity;
use crate::warning::WarningKind;
use crate::{RegistryError, RegistryValue};

impl<T: RegistryValue> SimpleRegistry<T> {
	pub fn get_tag(&self, key: &TagKey<T>) -> Option<Arc<NamedHolderSet<T>>> {
		self.tags.load().get(key).cloned()
	}

	/// The named set for `key`, created empty if it does not exist yet.
	pub fn get_or_create_tag(&self, key: &TagKey<T>) -> Arc<NamedHolderSet<T>> {
		if let Some(existing) = self.get_tag(key) {
			return existing;
		}
		let _writer = self.state.write();
		let current = self.tags.load_full();
		if let Some(existing) = current.get(key) {
			return existing.clone();
		}
		let set = Arc::new(NamedHolderSet::new(self.owner.clone(), key.clone()));
		let mut next = (*current).clone();
		next.insert(key.clone(), set.clone());
		self.tags.store(Arc::new(next));
		set
	}

	/// The named set for `key`, or an empty direct set.
	pub fn get_tag_or_empty(&self, key: &TagKey<T>) -> HolderSet<T> {
		self.get_tag(key)
			.map(HolderSet::Named)
			.unwrap_or_else(HolderSet::empty)
	}

	pub fn is_known_tag_key(&self, key: &TagKey<T>) -> bool {
		self.tags.load().contains_key(key)
	}

	/// Known tag keys in creation order.
	pub fn tag_keys(&self) -> Vec<TagKey<T>> {
		self.tags.load().keys().cloned().collect()
	}

	pub fn tag_entries(&self) -> Vec<(TagKey<T>, Arc<NamedHolderSet<T>>)> {
		self.tags
			.load()
			.iter()
			.map(|(key, set)| (key.clone(), set.clone()))
			.collect()
	}

	/// Value-level views over every known tag.
	pub fn tags(&self) -> Vec<TagSet<'_, T>> {
		self.tags
			.load()
			.values()
			.map(|set| TagSet {
				registry: self,
				set: set.clone(),
			})
			.collect()
	}

	pub fn tag_set(&self, key: &TagKey<T>) -> Option<TagSet<'_, T>> {
		self.get_tag(key).map(|set| TagSet {
			registry: self,
			set,
		})
	}

	/// Replaces all tag membership of this registry with `tags`.
	///
	/// Every holder must be a reference registered in this registry. Known tags
	/// absent from `tags` are reported as [`WarningKind::MissingTags`] and end
	/// up empty.
	pub fn bind_tags<I>(&self, tags: I) -> Result<(), RegistryError>
	where
		I: IntoIterator<Item = (TagKey<T>, Vec<Holder<T>>)>,
	{
		let supplied: IndexMap<TagKey<T>, Vec<Holder<T>>, FxBuildHasher> =
			tags.into_iter().collect();
		let state = self.state.write();

		let mut membership: FxHashMap<Identity, (Arc<Reference<T>>, Vec<TagKey<T>>)> = state
			.by_key
			.values()
			.map(|reference| (Identity::of(&**reference), (reference.clone(), Vec::new())))
			.collect();

		for (tag, holders) in &supplied {
			for holder in holders {
				if !holder.can_serialize_in(&self.owner) {
					return Err(RegistryError::ForeignHolder {
						registry: self.location().clone(),
						tag: tag.to_string(),
						holder: format!("{holder:?}"),
					});
				}
				let Holder::Reference(reference) = holder else {
					return Err(RegistryError::DirectHolderInTag {
						tag: tag.to_string(),
						holder: format!("{holder:?}"),
					});
				};
				let Some((_, tags)) = membership.get_mut(&Identity::of(&**reference)) else {
					return Err(RegistryError::UnknownHolder {
						registry: self.location().clone(),
						tag: tag.to_string(),
						holder: format!("{holder:?}"),
					});
				};
				if !tags.contains(tag) {
					tags.push(tag.clone());
				}
			}
		}

		let current = self.tags.load_full();
		let mut missing: Vec<Key> = current
			.keys()
			.filter(|key| !supplied.contains_key(*key))
			.map(|key| key.location().clone())
			.collect();
		if !missing.is_empty() {
			missing.sort();
			self.report(WarningKind::MissingTags { tags: missing })?;
		}

		let mut next = (*current).clone();
		for set in next.values() {
			if !supplied.contains_key(set.key()) {
				set.bind(Vec::new());
			}
		}
		for (tag, holders) in supplied {
			next.entry(tag.clone())
				.or_insert_with(|| Arc::new(NamedHolderSet::new(self.owner.clone(), tag)))
				.bind(holders);
		}
		for (reference, tags) in membership.into_values() {
			reference.bind_tags(tags);
		}
		self.tags.store(Arc::new(next));
		drop(state);

		tracing::debug!(registry = %self.location(), tags = self.tags.load().len(), "tags bound");
		Ok(())
	}

	/// Empties every named set and clears the tags of every holder.
	pub fn reset_tags(&self) {
		let state = self.state.write();
		for set in self.tags.load().values() {
			set.bind(Vec::new());
		}
		for reference in state.by_key.values() {
			reference.bind_tags(Vec::new());
		}
	}
}

/// Value-level view over one named holder set.
pub struct TagSet<'a, T: RegistryValue> {
	registry: &'a SimpleRegistry<T>,
	set: Arc<NamedHolderSet<T>>,
}

impl<T: RegistryValue> TagSet<'_, T> {
	pub fn key(&self) -> &TagKey<T> {
		self.set.key()
	}

	pub fn holders(&self) -> &Arc<NamedHolderSet<T>> {
		&self.set
	}

	pub fn len(&self) -> usize {
		self.set.len()
	}

	pub fn is_empty(&self) -> bool {
		self.set.is_empty()
	}

	pub fn contains(&self, value: &Arc<T>) -> bool {
		self.set.contains(&self.registry.wrap_as_holder(value))
	}

	pub fn get(&self, index: usize) -> Option<Arc<T>> {
		self.set.get(index).and_then(|holder| holder.try_value())
	}

	pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + use<T> {
		let contents = self.set.contents();
		(0..contents.len()).filter_map(move |i| contents[i].try_value())
	}
}

impl<T: RegistryValue> fmt::Debug for TagSet<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TagSet")
			.field("key", self.set.key())
			.field("len", &self.set.len())
			.finish()
	}
}
