//! Lazily bound reference holders.
//!
//! # Invariants
//!
//! - A reference is bound once both key and value are set and never becomes
//!   unbound again.
//! - The key is single assignment. Binding the same key twice is a no-op,
//!   binding a different key is [`RegistryError::KeyRebind`].
//! - An intrusive reference is created with its value and can only be rebound
//!   to that same value (by identity).
//! - Tags are replaced wholesale by the owning registry.

use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::{ArcSwap, ArcSwapOption};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use zero_primitives::{Key, ResourceKey, TagKey};

use super::owner::HolderOwner;
use crate::{RegistryError, RegistryValue};

type TagList<T> = IndexSet<TagKey<T>, FxBuildHasher>;

/// Which half of a reference is known at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
	/// Key known at creation, value bound on registration.
	Standalone,
	/// Value known at creation, key bound on registration.
	Intrusive,
}

/// A registry entry that may be handed out before it is bound.
pub struct Reference<T> {
	kind: ReferenceKind,
	owner: HolderOwner,
	key: OnceLock<ResourceKey<T>>,
	value: ArcSwapOption<T>,
	tags: ArcSwap<TagList<T>>,
}

impl<T: RegistryValue> Reference<T> {
	pub(crate) fn standalone(owner: HolderOwner, key: ResourceKey<T>) -> Self {
		Self {
			kind: ReferenceKind::Standalone,
			owner,
			key: OnceLock::from(key),
			value: ArcSwapOption::empty(),
			tags: ArcSwap::from_pointee(TagList::default()),
		}
	}

	pub(crate) fn intrusive(owner: HolderOwner, value: Arc<T>) -> Self {
		Self {
			kind: ReferenceKind::Intrusive,
			owner,
			key: OnceLock::new(),
			value: ArcSwapOption::from(Some(value)),
			tags: ArcSwap::from_pointee(TagList::default()),
		}
	}

	pub fn kind(&self) -> ReferenceKind {
		self.kind
	}

	pub fn owner(&self) -> &HolderOwner {
		&self.owner
	}

	/// The bound key, or [`RegistryError::UnboundHolder`].
	pub fn key(&self) -> Result<&ResourceKey<T>, RegistryError> {
		self.key.get().ok_or_else(|| self.unbound())
	}

	pub fn try_key(&self) -> Option<&ResourceKey<T>> {
		self.key.get()
	}

	/// The bound value, or [`RegistryError::UnboundHolder`].
	pub fn value(&self) -> Result<Arc<T>, RegistryError> {
		self.value.load_full().ok_or_else(|| self.unbound())
	}

	pub fn try_value(&self) -> Option<Arc<T>> {
		self.value.load_full()
	}

	pub fn is_bound(&self) -> bool {
		self.key.get().is_some() && self.value.load().is_some()
	}

	/// Current tag membership, re-read on every call.
	pub fn tags(&self) -> Vec<TagKey<T>> {
		self.tags.load().iter().cloned().collect()
	}

	pub fn is_location(&self, location: &Key) -> bool {
		self.key.get().is_some_and(|key| key.location() == location)
	}

	pub fn is_key(&self, key: &ResourceKey<T>) -> bool {
		self.key.get() == Some(key)
	}

	pub fn matches(&self, predicate: impl FnOnce(&ResourceKey<T>) -> bool) -> bool {
		self.key.get().is_some_and(predicate)
	}

	pub fn is_in(&self, tag: &TagKey<T>) -> bool {
		self.tags.load().contains(tag)
	}

	pub fn can_serialize_in(&self, owner: &HolderOwner) -> bool {
		self.owner.can_serialize_in(owner)
	}

	pub(crate) fn bind_key(&self, key: ResourceKey<T>) -> Result<(), RegistryError> {
		if let Some(existing) = self.key.get() {
			if *existing != key {
				return Err(RegistryError::KeyRebind {
					existing: existing.to_string(),
					new: key.to_string(),
				});
			}
			return Ok(());
		}
		// The registry serializes writers, so a lost race here means the same key.
		let _ = self.key.set(key);
		Ok(())
	}

	/// Binds `value`, returning the value it replaced.
	pub(crate) fn bind_value(&self, value: Arc<T>) -> Result<Option<Arc<T>>, RegistryError> {
		if self.kind == ReferenceKind::Intrusive {
			if let Some(current) = &*self.value.load()
				&& !Arc::ptr_eq(current, &value)
			{
				return Err(RegistryError::IntrusiveValueRebind {
					holder: format!("{self:?}"),
				});
			}
			return Ok(None);
		}
		Ok(self.value.swap(Some(value)))
	}

	pub(crate) fn bind_tags(&self, tags: impl IntoIterator<Item = TagKey<T>>) {
		self.tags.store(Arc::new(tags.into_iter().collect()));
	}

	fn unbound(&self) -> RegistryError {
		RegistryError::UnboundHolder {
			holder: format!("{self:?}"),
		}
	}
}

impl<T: RegistryValue> fmt::Debug for Reference<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.kind {
			ReferenceKind::Standalone => "Standalone",
			ReferenceKind::Intrusive => "Intrusive",
		};
		write!(f, "Reference.{kind}{{")?;
		match self.key.get() {
			Some(key) => write!(f, "{}", key.location())?,
			None => f.write_str("<unbound>")?,
		}
		f.write_str("=")?;
		match &*self.value.load() {
			Some(value) => write!(f, "{value:?}")?,
			None => f.write_str("<unbound>")?,
		}
		f.write_str("}")
	}
}
