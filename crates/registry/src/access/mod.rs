//! Registry-of-registries views.
//!
//! # Role
//!
//! A [`RegistryHolder`] answers "which registry is called `key`" over some
//! collection of registries. Every variant returns `None` on a miss:
//!
//! - [`ImmutableRegistryHolder`]: fixed map built once.
//! - [`CombinedRegistryHolder`]: first delegate that knows the key wins.
//! - [`FilteredRegistryHolder`]: hides registries rejected by a predicate.
//! - [`ParentRegistryHolder`]: live view over a bootstrap parent registry.
//! - [`RegistryAccess`]: immutable map that can freeze what it holds.
//!
//! Typed access goes through [`RegistryHolderExt`], which downcasts the erased
//! [`DynRegistry`] handles.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use zero_primitives::{Key, RegistryKey};

use crate::registry::{DynRegistry, ErasedRegistry, SimpleRegistry};
use crate::{RegistryError, RegistryValue};

type RegistryMap = IndexMap<Key, DynRegistry, FxBuildHasher>;

/// A collection of registries addressable by registry key.
pub trait RegistryHolder: Send + Sync {
	/// Every visible registry.
	fn registries(&self) -> Vec<DynRegistry>;

	/// The registry named `key`, if visible.
	fn get_dyn(&self, key: &Key) -> Option<DynRegistry>;
}

/// Typed lookups over any [`RegistryHolder`].
pub trait RegistryHolderExt: RegistryHolder {
	/// The registry named `key`, if it exists and holds `T` values.
	fn get_registry<T: RegistryValue>(&self, key: &RegistryKey<T>) -> Option<Arc<SimpleRegistry<T>>> {
		self.get_dyn(key.location())?.downcast()
	}

	/// Like [`get_registry`](Self::get_registry), restricted to defaulted registries.
	fn get_defaulted_registry<T: RegistryValue>(
		&self,
		key: &RegistryKey<T>,
	) -> Option<Arc<SimpleRegistry<T>>> {
		self.get_registry(key).filter(|registry| registry.is_defaulted())
	}

	fn registry_or_err<T: RegistryValue>(
		&self,
		key: &RegistryKey<T>,
	) -> Result<Arc<SimpleRegistry<T>>, RegistryError> {
		self.get_dyn(key.location())
			.ok_or_else(|| RegistryError::MissingRegistry {
				key: key.location().clone(),
			})?
			.downcast_or_err()
	}
}

impl<H: RegistryHolder + ?Sized> RegistryHolderExt for H {}

impl<H: RegistryHolder + ?Sized> RegistryHolder for Arc<H> {
	fn registries(&self) -> Vec<DynRegistry> {
		(**self).registries()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		(**self).get_dyn(key)
	}
}

fn collect(registries: impl IntoIterator<Item = DynRegistry>) -> RegistryMap {
	registries
		.into_iter()
		.map(|registry| (registry.location().clone(), registry))
		.collect()
}

/// Fixed set of registries.
#[derive(Clone, Default)]
pub struct ImmutableRegistryHolder {
	entries: RegistryMap,
}

impl ImmutableRegistryHolder {
	pub fn new(registries: impl IntoIterator<Item = DynRegistry>) -> Self {
		Self {
			entries: collect(registries),
		}
	}
}

impl RegistryHolder for ImmutableRegistryHolder {
	fn registries(&self) -> Vec<DynRegistry> {
		self.entries.values().cloned().collect()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		self.entries.get(key).cloned()
	}
}

impl fmt::Debug for ImmutableRegistryHolder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.entries.keys()).finish()
	}
}

/// Ordered delegates; the first one that knows a key answers.
#[derive(Clone, Default)]
pub struct CombinedRegistryHolder {
	delegates: Vec<Arc<dyn RegistryHolder>>,
}

impl CombinedRegistryHolder {
	pub fn new(delegates: impl IntoIterator<Item = Arc<dyn RegistryHolder>>) -> Self {
		Self {
			delegates: delegates.into_iter().collect(),
		}
	}
}

impl RegistryHolder for CombinedRegistryHolder {
	/// Registries of every delegate, in delegate order. A key shadowed by an
	/// earlier delegate is listed once per delegate that holds it.
	fn registries(&self) -> Vec<DynRegistry> {
		self.delegates
			.iter()
			.flat_map(|delegate| delegate.registries())
			.collect()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		self.delegates.iter().find_map(|delegate| delegate.get_dyn(key))
	}
}

/// Hides every registry whose key fails `filter`.
pub struct FilteredRegistryHolder<H, F> {
	backing: H,
	filter: F,
}

impl<H, F> FilteredRegistryHolder<H, F>
where
	H: RegistryHolder,
	F: Fn(&Key) -> bool + Send + Sync,
{
	pub fn new(backing: H, filter: F) -> Self {
		Self { backing, filter }
	}
}

impl<H, F> RegistryHolder for FilteredRegistryHolder<H, F>
where
	H: RegistryHolder,
	F: Fn(&Key) -> bool + Send + Sync,
{
	fn registries(&self) -> Vec<DynRegistry> {
		self.backing
			.registries()
			.into_iter()
			.filter(|registry| (self.filter)(registry.location()))
			.collect()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		if !(self.filter)(key) {
			return None;
		}
		self.backing.get_dyn(key)
	}
}

/// Live view over a registry-of-registries.
#[derive(Clone, Debug)]
pub struct ParentRegistryHolder {
	parent: Arc<SimpleRegistry<DynRegistry>>,
}

impl ParentRegistryHolder {
	pub fn new(parent: Arc<SimpleRegistry<DynRegistry>>) -> Self {
		Self { parent }
	}
}

impl RegistryHolder for ParentRegistryHolder {
	fn registries(&self) -> Vec<DynRegistry> {
		self.parent
			.iter()
			.map(|registry| DynRegistry::clone(&registry))
			.collect()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		self.parent.get(key).map(|registry| DynRegistry::clone(&registry))
	}
}

/// Immutable map of registries.
///
/// A frozen access is produced by [`RegistryAccess::freeze`], which freezes
/// every registry it holds first.
#[derive(Clone, Default)]
pub struct RegistryAccess {
	registries: RegistryMap,
	frozen: bool,
}

impl RegistryAccess {
	pub fn new(registries: impl IntoIterator<Item = DynRegistry>) -> Self {
		Self {
			registries: collect(registries),
			frozen: false,
		}
	}

	/// A frozen access with no registries.
	pub fn empty() -> Self {
		Self {
			registries: RegistryMap::default(),
			frozen: true,
		}
	}

	/// Snapshot of the registries held by `parent`, treated as frozen.
	pub fn from_registry_of_registries(parent: &SimpleRegistry<DynRegistry>) -> Self {
		Self {
			registries: collect(parent.iter().map(|registry| DynRegistry::clone(&registry))),
			frozen: true,
		}
	}

	/// Freezes every registry and returns the frozen access.
	pub fn freeze(self) -> Result<Self, RegistryError> {
		if self.frozen {
			return Ok(self);
		}
		for registry in self.registries.values() {
			ErasedRegistry::freeze(&**registry)?;
		}
		Ok(Self {
			frozen: true,
			..self
		})
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen
	}

	pub fn len(&self) -> usize {
		self.registries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registries.is_empty()
	}
}

impl RegistryHolder for RegistryAccess {
	fn registries(&self) -> Vec<DynRegistry> {
		self.registries.values().cloned().collect()
	}

	fn get_dyn(&self, key: &Key) -> Option<DynRegistry> {
		self.registries.get(key).cloned()
	}
}

impl fmt::Debug for RegistryAccess {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryAccess")
			.field("registries", &self.registries.keys().collect::<Vec<_>>())
			.field("frozen", &self.frozen)
			.finish()
	}
}
