//! Holders and holder sets.
//!
//! # Role
//!
//! A [`Holder`] is the stable handle code keeps to a registry value. Registries
//! hand out [`Holder::Reference`]s that may be created before their value is
//! registered (speculative holders during bootstrap, intrusive holders carried
//! by the value itself) and compare by identity. [`Holder::Direct`] wraps a
//! value that was never registered; it is always bound and carries no key or
//! tags.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Holder`] | Direct or reference handle to a value. |
//! | [`Reference`] | Lazily bound registry entry with tag membership. |
//! | [`HolderSet`] | Fixed list ([`DirectHolderSet`]) or tag ([`NamedHolderSet`]). |
//! | [`HolderOwner`] | Identity capability guarding cross-registry use. |
//! | [`HolderGetter`], [`HolderLookup`] | Read views over one registry. |

mod lookup;
mod owner;
mod reference;
mod set;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use lookup::{HolderGetter, HolderLookup};
pub use owner::HolderOwner;
pub use reference::{Reference, ReferenceKind};
pub use set::{DirectHolderSet, HolderSet, NamedHolderSet};
use zero_primitives::{Key, ResourceKey, TagKey};

use crate::value::Identity;
use crate::{RegistryError, RegistryValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HolderKind {
	Direct,
	Reference,
}

/// Handle to a registry value.
pub enum Holder<T> {
	Direct(Arc<T>),
	Reference(Arc<Reference<T>>),
}

impl<T: RegistryValue> Holder<T> {
	pub fn direct(value: impl Into<Arc<T>>) -> Self {
		Self::Direct(value.into())
	}

	pub fn kind(&self) -> HolderKind {
		match self {
			Self::Direct(_) => HolderKind::Direct,
			Self::Reference(_) => HolderKind::Reference,
		}
	}

	pub fn as_reference(&self) -> Option<&Arc<Reference<T>>> {
		match self {
			Self::Direct(_) => None,
			Self::Reference(reference) => Some(reference),
		}
	}

	/// The held value; fails only for unbound references.
	pub fn value(&self) -> Result<Arc<T>, RegistryError> {
		match self {
			Self::Direct(value) => Ok(value.clone()),
			Self::Reference(reference) => reference.value(),
		}
	}

	pub fn try_value(&self) -> Option<Arc<T>> {
		match self {
			Self::Direct(value) => Some(value.clone()),
			Self::Reference(reference) => reference.try_value(),
		}
	}

	pub fn is_bound(&self) -> bool {
		match self {
			Self::Direct(_) => true,
			Self::Reference(reference) => reference.is_bound(),
		}
	}

	pub fn try_key(&self) -> Option<&ResourceKey<T>> {
		self.as_reference().and_then(|reference| reference.try_key())
	}

	/// The key of a reference; direct holders and unbound references fail.
	pub fn unwrap_key(&self) -> Result<&ResourceKey<T>, RegistryError> {
		match self {
			Self::Direct(value) => Err(RegistryError::UnboundHolder {
				holder: format!("Direct{{{value:?}}}"),
			}),
			Self::Reference(reference) => reference.key(),
		}
	}

	/// Tags this holder currently belongs to. Always empty for direct holders.
	pub fn tags(&self) -> Vec<TagKey<T>> {
		self.as_reference()
			.map(|reference| reference.tags())
			.unwrap_or_default()
	}

	pub fn is_location(&self, location: &Key) -> bool {
		self.as_reference()
			.is_some_and(|reference| reference.is_location(location))
	}

	pub fn is_key(&self, key: &ResourceKey<T>) -> bool {
		self.as_reference().is_some_and(|reference| reference.is_key(key))
	}

	pub fn matches(&self, predicate: impl FnOnce(&ResourceKey<T>) -> bool) -> bool {
		self.as_reference()
			.is_some_and(|reference| reference.matches(predicate))
	}

	pub fn is_in(&self, tag: &TagKey<T>) -> bool {
		self.as_reference().is_some_and(|reference| reference.is_in(tag))
	}

	/// Direct holders can be used anywhere; references only with their owner.
	pub fn can_serialize_in(&self, owner: &HolderOwner) -> bool {
		match self {
			Self::Direct(_) => true,
			Self::Reference(reference) => reference.can_serialize_in(owner),
		}
	}

	fn identity(&self) -> (HolderKind, Identity) {
		match self {
			Self::Direct(value) => (HolderKind::Direct, Identity::of(&**value)),
			Self::Reference(reference) => (HolderKind::Reference, Identity::of(&**reference)),
		}
	}
}

impl<T> Clone for Holder<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Direct(value) => Self::Direct(value.clone()),
			Self::Reference(reference) => Self::Reference(reference.clone()),
		}
	}
}

impl<T: RegistryValue> PartialEq for Holder<T> {
	fn eq(&self, other: &Self) -> bool {
		self.identity() == other.identity()
	}
}

impl<T: RegistryValue> Eq for Holder<T> {}

impl<T: RegistryValue> Hash for Holder<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity().hash(state);
	}
}

impl<T: RegistryValue> fmt::Debug for Holder<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Direct(value) => write!(f, "Direct{{{value:?}}}"),
			Self::Reference(reference) => fmt::Debug::fmt(reference, f),
		}
	}
}

impl<T> From<Arc<Reference<T>>> for Holder<T> {
	fn from(reference: Arc<Reference<T>>) -> Self {
		Self::Reference(reference)
	}
}
