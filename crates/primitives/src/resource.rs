//! Typed resource identifiers.
//!
//! # Role
//!
//! [`ResourceKey`] names one value inside one registry, [`RegistryKey`] names a
//! registry, and [`TagKey`] names a group of values inside a registry. The type
//! parameter only ties a key to the value type of its registry; equality and
//! hashing look at the key components alone.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::key::Key;

/// Well-known registry roots.
pub struct RegistryRoots;

impl RegistryRoots {
	/// Root under which every Zero registry is registered.
	pub const ZERO: Key = Key::from_static("zero", "root");
}

/// Implements equality, hashing and ordering over `parts()` without bounds on `T`.
macro_rules! key_traits {
	($ty:ident) => {
		impl<T> PartialEq for $ty<T> {
			fn eq(&self, other: &Self) -> bool {
				self.parts() == other.parts()
			}
		}

		impl<T> Eq for $ty<T> {}

		impl<T> Hash for $ty<T> {
			fn hash<H: Hasher>(&self, state: &mut H) {
				self.parts().hash(state);
			}
		}

		impl<T> PartialOrd for $ty<T> {
			fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
				Some(self.cmp(other))
			}
		}

		impl<T> Ord for $ty<T> {
			fn cmp(&self, other: &Self) -> Ordering {
				self.parts().cmp(&other.parts())
			}
		}
	};
}

/// Identity of a value inside a registry: `(registry, location)`.
pub struct ResourceKey<T> {
	registry: Key,
	location: Key,
	_marker: PhantomData<fn() -> T>,
}

impl<T> ResourceKey<T> {
	pub const fn new(registry: Key, location: Key) -> Self {
		Self {
			registry,
			location,
			_marker: PhantomData,
		}
	}

	/// Key for `location` inside the registry named by `registry`.
	pub fn of(registry: &RegistryKey<T>, location: Key) -> Self {
		Self::new(registry.location().clone(), location)
	}

	pub fn registry(&self) -> &Key {
		&self.registry
	}

	pub fn location(&self) -> &Key {
		&self.location
	}

	/// Returns true if this key points into `registry`.
	pub fn is_for(&self, registry: &RegistryKey<T>) -> bool {
		self.registry == *registry.location()
	}

	/// Reinterprets the key for another value type with the same components.
	pub fn cast<U>(&self) -> ResourceKey<U> {
		ResourceKey::new(self.registry.clone(), self.location.clone())
	}

	fn parts(&self) -> (&Key, &Key) {
		(&self.registry, &self.location)
	}
}

impl<T> Clone for ResourceKey<T> {
	fn clone(&self) -> Self {
		Self::new(self.registry.clone(), self.location.clone())
	}
}

key_traits!(ResourceKey);

impl<T> fmt::Debug for ResourceKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ResourceKey[{} / {}]", self.registry, self.location)
	}
}

impl<T> fmt::Display for ResourceKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

/// Name of a registry holding values of type `T`.
pub struct RegistryKey<T> {
	location: Key,
	_marker: PhantomData<fn() -> T>,
}

impl<T> RegistryKey<T> {
	pub const fn new(location: Key) -> Self {
		Self {
			location,
			_marker: PhantomData,
		}
	}

	pub fn location(&self) -> &Key {
		&self.location
	}

	/// Key under which this registry is itself registered in the root registry.
	pub fn resource_key<U>(&self) -> ResourceKey<U> {
		ResourceKey::new(RegistryRoots::ZERO, self.location.clone())
	}

	/// Key of the value at `location` in this registry.
	pub fn entry(&self, location: Key) -> ResourceKey<T> {
		ResourceKey::of(self, location)
	}

	/// Key of the tag at `location` in this registry.
	pub fn tag(&self, location: Key) -> TagKey<T> {
		TagKey::new(self.clone(), location)
	}

	fn parts(&self) -> &Key {
		&self.location
	}
}

impl<T> Clone for RegistryKey<T> {
	fn clone(&self) -> Self {
		Self::new(self.location.clone())
	}
}

key_traits!(RegistryKey);

impl<T> fmt::Debug for RegistryKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RegistryKey[{}]", self.location)
	}
}

impl<T> fmt::Display for RegistryKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.location, f)
	}
}

/// Name of a group of values inside a registry.
pub struct TagKey<T> {
	registry: RegistryKey<T>,
	location: Key,
}

impl<T> TagKey<T> {
	pub const fn new(registry: RegistryKey<T>, location: Key) -> Self {
		Self { registry, location }
	}

	pub fn registry(&self) -> &RegistryKey<T> {
		&self.registry
	}

	pub fn location(&self) -> &Key {
		&self.location
	}

	fn parts(&self) -> (&Key, &Key) {
		(&self.registry.location, &self.location)
	}
}

impl<T> Clone for TagKey<T> {
	fn clone(&self) -> Self {
		Self::new(self.registry.clone(), self.location.clone())
	}
}

key_traits!(TagKey);

impl<T> fmt::Debug for TagKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TagKey[{} / {}]", self.registry.location(), self.location)
	}
}

impl<T> fmt::Display for TagKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.location)
	}
}

#[cfg(test)]
mod tests;
