use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use zero_primitives::Key;

use super::simple::SimpleRegistry;
use crate::warning::RegistryWarning;
use crate::{RegistryError, RegistryValue};

/// Type-erased registry operations used by the registry-of-registries.
pub trait ErasedRegistry: Send + Sync + 'static {
	fn location(&self) -> &Key;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn is_frozen(&self) -> bool;

	fn freeze(&self) -> Result<(), RegistryError>;

	fn default_key(&self) -> Option<&Key>;

	/// True if the default key of a defaulted registry has a registered value.
	fn has_default_value(&self) -> bool;

	/// Name of the value type, for diagnostics.
	fn value_type_name(&self) -> &'static str;

	fn warnings(&self) -> Vec<RegistryWarning>;

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: RegistryValue> ErasedRegistry for SimpleRegistry<T> {
	fn location(&self) -> &Key {
		SimpleRegistry::location(self)
	}

	fn len(&self) -> usize {
		SimpleRegistry::len(self)
	}

	fn is_frozen(&self) -> bool {
		SimpleRegistry::is_frozen(self)
	}

	fn freeze(&self) -> Result<(), RegistryError> {
		SimpleRegistry::freeze(self).map(|_| ())
	}

	fn default_key(&self) -> Option<&Key> {
		SimpleRegistry::default_key(self)
	}

	fn has_default_value(&self) -> bool {
		SimpleRegistry::default_key(self).is_some_and(|key| self.contains_location(key))
	}

	fn value_type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn warnings(&self) -> Vec<RegistryWarning> {
		SimpleRegistry::warnings(self)
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// Shared handle to a registry of any value type.
#[derive(Clone)]
pub struct DynRegistry(Arc<dyn ErasedRegistry>);

impl DynRegistry {
	pub fn new<T: RegistryValue>(registry: Arc<SimpleRegistry<T>>) -> Self {
		Self(registry)
	}

	/// The typed registry, if it holds values of type `T`.
	pub fn downcast<T: RegistryValue>(&self) -> Option<Arc<SimpleRegistry<T>>> {
		self.0.clone().into_any().downcast::<SimpleRegistry<T>>().ok()
	}

	pub fn downcast_or_err<T: RegistryValue>(&self) -> Result<Arc<SimpleRegistry<T>>, RegistryError> {
		self.downcast().ok_or_else(|| RegistryError::Type {
			key: self.0.location().clone(),
			type_name: std::any::type_name::<T>(),
		})
	}
}

impl Deref for DynRegistry {
	type Target = dyn ErasedRegistry;

	fn deref(&self) -> &Self::Target {
		&*self.0
	}
}

impl<T: RegistryValue> From<Arc<SimpleRegistry<T>>> for DynRegistry {
	fn from(registry: Arc<SimpleRegistry<T>>) -> Self {
		Self::new(registry)
	}
}

impl fmt::Debug for DynRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "DynRegistry({}: {})", self.0.location(), self.0.value_type_name())
	}
}
