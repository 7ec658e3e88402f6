//! Two-phase registry bootstrap.
//!
//! # Mental Model
//!
//! 1. **Declare:** every registry is created, registered into the parent
//!    registry-of-registries, and gets an ordered loader.
//! 2. **Freeze parent:** the set of registries is fixed before any content loads.
//! 3. **Load:** loaders run in declaration order; each registry is frozen right
//!    after its own loader. A loader may take holders from a registry declared
//!    later through its [`RegistrationLookup`](crate::RegistrationLookup); they
//!    bind when that registry loads.
//! 4. **Validate:** every registry is frozen again (a no-op), empty registries
//!    are reported, and a defaulted registry without its default fails.
//!
//! Any failure aborts the whole bootstrap.
//!
//! [`BootstrapKind::Builtin`] accepts every registry flavour.
//! [`BootstrapKind::Dynamic`] registries are populated from data and only
//! support plain [`SimpleRegistry::standard`] registries.

mod loader;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
pub use loader::RegistryLoader;
use rustc_hash::FxBuildHasher;
use zero_primitives::{Key, RegistryKey, RegistryRoots, ResourceKey};

use crate::access::{ParentRegistryHolder, RegistryAccess, RegistryHolderExt};
use crate::registry::{DynRegistry, SimpleRegistry};
use crate::settings::{RegistrySettings, Severity};
use crate::warning::{RegistryWarning, WarningKind};
use crate::{RegistryError, RegistryValue};

/// Key of the registry-of-registries.
pub const PARENT: RegistryKey<DynRegistry> = RegistryKey::new(RegistryRoots::ZERO);

/// Errors that abort a bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
	#[error("failed to bootstrap registry {registry}: {source}")]
	Loader {
		registry: Key,
		#[source]
		source: RegistryError,
	},

	#[error("failed to freeze registry {registry}: {source}")]
	Freeze {
		registry: Key,
		#[source]
		source: RegistryError,
	},

	#[error("registry {registry} failed validation: {source}")]
	Validation {
		registry: Key,
		#[source]
		source: RegistryError,
	},

	#[error("cannot declare registry {registry}: {source}")]
	Declaration {
		registry: Key,
		#[source]
		source: RegistryError,
	},

	#[error("registries were already bootstrapped")]
	AlreadyBootstrapped,

	#[error("registry {registry} is already declared")]
	DuplicateLoader { registry: Key },

	#[error("{kind:?} bootstrap does not support {flavour} registry {registry}")]
	Unsupported {
		kind: BootstrapKind,
		flavour: &'static str,
		registry: Key,
	},

	#[error("registry {registry} was empty after loading")]
	EmptyRegistry { registry: Key },
}

/// Which set of registries a [`RegistryBootstrap`] populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapKind {
	/// Built-in registries, filled from code.
	Builtin,
	/// Data-driven registries.
	Dynamic,
}

type Loader = Box<dyn FnOnce() -> Result<(), RegistryError> + Send>;

/// Owns the parent registry and the ordered loaders of one set of registries.
pub struct RegistryBootstrap {
	kind: BootstrapKind,
	parent: Arc<SimpleRegistry<DynRegistry>>,
	loaders: IndexMap<Key, Loader, FxBuildHasher>,
	settings: RegistrySettings,
	warnings: Vec<RegistryWarning>,
	bootstrapped: bool,
}

impl RegistryBootstrap {
	pub fn new(kind: BootstrapKind) -> Self {
		Self {
			kind,
			parent: Arc::new(SimpleRegistry::standard(PARENT)),
			loaders: IndexMap::default(),
			settings: RegistrySettings::default(),
			warnings: Vec::new(),
			bootstrapped: false,
		}
	}

	pub fn builtin() -> Self {
		Self::new(BootstrapKind::Builtin)
	}

	pub fn dynamic() -> Self {
		Self::new(BootstrapKind::Dynamic)
	}

	/// Settings applied to every registry declared afterwards and to validation.
	pub fn with_settings(mut self, settings: RegistrySettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn kind(&self) -> BootstrapKind {
		self.kind
	}

	pub fn is_bootstrapped(&self) -> bool {
		self.bootstrapped
	}

	pub fn parent(&self) -> &Arc<SimpleRegistry<DynRegistry>> {
		&self.parent
	}

	/// Live [`RegistryHolder`](crate::RegistryHolder) over the declared registries.
	pub fn holder(&self) -> ParentRegistryHolder {
		ParentRegistryHolder::new(self.parent.clone())
	}

	/// Snapshot of the declared registries.
	pub fn access(&self) -> RegistryAccess {
		RegistryAccess::from_registry_of_registries(&self.parent)
	}

	pub fn get_registry<T: RegistryValue>(&self, key: &RegistryKey<T>) -> Option<Arc<SimpleRegistry<T>>> {
		self.holder().get_registry(key)
	}

	/// Warnings collected by the last [`bootstrap`](Self::bootstrap).
	pub fn warnings(&self) -> &[RegistryWarning] {
		&self.warnings
	}

	/// Declares a plain registry.
	pub fn simple<T, F>(
		&mut self,
		key: RegistryKey<T>,
		loader: F,
	) -> Result<Arc<SimpleRegistry<T>>, BootstrapError>
	where
		T: RegistryValue,
		F: FnOnce(&SimpleRegistry<T>) -> Result<(), RegistryError> + Send + 'static,
	{
		self.declare(SimpleRegistry::standard(key), loader)
	}

	/// Declares a registry that falls back to the value at `default_key`.
	pub fn defaulted<T, F>(
		&mut self,
		key: RegistryKey<T>,
		default_key: Key,
		loader: F,
	) -> Result<Arc<SimpleRegistry<T>>, BootstrapError>
	where
		T: RegistryValue,
		F: FnOnce(&SimpleRegistry<T>) -> Result<(), RegistryError> + Send + 'static,
	{
		self.ensure_builtin("defaulted", key.location())?;
		self.declare(SimpleRegistry::defaulted(key, default_key), loader)
	}

	pub fn defaulted_intrusive<T, F>(
		&mut self,
		key: RegistryKey<T>,
		default_key: Key,
		loader: F,
	) -> Result<Arc<SimpleRegistry<T>>, BootstrapError>
	where
		T: RegistryValue,
		F: FnOnce(&SimpleRegistry<T>) -> Result<(), RegistryError> + Send + 'static,
	{
		self.ensure_builtin("defaulted intrusive", key.location())?;
		self.declare(SimpleRegistry::defaulted_intrusive(key, default_key), loader)
	}

	pub fn intrusive<T, F>(
		&mut self,
		key: RegistryKey<T>,
		loader: F,
	) -> Result<Arc<SimpleRegistry<T>>, BootstrapError>
	where
		T: RegistryValue,
		F: FnOnce(&SimpleRegistry<T>) -> Result<(), RegistryError> + Send + 'static,
	{
		self.ensure_builtin("intrusive", key.location())?;
		self.declare(SimpleRegistry::intrusive(key), loader)
	}

	/// Registers `value` at `location`, returning the shared value.
	pub fn register<T: RegistryValue>(
		registry: &SimpleRegistry<T>,
		location: Key,
		value: impl Into<Arc<T>>,
	) -> Result<Arc<T>, RegistryError> {
		Self::register_key(registry, registry.key().entry(location), value)
	}

	pub fn register_key<T: RegistryValue>(
		registry: &SimpleRegistry<T>,
		key: ResourceKey<T>,
		value: impl Into<Arc<T>>,
	) -> Result<Arc<T>, RegistryError> {
		let value = value.into();
		registry.register(key, value.clone())?;
		Ok(value)
	}

	fn ensure_builtin(&self, flavour: &'static str, registry: &Key) -> Result<(), BootstrapError> {
		if self.kind != BootstrapKind::Builtin {
			return Err(BootstrapError::Unsupported {
				kind: self.kind,
				flavour,
				registry: registry.clone(),
			});
		}
		Ok(())
	}

	fn declare<T, F>(
		&mut self,
		registry: SimpleRegistry<T>,
		loader: F,
	) -> Result<Arc<SimpleRegistry<T>>, BootstrapError>
	where
		T: RegistryValue,
		F: FnOnce(&SimpleRegistry<T>) -> Result<(), RegistryError> + Send + 'static,
	{
		if self.bootstrapped {
			return Err(BootstrapError::AlreadyBootstrapped);
		}
		let location = registry.location().clone();
		if self.loaders.contains_key(&location) {
			return Err(BootstrapError::DuplicateLoader { registry: location });
		}

		let registry = Arc::new(registry.with_settings(self.settings));
		self.parent
			.register(
				PARENT.entry(location.clone()),
				DynRegistry::new(registry.clone()),
			)
			.map_err(|source| BootstrapError::Declaration {
				registry: location.clone(),
				source,
			})?;

		let target = registry.clone();
		self.loaders
			.insert(location, Box::new(move || loader(&target)));
		Ok(registry)
	}

	/// Runs the whole protocol once. Returns every warning recorded by the
	/// declared registries and by validation.
	pub fn bootstrap(&mut self) -> Result<Vec<RegistryWarning>, BootstrapError> {
		if self.bootstrapped {
			return Err(BootstrapError::AlreadyBootstrapped);
		}
		self.bootstrapped = true;

		self.parent
			.freeze()
			.map_err(|source| BootstrapError::Freeze {
				registry: PARENT.location().clone(),
				source,
			})?;
		tracing::debug!(kind = ?self.kind, registries = self.parent.len(), "registry parent frozen");

		self.run_loaders()?;

		for registry in self.parent.iter() {
			registry
				.freeze()
				.map_err(|source| BootstrapError::Freeze {
					registry: registry.location().clone(),
					source,
				})?;
		}

		let warnings = validate_all(&self.parent, &self.settings)?;
		tracing::debug!(kind = ?self.kind, warnings = warnings.len(), "registries bootstrapped");
		self.warnings = warnings.clone();
		Ok(warnings)
	}

	fn run_loaders(&mut self) -> Result<(), BootstrapError> {
		for (location, loader) in std::mem::take(&mut self.loaders) {
			tracing::debug!(registry = %location, "running registry loader");
			loader().map_err(|source| BootstrapError::Loader {
				registry: location.clone(),
				source,
			})?;

			let registry = self
				.parent
				.get(&location)
				.ok_or_else(|| BootstrapError::Loader {
					registry: location.clone(),
					source: RegistryError::MissingRegistry {
						key: location.clone(),
					},
				})?;
			registry
				.freeze()
				.map_err(|source| BootstrapError::Freeze {
					registry: location.clone(),
					source,
				})?;
			tracing::debug!(registry = %location, len = registry.len(), "registry loaded");
		}
		Ok(())
	}
}

/// Checks every registry held by `parent`.
///
/// Empty registries are reported as [`WarningKind::EmptyRegistry`] (or fail
/// under [`Severity::Deny`]); a defaulted registry without its default value
/// fails. Returns the warnings recorded by each registry followed by the
/// empty-registry warnings.
pub fn validate_all(
	parent: &SimpleRegistry<DynRegistry>,
	settings: &RegistrySettings,
) -> Result<Vec<RegistryWarning>, BootstrapError> {
	let mut warnings: Vec<RegistryWarning> = parent
		.iter()
		.flat_map(|registry| registry.warnings())
		.collect();

	for registry in parent.iter() {
		let location = registry.location().clone();
		if registry.is_empty() {
			if settings.empty_registry == Severity::Deny {
				return Err(BootstrapError::EmptyRegistry { registry: location });
			}
			let warning = RegistryWarning::new(location.clone(), WarningKind::EmptyRegistry);
			warning.log();
			warnings.push(warning);
		}
		if let Some(default_key) = registry.default_key()
			&& !registry.has_default_value()
		{
			return Err(BootstrapError::Validation {
				source: RegistryError::MissingDefault {
					registry: location.clone(),
					key: default_key.clone(),
				},
				registry: location,
			});
		}
	}
	Ok(warnings)
}

impl fmt::Debug for RegistryBootstrap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryBootstrap")
			.field("kind", &self.kind)
			.field("registries", &self.parent.keys())
			.field("pending_loaders", &self.loaders.len())
			.field("bootstrapped", &self.bootstrapped)
			.finish()
	}
}

#[cfg(test)]
mod tests;
