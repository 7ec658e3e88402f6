//! Typed registries for Zero.
//!
//! A registry maps namespaced keys, dense integer ids and values onto stable
//! [`Holder`] proxies. Holders may be handed out before their value exists,
//! carry tag membership, and survive until the registry is dropped. Registries
//! are written during a single-threaded bootstrap, frozen once, and read
//! concurrently afterwards.
//!
//! # Layout
//!
//! - [`holder`] - holders, holder sets, owners and lookup traits
//! - [`registry`] - [`SimpleRegistry`] and its views
//! - [`access`] - registry-of-registries views ([`RegistryHolder`])
//! - [`bootstrap`] - two-phase population of a set of registries
//! - [`factory`] - explicit service locator keyed by type
//! - [`settings`] - severity of non-fatal diagnostics

pub mod access;
pub mod bootstrap;
mod error;
pub mod factory;
pub mod holder;
pub mod registry;
pub mod settings;
mod value;
mod warning;

pub use access::{
	CombinedRegistryHolder, FilteredRegistryHolder, ImmutableRegistryHolder, ParentRegistryHolder,
	RegistryAccess, RegistryHolder, RegistryHolderExt,
};
pub use bootstrap::{BootstrapError, BootstrapKind, RegistryBootstrap, RegistryLoader};
pub use error::RegistryError;
pub use factory::{FactoryError, FactoryProvider};
pub use holder::{
	DirectHolderSet, Holder, HolderGetter, HolderKind, HolderLookup, HolderOwner, HolderSet,
	NamedHolderSet, Reference, ReferenceKind,
};
pub use registry::{
	DynRegistry, DynamicRegistryReference, ErasedRegistry, HolderIdMap, RegistrationLookup,
	RegistryLookup, RegistryReference, SimpleRegistry, TagAddingLookup, TagSet,
};
pub use settings::{RegistrySettings, SettingsError, Severity};
pub use value::RegistryValue;
pub use warning::{RegistryWarning, WarningKind};
pub use zero_primitives::{IntBiMap, Key, KeyError, RegistryKey, RegistryRoots, ResourceKey, TagKey};
