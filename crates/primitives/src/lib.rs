//! Identifier types shared by every Zero registry: namespaced [`Key`]s, typed
//! [`ResourceKey`]s, registry and tag keys, and the [`IntBiMap`] id contract.

/// Bidirectional integer id mapping.
pub mod id_map;
/// Namespaced identifiers.
pub mod key;
/// Typed resource, registry and tag keys.
pub mod resource;

pub use id_map::IntBiMap;
pub use key::{DEFAULT_NAMESPACE, Key, KeyError};
pub use resource::{RegistryKey, RegistryRoots, ResourceKey, TagKey};
