//! Registries and their views.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`SimpleRegistry`] | Keyed store of values, holders and tags. |
//! | [`RegistryLookup`] | Read-only [`crate::HolderLookup`] view. |
//! | [`RegistrationLookup`] | Creates holders and tags on demand during loading. |
//! | [`TagSet`] | Value-level view of one tag. |
//! | [`DynRegistry`] | Type-erased handle stored in the registry-of-registries. |
//! | [`RegistryReference`], [`DynamicRegistryReference`] | Deferred single-value lookups. |
//!
//! # Lifecycle
//!
//! 1. **Open:** values are registered, holders created speculatively or
//!    intrusively, tags declared.
//! 2. **Freeze:** [`SimpleRegistry::freeze`] checks that every holder is bound,
//!    that no intrusive holder was left behind and that a defaulted registry has
//!    its default, then rejects all further registration.
//! 3. **Frozen:** reads only, plus tag rebinding through
//!    [`SimpleRegistry::bind_tags`].

mod erased;
mod lookup;
mod reference;
mod simple;
mod tags;

pub use erased::{DynRegistry, ErasedRegistry};
pub use lookup::{HolderIdMap, RegistrationLookup, RegistryLookup, TagAddingLookup};
pub use reference::{DynamicRegistryReference, RegistryReference};
pub use simple::SimpleRegistry;
pub use tags::TagSet;
