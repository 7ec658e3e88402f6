//! The keyed registry store.
//!
//! # Invariants
//!
//! - Every registered value has exactly one id, one [`ResourceKey`] and one
//!   [`Reference`] holder. Values are compared by identity.
//! - Ids are dense from 0 when assigned automatically; explicit ids may leave
//!   holes, which read as absent.
//! - Once frozen, every mutation except [`SimpleRegistry::get_or_create_tag`]
//!   fails with [`RegistryError::Frozen`].
//! - A defaulted registry answers key, id and value misses with its default.
//!
//! Writers are serialized by an internal lock. The frozen flag, the tag map and
//! the ordered holder cache are published atomically so readers never observe a
//! half-applied write.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxBuildHasher, FxHashMap};
use zero_primitives::{IntBiMap, Key, RegistryKey, ResourceKey, TagKey};

use super::lookup::{HolderIdMap, RegistrationLookup, RegistryLookup, TagAddingLookup};
use crate::holder::{Holder, HolderOwner, NamedHolderSet, Reference};
use crate::settings::{RegistrySettings, Severity};
use crate::value::Identity;
use crate::warning::{RegistryWarning, WarningKind};
use crate::{RegistryError, RegistryValue};

pub(super) type TagMap<T> = IndexMap<TagKey<T>, Arc<NamedHolderSet<T>>, FxBuildHasher>;

pub(super) struct State<T> {
	pub(super) by_id: Vec<Option<Arc<Reference<T>>>>,
	pub(super) to_id: FxHashMap<Identity, u32>,
	/// Slot of each registered holder, keyed by the holder's own address.
	pub(super) holder_ids: FxHashMap<Identity, u32>,
	/// Every holder, including speculative ones that have no value yet.
	pub(super) by_key: FxHashMap<Key, Arc<Reference<T>>>,
	/// Registered holders in registration order.
	pub(super) by_location: IndexMap<Key, Arc<Reference<T>>, FxBuildHasher>,
	pub(super) by_value: FxHashMap<Identity, Arc<Reference<T>>>,
	/// Unregistered intrusive holders; `None` unless intrusive and open.
	pub(super) intrusive: Option<FxHashMap<Identity, Arc<Reference<T>>>>,
	pub(super) default: Option<Arc<Reference<T>>>,
	pub(super) next_id: u32,
}

impl<T: RegistryValue> State<T> {
	fn new(intrusive: bool) -> Self {
		Self {
			by_id: Vec::new(),
			to_id: FxHashMap::default(),
			holder_ids: FxHashMap::default(),
			by_key: FxHashMap::default(),
			by_location: IndexMap::default(),
			by_value: FxHashMap::default(),
			intrusive: intrusive.then(FxHashMap::default),
			default: None,
			next_id: 0,
		}
	}

	fn slot(&self, id: u32) -> Option<&Arc<Reference<T>>> {
		self.by_id.get(id as usize).and_then(Option::as_ref)
	}

	fn default_value(&self) -> Option<Arc<T>> {
		self.default.as_ref().and_then(|reference| reference.try_value())
	}

	fn default_id(&self) -> Option<u32> {
		let value = self.default_value()?;
		self.to_id.get(&Identity::of(&*value)).copied()
	}

	/// Drops the id and value mappings of `identity` if they still point at
	/// `reference`.
	fn detach(&mut self, identity: Identity, reference: &Arc<Reference<T>>) {
		if self
			.by_value
			.get(&identity)
			.is_some_and(|current| Arc::ptr_eq(current, reference))
		{
			self.by_value.remove(&identity);
		}
		if let Some(id) = self.holder_ids.get(&Identity::of(&**reference))
			&& self.to_id.get(&identity) == Some(id)
		{
			self.to_id.remove(&identity);
		}
	}

	/// Frees the id slot held by `reference`.
	fn vacate(&mut self, reference: &Arc<Reference<T>>) {
		if let Some(id) = self.holder_ids.remove(&Identity::of(&**reference))
			&& self.slot(id).is_some_and(|current| Arc::ptr_eq(current, reference))
		{
			self.by_id[id as usize] = None;
		}
	}

	/// Removes a holder replaced at its location by a different holder.
	fn unlink(&mut self, reference: &Arc<Reference<T>>) {
		if let Some(value) = reference.try_value() {
			self.detach(Identity::of(&*value), reference);
		}
		self.vacate(reference);
	}
}

/// Registry of values of type `T`, optionally intrusive and/or defaulted.
pub struct SimpleRegistry<T: RegistryValue> {
	pub(super) key: RegistryKey<T>,
	pub(super) owner: HolderOwner,
	pub(super) intrusive: bool,
	pub(super) default_key: Option<Key>,
	pub(super) settings: RegistrySettings,
	pub(super) frozen: AtomicBool,
	pub(super) state: RwLock<State<T>>,
	pub(super) tags: ArcSwap<TagMap<T>>,
	in_order: ArcSwapOption<Vec<Holder<T>>>,
	warnings: Mutex<Vec<RegistryWarning>>,
}

impl<T: RegistryValue> SimpleRegistry<T> {
	pub fn standard(key: RegistryKey<T>) -> Self {
		Self::build(key, None, false)
	}

	/// A registry whose values create their holders before registration.
	pub fn intrusive(key: RegistryKey<T>) -> Self {
		Self::build(key, None, true)
	}

	/// A registry that falls back to the value registered under `default_key`.
	pub fn defaulted(key: RegistryKey<T>, default_key: Key) -> Self {
		Self::build(key, Some(default_key), false)
	}

	pub fn defaulted_intrusive(key: RegistryKey<T>, default_key: Key) -> Self {
		Self::build(key, Some(default_key), true)
	}

	pub fn with_settings(mut self, settings: RegistrySettings) -> Self {
		self.settings = settings;
		self
	}

	fn build(key: RegistryKey<T>, default_key: Option<Key>, intrusive: bool) -> Self {
		Self {
			owner: HolderOwner::new(key.location().clone()),
			key,
			intrusive,
			default_key,
			settings: RegistrySettings::default(),
			frozen: AtomicBool::new(false),
			state: RwLock::new(State::new(intrusive)),
			tags: ArcSwap::from_pointee(TagMap::default()),
			in_order: ArcSwapOption::empty(),
			warnings: Mutex::new(Vec::new()),
		}
	}

	pub fn key(&self) -> &RegistryKey<T> {
		&self.key
	}

	pub fn location(&self) -> &Key {
		self.key.location()
	}

	pub fn owner(&self) -> &HolderOwner {
		&self.owner
	}

	pub fn settings(&self) -> &RegistrySettings {
		&self.settings
	}

	pub fn default_key(&self) -> Option<&Key> {
		self.default_key.as_ref()
	}

	pub fn is_defaulted(&self) -> bool {
		self.default_key.is_some()
	}

	pub fn is_intrusive(&self) -> bool {
		self.intrusive
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen.load(Ordering::Acquire)
	}

	/// Warnings recorded so far, oldest first.
	pub fn warnings(&self) -> Vec<RegistryWarning> {
		self.warnings.lock().clone()
	}

	/// Registers `value` under `key` with the next free id.
	pub fn register(
		&self,
		key: ResourceKey<T>,
		value: impl Into<Arc<T>>,
	) -> Result<Holder<T>, RegistryError> {
		self.register_inner(None, key, value.into())
	}

	/// Registers `value` under `key` with an explicit id.
	pub fn register_with_id(
		&self,
		id: u32,
		key: ResourceKey<T>,
		value: impl Into<Arc<T>>,
	) -> Result<Holder<T>, RegistryError> {
		self.register_inner(Some(id), key, value.into())
	}

	/// Registers `value` at `location` inside this registry.
	pub fn register_location(
		&self,
		location: Key,
		value: impl Into<Arc<T>>,
	) -> Result<Holder<T>, RegistryError> {
		self.register(self.key.entry(location), value)
	}

	fn register_inner(
		&self,
		id: Option<u32>,
		key: ResourceKey<T>,
		value: Arc<T>,
	) -> Result<Holder<T>, RegistryError> {
		self.ensure_own(&key)?;
		let mut guard = self.state.write();
		self.ensure_open(Some(&key))?;
		let state = &mut *guard;

		let id = id.unwrap_or(state.next_id);
		let location = key.location().clone();
		let identity = Identity::of(&*value);

		if let Some(occupant) = state.slot(id)
			&& !occupant.is_location(&location)
		{
			return Err(RegistryError::DuplicateId {
				registry: self.location().clone(),
				id,
				key: occupant.key()?.location().clone(),
			});
		}
		if state.by_location.contains_key(&location) {
			self.report(WarningKind::DuplicateKey {
				key: location.clone(),
			})?;
		}
		if state.by_value.contains_key(&identity) {
			self.report(WarningKind::DuplicateValue {
				key: location.clone(),
				value: format!("{value:?}"),
			})?;
		}

		let reference = match state.intrusive.as_mut() {
			Some(pool) => {
				let reference = pool.get(&identity).cloned().ok_or_else(|| {
					RegistryError::MissingIntrusiveHolder {
						registry: self.location().clone(),
						key: location.clone(),
						value: format!("{value:?}"),
					}
				})?;
				reference.bind_key(key)?;
				pool.remove(&identity);
				reference
			}
			None => {
				let reference = state
					.by_key
					.entry(location.clone())
					.or_insert_with(|| Arc::new(Reference::standalone(self.owner.clone(), key)))
					.clone();
				if let Some(previous) = reference.bind_value(value.clone())? {
					let previous = Identity::of(&*previous);
					if previous != identity {
						state.detach(previous, &reference);
					}
				}
				reference
			}
		};
		if let Some(replaced) = state.by_location.get(&location).cloned()
			&& !Arc::ptr_eq(&replaced, &reference)
		{
			state.unlink(&replaced);
		}
		state.detach(identity, &reference);
		state.vacate(&reference);

		state.by_key.insert(location.clone(), reference.clone());
		state.by_location.insert(location.clone(), reference.clone());
		state.by_value.insert(identity, reference.clone());
		let slot = id as usize;
		if state.by_id.len() <= slot {
			state.by_id.resize_with(slot + 1, || None);
		}
		state.by_id[slot] = Some(reference.clone());
		state.to_id.insert(identity, id);
		state.holder_ids.insert(Identity::of(&*reference), id);
		state.next_id = state.next_id.max(id.saturating_add(1));

		if self.default_key.as_ref() == Some(&location) {
			state.default = Some(reference.clone());
		}
		self.in_order.store(None);

		Ok(Holder::Reference(reference))
	}

	/// Creates (or returns) the provisional holder of `value` in an intrusive
	/// registry.
	pub fn create_intrusive_holder(&self, value: &Arc<T>) -> Result<Holder<T>, RegistryError> {
		if !self.intrusive {
			return Err(RegistryError::NotIntrusive {
				registry: self.location().clone(),
			});
		}
		let mut guard = self.state.write();
		self.ensure_open(None)?;
		let state = &mut *guard;
		let identity = Identity::of(&**value);

		if let Some(registered) = state.by_value.get(&identity) {
			return Ok(Holder::Reference(registered.clone()));
		}
		let pool = state.intrusive.as_mut().ok_or_else(|| RegistryError::NotIntrusive {
			registry: self.location().clone(),
		})?;
		let reference = pool
			.entry(identity)
			.or_insert_with(|| Arc::new(Reference::intrusive(self.owner.clone(), value.clone())))
			.clone();
		Ok(Holder::Reference(reference))
	}

	/// The holder for `key`, creating an unbound one if nothing is registered
	/// there yet.
	pub(crate) fn get_or_create_holder(
		&self,
		key: &ResourceKey<T>,
	) -> Result<Holder<T>, RegistryError> {
		self.ensure_own(key)?;
		let mut guard = self.state.write();
		if let Some(existing) = guard.by_key.get(key.location()) {
			return Ok(Holder::Reference(existing.clone()));
		}
		if self.intrusive {
			return Err(RegistryError::SpeculativeHolder {
				registry: self.location().clone(),
			});
		}
		self.ensure_open(Some(key))?;
		let reference = Arc::new(Reference::standalone(self.owner.clone(), key.clone()));
		guard
			.by_key
			.insert(key.location().clone(), reference.clone());
		Ok(Holder::Reference(reference))
	}

	/// Validates the registry and makes it read-only. Repeated calls return
	/// immediately.
	///
	/// Fails, leaving the registry open, if a speculative holder was never
	/// registered, an intrusive holder was never registered, or the default
	/// key of a defaulted registry has no value.
	pub fn freeze(&self) -> Result<&Self, RegistryError> {
		if self.is_frozen() {
			return Ok(self);
		}
		let mut guard = self.state.write();
		if self.is_frozen() {
			return Ok(self);
		}

		let mut unbound: Vec<Key> = guard
			.by_key
			.iter()
			.filter(|(_, reference)| !reference.is_bound())
			.map(|(location, _)| location.clone())
			.collect();
		if !unbound.is_empty() {
			unbound.sort();
			return Err(RegistryError::UnboundValues {
				registry: self.location().clone(),
				keys: unbound,
			});
		}

		if let Some(pool) = &guard.intrusive
			&& !pool.is_empty()
		{
			let mut values: Vec<String> = pool
				.values()
				.map(|reference| format!("{reference:?}"))
				.collect();
			values.sort();
			return Err(RegistryError::UnregisteredIntrusive {
				registry: self.location().clone(),
				values,
			});
		}

		if let Some(default_key) = &self.default_key
			&& guard.default.is_none()
		{
			return Err(RegistryError::MissingDefault {
				registry: self.location().clone(),
				key: default_key.clone(),
			});
		}

		guard.intrusive = None;
		self.frozen.store(true, Ordering::Release);
		tracing::debug!(registry = %self.location(), len = guard.by_location.len(), "registry frozen");
		Ok(self)
	}

	/// Value at `location`, or the default value.
	pub fn get(&self, location: &Key) -> Option<Arc<T>> {
		let state = self.state.read();
		state
			.by_location
			.get(location)
			.and_then(|reference| reference.try_value())
			.or_else(|| state.default_value())
	}

	/// Value under `key`, or the default value.
	pub fn get_by_key(&self, key: &ResourceKey<T>) -> Option<Arc<T>> {
		if key.is_for(&self.key) {
			return self.get(key.location());
		}
		self.state.read().default_value()
	}

	/// Value with id `id`, or the default value.
	pub fn get_by_id(&self, id: u32) -> Option<Arc<T>> {
		let state = self.state.read();
		state
			.slot(id)
			.and_then(|reference| reference.try_value())
			.or_else(|| state.default_value())
	}

	/// Id of `value`, or the id of the default value.
	pub fn get_id(&self, value: &T) -> Option<u32> {
		let state = self.state.read();
		state
			.to_id
			.get(&Identity::of(value))
			.copied()
			.or_else(|| state.default_id())
	}

	/// Location of `value`, or the default key.
	pub fn get_location(&self, value: &T) -> Option<Key> {
		self.state
			.read()
			.by_value
			.get(&Identity::of(value))
			.and_then(|reference| reference.try_key())
			.map(|key| key.location().clone())
			.or_else(|| self.default_key.clone())
	}

	pub fn get_resource_key(&self, value: &T) -> Option<ResourceKey<T>> {
		self.state
			.read()
			.by_value
			.get(&Identity::of(value))
			.and_then(|reference| reference.try_key())
			.cloned()
	}

	pub fn get_or_err(&self, location: &Key) -> Result<Arc<T>, RegistryError> {
		self.get(location).ok_or_else(|| RegistryError::MissingElement {
			key: self.key.entry(location.clone()).to_string(),
		})
	}

	/// Holder at `location`, including speculative holders.
	pub fn holder(&self, location: &Key) -> Option<Holder<T>> {
		self.state
			.read()
			.by_key
			.get(location)
			.map(|reference| Holder::Reference(reference.clone()))
	}

	pub fn holder_by_key(&self, key: &ResourceKey<T>) -> Option<Holder<T>> {
		key.is_for(&self.key)
			.then(|| self.holder(key.location()))
			.flatten()
	}

	pub fn holder_by_id(&self, id: u32) -> Option<Holder<T>> {
		self.state
			.read()
			.slot(id)
			.map(|reference| Holder::Reference(reference.clone()))
	}

	pub fn holder_or_err(&self, location: &Key) -> Result<Holder<T>, RegistryError> {
		self.holder(location)
			.ok_or_else(|| RegistryError::MissingElement {
				key: self.key.entry(location.clone()).to_string(),
			})
	}

	/// Registered holders in id order. Cached until the next registration.
	pub fn holders(&self) -> Arc<Vec<Holder<T>>> {
		if let Some(cached) = self.in_order.load_full() {
			return cached;
		}
		let state = self.state.read();
		let holders: Arc<Vec<Holder<T>>> = Arc::new(
			state
				.by_id
				.iter()
				.flatten()
				.map(|reference| Holder::Reference(reference.clone()))
				.collect(),
		);
		self.in_order.store(Some(holders.clone()));
		holders
	}

	/// Registered values in id order.
	pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + use<T> {
		let holders = self.holders();
		(0..holders.len()).filter_map(move |i| holders[i].try_value())
	}

	/// `(key, value)` pairs in registration order.
	pub fn entries(&self) -> Vec<(ResourceKey<T>, Arc<T>)> {
		self.state
			.read()
			.by_location
			.values()
			.filter_map(|reference| Some((reference.try_key()?.clone(), reference.try_value()?)))
			.collect()
	}

	/// Registered locations in registration order.
	pub fn keys(&self) -> Vec<Key> {
		self.state.read().by_location.keys().cloned().collect()
	}

	pub fn resource_keys(&self) -> Vec<ResourceKey<T>> {
		self.state
			.read()
			.by_location
			.values()
			.filter_map(|reference| reference.try_key().cloned())
			.collect()
	}

	/// Number of registered keys.
	pub fn len(&self) -> usize {
		self.state.read().by_location.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains_location(&self, location: &Key) -> bool {
		self.state.read().by_location.contains_key(location)
	}

	pub fn contains_key(&self, key: &ResourceKey<T>) -> bool {
		key.is_for(&self.key) && self.contains_location(key.location())
	}

	/// The registered holder of `value`, or a direct holder around it.
	pub fn wrap_as_holder(&self, value: &Arc<T>) -> Holder<T> {
		self.state
			.read()
			.by_value
			.get(&Identity::of(&**value))
			.map(|reference| Holder::Reference(reference.clone()))
			.unwrap_or_else(|| Holder::Direct(value.clone()))
	}

	/// Read-only lookup view.
	pub fn as_lookup(&self) -> RegistryLookup<'_, T> {
		RegistryLookup::new(self)
	}

	/// Lookup that creates holders and tags on demand. Not available once
	/// frozen or for intrusive registries.
	pub fn registration_lookup(&self) -> Result<RegistrationLookup<'_, T>, RegistryError> {
		self.ensure_open(None)?;
		if self.intrusive {
			return Err(RegistryError::SpeculativeHolder {
				registry: self.location().clone(),
			});
		}
		Ok(RegistrationLookup::new(self))
	}

	/// Read-only lookup that creates missing tags on demand.
	pub fn as_tag_adding_lookup(&self) -> TagAddingLookup<'_, T> {
		TagAddingLookup::new(self)
	}

	/// Id view over holders instead of values.
	pub fn as_holder_id_map(&self) -> HolderIdMap<'_, T> {
		HolderIdMap::new(self)
	}

	pub(super) fn ensure_open(&self, key: Option<&ResourceKey<T>>) -> Result<(), RegistryError> {
		if self.is_frozen() {
			return Err(RegistryError::Frozen {
				registry: self.location().clone(),
				key: key.map(ToString::to_string),
			});
		}
		Ok(())
	}

	fn ensure_own(&self, key: &ResourceKey<T>) -> Result<(), RegistryError> {
		if !key.is_for(&self.key) {
			return Err(RegistryError::ForeignKey {
				registry: self.location().clone(),
				key: key.to_string(),
			});
		}
		Ok(())
	}

	/// Logs and records `kind`, or turns it into an error under `Deny`.
	pub(crate) fn report(&self, kind: WarningKind) -> Result<(), RegistryError> {
		let severity = self.settings.severity(&kind);
		let warning = RegistryWarning::new(self.location().clone(), kind);
		match severity {
			Severity::Deny => Err(warning.into_error()),
			Severity::Warn => {
				warning.log();
				self.warnings.lock().push(warning);
				Ok(())
			}
		}
	}
}

impl<T: RegistryValue> IntBiMap<Arc<T>> for SimpleRegistry<T> {
	fn len(&self) -> usize {
		SimpleRegistry::len(self)
	}

	fn get_by_id(&self, id: u32) -> Option<Arc<T>> {
		SimpleRegistry::get_by_id(self, id)
	}

	fn get_id(&self, value: &Arc<T>) -> Option<u32> {
		SimpleRegistry::get_id(self, &**value)
	}

	fn values(&self) -> Vec<Arc<T>> {
		self.iter().collect()
	}
}

impl<T: RegistryValue> fmt::Debug for SimpleRegistry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SimpleRegistry(key={})", self.location())
	}
}
