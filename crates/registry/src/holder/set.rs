use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use rustc_hash::FxHashSet;
use zero_primitives::TagKey;

use super::{Holder, HolderOwner};
use crate::RegistryValue;

/// Ordered collection of holders.
pub enum HolderSet<T> {
	Direct(DirectHolderSet<T>),
	Named(Arc<NamedHolderSet<T>>),
}

impl<T: RegistryValue> HolderSet<T> {
	pub fn direct(holders: impl IntoIterator<Item = Holder<T>>) -> Self {
		Self::Direct(DirectHolderSet::new(holders))
	}

	pub fn empty() -> Self {
		Self::direct([])
	}

	/// Snapshot of the current contents.
	pub fn contents(&self) -> Arc<Vec<Holder<T>>> {
		match self {
			Self::Direct(set) => set.contents.clone(),
			Self::Named(set) => set.contents(),
		}
	}

	pub fn len(&self) -> usize {
		self.contents().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, index: usize) -> Option<Holder<T>> {
		self.contents().get(index).cloned()
	}

	pub fn contains(&self, holder: &Holder<T>) -> bool {
		match self {
			Self::Direct(set) => set.contains(holder),
			Self::Named(set) => set.contains(holder),
		}
	}

	/// Tag backing this set, if it is named.
	pub fn tag_key(&self) -> Option<&TagKey<T>> {
		match self {
			Self::Direct(_) => None,
			Self::Named(set) => Some(set.key()),
		}
	}

	pub fn can_serialize_in(&self, owner: &HolderOwner) -> bool {
		match self {
			Self::Direct(_) => true,
			Self::Named(set) => set.owner.can_serialize_in(owner),
		}
	}
}

impl<T> Clone for HolderSet<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Direct(set) => Self::Direct(set.clone()),
			Self::Named(set) => Self::Named(set.clone()),
		}
	}
}

impl<T: RegistryValue> fmt::Debug for HolderSet<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Direct(set) => f.debug_tuple("Direct").field(&set.contents).finish(),
			Self::Named(set) => fmt::Debug::fmt(set, f),
		}
	}
}

impl<T> From<Arc<NamedHolderSet<T>>> for HolderSet<T> {
	fn from(set: Arc<NamedHolderSet<T>>) -> Self {
		Self::Named(set)
	}
}

/// Fixed list of holders. Membership is answered from an identity set built on
/// the first query.
pub struct DirectHolderSet<T> {
	contents: Arc<Vec<Holder<T>>>,
	lookup: Arc<OnceLock<FxHashSet<Holder<T>>>>,
}

impl<T: RegistryValue> DirectHolderSet<T> {
	pub fn new(holders: impl IntoIterator<Item = Holder<T>>) -> Self {
		Self {
			contents: Arc::new(holders.into_iter().collect()),
			lookup: Arc::new(OnceLock::new()),
		}
	}

	pub fn contents(&self) -> &[Holder<T>] {
		&self.contents
	}

	pub fn contains(&self, holder: &Holder<T>) -> bool {
		self.lookup
			.get_or_init(|| self.contents.iter().cloned().collect())
			.contains(holder)
	}
}

impl<T> Clone for DirectHolderSet<T> {
	fn clone(&self) -> Self {
		Self {
			contents: self.contents.clone(),
			lookup: self.lookup.clone(),
		}
	}
}

/// The holder set of one tag.
///
/// Starts empty and is rebound wholesale by the owning registry. `contains`
/// asks the holder for its tags rather than scanning the contents, so it is
/// only meaningful after the registry bound holders and sets together.
pub struct NamedHolderSet<T> {
	owner: HolderOwner,
	key: TagKey<T>,
	contents: ArcSwap<Vec<Holder<T>>>,
}

impl<T: RegistryValue> NamedHolderSet<T> {
	pub(crate) fn new(owner: HolderOwner, key: TagKey<T>) -> Self {
		Self {
			owner,
			key,
			contents: ArcSwap::from_pointee(Vec::new()),
		}
	}

	pub fn key(&self) -> &TagKey<T> {
		&self.key
	}

	pub fn owner(&self) -> &HolderOwner {
		&self.owner
	}

	pub fn contents(&self) -> Arc<Vec<Holder<T>>> {
		self.contents.load_full()
	}

	pub fn len(&self) -> usize {
		self.contents.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, index: usize) -> Option<Holder<T>> {
		self.contents.load().get(index).cloned()
	}

	pub fn contains(&self, holder: &Holder<T>) -> bool {
		holder.is_in(&self.key)
	}

	pub(crate) fn bind(&self, holders: Vec<Holder<T>>) {
		self.contents.store(Arc::new(holders));
	}
}

impl<T: RegistryValue> fmt::Debug for NamedHolderSet<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Named")
			.field("key", &self.key)
			.field("contents", &*self.contents.load())
			.finish()
	}
}
