use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use zero_primitives::Key;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Identity capability of one registry.
///
/// Every registry gets a fresh owner. Holders remember the owner that created
/// them, and a holder may only be bound into tags of a registry whose owner it
/// [can serialize in](HolderOwner::can_serialize_in).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HolderOwner {
	id: u64,
	registry: Key,
}

impl HolderOwner {
	pub fn new(registry: Key) -> Self {
		Self {
			id: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
			registry,
		}
	}

	/// Registry this owner was created for.
	pub fn registry(&self) -> &Key {
		&self.registry
	}

	/// Two owners are compatible only if they are the same owner.
	pub fn can_serialize_in(&self, other: &HolderOwner) -> bool {
		self.id == other.id
	}
}

impl fmt::Debug for HolderOwner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "HolderOwner({}#{})", self.registry, self.id)
	}
}
