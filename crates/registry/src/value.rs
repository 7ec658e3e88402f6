use std::fmt::Debug;

/// Marker for types that can be stored in a registry.
///
/// Values are shared as `Arc<T>` and compared by identity, never by `Eq`.
pub trait RegistryValue: Debug + Send + Sync + 'static {}

impl<T> RegistryValue for T where T: Debug + Send + Sync + 'static {}

/// Address of a shared value, used as its identity inside a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Identity(usize);

impl Identity {
	pub(crate) fn of<T>(value: &T) -> Self {
		Self(std::ptr::from_ref(value).addr())
	}
}
