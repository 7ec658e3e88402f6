use std::fmt;

use zero_primitives::Key;

use crate::RegistryError;

/// Non-fatal condition detected while populating a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
	DuplicateKey { key: Key },
	DuplicateValue { key: Key, value: String },
	/// Known tags that a `bind_tags` call did not supply, sorted.
	MissingTags { tags: Vec<Key> },
	EmptyRegistry,
}

/// A recorded [`WarningKind`] together with the registry that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryWarning {
	pub registry: Key,
	pub kind: WarningKind,
}

impl RegistryWarning {
	pub fn new(registry: Key, kind: WarningKind) -> Self {
		Self { registry, kind }
	}

	/// The error raised instead of this warning under [`crate::Severity::Deny`].
	pub fn into_error(self) -> RegistryError {
		let registry = self.registry;
		match self.kind {
			WarningKind::DuplicateKey { key } => RegistryError::DuplicateKey { registry, key },
			WarningKind::DuplicateValue { key, value } => {
				RegistryError::DuplicateValue { registry, key, value }
			}
			WarningKind::MissingTags { tags } => RegistryError::MissingTags { registry, tags },
			WarningKind::EmptyRegistry => RegistryError::EmptyRegistry { registry },
		}
	}

	/// Emits the warning through `tracing`.
	pub(crate) fn log(&self) {
		match &self.kind {
			WarningKind::DuplicateKey { key } => tracing::warn!(
				registry = %self.registry,
				%key,
				"adding duplicate key to registry",
			),
			WarningKind::DuplicateValue { key, value } => tracing::warn!(
				registry = %self.registry,
				%key,
				value = value.as_str(),
				"adding duplicate value to registry",
			),
			WarningKind::MissingTags { tags } => tracing::warn!(
				registry = %self.registry,
				missing = ?tags,
				"not all defined tags are present in the binding data",
			),
			WarningKind::EmptyRegistry => tracing::warn!(
				registry = %self.registry,
				"registry was empty after loading",
			),
		}
	}
}

impl fmt::Display for RegistryWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.clone().into_error(), f)
	}
}
