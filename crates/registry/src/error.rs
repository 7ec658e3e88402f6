use std::fmt::Display;

use zero_primitives::Key;

fn join<T: Display>(items: &[T]) -> String {
	let mut out = String::new();
	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}
		out.push_str(&item.to_string());
	}
	out
}

fn requested(key: &Option<String>) -> String {
	key.as_ref()
		.map(|key| format!(" (requested key: {key})"))
		.unwrap_or_default()
}

/// Fatal registry errors.
///
/// Non-fatal conditions are reported as [`crate::RegistryWarning`]s instead and
/// only surface here when their [`crate::Severity`] is `Deny`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("registry {registry} is already frozen{}", requested(.key))]
	Frozen { registry: Key, key: Option<String> },

	#[error("unbound holder: {holder}")]
	UnboundHolder { holder: String },

	#[error("cannot rebind holder key from {existing} to {new}")]
	KeyRebind { existing: String, new: String },

	#[error("cannot rebind intrusive holder {holder} to a different value")]
	IntrusiveValueRebind { holder: String },

	#[error("missing intrusive holder for {key} -> {value} in registry {registry}")]
	MissingIntrusiveHolder {
		registry: Key,
		key: Key,
		value: String,
	},

	#[error("registry {registry} cannot create intrusive holders")]
	NotIntrusive { registry: Key },

	#[error("registry {registry} cannot create new holders without a value")]
	SpeculativeHolder { registry: Key },

	#[error("unbound values [{}] in registry {registry}", join(.keys))]
	UnboundValues { registry: Key, keys: Vec<Key> },

	#[error("intrusive holders were never registered in {registry}: [{}]", join(.values))]
	UnregisteredIntrusive { registry: Key, values: Vec<String> },

	#[error("default value for key {key} in registry {registry} was not loaded")]
	MissingDefault { registry: Key, key: Key },

	#[error("cannot add {holder} to tag {tag} from outside registry {registry}")]
	ForeignHolder {
		registry: Key,
		tag: String,
		holder: String,
	},

	#[error("found direct holder {holder} in tag {tag}")]
	DirectHolderInTag { tag: String, holder: String },

	#[error("holder {holder} in tag {tag} is not registered in {registry}")]
	UnknownHolder {
		registry: Key,
		tag: String,
		holder: String,
	},

	#[error("key {key} does not belong to registry {registry}")]
	ForeignKey { registry: Key, key: String },

	#[error("missing element {key}")]
	MissingElement { key: String },

	#[error("missing tag {key}")]
	MissingTag { key: String },

	#[error("missing registry {key}")]
	MissingRegistry { key: Key },

	#[error("registry {key} does not hold values of type {type_name}")]
	Type { key: Key, type_name: &'static str },

	#[error("duplicate key {key} in registry {registry}")]
	DuplicateKey { registry: Key, key: Key },

	#[error("duplicate value {value} (key {key}) in registry {registry}")]
	DuplicateValue {
		registry: Key,
		key: Key,
		value: String,
	},

	#[error("id {id} in registry {registry} is already taken by {key}")]
	DuplicateId { registry: Key, id: u32, key: Key },

	#[error("tags [{}] of registry {registry} are missing from the binding data", join(.tags))]
	MissingTags { registry: Key, tags: Vec<Key> },

	#[error("registry {registry} was empty after loading")]
	EmptyRegistry { registry: Key },
}
