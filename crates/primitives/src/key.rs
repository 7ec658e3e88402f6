//! Namespaced identifiers.
//!
//! A [`Key`] is a `namespace:path` pair. Namespaces accept `[a-z0-9_.-]`, paths
//! additionally accept `/`. A string without a `:` parses into the
//! [`DEFAULT_NAMESPACE`].

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace assumed when a key string has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Errors produced while parsing or constructing a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
	#[error("empty namespace in key {key:?}")]
	EmptyNamespace { key: String },
	#[error("empty path in key {key:?}")]
	EmptyPath { key: String },
	#[error("invalid character {ch:?} in namespace of key {key:?}")]
	InvalidNamespace { key: String, ch: char },
	#[error("invalid character {ch:?} in path of key {key:?}")]
	InvalidPath { key: String, ch: char },
}

/// A namespaced identifier such as `minecraft:red`.
///
/// Keys order by namespace, then path, which is the order used whenever a
/// diagnostic lists keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
	namespace: Cow<'static, str>,
	path: Cow<'static, str>,
}

const fn is_namespace_byte(b: u8) -> bool {
	matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-')
}

const fn is_path_byte(b: u8) -> bool {
	is_namespace_byte(b) || b == b'/'
}

const fn all_bytes(bytes: &[u8], path: bool) -> bool {
	let mut i = 0;
	while i < bytes.len() {
		let ok = if path {
			is_path_byte(bytes[i])
		} else {
			is_namespace_byte(bytes[i])
		};
		if !ok {
			return false;
		}
		i += 1;
	}
	true
}

impl Key {
	/// Builds a key from static parts, validated at compile time when used in a
	/// `const` context.
	///
	/// # Panics
	///
	/// Panics if either part is empty or contains a character outside the
	/// allowed set.
	pub const fn from_static(namespace: &'static str, path: &'static str) -> Self {
		assert!(!namespace.is_empty(), "key namespace must not be empty");
		assert!(!path.is_empty(), "key path must not be empty");
		assert!(
			all_bytes(namespace.as_bytes(), false),
			"key namespace contains an invalid character"
		);
		assert!(
			all_bytes(path.as_bytes(), true),
			"key path contains an invalid character"
		);
		Self {
			namespace: Cow::Borrowed(namespace),
			path: Cow::Borrowed(path),
		}
	}

	/// Builds a key in the [`DEFAULT_NAMESPACE`] from a static path.
	///
	/// # Panics
	///
	/// Same conditions as [`Key::from_static`].
	pub const fn minecraft(path: &'static str) -> Self {
		Self::from_static(DEFAULT_NAMESPACE, path)
	}

	/// Builds a key from owned or borrowed parts, validating both.
	pub fn new(
		namespace: impl Into<Cow<'static, str>>,
		path: impl Into<Cow<'static, str>>,
	) -> Result<Self, KeyError> {
		let namespace = namespace.into();
		let path = path.into();
		let display = || format!("{namespace}:{path}");

		if namespace.is_empty() {
			return Err(KeyError::EmptyNamespace { key: display() });
		}
		if path.is_empty() {
			return Err(KeyError::EmptyPath { key: display() });
		}
		if let Some(ch) = namespace.chars().find(|c| !c.is_ascii() || !is_namespace_byte(*c as u8)) {
			return Err(KeyError::InvalidNamespace { key: display(), ch });
		}
		if let Some(ch) = path.chars().find(|c| !c.is_ascii() || !is_path_byte(*c as u8)) {
			return Err(KeyError::InvalidPath { key: display(), ch });
		}

		Ok(Self { namespace, path })
	}

	/// Parses `namespace:path`, or a bare `path` in the default namespace.
	pub fn parse(input: &str) -> Result<Self, KeyError> {
		match input.split_once(':') {
			Some((namespace, path)) => Self::new(namespace.to_owned(), path.to_owned()),
			None => Self::new(DEFAULT_NAMESPACE, input.to_owned()),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace, self.path)
	}
}

impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Key({self})")
	}
}

impl FromStr for Key {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for Key {
	type Error = KeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<Key> for String {
	fn from(key: Key) -> Self {
		key.to_string()
	}
}

#[cfg(test)]
mod tests;
