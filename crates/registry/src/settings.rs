//! Registry diagnostics configuration.
//!
//! ```toml
//! duplicate-keys = "warn"
//! duplicate-values = "deny"
//! empty-registry = "warn"
//! missing-tags = "warn"
//! ```
//!
//! Every setting defaults to [`Severity::Warn`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::warning::WarningKind;

/// How a non-fatal registry condition is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
	/// Log through `tracing` and record a [`crate::RegistryWarning`].
	#[default]
	Warn,
	/// Fail the operation that detected the condition.
	Deny,
}

/// Errors that can occur when loading [`RegistrySettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("I/O error reading {}: {error}", .path.display())]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistrySettings {
	/// Registering a key that is already registered.
	pub duplicate_keys: Severity,
	/// Registering a value that is already registered under another key.
	pub duplicate_values: Severity,
	/// A registry with no values after its loader ran.
	pub empty_registry: Severity,
	/// Known tags absent from a `bind_tags` call.
	pub missing_tags: Severity,
}

impl RegistrySettings {
	/// Settings that turn every diagnostic into an error.
	pub const STRICT: Self = Self {
		duplicate_keys: Severity::Deny,
		duplicate_values: Severity::Deny,
		empty_registry: Severity::Deny,
		missing_tags: Severity::Deny,
	};

	pub fn parse(input: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| SettingsError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	pub(crate) fn severity(&self, kind: &WarningKind) -> Severity {
		match kind {
			WarningKind::DuplicateKey { .. } => self.duplicate_keys,
			WarningKind::DuplicateValue { .. } => self.duplicate_values,
			WarningKind::EmptyRegistry => self.empty_registry,
			WarningKind::MissingTags { .. } => self.missing_tags,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(RegistrySettings::parse("").unwrap(), RegistrySettings::default());
	}

	#[test]
	fn parses_kebab_case() {
		let settings = RegistrySettings::parse(
			"duplicate-values = \"deny\"\nmissing-tags = \"deny\"\n",
		)
		.unwrap();
		assert_eq!(settings.duplicate_keys, Severity::Warn);
		assert_eq!(settings.duplicate_values, Severity::Deny);
		assert_eq!(settings.empty_registry, Severity::Warn);
		assert_eq!(settings.missing_tags, Severity::Deny);
	}

	#[test]
	fn rejects_unknown_fields_and_values() {
		assert!(matches!(
			RegistrySettings::parse("duplicate-ids = \"warn\""),
			Err(SettingsError::Toml(_))
		));
		assert!(matches!(
			RegistrySettings::parse("empty-registry = \"ignore\""),
			Err(SettingsError::Toml(_))
		));
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("registries.toml");
		std::fs::write(&path, "empty-registry = \"deny\"").unwrap();
		let settings = RegistrySettings::load(&path).unwrap();
		assert_eq!(settings.empty_registry, Severity::Deny);
	}

	#[test]
	fn load_reports_path_on_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.toml");
		let err = RegistrySettings::load(&path).unwrap_err();
		assert!(matches!(&err, SettingsError::Io { path: p, .. } if *p == path));
		assert!(err.to_string().contains("missing.toml"));
	}
}
