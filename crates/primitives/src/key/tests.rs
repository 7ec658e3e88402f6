use proptest::prelude::*;

use super::{DEFAULT_NAMESPACE, Key, KeyError};

#[test]
fn parse_defaults_namespace() {
	let key = Key::parse("red").unwrap();
	assert_eq!(key.namespace(), DEFAULT_NAMESPACE);
	assert_eq!(key.path(), "red");
	assert_eq!(key, Key::minecraft("red"));
}

#[test]
fn parse_splits_on_first_colon() {
	let key = Key::parse("zero:blocks/stone").unwrap();
	assert_eq!(key.namespace(), "zero");
	assert_eq!(key.path(), "blocks/stone");
	assert_eq!(key.to_string(), "zero:blocks/stone");
	assert_eq!(format!("{key:?}"), "Key(zero:blocks/stone)");
}

#[test]
fn rejects_bad_components() {
	assert!(matches!(Key::parse(":red"), Err(KeyError::EmptyNamespace { .. })));
	assert!(matches!(Key::parse("zero:"), Err(KeyError::EmptyPath { .. })));
	assert_eq!(
		Key::parse("Zero:red"),
		Err(KeyError::InvalidNamespace {
			key: "Zero:red".into(),
			ch: 'Z'
		})
	);
	assert!(matches!(Key::parse("zero/x:red"), Err(KeyError::InvalidNamespace { ch: '/', .. })));
	assert!(matches!(Key::parse("zero:a:b"), Err(KeyError::InvalidPath { ch: ':', .. })));
	assert!(matches!(Key::parse("zero:é"), Err(KeyError::InvalidPath { ch: 'é', .. })));
}

#[test]
fn static_and_owned_keys_compare_equal() {
	const RED: Key = Key::from_static("minecraft", "red");
	let owned = Key::new(String::from("minecraft"), String::from("red")).unwrap();
	assert_eq!(RED, owned);

	let mut set = std::collections::HashSet::new();
	set.insert(RED);
	assert!(set.contains(&owned));
}

#[test]
fn ordering_is_namespace_then_path() {
	let mut keys = vec![
		Key::parse("zero:a").unwrap(),
		Key::parse("minecraft:z").unwrap(),
		Key::parse("minecraft:b").unwrap(),
	];
	keys.sort();
	let rendered: Vec<_> = keys.iter().map(ToString::to_string).collect();
	assert_eq!(rendered, ["minecraft:b", "minecraft:z", "zero:a"]);
}

#[test]
fn serde_uses_string_form() {
	#[derive(serde::Serialize, serde::Deserialize)]
	struct Doc {
		key: Key,
	}

	let doc: Doc = toml::from_str("key = \"zero:colors\"").unwrap();
	assert_eq!(doc.key, Key::from_static("zero", "colors"));
	assert!(toml::from_str::<Doc>("key = \"Bad Key\"").is_err());

	let rendered = toml::to_string(&doc).unwrap();
	assert!(rendered.contains("\"zero:colors\""));
}

proptest! {
	#[test]
	fn display_parse_roundtrip(ns in "[a-z0-9_.-]{1,12}", path in "[a-z0-9_./-]{1,24}") {
		let key = Key::new(ns.clone(), path.clone()).unwrap();
		let parsed = Key::parse(&key.to_string()).unwrap();
		prop_assert_eq!(parsed.namespace(), ns.as_str());
		prop_assert_eq!(parsed.path(), path.as_str());
		prop_assert_eq!(parsed, key);
	}
}
