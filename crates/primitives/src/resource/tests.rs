use std::collections::HashSet;

use super::{RegistryKey, RegistryRoots, ResourceKey, TagKey};
use crate::key::Key;

struct Color;
struct Block;

const COLORS: RegistryKey<Color> = RegistryKey::new(Key::from_static("zero", "colors"));

#[test]
fn resource_keys_compare_by_components() {
	let red = COLORS.entry(Key::minecraft("red"));
	let again = ResourceKey::<Color>::new(Key::from_static("zero", "colors"), Key::minecraft("red"));
	assert_eq!(red, again);
	assert_ne!(red, COLORS.entry(Key::minecraft("blue")));

	let set: HashSet<_> = [red.clone(), again].into_iter().collect();
	assert_eq!(set.len(), 1);
	assert!(red.is_for(&COLORS));
}

#[test]
fn same_location_in_other_registry_differs() {
	let red = COLORS.entry(Key::minecraft("red"));
	let other = ResourceKey::<Color>::new(Key::from_static("zero", "dyes"), Key::minecraft("red"));
	assert_ne!(red, other);
}

#[test]
fn registry_resource_key_lives_under_root() {
	let key: ResourceKey<Block> = COLORS.resource_key();
	assert_eq!(key.registry(), &RegistryRoots::ZERO);
	assert_eq!(key.location(), COLORS.location());
	assert_eq!(RegistryRoots::ZERO.to_string(), "zero:root");
}

#[test]
fn formatting() {
	let red = COLORS.entry(Key::minecraft("red"));
	assert_eq!(red.to_string(), "ResourceKey[zero:colors / minecraft:red]");

	let warm: TagKey<Color> = COLORS.tag(Key::minecraft("warm"));
	assert_eq!(warm.to_string(), "#minecraft:warm");
	assert_eq!(format!("{warm:?}"), "TagKey[zero:colors / minecraft:warm]");
	assert_eq!(format!("{COLORS:?}"), "RegistryKey[zero:colors]");
}

#[test]
fn tag_keys_sort_by_location() {
	let mut tags = vec![
		COLORS.tag(Key::minecraft("warm")),
		COLORS.tag(Key::minecraft("cold")),
	];
	tags.sort();
	assert_eq!(tags[0].location(), &Key::minecraft("cold"));
}
