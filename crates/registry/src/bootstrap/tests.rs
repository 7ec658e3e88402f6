use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::holder::{Holder, HolderGetter};

#[derive(Debug)]
struct Block(&'static str);

#[derive(Debug)]
struct Fluid {
	name: &'static str,
	block: Holder<Block>,
}

const BLOCKS: RegistryKey<Block> = RegistryKey::new(Key::minecraft("block"));
const FLUIDS: RegistryKey<Fluid> = RegistryKey::new(Key::minecraft("fluid"));
const STONE: Key = Key::minecraft("stone");
const WATER: Key = Key::minecraft("water");

#[test]
fn loaders_run_in_declaration_order() {
	let order = Arc::new(Mutex::new(Vec::new()));
	let mut bootstrap = RegistryBootstrap::builtin();

	let seen = order.clone();
	bootstrap
		.simple(FLUIDS, move |_| {
			seen.lock().push("fluid");
			Ok(())
		})
		.unwrap();
	let seen = order.clone();
	bootstrap
		.simple(BLOCKS, move |registry| {
			seen.lock().push("block");
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();

	bootstrap.bootstrap().unwrap();
	assert_eq!(*order.lock(), ["fluid", "block"]);
	assert!(bootstrap.parent().is_frozen());
	assert!(bootstrap.get_registry(&BLOCKS).unwrap().is_frozen());
	assert!(bootstrap.is_bootstrapped());
}

#[test]
fn earlier_loader_holds_proxy_into_later_registry() {
	let mut bootstrap = RegistryBootstrap::builtin();
	let registries = bootstrap.holder();

	let fluids = bootstrap
		.simple(FLUIDS, move |registry| {
			let blocks = registries.registry_or_err(&BLOCKS)?;
			let block = blocks
				.registration_lookup()?
				.get_or_create(&BLOCKS.entry(STONE))?;
			registry.register_location(WATER, Fluid { name: "water", block })?;
			Ok(())
		})
		.unwrap();
	let blocks = bootstrap
		.simple(BLOCKS, |registry| {
			RegistryBootstrap::register(registry, STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();

	bootstrap.bootstrap().unwrap();

	let water = fluids.get(&WATER).unwrap();
	let stone = blocks.get(&STONE).unwrap();
	assert_eq!(water.name, "water");
	assert!(water.block.is_bound());
	assert!(Arc::ptr_eq(&water.block.value().unwrap(), &stone));
	assert_eq!(blocks.holder(&STONE), Some(water.block.clone()));
}

#[test]
fn later_loader_reads_frozen_earlier_registry() {
	let mut bootstrap = RegistryBootstrap::builtin();
	let registries = bootstrap.holder();

	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();
	let fluids = bootstrap
		.simple(FLUIDS, move |registry| {
			let blocks = registries.registry_or_err(&BLOCKS)?;
			assert!(blocks.is_frozen());
			let block = blocks.as_lookup().get_or_err(&BLOCKS.entry(STONE))?;
			registry.register_location(WATER, Fluid { name: "water", block })?;
			Ok(())
		})
		.unwrap();

	bootstrap.bootstrap().unwrap();
	assert_eq!(fluids.get(&WATER).unwrap().block.value().unwrap().0, "stone");
}

#[test]
fn unresolved_proxy_fails_freeze_of_target() {
	let mut bootstrap = RegistryBootstrap::builtin();
	let registries = bootstrap.holder();

	bootstrap
		.simple(FLUIDS, move |registry| {
			let block = registries
				.registry_or_err(&BLOCKS)?
				.registration_lookup()?
				.get_or_create(&BLOCKS.entry(Key::minecraft("missing")))?;
			registry.register_location(WATER, Fluid { name: "water", block })?;
			Ok(())
		})
		.unwrap();
	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();

	let err = bootstrap.bootstrap().unwrap_err();
	assert_eq!(
		err,
		BootstrapError::Freeze {
			registry: BLOCKS.location().clone(),
			source: RegistryError::UnboundValues {
				registry: BLOCKS.location().clone(),
				keys: vec![Key::minecraft("missing")],
			},
		}
	);
}

#[test]
fn loader_failure_names_registry() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap
		.simple(BLOCKS, |registry| {
			let other: RegistryKey<Block> = RegistryKey::new(Key::minecraft("other"));
			registry.register(other.entry(STONE), Block("stone"))?;
			Ok(())
		})
		.unwrap();

	let err = bootstrap.bootstrap().unwrap_err();
	let BootstrapError::Loader { registry, source } = &err else {
		panic!("unexpected error: {err}");
	};
	assert_eq!(registry, BLOCKS.location());
	assert!(matches!(source, RegistryError::ForeignKey { .. }));
	assert!(err.to_string().starts_with("failed to bootstrap registry minecraft:block"));
}

#[test]
fn defaulted_registry_without_default_aborts() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap
		.defaulted(BLOCKS, Key::minecraft("air"), |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();

	let err = bootstrap.bootstrap().unwrap_err();
	assert!(matches!(
		err,
		BootstrapError::Freeze {
			source: RegistryError::MissingDefault { .. },
			..
		}
	));
}

#[test]
fn empty_registry_warns() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap.simple(BLOCKS, |_| Ok(())).unwrap();

	let warnings = bootstrap.bootstrap().unwrap();
	assert_eq!(
		warnings,
		vec![RegistryWarning::new(
			BLOCKS.location().clone(),
			WarningKind::EmptyRegistry
		)]
	);
	assert_eq!(bootstrap.warnings(), warnings.as_slice());
}

#[test]
fn empty_registry_denied_by_settings() {
	let mut bootstrap = RegistryBootstrap::builtin().with_settings(RegistrySettings {
		empty_registry: Severity::Deny,
		..RegistrySettings::default()
	});
	bootstrap.simple(BLOCKS, |_| Ok(())).unwrap();

	assert_eq!(
		bootstrap.bootstrap().unwrap_err(),
		BootstrapError::EmptyRegistry {
			registry: BLOCKS.location().clone()
		}
	);
}

#[test]
fn registry_warnings_are_collected() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			registry.register_location(STONE, Block("smooth"))?;
			Ok(())
		})
		.unwrap();

	let warnings = bootstrap.bootstrap().unwrap();
	assert_eq!(warnings.len(), 1);
	assert_eq!(warnings[0].kind, WarningKind::DuplicateKey { key: STONE });
}

#[test]
fn intrusive_registry_loads_through_loader() {
	let mut bootstrap = RegistryBootstrap::builtin();
	let blocks = bootstrap
		.defaulted_intrusive(BLOCKS, Key::minecraft("air"), |registry| {
			let mut loader = RegistryLoader::new();
			loader
				.put(Key::minecraft("air"), Block("air"))
				.add(STONE, |_| Block("stone"));
			loader.register_all(registry)
		})
		.unwrap();

	bootstrap.bootstrap().unwrap();
	assert_eq!(blocks.len(), 2);
	assert_eq!(blocks.get(&Key::minecraft("dirt")).unwrap().0, "air");
	assert_eq!(blocks.get_id(&blocks.get(&STONE).unwrap()), Some(1));
}

#[test]
fn dynamic_bootstrap_only_declares_simple_registries() {
	let mut bootstrap = RegistryBootstrap::dynamic();
	let err = bootstrap.intrusive(BLOCKS, |_| Ok(())).unwrap_err();
	assert_eq!(
		err,
		BootstrapError::Unsupported {
			kind: BootstrapKind::Dynamic,
			flavour: "intrusive",
			registry: BLOCKS.location().clone(),
		}
	);
	assert!(bootstrap.defaulted(BLOCKS, STONE, |_| Ok(())).is_err());

	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();
	bootstrap.bootstrap().unwrap();
	assert_eq!(bootstrap.kind(), BootstrapKind::Dynamic);
}

#[test]
fn duplicate_declaration_is_rejected() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap.simple(BLOCKS, |_| Ok(())).unwrap();
	let err = bootstrap.simple(BLOCKS, |_| Ok(())).unwrap_err();

	assert_eq!(
		err,
		BootstrapError::DuplicateLoader {
			registry: BLOCKS.location().clone()
		}
	);
}

#[test]
fn bootstrap_runs_once() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();
	bootstrap.bootstrap().unwrap();

	assert_eq!(bootstrap.bootstrap().unwrap_err(), BootstrapError::AlreadyBootstrapped);
	assert_eq!(
		bootstrap.simple(FLUIDS, |_| Ok(())).unwrap_err(),
		BootstrapError::AlreadyBootstrapped
	);
}

#[test]
fn access_snapshot_holds_declared_registries() {
	let mut bootstrap = RegistryBootstrap::builtin();
	bootstrap
		.simple(BLOCKS, |registry| {
			registry.register_location(STONE, Block("stone"))?;
			Ok(())
		})
		.unwrap();
	bootstrap.bootstrap().unwrap();

	let access = bootstrap.access();
	assert!(access.is_frozen());
	assert_eq!(access.len(), 1);
	assert_eq!(access.get_registry(&BLOCKS).unwrap().len(), 1);
	assert!(access.get_registry(&FLUIDS).is_none());
}
