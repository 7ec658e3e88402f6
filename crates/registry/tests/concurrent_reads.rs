use std::sync::Arc;
use std::thread;

use zero_registry::{
	CombinedRegistryHolder, DynRegistry, FilteredRegistryHolder, Holder, ImmutableRegistryHolder,
	Key, RegistryAccess, RegistryHolder, RegistryHolderExt, RegistryKey, SimpleRegistry,
};

#[derive(Debug)]
struct Sound {
	volume: u32,
}

const SOUNDS: RegistryKey<Sound> = RegistryKey::new(Key::minecraft("sound_event"));
const MUSIC: RegistryKey<Sound> = RegistryKey::new(Key::minecraft("music"));

fn frozen_sounds(key: RegistryKey<Sound>, count: u32) -> Arc<SimpleRegistry<Sound>> {
	let registry = Arc::new(SimpleRegistry::standard(key));
	for volume in 0..count {
		let location = Key::new("zero", format!("sound_{volume}")).unwrap();
		registry.register_location(location, Sound { volume }).unwrap();
	}
	registry.freeze().unwrap();
	registry
}

#[test]
fn frozen_registry_serves_parallel_readers() {
	let registry = frozen_sounds(SOUNDS, 256);

	thread::scope(|scope| {
		for _ in 0..8 {
			scope.spawn(|| {
				for id in 0..256 {
					let sound = registry.get_by_id(id).unwrap();
					assert_eq!(sound.volume, id);
					assert_eq!(registry.get_id(&sound), Some(id));
					let location = registry.get_location(&sound).unwrap();
					assert!(Arc::ptr_eq(&registry.get(&location).unwrap(), &sound));
				}
				assert_eq!(registry.holders().len(), 256);
			});
		}
	});
}

#[test]
fn tag_rebinding_is_atomic_for_readers() {
	let registry = frozen_sounds(SOUNDS, 64);
	let loud = SOUNDS.tag(Key::minecraft("loud"));
	let evens: Vec<Holder<Sound>> = registry
		.holders()
		.iter()
		.filter(|holder| holder.value().unwrap().volume % 2 == 0)
		.cloned()
		.collect();
	let odds: Vec<Holder<Sound>> = registry
		.holders()
		.iter()
		.filter(|holder| holder.value().unwrap().volume % 2 == 1)
		.cloned()
		.collect();
	registry.bind_tags([(loud.clone(), evens.clone())]).unwrap();

	thread::scope(|scope| {
		scope.spawn(|| {
			for round in 0..50 {
				let next = if round % 2 == 0 { &odds } else { &evens };
				registry.bind_tags([(loud.clone(), next.clone())]).unwrap();
			}
		});
		for _ in 0..4 {
			scope.spawn(|| {
				for _ in 0..200 {
					let set = registry.get_tag(&loud).unwrap();
					assert_eq!(set.len(), 32);
					let contents = set.contents();
					let parity = contents[0].value().unwrap().volume % 2;
					assert!(contents.iter().all(|holder| holder.value().unwrap().volume % 2 == parity));
				}
			});
		}
	});
}

#[test]
fn holders_compose_over_shared_registries() {
	let sounds = frozen_sounds(SOUNDS, 4);
	let music = frozen_sounds(MUSIC, 2);

	let base: Arc<dyn RegistryHolder> = Arc::new(ImmutableRegistryHolder::new([DynRegistry::new(sounds.clone())]));
	let overlay: Arc<dyn RegistryHolder> = Arc::new(RegistryAccess::new([DynRegistry::new(music.clone())]));
	let combined = CombinedRegistryHolder::new([base, overlay]);
	let visible = FilteredRegistryHolder::new(combined, |key: &Key| key.path() != "music");

	thread::scope(|scope| {
		for _ in 0..4 {
			scope.spawn(|| {
				assert!(Arc::ptr_eq(&visible.get_registry(&SOUNDS).unwrap(), &sounds));
				assert!(visible.get_registry(&MUSIC).is_none());
				assert_eq!(visible.registries().len(), 1);
			});
		}
	});
}
