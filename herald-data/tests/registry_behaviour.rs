//! Behavioural coverage for registry persistence.

mod support;

use std::cell::RefCell;

use herald_data::SourceRegistry;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{Sandbox, write_text};

/// World state for registry scenarios.
#[derive(Debug)]
struct RegistryWorld {
    sandbox: Sandbox,
    registry: RefCell<Option<SourceRegistry>>,
}

impl RegistryWorld {
    fn open(&self) {
        let registry = SourceRegistry::open(&self.sandbox.registry_path())
            .unwrap_or_else(|err| panic!("failed to open registry: {err}"));
        self.registry.replace(Some(registry));
    }

    fn with_registry<T>(&self, action: impl FnOnce(&mut SourceRegistry) -> T) -> T {
        let mut borrowed = self.registry.borrow_mut();
        let registry = borrowed
            .as_mut()
            .unwrap_or_else(|| panic!("the registry must be opened first"));
        action(registry)
    }
}

#[fixture]
fn world() -> RegistryWorld {
    RegistryWorld {
        sandbox: Sandbox::new(),
        registry: RefCell::new(None),
    }
}

fn clean(name: &str) -> &str {
    name.trim_matches('"')
}

#[given("an empty registry")]
fn empty_registry(world: &RegistryWorld) {
    world.open();
}

#[given("a registry file containing invalid JSON")]
fn corrupt_registry(world: &RegistryWorld) {
    write_text(&world.sandbox.registry_path(), "{\"items\": [");
}

#[when("the source {name:word} is registered")]
fn register_source(world: &RegistryWorld, name: String) {
    let key = clean(&name);
    world.with_registry(|registry| {
        registry
            .register(key, &format!("{key}.json"), None)
            .unwrap_or_else(|err| panic!("registration failed: {err}"));
    });
}

#[when("the source {name:word} is disabled")]
fn disable_source(world: &RegistryWorld, name: String) {
    let found = world.with_registry(|registry| {
        registry
            .set_enabled(clean(&name), false)
            .unwrap_or_else(|err| panic!("disabling failed: {err}"))
    });
    assert!(found, "source {name} should exist");
}

#[when("the registry is reopened")]
fn reopen_registry(world: &RegistryWorld) {
    world.open();
}

#[then("the source {name:word} points at its own file")]
fn points_at_file(world: &RegistryWorld, name: String) {
    let key = clean(&name);
    let file = world.with_registry(|registry| {
        registry
            .get(key)
            .map(|source| source.file().to_owned())
            .unwrap_or_else(|| panic!("source {key} missing after reopen"))
    });
    assert_eq!(file, format!("{key}.json"));
}

#[then("the registry lists no sources")]
fn lists_nothing(world: &RegistryWorld) {
    assert!(world.with_registry(|registry| registry.list().is_empty()));
}

#[then("only {name:word} is enabled")]
fn only_enabled(world: &RegistryWorld, name: String) {
    let enabled: Vec<String> =
        world.with_registry(|registry| registry.get_enabled().into_keys().collect());
    assert_eq!(enabled, vec![clean(&name).to_owned()]);
}

#[scenario(path = "tests/features/source_registry.feature", index = 0)]
fn registered_sources_survive_restart(world: RegistryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/source_registry.feature", index = 1)]
fn corrupt_registry_starts_empty(world: RegistryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/source_registry.feature", index = 2)]
fn disabled_sources_left_out(world: RegistryWorld) {
    let _ = world;
}
