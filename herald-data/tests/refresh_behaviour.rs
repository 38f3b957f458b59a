//! Behavioural coverage for refreshing and resetting tracked documents.

mod support;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use herald_core::{NO_UPDATE, Source};
use herald_data::{RefreshEngine, RefreshOutcome};
use herald_fs::BaseDir;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use support::Sandbox;

const FEED: &str = "feed.json";

/// World state for refresh scenarios.
#[derive(Debug)]
struct RefreshWorld {
    sandbox: Sandbox,
    engine: RefreshEngine,
    source: RefCell<Option<Source>>,
    reply: RefCell<Option<String>>,
}

impl RefreshWorld {
    fn source(&self) -> Source {
        self.source
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("a source must be configured"))
    }

    fn reply(&self) -> String {
        self.reply
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("an operation must have run"))
    }

    fn feed_items(&self) -> Vec<Value> {
        match self.sandbox.read_document(FEED) {
            Value::Array(items) => items,
            other => panic!("feed is not a list: {other}"),
        }
    }
}

#[fixture]
fn world() -> RefreshWorld {
    let sandbox = Sandbox::new();
    let base = BaseDir::open(&sandbox.data_dir())
        .unwrap_or_else(|err| panic!("failed to open base dir: {err}"));
    RefreshWorld {
        sandbox,
        engine: RefreshEngine::new(base),
        source: RefCell::new(None),
        reply: RefCell::new(None),
    }
}

fn feed_source(file: &str) -> Source {
    Source::new("feed", file).unwrap_or_else(|err| panic!("invalid source: {err}"))
}

#[given("a feed with two unannounced items and one announced item")]
fn feed_with_items(world: &RefreshWorld) {
    world.sandbox.write_document(
        FEED,
        &json!([
            {"id": 1, "title": "first"},
            {"id": 2, "title": "second", "pushed": false},
            {"id": 3, "title": "third", "pushed": true}
        ]),
    );
    world.source.replace(Some(feed_source(FEED)));
}

#[given("a source pointing outside the data directory")]
fn escaping_source(world: &RefreshWorld) {
    world.source.replace(Some(feed_source("../../etc/passwd")));
}

#[given("a source pointing at a file that does not exist")]
fn missing_source(world: &RefreshWorld) {
    world.source.replace(Some(feed_source("absent.json")));
}

#[when("the feed is refreshed")]
fn refresh_feed(world: &RefreshWorld) {
    let reply = world.engine.refresh_source(&world.source());
    world.reply.replace(Some(reply));
}

#[when("the feed is reset")]
fn reset_feed(world: &RefreshWorld) {
    let reply = world.engine.reset_source(&world.source());
    world.reply.replace(Some(reply));
}

#[then("the two unannounced items are returned")]
fn two_items_returned(world: &RefreshWorld) {
    let returned: Value = serde_json::from_str(&world.reply())
        .unwrap_or_else(|err| panic!("reply is not JSON: {err}"));
    assert_eq!(
        returned,
        json!([
            {"id": 1, "title": "first"},
            {"id": 2, "title": "second", "pushed": false}
        ])
    );
}

#[then("every item in the feed is marked as pushed")]
fn all_pushed(world: &RefreshWorld) {
    assert!(
        world
            .feed_items()
            .iter()
            .all(|item| item.get("pushed") == Some(&Value::Bool(true)))
    );
}

#[then("no item in the feed is marked as pushed")]
fn none_pushed(world: &RefreshWorld) {
    assert!(
        world
            .feed_items()
            .iter()
            .all(|item| item.get("pushed") == Some(&Value::Bool(false)))
    );
}

#[then("the reply says there is no update")]
fn no_update(world: &RefreshWorld) {
    assert_eq!(world.reply(), NO_UPDATE);
}

#[then("the reply reports {count} items reset")]
fn reports_reset(world: &RefreshWorld, count: usize) {
    assert_eq!(world.reply(), format!("Reset {count} items in feed"));
}

#[then("the reply is an error mentioning the base directory")]
fn containment_error(world: &RefreshWorld) {
    let reply = world.reply();
    assert!(
        reply.starts_with("[ERR] feed: path escapes base dir"),
        "unexpected reply: {reply}"
    );
}

#[then("the reply says the JSON was not found")]
fn not_found(world: &RefreshWorld) {
    assert_eq!(world.reply(), "[ERR] JSON not found: absent.json");
}

#[scenario(path = "tests/features/refresh_source.feature", index = 0)]
fn announcing_new_items_once(world: RefreshWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/refresh_source.feature", index = 1)]
fn resetting_after_refresh(world: RefreshWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/refresh_source.feature", index = 2)]
fn refusing_escaping_file(world: RefreshWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/refresh_source.feature", index = 3)]
fn reporting_missing_document(world: RefreshWorld) {
    let _ = world;
}

#[rstest]
fn concurrent_refreshes_announce_each_item_once() {
    let sandbox = Sandbox::new();
    let items: Vec<Value> = (0..50).map(|id| json!({"id": id})).collect();
    sandbox.write_document(FEED, &Value::Array(items));
    let base = BaseDir::open(&sandbox.data_dir())
        .unwrap_or_else(|err| panic!("failed to open base dir: {err}"));
    let engine = Arc::new(RefreshEngine::new(base));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let worker = Arc::clone(&engine);
            thread::spawn(move || worker.refresh(&feed_source(FEED)))
        })
        .collect();
    let announced: usize = handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(Ok(RefreshOutcome::Collected(items))) => items.len(),
            Ok(Ok(RefreshOutcome::NothingNew)) => 0,
            Ok(Err(err)) => panic!("refresh failed: {err}"),
            Err(_) => panic!("refresh thread panicked"),
        })
        .sum();

    assert_eq!(announced, 50);
}

#[rstest]
fn bulk_refresh_labels_each_source() {
    let sandbox = Sandbox::new();
    sandbox.write_document("a.json", &json!({"k1": {"v": 1}, "k2": {"v": 2}}));
    sandbox.write_document("b.json", &json!({"v": 3}));
    let base = BaseDir::open(&sandbox.data_dir())
        .unwrap_or_else(|err| panic!("failed to open base dir: {err}"));
    let engine = RefreshEngine::new(base);
    let sources: BTreeMap<String, Source> = [("alpha", "a.json"), ("beta", "b.json")]
        .into_iter()
        .map(|(name, file)| {
            let source =
                Source::new(name, file).unwrap_or_else(|err| panic!("invalid source: {err}"));
            (name.to_owned(), source)
        })
        .collect();

    let reply = engine.refresh_multiple_sources(&sources);

    let (alpha, beta) = reply
        .split_once("\n\n")
        .unwrap_or_else(|| panic!("expected two sections: {reply}"));
    assert!(alpha.starts_with("[alpha]\n"), "{alpha}");
    assert!(beta.starts_with("[beta]\n"), "{beta}");
    assert_eq!(engine.refresh_multiple_sources(&sources), NO_UPDATE);
}
