//! Nested record tests.
//!
//! Covers flattened records, optional and boxed nesting, absent roots and
//! key templates shared across nesting levels.

#![allow(clippy::pedantic)]

use paramstore::store::MemoryStore;
use paramstore::{Error, Loader, Parameters};
use serde_json::json;

// ============================================================================
// Test Configuration Types
// ============================================================================

#[derive(Debug, Default, Parameters)]
struct Database {
    #[param("/{{.env}}/db/host")]
    host: String,

    #[param("/{{.env}}/db/port")]
    port: u16,

    #[param("/{{.env}}/db/password,decrypt")]
    password: String,
}

#[derive(Debug, Default, Parameters)]
struct Cache {
    #[param("/{{.env}}/cache/url")]
    url: String,
}

#[derive(Debug, Default, Parameters)]
struct App {
    #[param("/{{.env}}/name")]
    name: String,

    #[param(flatten)]
    database: Database,

    #[param(flatten)]
    cache: Option<Cache>,

    #[param(flatten)]
    replica: Box<Database>,

    workers: usize,
}

fn app_store() -> MemoryStore {
    MemoryStore::new()
        .with("/prd/name", "api")
        .with("/prd/db/host", "db.internal")
        .with("/prd/db/port", "5432")
        .with_secure("/prd/db/password", "pw")
        .with("/prd/cache/url", "redis://cache")
}

// ============================================================================
// Flatten Tests
// ============================================================================

#[test]
fn test_nested_records_bound() {
    let store = app_store();
    let mut app = App {
        workers: 4,
        ..App::default()
    };

    Loader::new(&store)
        .load_with_parameters(&mut app, &json!({ "env": "prd" }))
        .unwrap();

    assert_eq!(app.name, "api");
    assert_eq!(app.database.host, "db.internal");
    assert_eq!(app.database.port, 5432);
    assert_eq!(app.database.password, "pw");
    assert_eq!(app.workers, 4);
}

#[test]
fn test_optional_nested_is_allocated() {
    let store = app_store();
    let mut app = App::default();
    assert!(app.cache.is_none());

    Loader::new(&store)
        .load_with_parameters(&mut app, &json!({ "env": "prd" }))
        .unwrap();

    assert_eq!(app.cache.as_ref().map(|c| c.url.as_str()), Some("redis://cache"));
}

#[test]
fn test_boxed_nested_shares_keys() {
    let store = app_store();
    let mut app = App::default();

    Loader::new(&store)
        .load_with_parameters(&mut app, &json!({ "env": "prd" }))
        .unwrap();

    assert_eq!(app.replica.host, app.database.host);
    assert_eq!(app.replica.password, "pw");
}

#[test]
fn test_nested_failure_reports_nested_field() {
    let store = app_store().with("/prd/db/port", "not-a-port");
    let mut app = App::default();

    let err = Loader::new(&store)
        .load_with_parameters(&mut app, &json!({ "env": "prd" }))
        .unwrap_err();

    assert_eq!(err.field(), Some("port"));
}

// ============================================================================
// Root Record Tests
// ============================================================================

#[test]
fn test_absent_root_is_invalid() {
    let store = app_store();
    let mut root: Option<Cache> = None;

    let err = Loader::new(&store).load(&mut root).unwrap_err();

    assert!(matches!(err, Error::InvalidType { type_name: None }));
    assert_eq!(err.to_string(), "nil type");
}

#[test]
fn test_present_and_boxed_roots() {
    let store = app_store();

    let mut root = Some(Cache::default());
    Loader::new(&store)
        .load_with_parameters(&mut root, &json!({ "env": "prd" }))
        .unwrap();
    assert_eq!(root.map(|c| c.url), Some("redis://cache".to_string()));

    let mut boxed = Box::new(Cache::default());
    Loader::new(&store)
        .load_with_parameters(&mut boxed, &json!({ "env": "prd" }))
        .unwrap();
    assert_eq!(boxed.url, "redis://cache");
}

#[test]
fn test_record_without_bindings() {
    #[derive(Default, Parameters)]
    struct Nothing {
        #[param("-")]
        skipped: String,
        plain: u8,
    }

    let store = MemoryStore::new();
    let mut nothing = Nothing::default();

    Loader::new(&store).load(&mut nothing).unwrap();
    assert!(nothing.skipped.is_empty());
    assert_eq!(nothing.plain, 0);
}

// ============================================================================
// Template Tests
// ============================================================================

#[test]
fn test_unrendered_template_is_used_as_written() {
    let store = MemoryStore::new().with("/{{.env}}/cache/url", "literal");
    let mut cache = Cache::default();

    Loader::new(&store)
        .load_with_parameters(&mut cache, &json!({ "region": "eu" }))
        .unwrap();

    assert_eq!(cache.url, "literal");
}

#[test]
fn test_load_without_parameters_keeps_template_text() {
    let store = MemoryStore::new().with("/{{.env}}/cache/url", "raw");
    let mut cache = Cache::default();

    Loader::new(&store).load(&mut cache).unwrap();

    assert_eq!(cache.url, "raw");
}

#[test]
fn test_nested_template_parameters() {
    #[derive(Default, Parameters)]
    struct Service {
        #[param("/{{.env.name}}/{{.service}}/url")]
        url: String,
    }

    let store = MemoryStore::new().with("/prd/billing/url", "https://billing");
    let mut service = Service::default();

    Loader::new(&store)
        .load_with_parameters(
            &mut service,
            &json!({ "env": { "name": "prd" }, "service": "billing" }),
        )
        .unwrap();

    assert_eq!(service.url, "https://billing");
}
