//! Performance benchmarks for paramstore binding.
//!
//! Run with: `cargo bench -p paramstore`
//!
//! All records load from an in-memory store, so the numbers measure
//! annotation parsing, template rendering, batching and conversion.

#![allow(unused, dead_code, clippy::struct_field_names)]

use std::time::Duration;

use paramstore::store::MemoryStore;
use paramstore::{Loader, Parameters};
use serde_json::{Value, json};

fn main() {
    divan::main();
}

fn store() -> MemoryStore {
    let store = MemoryStore::new()
        .with("/bench/host", "localhost")
        .with("/bench/port", "8080")
        .with("/bench/debug", "true")
        .with("/bench/timeout", "1m30s")
        .with("/bench/ratio", "0.75")
        .with("/bench/hosts", "a,b,c,d")
        .with("/bench/ports", "1,2,3,4,5,6,7,8")
        .with("/bench/limits", r#"{"rps": 100, "burst": 20}"#)
        .with_secure("/bench/token", "t0k3n")
        .with("/prd/bench/host", "prd.internal");

    for i in 0..40 {
        store.set(format!("/bench/field/{i}"), format!("value_{i}"));
    }

    store
}

fn params() -> Value {
    json!({ "env": "prd" })
}

// ============================================================================
// Small Record (3 fields)
// ============================================================================

#[derive(Default, Parameters)]
struct SmallRecord {
    #[param("/bench/host")]
    host: String,
    #[param("/bench/port")]
    port: u16,
    #[param("/bench/debug")]
    debug: bool,
}

#[divan::bench]
fn small_record(bencher: divan::Bencher) {
    let store = store();
    bencher.bench_local(|| {
        let mut record = SmallRecord::default();
        Loader::new(&store).load(&mut record).map(|_| record)
    });
}

// ============================================================================
// Mixed Record (every conversion kind, one decrypted)
// ============================================================================

#[derive(Default, serde::Deserialize)]
struct Limits {
    rps: u32,
    burst: u32,
}

paramstore::json_parameter!(Limits);

#[derive(Default, Parameters)]
struct MixedRecord {
    #[param("/bench/host")]
    host: String,
    #[param("/bench/port")]
    port: u16,
    #[param("/bench/timeout")]
    timeout: Duration,
    #[param("/bench/ratio")]
    ratio: f64,
    #[param("/bench/hosts")]
    hosts: Vec<String>,
    #[param("/bench/ports")]
    ports: Vec<u16>,
    #[param("/bench/limits,json")]
    limits: Limits,
    #[param("/bench/token,decrypt")]
    token: Option<String>,
}

#[divan::bench]
fn mixed_record(bencher: divan::Bencher) {
    let store = store();
    bencher.bench_local(|| {
        let mut record = MixedRecord::default();
        Loader::new(&store).load(&mut record).map(|_| record)
    });
}

// ============================================================================
// Templated Record
// ============================================================================

#[derive(Default, Parameters)]
struct TemplatedRecord {
    #[param("/{{.env}}/bench/host")]
    host: String,
}

#[divan::bench]
fn templated_record(bencher: divan::Bencher) {
    let store = store();
    let params = params();
    bencher.bench_local(|| {
        let mut record = TemplatedRecord::default();
        Loader::new(&store)
            .load_with_value(&mut record, &params)
            .map(|_| record)
    });
}

// ============================================================================
// Batched Record (40 keys, four requests)
// ============================================================================

struct WideRecord {
    keys: Vec<String>,
    fields: Vec<String>,
}

impl WideRecord {
    fn new() -> Self {
        Self {
            keys: (0..40).map(|i| format!("/bench/field/{i}")).collect(),
            fields: vec![String::new(); 40],
        }
    }
}

impl Parameters for WideRecord {
    fn walk<'a>(
        &'a mut self,
        walker: &mut paramstore::Walker<'a, '_>,
    ) -> Result<(), paramstore::Error> {
        let Self { keys, fields } = self;

        for (slot, key) in fields.iter_mut().zip(keys.iter()) {
            walker.field(paramstore::FieldMeta::new("field", "String"), key, slot)?;
        }

        Ok(())
    }
}

#[divan::bench]
fn wide_record(bencher: divan::Bencher) {
    let store = store();
    bencher.bench_local(|| {
        let mut record = WideRecord::new();
        Loader::new(&store).load(&mut record).map(|_| record)
    });
}

// ============================================================================
// Primitives
// ============================================================================

#[divan::bench(args = ["1h", "1h30m15s", "2.5ms", "1500000000"])]
fn parse_duration(text: &str) -> Option<Duration> {
    paramstore::convert::parse_duration_or_nanos(divan::black_box(text)).ok()
}

#[divan::bench]
fn render_template() -> Option<String> {
    paramstore::template::render(
        divan::black_box("/{{.env}}/{{.service}}/db/url"),
        &json!({ "env": "prd", "service": "billing" }),
    )
    .ok()
}
