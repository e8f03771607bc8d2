//! Basic example binding a record from an in-memory store.
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;

use paramstore::store::MemoryStore;
use paramstore::{Loader, Parameters};
use serde::Serialize;

#[derive(Debug, Default, Parameters)]
struct Database {
    #[param("/{{.env}}/db/url")]
    url: String,

    #[param("/{{.env}}/db/password,decrypt")]
    password: String,

    #[param("/{{.env}}/db/pool")]
    pool: Option<u32>,
}

#[derive(Debug, Default, Parameters)]
struct Config {
    #[param("/{{.env}}/name")]
    name: String,

    #[param("/{{.env}}/timeout")]
    timeout: Duration,

    #[param("/{{.env}}/hosts")]
    hosts: Vec<String>,

    #[param(flatten)]
    database: Database,
}

#[derive(Serialize)]
struct Env {
    env: &'static str,
}

fn main() -> miette::Result<()> {
    let store = MemoryStore::new()
        .with("/prd/name", "billing")
        .with("/prd/timeout", "1m30s")
        .with("/prd/hosts", "a.internal,b.internal")
        .with("/prd/db/url", "postgres://db.internal/billing")
        .with_secure("/prd/db/password", "s3cr3t")
        .with("/prd/db/pool", "16");

    let mut config = Config::default();
    let fingerprint = Loader::new(&store).load_with_parameters(&mut config, &Env { env: "prd" })?;

    println!("Loaded {config:#?}");
    println!("Fingerprint: {fingerprint}");

    // A bad value reports the field and type.
    store.set("/prd/db/pool", "many");
    if let Err(err) = Loader::new(&store).load_with_parameters(&mut config, &Env { env: "prd" }) {
        println!("\n{:?}", miette::Report::new(err));
    }

    Ok(())
}
