//! Watch example re-checking parameters in the background.
//!
//! The main thread changes a value after a few seconds; the watcher
//! re-binds the record and calls back once.
//!
//! # Running
//!
//! ```bash
//! cargo run --example watch
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::bounded;
use parking_lot::Mutex;
use paramstore::Parameters;
use paramstore::store::MemoryStore;

#[derive(Debug, Default, Parameters)]
struct Feature {
    #[param("/{{.env}}/feature/enabled")]
    enabled: bool,

    #[param("/{{.env}}/feature/ratio")]
    ratio: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(
        MemoryStore::new()
            .with("/dev/feature/enabled", "false")
            .with("/dev/feature/ratio", "0.1"),
    );
    let feature = Arc::new(Mutex::new(Feature::default()));

    let watcher =
        paramstore::load_with_parameters(store.clone(), &feature, &serde_json::json!({ "env": "dev" }))?;
    println!("Initial: {:?}", feature.lock());

    let (tx, rx) = bounded(1);
    let handle = watcher.watch(Duration::from_millis(500), move || {
        let _ = tx.send(());
    })?;

    thread::sleep(Duration::from_secs(2));
    println!("Enabling the feature...");
    store.set("/dev/feature/enabled", "true");

    rx.recv_timeout(Duration::from_secs(10))?;
    println!("Changed: {:?}", feature.lock());

    handle.join()?;
    Ok(())
}
