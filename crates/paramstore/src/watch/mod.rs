//! Change detection for loaded parameters.
//!
//! A load with template parameters returns an active [`Watcher`]. Starting
//! it spawns a thread that re-runs the same load on a fixed period and
//! calls back once when the bound values drift.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use parking_lot::Mutex;
//!
//! let config = Arc::new(Mutex::new(Config::default()));
//! let watcher = paramstore::load_with_parameters(store, &config, &params)?;
//!
//! let handle = watcher.watch(Duration::from_secs(30), || {
//!     println!("parameters changed, reload the service");
//! })?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  tick   ┌──────────────────┐  drift  ┌─────────────┐
//! │  crossbeam   │────────▶│  watcher thread  │────────▶│ on_changed  │
//! │    tick()    │         │ (re-load + hash) │         │  (once)     │
//! └──────────────┘         └──────────────────┘         └─────────────┘
//!                                   ▲
//!                                   │ stop
//!                            ┌─────────────┐
//!                            │ WatchHandle │
//!                            └─────────────┘
//! ```
//!
//! # Error Handling
//!
//! A failed re-check (store outage, missing key, bad value) is logged at
//! `warn` level and the watcher keeps ticking. The record may have been
//! partially re-bound by the failed attempt.

mod handle;
mod types;
mod watcher;

pub use handle::WatchHandle;
pub use types::WatchError;
pub use watcher::Watcher;
