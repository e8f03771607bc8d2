//! Background re-check of a loaded record.
//!
//! A [`Watcher`] holds everything needed to repeat a load: the store, the
//! shared record, a private copy of the template parameters and the
//! fingerprint of the last load. Once started, its thread re-runs the load
//! on every tick and fires the callback the first time the fingerprint
//! differs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, bounded, never, select, tick};
use parking_lot::Mutex;
use serde_json::Value;

use super::handle::WatchHandle;
use super::types::WatchError;
use crate::error::Error;
use crate::fingerprint::Fingerprint;
use crate::loader::Loader;
use crate::store::ParameterStore;
use crate::walk::Parameters;

/// Commands sent to the watcher thread.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WatchCommand {
    /// Stop without calling back.
    Stop,
}

/// State needed to repeat a load.
struct WatchState<R> {
    store: Arc<dyn ParameterStore>,
    record: Arc<Mutex<R>>,
    params: Value,
    fingerprint: Fingerprint,
}

impl<R: Parameters> WatchState<R> {
    /// Re-runs the load; `true` when the fingerprint changed.
    fn check(&mut self) -> Result<bool, Error> {
        let mut record = self.record.lock();
        let fingerprint = Loader::new(&*self.store).load_with_value(&mut *record, &self.params)?;

        if fingerprint == self.fingerprint {
            tracing::trace!(%fingerprint, "parameters unchanged");
            return Ok(false);
        }

        tracing::info!(
            previous = %self.fingerprint,
            current = %fingerprint,
            "parameters changed"
        );
        self.fingerprint = fingerprint;

        Ok(true)
    }
}

/// Watches a loaded record for parameter drift.
///
/// Returned by [`load`](crate::load) and
/// [`load_with_parameters`](crate::load_with_parameters). Only the latter
/// produces an active watcher; the former returns a no-op one.
///
/// The watcher is one-shot: after the first detected change it calls back
/// once and stops. Load again to obtain a fresh watcher.
///
/// Each tick re-binds the shared record under its lock, so the record
/// reflects the store's current values even before the callback fires.
pub struct Watcher<R> {
    state: Option<WatchState<R>>,
}

impl<R: Parameters + Send + 'static> Watcher<R> {
    pub(crate) fn new(
        store: Arc<dyn ParameterStore>,
        record: Arc<Mutex<R>>,
        params: Value,
        fingerprint: Fingerprint,
    ) -> Self {
        Self {
            state: Some(WatchState {
                store,
                record,
                params,
                fingerprint,
            }),
        }
    }

    /// A watcher that never reports a change.
    #[must_use]
    pub fn noop() -> Self {
        Self { state: None }
    }

    /// Whether `watch` starts a thread.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Fingerprint of the last load, for an active watcher.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.state.as_ref().map(|state| &state.fingerprint)
    }

    /// Starts re-checking every `period`.
    ///
    /// `on_changed` runs on the watcher thread, at most once. Failed
    /// re-checks are logged at `warn` level and do not stop the watcher.
    ///
    /// A no-op watcher returns an idle handle and never calls back.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidPeriod`] for a zero period, or
    /// [`WatchError::InitFailed`] if the thread cannot be spawned.
    pub fn watch<F>(self, period: Duration, on_changed: F) -> Result<WatchHandle, WatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(state) = self.state else {
            return Ok(WatchHandle::idle());
        };

        if period.is_zero() {
            return Err(WatchError::InvalidPeriod);
        }

        let (command_tx, command_rx) = bounded::<WatchCommand>(1);
        let running = Arc::new(AtomicBool::new(true));
        let guard = RunningGuard(Arc::clone(&running));

        let thread = thread::Builder::new()
            .name("paramstore-watcher".to_string())
            .spawn(move || {
                let _guard = guard;
                watch_loop(state, period, command_rx, on_changed);
            })
            .map_err(|e| {
                WatchError::init_failed(format!("failed to spawn watcher thread: {e}"), Some(e))
            })?;

        Ok(WatchHandle::new(command_tx, running, thread))
    }
}

impl<R> std::fmt::Debug for Watcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("active", &self.state.is_some())
            .field(
                "fingerprint",
                &self.state.as_ref().map(|state| state.fingerprint.as_str()),
            )
            .finish()
    }
}

/// Clears the running flag when the thread exits, even by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum Event {
    Tick,
    Stop,
    Detached,
}

/// Main watcher loop running in a separate thread.
fn watch_loop<R, F>(
    mut state: WatchState<R>,
    period: Duration,
    mut commands: Receiver<WatchCommand>,
    on_changed: F,
) where
    R: Parameters,
    F: FnOnce(),
{
    let ticker = tick(period);

    loop {
        let event = select! {
            recv(commands) -> cmd => match cmd {
                Ok(WatchCommand::Stop) => Event::Stop,
                Err(_) => Event::Detached,
            },
            recv(ticker) -> _ => Event::Tick,
        };

        match event {
            Event::Stop => {
                tracing::debug!("parameter watcher stopped");
                return;
            }

            // The handle was dropped; keep ticking until a change.
            Event::Detached => commands = never(),

            Event::Tick => match state.check() {
                Ok(true) => {
                    on_changed();
                    return;
                }
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "parameter re-check failed"),
            },
        }
    }
}
