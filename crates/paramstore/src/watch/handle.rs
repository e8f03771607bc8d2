//! User-facing handle for a running watcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use super::types::WatchError;
use super::watcher::WatchCommand;

/// Handle to a watcher thread.
///
/// Dropping the handle detaches the thread: it keeps ticking until it
/// detects a change. Call [`stop`](Self::stop) to end it early.
///
/// # Example
///
/// ```ignore
/// let handle = watcher.watch(Duration::from_secs(30), || println!("changed"))?;
///
/// // Graceful shutdown
/// handle.stop();
/// handle.join()?;
/// ```
pub struct WatchHandle {
    /// Command sender; `None` for an idle handle.
    commands: Option<Sender<WatchCommand>>,

    /// Cleared when the thread exits, for any reason.
    running: Arc<AtomicBool>,

    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    pub(crate) fn new(
        commands: Sender<WatchCommand>,
        running: Arc<AtomicBool>,
        thread: JoinHandle<()>,
    ) -> Self {
        Self {
            commands: Some(commands),
            running,
            thread: Some(thread),
        }
    }

    /// A handle with no thread behind it.
    pub(crate) fn idle() -> Self {
        Self {
            commands: None,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Check if the watcher thread is still running.
    ///
    /// Returns `false` once a change was reported, after `stop()` took
    /// effect, or for the idle handle of a no-op watcher.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the watcher thread to stop.
    ///
    /// The change callback is not called. Has no effect once the thread
    /// has exited.
    pub fn stop(&self) {
        if let Some(commands) = &self.commands {
            let _ = commands.try_send(WatchCommand::Stop);
        }
    }

    /// Wait for the watcher thread to exit.
    ///
    /// Blocks until a change is reported or [`stop`](Self::stop) was
    /// called.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Panicked`] if the thread panicked.
    pub fn join(mut self) -> Result<(), WatchError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| WatchError::Panicked),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_handle() {
        let handle = WatchHandle::idle();

        assert!(!handle.is_running());
        handle.stop();
        assert!(handle.join().is_ok());
    }
}
