//! Error type for parameter watching.

use miette::Diagnostic;
use thiserror::Error;

/// Error type for watch operations.
///
/// Failures of individual watch ticks are not reported here: they are
/// logged and the watcher keeps ticking.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum WatchError {
    /// Failed to start the watcher thread.
    #[error("failed to start parameter watcher: {message}")]
    #[diagnostic(code(paramstore::watch::init_failed))]
    InitFailed {
        /// Human-readable error message.
        message: String,
        /// The underlying spawn error, if available.
        #[source]
        source: Option<std::io::Error>,
    },

    /// The watch period was zero.
    #[error("watch period must be greater than zero")]
    #[diagnostic(
        code(paramstore::watch::invalid_period),
        help("pass a period such as `Duration::from_secs(30)`")
    )]
    InvalidPeriod,

    /// The watcher thread panicked, most likely inside the change callback.
    #[error("parameter watcher thread panicked")]
    #[diagnostic(code(paramstore::watch::panicked))]
    Panicked,
}

impl WatchError {
    /// Create a new `InitFailed` error.
    pub fn init_failed(message: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Self::InitFailed {
            message: message.into(),
            source,
        }
    }
}
