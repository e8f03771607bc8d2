//! Parameter loader that binds records from a store.
//!
//! The [`Loader`] is the engine behind [`load`] and
//! [`load_with_parameters`]. One load runs these steps, in order:
//!
//! 1. Walk the record and collect its bindings
//! 2. Split them into plain and decrypt groups, keeping declaration order
//! 3. Fetch each group in batches of at most [`MAX_PARAMETERS`] keys,
//!    all plain batches first
//! 4. Convert each fetched value into its field
//!
//! The first failure stops the load. Fields assigned before it keep their
//! new values.
//!
//! # Example
//!
//! ```rust
//! use paramstore::{Loader, Parameters};
//! use paramstore::store::MemoryStore;
//!
//! #[derive(Default, Parameters)]
//! struct Config {
//!     #[param("/{{.env}}/port")]
//!     port: u16,
//! }
//!
//! let store = MemoryStore::new().with("/dev/port", "8080");
//! let mut config = Config::default();
//!
//! Loader::new(&store)
//!     .load_with_parameters(&mut config, &serde_json::json!({ "env": "dev" }))
//!     .unwrap();
//!
//! assert_eq!(config.port, 8080);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::batch::{batches, partition_stable};
use crate::convert::{Bind, convert};
use crate::error::Error;
use crate::fingerprint::{Fingerprint, FingerprintBuilder};
use crate::store::ParameterStore;
use crate::walk::{Binding, FieldMeta, Parameters, Walker};
use crate::watch::Watcher;

/// Most keys fetched in one store request.
pub const MAX_PARAMETERS: usize = 10;

/// Binds records from a [`ParameterStore`].
#[derive(Clone, Copy)]
pub struct Loader<'s> {
    store: &'s dyn ParameterStore,
    max_batch: usize,
}

impl std::fmt::Debug for Loader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("store", &self.store.name())
            .field("max_batch", &self.max_batch)
            .finish()
    }
}

impl<'s> Loader<'s> {
    /// Creates a loader fetching up to [`MAX_PARAMETERS`] keys per request.
    #[must_use]
    pub fn new(store: &'s dyn ParameterStore) -> Self {
        Self {
            store,
            max_batch: MAX_PARAMETERS,
        }
    }

    /// Lowers the number of keys per request, between 1 and
    /// [`MAX_PARAMETERS`].
    #[must_use]
    pub fn with_max_batch(mut self, max: usize) -> Self {
        self.max_batch = max.clamp(1, MAX_PARAMETERS);

        self
    }

    /// Keys per request.
    #[must_use]
    pub const fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Binds `record` without template parameters.
    ///
    /// # Errors
    ///
    /// Returns the first walk, fetch or conversion failure.
    pub fn load<R: Parameters + ?Sized>(&self, record: &mut R) -> Result<Fingerprint, Error> {
        self.run(record, None)
    }

    /// Binds `record`, rendering key templates against `params`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parameters`] when `params` cannot be serialized,
    /// otherwise the first walk, fetch or conversion failure.
    pub fn load_with_parameters<R, P>(&self, record: &mut R, params: &P) -> Result<Fingerprint, Error>
    where
        R: Parameters + ?Sized,
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params).map_err(|source| Error::Parameters { source })?;

        self.run(record, Some(&params))
    }

    /// Binds `record` against already serialized template parameters.
    ///
    /// # Errors
    ///
    /// Returns the first walk, fetch or conversion failure.
    pub fn load_with_value<R: Parameters + ?Sized>(
        &self,
        record: &mut R,
        params: &Value,
    ) -> Result<Fingerprint, Error> {
        self.run(record, Some(params))
    }

    /// Fetches a single parameter and converts it into a fresh `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when the key cannot be fetched, or the
    /// conversion failure.
    pub fn get<T: Bind + Default>(&self, key: &str, decrypt: bool) -> Result<T, Error> {
        let parameter = self.store.get_parameter(key, decrypt)?;
        let mut value = T::default();

        convert(&mut value, &parameter.value, false)
            .map_err(|err| err.for_field(&FieldMeta::new("", std::any::type_name::<T>()), decrypt))?;

        Ok(value)
    }

    fn run<R: Parameters + ?Sized>(
        &self,
        record: &mut R,
        params: Option<&Value>,
    ) -> Result<Fingerprint, Error> {
        let bindings = Walker::collect(record, params)?;
        let (mut plain, mut secret) = partition_stable(bindings, |binding| binding.tag.decrypt);

        tracing::debug!(
            store = self.store.name(),
            plain = plain.len(),
            decrypt = secret.len(),
            "loading parameters"
        );

        let mut fingerprint = FingerprintBuilder::new(params);

        for batch in batches(&mut plain, self.max_batch) {
            self.fetch_batch(batch, false, &mut fingerprint)?;
        }
        for batch in batches(&mut secret, self.max_batch) {
            self.fetch_batch(batch, true, &mut fingerprint)?;
        }

        Ok(fingerprint.finish())
    }

    fn fetch_batch(
        &self,
        batch: &mut [Binding<'_>],
        decrypt: bool,
        fingerprint: &mut FingerprintBuilder,
    ) -> Result<(), Error> {
        let fetched = {
            let keys: Vec<&str> = batch.iter().map(|binding| binding.tag.key.as_str()).collect();
            tracing::debug!(decrypt, size = keys.len(), "fetching parameter batch");

            self.store.get_parameters(&keys, decrypt)?
        };

        if !fetched.invalid.is_empty() {
            return Err(Error::not_found(fetched.invalid));
        }

        let values: HashMap<String, String> = fetched
            .parameters
            .into_iter()
            .map(|parameter| (parameter.name, parameter.value))
            .collect();

        for binding in batch.iter_mut() {
            let value = values
                .get(&binding.tag.key)
                .ok_or_else(|| Error::missing_value(&binding.tag.key))?;

            let outcome = convert(&mut *binding.slot, value, binding.tag.json)
                .map_err(|err| err.for_field(&binding.field, binding.tag.decrypt))?;

            tracing::trace!(
                field = binding.field.name(),
                key = %binding.tag.key,
                ?outcome,
                "bound parameter"
            );

            fingerprint.update(&binding.tag.key, value);
        }

        Ok(())
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Binds a shared record without template parameters.
///
/// The returned watcher never reports changes.
///
/// # Errors
///
/// Returns the first walk, fetch or conversion failure.
pub fn load<R>(store: Arc<dyn ParameterStore>, record: &Arc<Mutex<R>>) -> Result<Watcher<R>, Error>
where
    R: Parameters + Send + 'static,
{
    Loader::new(&*store).load(&mut *record.lock())?;

    Ok(Watcher::noop())
}

/// Binds a shared record, rendering key templates against `params`.
///
/// The returned watcher can re-run the load periodically and report when
/// the bound values drift.
///
/// # Errors
///
/// Returns [`Error::Parameters`] when `params` cannot be serialized,
/// otherwise the first walk, fetch or conversion failure.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use paramstore::{Parameters, load_with_parameters};
/// use paramstore::store::MemoryStore;
///
/// #[derive(Default, Parameters)]
/// struct Config {
///     #[param("/{{.env}}/token,decrypt")]
///     token: String,
/// }
///
/// let store = Arc::new(MemoryStore::new().with_secure("/prd/token", "t0k3n"));
/// let config = Arc::new(Mutex::new(Config::default()));
///
/// let watcher = load_with_parameters(store, &config, &serde_json::json!({ "env": "prd" })).unwrap();
///
/// assert_eq!(config.lock().token, "t0k3n");
/// assert!(watcher.is_active());
/// ```
pub fn load_with_parameters<R, P>(
    store: Arc<dyn ParameterStore>,
    record: &Arc<Mutex<R>>,
    params: &P,
) -> Result<Watcher<R>, Error>
where
    R: Parameters + Send + 'static,
    P: Serialize + ?Sized,
{
    let params = serde_json::to_value(params).map_err(|source| Error::Parameters { source })?;
    let fingerprint = Loader::new(&*store).load_with_value(&mut *record.lock(), &params)?;

    Ok(Watcher::new(store, Arc::clone(record), params, fingerprint))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    struct Pair {
        a: String,
        b: i32,
    }

    impl Parameters for Pair {
        fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), Error> {
            walker.field(FieldMeta::new("a", "String"), "/{{.env}}/a", &mut self.a)?;
            walker.field(FieldMeta::new("b", "i32"), "/{{.env}}/b,decrypt", &mut self.b)
        }
    }

    fn pair() -> Pair {
        Pair {
            a: String::new(),
            b: 0,
        }
    }

    #[test]
    fn test_load_binds_rendered_keys() {
        let store = MemoryStore::new().with("/dev/a", "x").with_secure("/dev/b", "7");
        let mut record = pair();

        Loader::new(&store)
            .load_with_parameters(&mut record, &json!({ "env": "dev" }))
            .unwrap();

        assert_eq!(record.a, "x");
        assert_eq!(record.b, 7);
    }

    #[test]
    fn test_not_found_names_all_keys() {
        let store = MemoryStore::new();
        let mut record = pair();

        let err = Loader::new(&store)
            .with_max_batch(1)
            .load(&mut record)
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid parameters: /{{.env}}/a");
    }

    #[test]
    fn test_conversion_error_names_field_and_redacts() {
        let store = MemoryStore::new().with("/dev/a", "x").with_secure("/dev/b", "seven");
        let mut record = pair();

        let err = Loader::new(&store)
            .load_with_parameters(&mut record, &json!({ "env": "dev" }))
            .unwrap_err();

        assert_eq!(err.field(), Some("b"));
        assert!(!err.to_string().contains("seven"));
        assert_eq!(record.a, "x");
    }

    #[test]
    fn test_fingerprint_tracks_values() {
        let store = MemoryStore::new().with("/dev/a", "x").with_secure("/dev/b", "7");
        let params = json!({ "env": "dev" });
        let loader = Loader::new(&store);

        let first = loader.load_with_value(&mut pair(), &params).unwrap();
        let again = loader.load_with_value(&mut pair(), &params).unwrap();
        assert_eq!(first, again);

        store.set("/dev/a", "y");
        let changed = loader.load_with_value(&mut pair(), &params).unwrap();
        assert_ne!(first, changed);
    }

    #[test]
    fn test_get_single_parameter() {
        let store = MemoryStore::new().with("/timeout", "1m");
        let loader = Loader::new(&store);

        let timeout: std::time::Duration = loader.get("/timeout", false).unwrap();
        assert_eq!(timeout, std::time::Duration::from_secs(60));

        let err = loader.get::<u8>("/missing", false).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_max_batch_clamped() {
        let store = MemoryStore::new();

        assert_eq!(Loader::new(&store).with_max_batch(0).max_batch(), 1);
        assert_eq!(Loader::new(&store).with_max_batch(50).max_batch(), MAX_PARAMETERS);
    }
}
