//! The process-wide default registry.
//!
//! These free functions operate on one [`InstanceRegistry`] created lazily on
//! first use and attached to [`DEFAULT_AMBIENT_SLOT`](crate::DEFAULT_AMBIENT_SLOT).
//! The mode is read from `APP_ENV` on every call.
//!
//! # Examples
//!
//! ```
//! use shared_instance_registry::get_shared_instance;
//! use std::sync::Arc;
//!
//! struct DbClient {
//!     url: String,
//! }
//!
//! let a = get_shared_instance("main-db", || DbClient {
//!     url: "postgres://localhost/main".to_string(),
//! })
//! .unwrap();
//! let b = get_shared_instance::<DbClient, _>("main-db", || unreachable!()).unwrap();
//!
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(a.url, "postgres://localhost/main");
//! ```

use std::sync::{Arc, LazyLock};

use crate::{ExecutionMode, InstanceRegistry, RegistryError, RegistryEvent, SharedInstanceApi};

static DEFAULT_REGISTRY: LazyLock<InstanceRegistry> = LazyLock::new(InstanceRegistry::new);

/// The default registry behind this module's free functions.
pub fn default_registry() -> &'static InstanceRegistry {
    &DEFAULT_REGISTRY
}

/// Returns the shared instance for `instance_key`, constructing it with `factory`
/// the first time the key is requested.
///
/// # Arguments
///
/// * `instance_key` - Non-empty name of the shared resource. Callers that should
///   share an instance must use the same key.
/// * `factory` - Builds the instance. Runs at most once per key per store.
///
/// # Errors
///
/// - `instance_key` is empty
/// - The key already holds a value of another type
///
/// # Panics
///
/// A panic in `factory` propagates to the caller; the key stays unconstructed.
pub fn get_shared_instance<T, F>(instance_key: &str, factory: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> T,
{
    DEFAULT_REGISTRY.get_shared_instance(instance_key, factory)
}

/// Returns the shared instance for `instance_key`, constructing it with a
/// fallible `factory` the first time the key is requested.
///
/// A factory error is returned unchanged and leaves the key unconstructed.
///
/// # Examples
///
/// ```
/// use shared_instance_registry::{try_get_shared_instance, RegistryError};
///
/// #[derive(Debug)]
/// enum ConnectError {
///     Unreachable,
///     Registry(RegistryError),
/// }
///
/// impl From<RegistryError> for ConnectError {
///     fn from(err: RegistryError) -> Self {
///         ConnectError::Registry(err)
///     }
/// }
///
/// let failed =
///     try_get_shared_instance::<String, _, _>("replica-db", || Err(ConnectError::Unreachable));
/// assert!(matches!(failed, Err(ConnectError::Unreachable)));
///
/// let client =
///     try_get_shared_instance("replica-db", || Ok::<_, ConnectError>("connected".to_string()))
///         .unwrap();
/// assert_eq!(&*client, "connected");
/// ```
pub fn try_get_shared_instance<T, E, F>(instance_key: &str, factory: F) -> Result<Arc<T>, E>
where
    T: Send + Sync + 'static,
    E: From<RegistryError>,
    F: FnOnce() -> Result<T, E>,
{
    DEFAULT_REGISTRY.try_get_shared_instance(instance_key, factory)
}

/// Retrieves an already constructed instance without constructing it.
pub fn get<T: Send + Sync + 'static>(instance_key: &str) -> Result<Arc<T>, RegistryError> {
    DEFAULT_REGISTRY.get(instance_key)
}

/// Checks whether an instance has been constructed for `instance_key` in the
/// current mode's store.
///
/// # Examples
///
/// ```
/// use shared_instance_registry::{contains, get_shared_instance};
///
/// assert!(!contains("search-index").unwrap());
/// get_shared_instance("search-index", || 0u64).unwrap();
/// assert!(contains("search-index").unwrap());
/// ```
pub fn contains(instance_key: &str) -> Result<bool, RegistryError> {
    DEFAULT_REGISTRY.contains(instance_key)
}

/// The mode the next call will run under.
pub fn mode() -> ExecutionMode {
    DEFAULT_REGISTRY.mode()
}

/// Sets a tracing callback that will be invoked on every interaction with the
/// default registry.
///
/// # Example
/// ```rust
/// use shared_instance_registry::set_trace_callback;
///
/// set_trace_callback(|event| println!("[registry-trace] {event}"));
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    DEFAULT_REGISTRY.set_trace_callback(callback)
}

/// Clears the tracing callback (disables registry tracing).
pub fn clear_trace_callback() {
    DEFAULT_REGISTRY.clear_trace_callback()
}

#[doc(hidden)]
pub fn clear() {
    DEFAULT_REGISTRY.clear()
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
