//! Macros for creating shared-instance registries.
//!
//! This module provides a macro-based approach to create keyed, construct-once
//! registries whose production store is a module-private static.

/// Creates a complete shared-instance registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A production store static (hidden)
/// - A handle to an ambient slot for development mode (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `SharedInstanceApi`
/// - Free functions delegating to `Api`
///
/// The ambient slot defaults to [`DEFAULT_AMBIENT_SLOT`](crate::DEFAULT_AMBIENT_SLOT);
/// pass `slot = "..."` to attach the registry to another one.
///
/// # Examples
///
/// ```rust
/// use shared_instance_registry::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(db);
///
/// struct Client { url: String }
///
/// let a: Arc<Client> = db::get_shared_instance("main-db", || Client {
///     url: "postgres://localhost/main".to_string(),
/// })
/// .unwrap();
/// let b: Arc<Client> = db::get_shared_instance("main-db", || unreachable!()).unwrap();
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(b.url, "postgres://localhost/main");
/// ```
///
/// # Trait-Based Usage
///
/// ```rust
/// use shared_instance_registry::{define_registry, SharedInstanceApi};
///
/// define_registry!(app, slot = "__APP_DOC_INSTANCES__");
///
/// let value = app::API.get_shared_instance("answer", || 42u32).unwrap();
/// assert_eq!(*value, 42);
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        $crate::define_registry!($name, slot = $crate::DEFAULT_AMBIENT_SLOT);
    };
    ($name:ident, slot = $slot:expr) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock, Mutex};

            // Production store (module-private)
            static LOCAL: LazyLock<$crate::InstanceStore> =
                LazyLock::new($crate::InstanceStore::new);

            // Development store, looked up in the process-wide slot table
            static AMBIENT: LazyLock<Arc<$crate::InstanceStore>> =
                LazyLock::new(|| $crate::ambient_slot($slot));

            static TRACE: $crate::TraceSlot = Mutex::new(None);

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `SharedInstanceApi` trait's
            /// default implementations. This struct only provides access to the statics.
            pub struct Api;

            impl $crate::SharedInstanceApi for Api {
                fn trace(&self) -> &$crate::TraceSlot {
                    &TRACE
                }

                fn local_store(&self) -> &$crate::InstanceStore {
                    &LOCAL
                }

                fn ambient_store(&self) -> &$crate::InstanceStore {
                    &AMBIENT
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Return the shared instance for `instance_key`, constructing it on first use.
            pub fn get_shared_instance<T, F>(
                instance_key: &str,
                factory: F,
            ) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> T,
            {
                use $crate::SharedInstanceApi;
                API.get_shared_instance(instance_key, factory)
            }

            /// Like `get_shared_instance`, for factories that can fail.
            pub fn try_get_shared_instance<T, E, F>(
                instance_key: &str,
                factory: F,
            ) -> Result<Arc<T>, E>
            where
                T: Send + Sync + 'static,
                E: From<$crate::RegistryError>,
                F: FnOnce() -> Result<T, E>,
            {
                use $crate::SharedInstanceApi;
                API.try_get_shared_instance(instance_key, factory)
            }

            /// Retrieve an already constructed instance.
            pub fn get<T: Send + Sync + 'static>(
                instance_key: &str,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::SharedInstanceApi;
                API.get(instance_key)
            }

            /// Check whether an instance has been constructed for `instance_key`.
            pub fn contains(instance_key: &str) -> Result<bool, $crate::RegistryError> {
                use $crate::SharedInstanceApi;
                API.contains(instance_key)
            }

            /// The mode the next call will run under.
            pub fn mode() -> $crate::ExecutionMode {
                use $crate::SharedInstanceApi;
                API.mode()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                use $crate::SharedInstanceApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::SharedInstanceApi;
                API.clear_trace_callback()
            }

            #[doc(hidden)]
            pub fn clear() {
                use $crate::SharedInstanceApi;
                API.clear()
            }
        }
    };
}
