//! Core trait defining registry behavior.
//!
//! This module provides the `SharedInstanceApi` trait with default implementations for
//! keyed, construct-once retrieval and tracing of shared instances.
//!
//! The registry is key-based: each instance key maps to at most one constructed value
//! per store. Which store is used depends on the [`ExecutionMode`] selected at call time.

use std::any::type_name;
use std::sync::{Arc, Mutex};

use crate::store::{InstanceStore, Resolved, Unresolved};
use crate::{ExecutionMode, ModeSource, RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because registries are shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Storage for an optional trace callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// three accessors (`local_store`, `ambient_store` and `trace`) from the implementor.
pub trait SharedInstanceApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback will be invoked for every registry operation.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned (due to a panic while holding the lock),
    /// this method automatically recovers by extracting the inner value.
    /// This is safe because trace operations are non-critical and idempotent.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Note: This does not affect stored instances, only the tracing callback.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Convenience wrapper to emit a registry event using the current callback.
    ///
    /// The trace lock is released before the callback runs, so the callback may
    /// use the registry, including replacing the callback.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic will propagate to the caller.
    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Storage
    // -------------------------------------------------------------------------------------------------

    /// Store used in production mode. Private to this registry.
    fn local_store(&self) -> &InstanceStore;

    /// Store used in development mode. Shared with every registry attached to
    /// the same ambient slot.
    fn ambient_store(&self) -> &InstanceStore;

    /// Where the execution mode comes from. Defaults to reading `APP_ENV` on every call.
    fn mode_source(&self) -> ModeSource {
        ModeSource::Env
    }

    /// The mode the next operation will run under.
    fn mode(&self) -> ExecutionMode {
        self.mode_source().current()
    }

    /// The store backing `mode`.
    fn store_for(&self, mode: ExecutionMode) -> &InstanceStore {
        match mode {
            ExecutionMode::Production => self.local_store(),
            ExecutionMode::Development => self.ambient_store(),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Returns the shared instance for `instance_key`, constructing it with `factory`
    /// on first use.
    ///
    /// Every later call for the same key (in the same mode) returns the same `Arc`
    /// without running its factory. A panicking factory unwinds to the caller and
    /// leaves the key unconstructed.
    ///
    /// # Errors
    ///
    /// - `instance_key` is empty
    /// - the key already holds a value of another type
    /// - the factory requested its own key
    fn get_shared_instance<T, F>(
        &self,
        instance_key: &str,
        factory: F,
    ) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        self.try_get_shared_instance(instance_key, || Ok::<T, RegistryError>(factory()))
    }

    /// Like [`get_shared_instance`](Self::get_shared_instance), for factories that can fail.
    ///
    /// A factory error is returned unchanged and nothing is stored, so a later call
    /// may try again. Registry errors are converted into the caller's error type.
    ///
    /// A factory that asks the same registry for its own key gets
    /// [`RegistryError::Reentrant`] instead of blocking forever.
    fn try_get_shared_instance<T, E, F>(&self, instance_key: &str, factory: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        E: From<RegistryError>,
        F: FnOnce() -> Result<T, E>,
    {
        if instance_key.is_empty() {
            return Err(RegistryError::EmptyKey.into());
        }

        let mode = self.mode();
        let type_name = type_name::<T>();

        match self.store_for(mode).get_or_try_init(instance_key, factory) {
            Ok(Resolved {
                instance,
                constructed: true,
            }) => {
                if mode.is_production() {
                    tracing::trace!(instance_key, type_name, "Shared instance created");
                } else {
                    tracing::debug!(
                        instance_key,
                        type_name,
                        "Dev instance created and preserved globally"
                    );
                }
                self.emit_event(&RegistryEvent::Constructed {
                    key: instance_key.to_owned(),
                    type_name,
                    mode,
                });
                Ok(instance)
            }
            Ok(Resolved { instance, .. }) => {
                tracing::trace!(instance_key, %mode, "Reusing shared instance");
                self.emit_event(&RegistryEvent::Reused {
                    key: instance_key.to_owned(),
                    type_name,
                    mode,
                });
                Ok(instance)
            }
            Err(Unresolved::Factory(err)) => {
                tracing::warn!(instance_key, type_name, %mode, "Shared instance factory failed");
                self.emit_event(&RegistryEvent::Failed {
                    key: instance_key.to_owned(),
                    type_name,
                    mode,
                });
                Err(err)
            }
            Err(Unresolved::Rejected(err)) => {
                tracing::warn!(
                    instance_key,
                    type_name,
                    %mode,
                    error = %err,
                    "Shared instance request rejected"
                );
                self.emit_event(&RegistryEvent::Rejected {
                    key: instance_key.to_owned(),
                    type_name,
                    mode,
                    error: err.clone(),
                });
                Err(err.into())
            }
        }
    }

    /// Retrieve an already constructed instance without constructing it.
    ///
    /// # Errors
    ///
    /// - No instance exists for the key in the current mode's store
    /// - Type mismatch
    /// - Registry lock is poisoned
    fn get<T: Send + Sync + 'static>(&self, instance_key: &str) -> Result<Arc<T>, RegistryError> {
        self.store_for(self.mode()).get(instance_key)
    }

    /// Check whether an instance has been constructed for `instance_key`.
    ///
    /// # Errors
    ///
    /// - Registry lock is poisoned
    fn contains(&self, instance_key: &str) -> Result<bool, RegistryError> {
        let mode = self.mode();
        let found = self.store_for(mode).contains(instance_key)?;

        self.emit_event(&RegistryEvent::Contains {
            key: instance_key.to_owned(),
            found,
            mode,
        });

        Ok(found)
    }

    /// Drop every instance from the current mode's store.
    ///
    /// This method is primarily intended for testing. It does NOT affect:
    /// - Already-retrieved `Arc<T>` references (they remain valid)
    /// - The other mode's store
    /// - The tracing callback (use `clear_trace_callback()` to clear that)
    #[doc(hidden)]
    fn clear(&self) {
        let mode = self.mode();
        self.emit_event(&RegistryEvent::Clear { mode });
        self.store_for(mode).clear();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
