//! An explicit registry value for hosts that inject their dependencies.
//!
//! Build one at process startup, outside whatever code gets reloaded, and pass
//! it to the code that needs shared instances. In development mode its
//! instances live in an ambient slot, so a registry rebuilt after a reload
//! picks up the instances of the one it replaced.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::store::{ambient_slot, InstanceStore, DEFAULT_AMBIENT_SLOT};
use crate::{ModeSource, SharedInstanceApi, TraceSlot};

/// Keyed, construct-once registry of shared instances.
///
/// # Examples
///
/// ```rust
/// use shared_instance_registry::{ExecutionMode, InstanceRegistry, ModeSource, SharedInstanceApi};
/// use std::sync::Arc;
///
/// let registry = InstanceRegistry::new()
///     .with_mode(ModeSource::Fixed(ExecutionMode::Production));
///
/// let a = registry.get_shared_instance("main-db", || vec![1, 2, 3]).unwrap();
/// let b = registry.get_shared_instance("main-db", || Vec::<i32>::new()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct InstanceRegistry {
    local: InstanceStore,
    ambient: Arc<InstanceStore>,
    trace: TraceSlot,
    mode_source: ModeSource,
}

impl InstanceRegistry {
    /// A registry attached to [`DEFAULT_AMBIENT_SLOT`] that reads `APP_ENV` on every call.
    pub fn new() -> Self {
        Self::with_ambient_store(ambient_slot(DEFAULT_AMBIENT_SLOT))
    }

    /// A registry whose development store is `store` instead of a named slot.
    pub fn with_ambient_store(store: Arc<InstanceStore>) -> Self {
        Self {
            local: InstanceStore::new(),
            ambient: store,
            trace: Mutex::new(None),
            mode_source: ModeSource::Env,
        }
    }

    /// Attach to the ambient slot called `name`.
    pub fn with_ambient_slot(self, name: &str) -> Self {
        Self {
            ambient: ambient_slot(name),
            ..self
        }
    }

    pub fn with_mode(self, mode_source: ModeSource) -> Self {
        Self {
            mode_source,
            ..self
        }
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedInstanceApi for InstanceRegistry {
    fn trace(&self) -> &TraceSlot {
        &self.trace
    }

    fn local_store(&self) -> &InstanceStore {
        &self.local
    }

    fn ambient_store(&self) -> &InstanceStore {
        &self.ambient
    }

    fn mode_source(&self) -> ModeSource {
        self.mode_source
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("local", &self.local)
            .field("ambient", &self.ambient)
            .field("mode_source", &self.mode_source)
            .finish_non_exhaustive()
    }
}
