//! # Shared Instance Registry
//!
//! A keyed, construct-once registry for expensive shared resources such as
//! database clients and connection pools.
//!
//! Each instance key is constructed at most once per store. Which store is used
//! depends on the execution mode read from `APP_ENV` at call time:
//!
//! - `production`: a store private to the registry.
//! - anything else: a process-wide ambient slot (`__SHARED_RESOURCE_INSTANCES__`
//!   by default) that outlives the registry, so code rebuilt during live-reload
//!   development keeps reusing the instances it already opened instead of
//!   exhausting connection limits.
//!
//! ## Quick Start
//!
//! ```rust
//! use shared_instance_registry::get_shared_instance;
//! use std::sync::Arc;
//!
//! let pool: Arc<String> = get_shared_instance("main-db", || "pool".to_string()).unwrap();
//! let again: Arc<String> = get_shared_instance("main-db", || "other".to_string()).unwrap();
//! assert!(Arc::ptr_eq(&pool, &again));
//! ```
//!
//! ## Main Functions
//!
//! - [`get_shared_instance`] - Construct-or-reuse with an infallible factory
//! - [`try_get_shared_instance`] - Construct-or-reuse with a fallible factory
//! - [`get`] - Retrieve an already constructed instance
//! - [`contains`] - Check if a key has been constructed
//! - [`set_trace_callback`] - Set up tracing for registry operations
//!
//! For isolated registries see [`define_registry!`] and [`InstanceRegistry`].

mod instance_registry;
mod macros;
mod mode;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;
mod store;

pub use instance_registry::InstanceRegistry;
pub use mode::{ExecutionMode, ModeSource, MODE_ENV_VAR};
pub use registry::{
    clear, clear_trace_callback, contains, default_registry, get, get_shared_instance, mode,
    set_trace_callback, try_get_shared_instance,
};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::{SharedInstanceApi, TraceCallback, TraceSlot};
pub use store::{ambient_slot, InstanceStore, DEFAULT_AMBIENT_SLOT};
