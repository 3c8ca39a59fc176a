use crate::{ExecutionMode, RegistryError};

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use shared_instance_registry::{ExecutionMode, RegistryEvent};
///
/// let event = RegistryEvent::Constructed {
///     key: "main-db".to_string(),
///     type_name: "i32",
///     mode: ExecutionMode::Development,
/// };
/// assert_eq!(
///     event.to_string(),
///     "constructed { key: main-db, type_name: i32, mode: development }"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A factory ran and its instance was stored.
    Constructed {
        key: String,
        /// The type name of the stored value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
        mode: ExecutionMode,
    },

    /// An existing instance was handed out; no factory ran.
    Reused {
        key: String,
        type_name: &'static str,
        mode: ExecutionMode,
    },

    /// The factory ran and returned an error; nothing was stored.
    Failed {
        key: String,
        type_name: &'static str,
        mode: ExecutionMode,
    },

    /// The registry refused the request without running the factory, e.g. the
    /// key holds another type or the factory asked for its own key.
    Rejected {
        key: String,
        type_name: &'static str,
        mode: ExecutionMode,
        error: RegistryError,
    },

    /// A read-only lookup was performed.
    Contains {
        key: String,
        /// Whether an instance exists for the key
        found: bool,
        mode: ExecutionMode,
    },

    /// The store for `mode` was cleared.
    Clear { mode: ExecutionMode },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Constructed {
                key,
                type_name,
                mode,
            } => write!(
                f,
                "constructed {{ key: {key}, type_name: {type_name}, mode: {mode} }}"
            ),
            RegistryEvent::Reused {
                key,
                type_name,
                mode,
            } => write!(
                f,
                "reused {{ key: {key}, type_name: {type_name}, mode: {mode} }}"
            ),
            RegistryEvent::Failed {
                key,
                type_name,
                mode,
            } => write!(
                f,
                "failed {{ key: {key}, type_name: {type_name}, mode: {mode} }}"
            ),
            RegistryEvent::Rejected {
                key,
                type_name,
                mode,
                error,
            } => write!(
                f,
                "rejected {{ key: {key}, type_name: {type_name}, mode: {mode}, error: {error} }}"
            ),
            RegistryEvent::Contains { key, found, mode } => {
                write!(f, "contains {{ key: {key}, found: {found}, mode: {mode} }}")
            }
            RegistryEvent::Clear { mode } => write!(f, "Clearing the {mode} store"),
        }
    }
}
