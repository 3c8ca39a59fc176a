use thiserror::Error;

/// Errors reported by the registry itself.
///
/// Factory failures are never wrapped in this type: a fallible factory's error
/// reaches the caller unchanged (see `try_get_shared_instance`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Failed to acquire registry lock")]
    RegistryLock,
    #[error("Instance key must not be empty")]
    EmptyKey,
    #[error("Instance `{key}` holds a value of a different type than {type_name}")]
    TypeMismatch { key: String, type_name: &'static str },
    #[error("Instance `{key}` has not been constructed")]
    InstanceNotFound { key: String },
    #[error("Instance `{key}` was requested by its own factory")]
    Reentrant { key: String },
}
