//! Execution mode selection.
//!
//! The mode decides which store backs a lookup: the registry's own store in
//! production, or a process-wide ambient slot everywhere else.

use std::{env, fmt};

/// Environment variable carrying the execution-mode signal.
pub const MODE_ENV_VAR: &str = "APP_ENV";

/// Deployment mode that selects the storage strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Instances live in the registry's private store.
    Production,
    /// Instances live in an ambient slot and survive rebuilding the registry.
    Development,
}

impl ExecutionMode {
    /// Interprets a raw signal value. Only `"production"` selects production;
    /// everything else, including an empty value, is development.
    pub fn from_signal(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Reads [`MODE_ENV_VAR`] now. An unset or non-unicode value is development.
    pub fn from_env() -> Self {
        env::var(MODE_ENV_VAR)
            .map(|value| Self::from_signal(&value))
            .unwrap_or(Self::Development)
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Canonical name used in log fields and events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a registry gets its mode from.
///
/// `Env` is re-read on every call and never cached, so flipping `APP_ENV`
/// mid-process changes the store subsequent calls use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSource {
    #[default]
    Env,
    Fixed(ExecutionMode),
}

impl ModeSource {
    pub fn current(self) -> ExecutionMode {
        match self {
            Self::Env => ExecutionMode::from_env(),
            Self::Fixed(mode) => mode,
        }
    }
}
