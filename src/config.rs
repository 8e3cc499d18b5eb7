//! Configuration model for the lock table.
//!
//! Configuration is applied as an ordered sequence of [`ConfigOption`]
//! overrides rather than loaded from a file; wiring the table into an
//! application's own configuration format is the embedding application's
//! concern. Later options win when several touch the same field. Values are
//! pass-through, not validated input: the table never interprets the error
//! status/message/code, it only hands them back to whatever layer turns a
//! denial into a response.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resource type for user-scoped locks.
pub const RESOURCE_USER: &str = "user";

/// Resource type for reward-scoped locks.
pub const RESOURCE_REWARD: &str = "reward";

/// Configuration for a [`Gatekeeper`](crate::Gatekeeper) lock table.
///
/// Unknown fields in serialized form are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Duration after which a held lock is treated as expired even without
    /// an explicit release.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout: Duration,

    /// Whether locking is enforced at all. When `false`, every acquisition
    /// succeeds and every query reports unlocked.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Status an adapter layer should surface when acquisition is denied.
    #[serde(default = "default_error_status")]
    pub error_status: u16,

    /// Human-readable denial message for adapter layers.
    #[serde(default = "default_error_message")]
    pub error_message: String,

    /// Machine-readable denial code for adapter layers.
    #[serde(default = "default_error_code")]
    pub error_code: String,
}

// Default value functions for serde
fn default_lock_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_error_status() -> u16 {
    429
}
fn default_error_message() -> String {
    "Resource is currently being processed".to_string()
}
fn default_error_code() -> String {
    "RESOURCE_LOCKED".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_timeout: default_lock_timeout(),
            enabled: default_true(),
            error_status: default_error_status(),
            error_message: default_error_message(),
            error_code: default_error_code(),
        }
    }
}

/// A single configuration override.
///
/// Options are applied in order by [`Gatekeeper::configure`](crate::Gatekeeper::configure);
/// the last option touching a field wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigOption {
    /// Set the TTL before a held lock is treated as expired.
    LockTimeout(Duration),
    /// Enable or disable locking globally.
    Enabled(bool),
    /// Set the default denial status.
    ErrorStatus(u16),
    /// Set the default denial message.
    ErrorMessage(String),
    /// Set the default denial code.
    ErrorCode(String),
}

impl ConfigOption {
    /// Apply this override to a configuration value.
    pub(crate) fn apply(self, config: &mut Config) {
        match self {
            ConfigOption::LockTimeout(timeout) => config.lock_timeout = timeout,
            ConfigOption::Enabled(enabled) => config.enabled = enabled,
            ConfigOption::ErrorStatus(status) => config.error_status = status,
            ConfigOption::ErrorMessage(message) => config.error_message = message,
            ConfigOption::ErrorCode(code) => config.error_code = code,
        }
    }
}

/// Override the TTL before a held lock is treated as expired.
pub fn with_lock_timeout(timeout: Duration) -> ConfigOption {
    ConfigOption::LockTimeout(timeout)
}

/// Enable or disable locking globally.
pub fn with_enabled(enabled: bool) -> ConfigOption {
    ConfigOption::Enabled(enabled)
}

/// Override the default denial status.
pub fn with_error_status(status: u16) -> ConfigOption {
    ConfigOption::ErrorStatus(status)
}

/// Override the default denial message.
pub fn with_error_message(message: impl Into<String>) -> ConfigOption {
    ConfigOption::ErrorMessage(message.into())
}

/// Override the default denial code.
pub fn with_error_code(code: impl Into<String>) -> ConfigOption {
    ConfigOption::ErrorCode(code.into())
}
