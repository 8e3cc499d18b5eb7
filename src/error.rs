//! Denial surface for adapter layers.
//!
//! Uses thiserror for derive macros. Denial is the only failure this crate
//! ever reports: no table operation errors, times out, or retries.

use crate::config::Config;
use serde::Serialize;
use thiserror::Error;

/// Returned when a resource is already held by another caller.
///
/// Carries the configured status/message/code verbatim so an adapter layer
/// can shape a "resource busy" response without consulting the table again.
/// Serializing the error produces the response body (`message` and `code`);
/// `status` is transport metadata and is skipped.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message} ({code})")]
pub struct ResourceBusy {
    /// Status for the transport layer (e.g., an HTTP status code).
    #[serde(skip)]
    pub status: u16,

    /// Human-readable denial message.
    pub message: String,

    /// Machine-readable denial code.
    pub code: String,
}

impl ResourceBusy {
    /// Build a denial from the table's current configuration.
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            status: config.error_status,
            message: config.error_message.clone(),
            code: config.error_code.clone(),
        }
    }
}
