//! RAII lock guard implementation.

use crate::table::Gatekeeper;

/// RAII guard for an acquired resource.
///
/// When dropped, the resource is released, on every exit path. Release is
/// infallible and idempotent, so dropping a guard whose lock already
/// expired is harmless, with one caveat: the table performs no ownership
/// check, so a guard that outlives its TTL releases whatever entry
/// currently sits under its key, including one re-acquired by another
/// caller. Keep guard lifetimes comfortably inside the configured TTL.
#[derive(Debug)]
pub struct LockGuard<'a> {
    table: &'a Gatekeeper,
    resource_type: String,
    resource_id: String,

    /// Whether the lock has been released manually.
    released: bool,
}

impl<'a> LockGuard<'a> {
    pub(crate) fn new(table: &'a Gatekeeper, resource_type: String, resource_id: String) -> Self {
        Self {
            table,
            resource_type,
            resource_id,
            released: false,
        }
    }

    /// Resource category this guard holds.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Resource instance this guard holds.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Release the resource before the guard goes out of scope.
    pub fn release(mut self) {
        self.released = true;
        self.table.release(&self.resource_type, &self.resource_id);
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.table.release(&self.resource_type, &self.resource_id);
        }
    }
}
