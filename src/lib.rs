//! In-process resource locking with TTL-based expiry.
//!
//! This crate implements the lock model required for serializing concurrent
//! work on named resources:
//! - A resource is a `(resource type, resource id)` pair of opaque strings
//!   (e.g., `("user", "42")`)
//! - Acquisition is non-blocking: [`Gatekeeper::try_lock`] answers
//!   immediately with a boolean, it never waits for a holder to finish
//! - A held lock expires on its own after the configured TTL
//!   (default 5 seconds), so a crashed or forgetful holder cannot wedge a
//!   resource forever
//!
//! # Locking model
//!
//! The table maps resource type to resource id to the instant the lock was
//! acquired. Liveness is derived, not stored: a pair is held iff its entry
//! is younger than the TTL. Expiry is evaluated lazily on access: there is
//! no sweeper thread, and an expired entry occupies memory until its key is
//! next touched. The check-then-set inside [`Gatekeeper::try_lock`] runs in
//! one exclusive critical section, so concurrent callers racing for the
//! same unheld pair see exactly one winner.
//!
//! This is in-process coordination only. Nothing crosses process or machine
//! boundaries, and all state is lost on restart.
//!
//! # RAII Guards
//!
//! [`Gatekeeper::acquire`] returns a [`LockGuard`] that releases the
//! resource when dropped. Bare [`Gatekeeper::release`] performs no
//! ownership check (any caller that knows the pair can release it), so
//! scoped acquisition through the guard is the safer default.
//!
//! # Process-wide table
//!
//! Most applications want one table shared by all request handlers. The
//! module-level functions ([`setup`], [`try_lock`], [`release_lock`],
//! [`is_locked`], [`acquire`]) operate on a lazily-created [`global`]
//! instance; independent [`Gatekeeper`] instances remain available for
//! tests and embedded use.
//!
//! ```
//! use gatekeeper::{Gatekeeper, RESOURCE_USER, with_lock_timeout};
//! use std::time::Duration;
//!
//! let gate = Gatekeeper::with_options([with_lock_timeout(Duration::from_millis(100))]);
//!
//! assert!(gate.try_lock(RESOURCE_USER, "u1"));
//! assert!(!gate.try_lock(RESOURCE_USER, "u1"));
//!
//! gate.release(RESOURCE_USER, "u1");
//! assert!(gate.try_lock(RESOURCE_USER, "u1"));
//! ```

mod config;
mod error;
mod guard;
mod table;


// Re-export public API
pub use config::{
    Config, ConfigOption, RESOURCE_REWARD, RESOURCE_USER, with_enabled, with_error_code,
    with_error_message, with_error_status, with_lock_timeout,
};
pub use error::ResourceBusy;
pub use guard::LockGuard;
pub use table::{Gatekeeper, HeldLock};

use std::sync::OnceLock;

static GLOBAL: OnceLock<Gatekeeper> = OnceLock::new();

/// The process-wide lock table shared by the module-level functions.
///
/// Created with default configuration on first use; reconfigure it through
/// [`setup`].
pub fn global() -> &'static Gatekeeper {
    GLOBAL.get_or_init(Gatekeeper::new)
}

/// Apply configuration overrides to the process-wide table.
///
/// Typically called once at startup, before serving traffic.
pub fn setup(options: impl IntoIterator<Item = ConfigOption>) {
    global().configure(options);
}

/// Attempt to acquire a lock on the process-wide table.
///
/// See [`Gatekeeper::try_lock`].
pub fn try_lock(resource_type: &str, resource_id: &str) -> bool {
    global().try_lock(resource_type, resource_id)
}

/// Release a lock on the process-wide table.
///
/// See [`Gatekeeper::release`].
pub fn release_lock(resource_type: &str, resource_id: &str) {
    global().release(resource_type, resource_id);
}

/// Whether a resource is held in the process-wide table.
///
/// See [`Gatekeeper::is_locked`].
pub fn is_locked(resource_type: &str, resource_id: &str) -> bool {
    global().is_locked(resource_type, resource_id)
}

/// Acquire a resource on the process-wide table, returning a releasing guard.
///
/// See [`Gatekeeper::acquire`].
pub fn acquire(resource_type: &str, resource_id: &str) -> Result<LockGuard<'static>, ResourceBusy> {
    global().acquire(resource_type, resource_id)
}
