//! The lock table: which resources are held, and until when.

use crate::config::{Config, ConfigOption};
use crate::error::ResourceBusy;
use crate::guard::LockGuard;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Map of resource id to the instant its lock was acquired.
type TypeLocks = HashMap<String, Instant>;

/// Everything the table's lock protects: the entries and the configuration
/// move together, so a `configure` call is serialized against every in-flight
/// lock decision.
#[derive(Debug)]
struct State {
    locks: HashMap<String, TypeLocks>,
    config: Config,
}

/// In-process lock table for `(resource type, resource id)` pairs.
///
/// A pair is *held* iff an entry for it exists and is younger than the
/// configured TTL. Expiry is lazy: nothing sweeps the table, an expired
/// entry is simply reinterpreted as unheld by the next operation touching
/// its key. Type and id strings are opaque keys; the table never validates
/// them against a fixed set, and an empty string is just another key.
///
/// Writers ([`try_lock`](Self::try_lock), [`release`](Self::release),
/// [`configure`](Self::configure)) take the table's lock exclusively;
/// queries ([`is_locked`](Self::is_locked), [`held_locks`](Self::held_locks))
/// take it shared. No operation blocks on anything but that lock, starts a
/// thread, or suspends.
#[derive(Debug)]
pub struct Gatekeeper {
    state: RwLock<State>,
}

impl Gatekeeper {
    /// Create a lock table with default configuration.
    pub fn new() -> Self {
        Self::with_options([])
    }

    /// Create a lock table, applying configuration overrides in order.
    ///
    /// ```
    /// use gatekeeper::{Gatekeeper, with_lock_timeout};
    /// use std::time::Duration;
    ///
    /// let gate = Gatekeeper::with_options([with_lock_timeout(Duration::from_secs(30))]);
    /// assert_eq!(gate.config().lock_timeout, Duration::from_secs(30));
    /// ```
    pub fn with_options(options: impl IntoIterator<Item = ConfigOption>) -> Self {
        let mut config = Config::default();
        for option in options {
            option.apply(&mut config);
        }
        Self {
            state: RwLock::new(State {
                locks: HashMap::new(),
                config,
            }),
        }
    }

    /// Apply configuration overrides in order, under exclusive access.
    ///
    /// Later options win when several touch the same field. Safe to call at
    /// any point, though a reconfiguration racing in-flight lock decisions
    /// is only ordered relative to them by the table's own lock.
    pub fn configure(&self, options: impl IntoIterator<Item = ConfigOption>) {
        let mut state = self.state.write();
        for option in options {
            option.apply(&mut state.config);
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.state.read().config.clone()
    }

    /// Attempt to acquire the lock for a resource.
    ///
    /// Returns `true` when the caller now holds the resource and `false`
    /// when it is held by someone else. The check and the write happen in
    /// one exclusive critical section, so of any number of callers racing
    /// for the same unheld pair exactly one wins; which one is whoever gets
    /// the lock first, with no fairness or queueing. There is no
    /// re-entrancy: a second acquisition of a held pair fails even from the
    /// caller that holds it.
    ///
    /// When locking is disabled this always succeeds without recording
    /// anything.
    pub fn try_lock(&self, resource_type: &str, resource_id: &str) -> bool {
        let mut state = self.state.write();
        if !state.config.enabled {
            return true;
        }

        let now = Instant::now();
        let timeout = state.config.lock_timeout;
        let locks = state.locks.entry(resource_type.to_string()).or_default();

        if let Some(acquired_at) = locks.get(resource_id) {
            if now.duration_since(*acquired_at) < timeout {
                trace!(resource_type, resource_id, "acquisition denied, resource held");
                return false;
            }
            debug!(resource_type, resource_id, "superseding expired lock");
        }

        locks.insert(resource_id.to_string(), now);
        trace!(resource_type, resource_id, "lock acquired");
        true
    }

    /// Acquire a resource, returning a guard that releases it on drop.
    ///
    /// On denial the error carries the configured status/message/code for
    /// the adapter layer to surface. Prefer this over a bare
    /// [`try_lock`](Self::try_lock)/[`release`](Self::release) pair: the
    /// guard releases on every exit path, including early returns and
    /// panics.
    ///
    /// ```
    /// use gatekeeper::{Gatekeeper, RESOURCE_USER};
    ///
    /// let gate = Gatekeeper::new();
    /// let guard = gate.acquire(RESOURCE_USER, "42")?;
    /// assert!(gate.is_locked(RESOURCE_USER, "42"));
    /// drop(guard);
    /// assert!(!gate.is_locked(RESOURCE_USER, "42"));
    /// # Ok::<(), gatekeeper::ResourceBusy>(())
    /// ```
    pub fn acquire(
        &self,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<LockGuard<'_>, ResourceBusy> {
        if self.try_lock(resource_type, resource_id) {
            Ok(LockGuard::new(
                self,
                resource_type.to_string(),
                resource_id.to_string(),
            ))
        } else {
            Err(ResourceBusy::from_config(&self.state.read().config))
        }
    }

    /// Release the lock for a resource.
    ///
    /// Releasing a pair that is not held, already expired, or whose type
    /// was never seen is a silent no-op; release never fails. No ownership
    /// check is performed (any caller that knows the pair can release it),
    /// so callers must pair their own acquisitions and releases, or let a
    /// [`LockGuard`] do it.
    pub fn release(&self, resource_type: &str, resource_id: &str) {
        let mut state = self.state.write();
        if !state.config.enabled {
            return;
        }

        if let Some(locks) = state.locks.get_mut(resource_type)
            && locks.remove(resource_id).is_some()
        {
            trace!(resource_type, resource_id, "lock released");
        }
    }

    /// Whether a resource is currently held.
    ///
    /// A shared read: it never extends, refreshes, or cleans up the entry
    /// it inspects. Always `false` when locking is disabled.
    pub fn is_locked(&self, resource_type: &str, resource_id: &str) -> bool {
        let state = self.state.read();
        if !state.config.enabled {
            return false;
        }

        state
            .locks
            .get(resource_type)
            .and_then(|locks| locks.get(resource_id))
            .is_some_and(|acquired_at| acquired_at.elapsed() < state.config.lock_timeout)
    }

    /// Snapshot of currently held (non-expired) locks, sorted by key.
    ///
    /// Expired entries are filtered from the listing but stay in the table
    /// until their key is next acquired or released. Empty when locking is
    /// disabled.
    pub fn held_locks(&self) -> Vec<HeldLock> {
        let state = self.state.read();
        if !state.config.enabled {
            return Vec::new();
        }

        let timeout = state.config.lock_timeout;
        let mut held: Vec<HeldLock> = state
            .locks
            .iter()
            .flat_map(|(resource_type, locks)| {
                locks.iter().filter_map(move |(resource_id, acquired_at)| {
                    let age = acquired_at.elapsed();
                    (age < timeout).then(|| HeldLock {
                        resource_type: resource_type.clone(),
                        resource_id: resource_id.clone(),
                        held_for: age,
                        expires_in: timeout - age,
                    })
                })
            })
            .collect();

        // Sort by key for consistent output
        held.sort_by(|a, b| {
            (&a.resource_type, &a.resource_id).cmp(&(&b.resource_type, &b.resource_id))
        });

        held
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new()
    }
}

/// A live entry in the lock table, as reported by [`Gatekeeper::held_locks`].
#[derive(Debug, Clone)]
pub struct HeldLock {
    /// Resource category.
    pub resource_type: String,

    /// Resource instance within the category.
    pub resource_id: String,

    /// How long the lock has been held.
    pub held_for: Duration,

    /// Time remaining before the lock expires on its own.
    pub expires_in: Duration,
}

impl std::fmt::Display for HeldLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} (held {}ms, expires in {}ms)",
            self.resource_type,
            self.resource_id,
            self.held_for.as_millis(),
            self.expires_in.as_millis()
        )
    }
}
