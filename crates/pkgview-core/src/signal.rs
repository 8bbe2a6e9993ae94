//! Change signals for pkgview.
//!
//! A [`Signal<Args>`] is a notification channel with any number of connected
//! slots (callbacks). Models and views expose one signal per observable
//! change; the sync layer connects to them and reacts.
//!
//! Slots run synchronously on the emitting thread, in the order they were
//! connected. Nothing is queued here;
//! deferring work to a later tick is the job of the
//! [`EventCoalescer`](crate::EventCoalescer).
//!
//! # Example
//!
//! ```
//! use pkgview_core::Signal;
//!
//! // A payload-free "something changed" signal
//! let items_changed = Signal::<()>::new();
//!
//! let conn_id = items_changed.connect(|_| {
//!     println!("items changed");
//! });
//!
//! items_changed.emit(());
//! items_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle for one connected slot, passed back to [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connection<Args> {
    /// Connection order; slot map keys get reused.
    seq: u64,
    slot: Slot<Args>,
}

/// A notification channel with any number of slots.
///
/// Change notifications carry no payload and use `Signal<()>`.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. The connection table is guarded by a
/// mutex, but slots run outside of it, so a slot may connect or disconnect
/// on the signal that is invoking it.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    next_seq: AtomicU64,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            next_seq: AtomicU64::new(0),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect `slot`. Keep the returned ID to disconnect it again.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert(Connection {
            seq,
            slot: Arc::new(slot),
        })
    }

    /// Remove one slot. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a slot, reporting an unknown ID as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// While blocked, [`emit`](Self::emit) does nothing. Hosts use this while
    /// repopulating a model in several steps.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Snapshot so slots can touch the connection table
        let mut slots: Vec<(u64, Slot<Args>)> = self
            .connections
            .lock()
            .values()
            .map(|conn| (conn.seq, conn.slot.clone()))
            .collect();
        slots.sort_unstable_by_key(|(seq, _)| *seq);
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for (_, slot) in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
