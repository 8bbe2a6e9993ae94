//! Delayed, deduplicating dispatch of change handlers.
//!
//! Many independent signals may fire during one host tick, and each of them
//! only means "the displayed data is stale". The [`EventCoalescer`] turns
//! every such fire into a pending obligation, collapses repeated obligations
//! for the same [`Handler`], and runs each pending handler once when the
//! host calls [`flush`](EventCoalescer::flush).
//!
//! # Wiring
//!
//! [`register`](EventCoalescer::register) creates a wiring and returns its
//! [`Dispatch`] token. The token is what gets connected to a signal; every
//! fire of the token schedules the handler. [`unregister`](EventCoalescer::unregister)
//! removes one wiring of a handler, [`cancel`](EventCoalescer::cancel) drops
//! whatever it still has pending, and [`check_empty`](EventCoalescer::check_empty)
//! verifies at teardown that nothing is left wired or pending.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use pkgview_core::{EventCoalescer, Handler, QueueMode, Signal};
//!
//! let coalescer = EventCoalescer::new();
//! let runs = Arc::new(AtomicUsize::new(0));
//!
//! let runs_clone = runs.clone();
//! let refresh = Handler::new(move || {
//!     runs_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let items_changed = Signal::<()>::new();
//! let dispatch = coalescer.register(&refresh, QueueMode::LatestOnly);
//! let conn = items_changed.connect(dispatch.slot::<()>());
//!
//! items_changed.emit(());
//! items_changed.emit(());
//! items_changed.emit(());
//!
//! assert_eq!(coalescer.flush(), 1);
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//!
//! items_changed.disconnect(conn);
//! coalescer.unregister(&refresh).unwrap();
//! coalescer.assert_empty();
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::CoalescerError;
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// A unique identifier for a handler.
///
/// Handler identity is what `LatestOnly` deduplication keys on. Clones of a
/// [`Handler`] share the same ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Get the raw u64 value of this handler ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique handler IDs.
static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

fn next_handler_id() -> HandlerId {
    HandlerId(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
}

/// A deferred unit of work with a stable identity.
#[derive(Clone)]
pub struct Handler {
    id: HandlerId,
    func: Arc<dyn Fn() + Send + Sync>,
}

impl Handler {
    /// Wrap a closure as a handler with a fresh identity.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: next_handler_id(),
            func: Arc::new(func),
        }
    }

    /// The identity of this handler.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    fn invoke(&self) {
        (self.func)()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("id", &self.id).finish()
    }
}

/// How repeated fires of a handler are queued before a flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueMode {
    /// At most one pending entry per handler. Further fires before the next
    /// flush are absorbed by the entry that is already pending.
    #[default]
    LatestOnly,
    /// Every fire adds its own pending entry.
    All,
}

new_key_type! {
    /// Identifies one wiring created by [`EventCoalescer::register`].
    pub struct WiringId;
}

struct Wiring {
    handler: Handler,
    mode: QueueMode,
    /// Registration order, used to pick the earliest wiring on unregister.
    seq: u64,
}

#[derive(Default)]
struct CoalescerState {
    wirings: SlotMap<WiringId, Wiring>,
    next_seq: u64,
    /// Handlers to run at the next flush, in the order they became pending.
    pending: Vec<Handler>,
    pending_ids: HashSet<HandlerId>,
}

impl CoalescerState {
    /// Returns `false` when a `LatestOnly` fire was absorbed.
    fn schedule(&mut self, handler: &Handler, mode: QueueMode) -> bool {
        let newly_pending = self.pending_ids.insert(handler.id);
        if mode == QueueMode::LatestOnly && !newly_pending {
            return false;
        }
        self.pending.push(handler.clone());
        true
    }

    fn cancel(&mut self, id: HandlerId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        self.pending_ids.remove(&id);
        before - self.pending.len()
    }
}

/// Subscription token returned by [`EventCoalescer::register`].
///
/// Firing the token schedules the registered handler. Once the wiring has
/// been removed with [`EventCoalescer::unregister`], or the coalescer has been
/// dropped, firing is a no-op.
#[derive(Clone)]
pub struct Dispatch {
    wiring: WiringId,
    handler: HandlerId,
    state: Weak<Mutex<CoalescerState>>,
}

impl Dispatch {
    /// The wiring this token belongs to.
    pub fn wiring_id(&self) -> WiringId {
        self.wiring
    }

    /// The handler this token schedules.
    pub fn handler_id(&self) -> HandlerId {
        self.handler
    }

    /// Schedule the handler for the next flush.
    pub fn fire(&self) {
        let Some(state) = self.state.upgrade() else {
            tracing::trace!(target: targets::COALESCER, "coalescer dropped, ignoring fire");
            return;
        };
        let mut state = state.lock();
        let Some(wiring) = state.wirings.get(self.wiring) else {
            tracing::trace!(
                target: targets::COALESCER,
                handler = self.handler.as_u64(),
                "wiring removed, ignoring fire"
            );
            return;
        };
        let (handler, mode) = (wiring.handler.clone(), wiring.mode);
        let scheduled = state.schedule(&handler, mode);
        tracing::trace!(
            target: targets::COALESCER,
            handler = self.handler.as_u64(),
            scheduled,
            "dispatch fired"
        );
    }

    /// A slot that fires this token, ready to connect to a `Signal<Args>`.
    pub fn slot<Args: 'static>(&self) -> impl Fn(&Args) + Send + Sync + use<Args> {
        let dispatch = self.clone();
        move |_: &Args| dispatch.fire()
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("wiring", &self.wiring)
            .field("handler", &self.handler)
            .finish()
    }
}

/// Resets the flushing flag even if a handler panics.
struct FlushGuard<'a>(&'a AtomicBool);

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Collapses bursts of change notifications into one deferred run per handler.
///
/// # Thread Safety
///
/// The pending set is guarded by a mutex, so tokens may be fired from any
/// thread. [`flush`](Self::flush) is expected to run on the thread that
/// created the coalescer and debug-asserts it.
pub struct EventCoalescer {
    state: Arc<Mutex<CoalescerState>>,
    flushing: AtomicBool,
    affinity: ThreadAffinity,
}

impl Default for EventCoalescer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCoalescer {
    /// Create an empty coalescer owned by the current thread.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CoalescerState::default())),
            flushing: AtomicBool::new(false),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Create a wiring for `handler` and return its token.
    ///
    /// Each call is one wiring and needs one matching [`unregister`](Self::unregister).
    pub fn register(&self, handler: &Handler, mode: QueueMode) -> Dispatch {
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let wiring = state.wirings.insert(Wiring {
            handler: handler.clone(),
            mode,
            seq,
        });
        tracing::debug!(
            target: targets::COALESCER,
            handler = handler.id.as_u64(),
            ?mode,
            wired = state.wirings.len(),
            "registered wiring"
        );
        Dispatch {
            wiring,
            handler: handler.id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Remove the earliest live wiring of `handler`.
    ///
    /// The returned token is already dead: firing it does nothing. Work that
    /// was pending before the call still runs at the next flush.
    pub fn unregister(&self, handler: &Handler) -> Result<Dispatch, CoalescerError> {
        let mut state = self.state.lock();
        let key = state
            .wirings
            .iter()
            .filter(|(_, wiring)| wiring.handler.id == handler.id)
            .min_by_key(|(_, wiring)| wiring.seq)
            .map(|(key, _)| key)
            .ok_or(CoalescerError::NotRegistered {
                handler: handler.id,
            })?;
        state.wirings.remove(key);
        tracing::debug!(
            target: targets::COALESCER,
            handler = handler.id.as_u64(),
            wired = state.wirings.len(),
            "unregistered wiring"
        );
        Ok(Dispatch {
            wiring: key,
            handler: handler.id,
            state: Arc::downgrade(&self.state),
        })
    }

    /// Drop every pending entry of `handler` and return how many were dropped.
    ///
    /// Wirings are untouched, so a later fire schedules the handler again.
    pub fn cancel(&self, handler: &Handler) -> usize {
        let cancelled = self.state.lock().cancel(handler.id);
        if cancelled > 0 {
            tracing::debug!(
                target: targets::COALESCER,
                handler = handler.id.as_u64(),
                cancelled,
                "cancelled pending work"
            );
        }
        cancelled
    }

    /// Schedule `handler` directly, without any signal having fired.
    ///
    /// Deduplicates like `LatestOnly`.
    pub fn trigger(&self, handler: &Handler) {
        let scheduled = self.state.lock().schedule(handler, QueueMode::LatestOnly);
        tracing::trace!(
            target: targets::COALESCER,
            handler = handler.id.as_u64(),
            scheduled,
            "handler triggered"
        );
    }

    /// Run every pending handler once, in the order it became pending.
    ///
    /// Returns the number of handler invocations. Handlers scheduled while
    /// the flush is running are deferred to the next flush.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a handler that is being flushed.
    pub fn flush(&self) -> usize {
        self.affinity
            .debug_assert_same_thread_with_msg("EventCoalescer::flush called off the owning thread");

        if self.flushing.swap(true, Ordering::SeqCst) {
            tracing::error!(target: targets::COALESCER, "reentrant flush detected");
            panic!("EventCoalescer::flush is not reentrant: a handler called flush() during a flush");
        }
        let _guard = FlushGuard(&self.flushing);

        let batch = {
            let mut state = self.state.lock();
            state.pending_ids.clear();
            std::mem::take(&mut state.pending)
        };
        if batch.is_empty() {
            return 0;
        }

        tracing::debug!(target: targets::COALESCER, count = batch.len(), "flushing pending handlers");
        for handler in &batch {
            handler.invoke();
        }
        batch.len()
    }

    /// Number of pending handler invocations.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Whether `handler` will run at the next flush.
    pub fn is_pending(&self, handler: &Handler) -> bool {
        self.state.lock().pending_ids.contains(&handler.id)
    }

    /// Number of live wirings.
    pub fn wired_count(&self) -> usize {
        self.state.lock().wirings.len()
    }

    /// Verify that no wiring is registered and no work is pending.
    pub fn check_empty(&self) -> Result<(), CoalescerError> {
        let state = self.state.lock();
        match (state.wirings.len(), state.pending.len()) {
            (0, 0) => Ok(()),
            (wirings, pending) => Err(CoalescerError::Leaked { wirings, pending }),
        }
    }

    /// Panic if any wiring is still registered or any work is still pending.
    ///
    /// A leaked wiring means a signal was connected without a matching
    /// disconnect path.
    pub fn assert_empty(&self) {
        if let Err(err) = self.check_empty() {
            tracing::error!(target: targets::COALESCER, %err, "coalescer not empty");
            panic!("EventCoalescer::assert_empty failed: {err}");
        }
    }
}

impl fmt::Debug for EventCoalescer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventCoalescer")
            .field("wired", &state.wirings.len())
            .field("pending", &state.pending.len())
            .field("flushing", &self.flushing.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(EventCoalescer: Send, Sync);
static_assertions::assert_impl_all!(Dispatch: Send, Sync);
