//! Owning-thread checks for tick-driven state.
//!
//! Signals, the coalescer and the list rebuild all run on whichever thread
//! drives the host's per-tick callback. [`ThreadAffinity`] remembers that
//! thread so a flush from anywhere else is caught in debug builds.
//!
//! ```
//! use pkgview_core::thread_check::ThreadAffinity;
//!
//! struct TickDriver {
//!     owner: ThreadAffinity,
//! }
//!
//! impl TickDriver {
//!     fn tick(&self) {
//!         self.owner.debug_assert_same_thread_with_msg("tick must run on the host thread");
//!     }
//! }
//!
//! let driver = TickDriver { owner: ThreadAffinity::current() };
//! driver.tick();
//! ```

use std::thread::{self, ThreadId};

/// The thread a piece of state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the owner.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic with `msg` unless called on the owning thread. Checked in every
    /// build profile.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.wrong_thread(msg);
        }
    }

    /// Like [`assert_same_thread_with_msg`](Self::assert_same_thread_with_msg),
    /// but compiled out of release builds.
    #[inline]
    pub fn debug_assert_same_thread_with_msg(&self, msg: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread_with_msg(msg);
        #[cfg(not(debug_assertions))]
        let _ = msg;
    }

    #[cold]
    #[inline(never)]
    fn wrong_thread(&self, msg: &str) -> ! {
        let caller = thread::current();
        tracing::error!(
            target: crate::logging::targets::CORE,
            owner = ?self.owner,
            caller = ?caller.id(),
            "{msg}"
        );
        panic!(
            "{msg}\n  owner thread: {:?}\n  calling thread: \"{}\" ({:?})\n\
             Fire signals and call update() on the thread that drives the host tick.",
            self.owner,
            caller.name().unwrap_or("<unnamed>"),
            caller.id(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_thread_passes() {
        let owner = ThreadAffinity::current();
        assert!(owner.is_same_thread());
        assert_eq!(owner.thread_id(), thread::current().id());
        owner.assert_same_thread_with_msg("unreachable");
        assert_eq!(ThreadAffinity::default(), owner);
    }

    #[test]
    fn test_other_thread_is_not_owner() {
        let owner = ThreadAffinity::current();
        let same = thread::spawn(move || owner.is_same_thread()).join().unwrap();
        assert!(!same);
    }

    #[test]
    fn test_other_thread_panics_with_message() {
        let owner = ThreadAffinity::current();
        let err = thread::spawn(move || owner.assert_same_thread_with_msg("flush off the tick thread"))
            .join()
            .unwrap_err();

        let msg = err.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(msg.contains("flush off the tick thread"), "{msg}");
    }
}
