//! Core systems for pkgview.
//!
//! This crate provides the building blocks the sync layer is made of:
//!
//! - **Signals**: payload-free change notification with any number of slots
//! - **Properties**: interior-mutable values with change detection
//! - **Event Coalescer**: deferred, deduplicated dispatch of change handlers
//! - **Thread checks**: affinity tracking for single-threaded state
//!
//! # Coalescing Example
//!
//! ```
//! use pkgview_core::{EventCoalescer, Handler, QueueMode, Signal};
//!
//! let coalescer = EventCoalescer::new();
//! let refresh = Handler::new(|| println!("rebuilding lists"));
//!
//! let packages_changed = Signal::<()>::new();
//! let releases_changed = Signal::<()>::new();
//! let a = packages_changed.connect(coalescer.register(&refresh, QueueMode::LatestOnly).slot::<()>());
//! let b = releases_changed.connect(coalescer.register(&refresh, QueueMode::LatestOnly).slot::<()>());
//!
//! packages_changed.emit(());
//! releases_changed.emit(());
//!
//! // Both fires collapse into one run
//! assert_eq!(coalescer.flush(), 1);
//!
//! packages_changed.disconnect(a);
//! releases_changed.disconnect(b);
//! coalescer.unregister(&refresh).unwrap();
//! coalescer.unregister(&refresh).unwrap();
//! coalescer.assert_empty();
//! ```

pub mod coalescer;
mod error;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;

pub use coalescer::{Dispatch, EventCoalescer, Handler, HandlerId, QueueMode, WiringId};
pub use error::{CoalescerError, Error, Result, SignalError};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
