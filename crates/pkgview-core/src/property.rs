//! Reactive properties with change detection.
//!
//! A [`Property<T>`] wraps a value behind interior mutability and reports
//! whether a write actually changed it. Paired with a [`Signal`](crate::Signal)
//! it gives the "emit only on change" pattern used by models and views:
//!
//! ```
//! use pkgview_core::{Property, Signal};
//!
//! struct SortState {
//!     descending: Property<bool>,
//!     descending_changed: Signal<()>,
//! }
//!
//! impl SortState {
//!     fn set_descending(&self, value: bool) {
//!         if self.descending.set(value) {
//!             self.descending_changed.emit(());
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value that reports whether writes changed it.
///
/// Backed by a `RwLock`, so it is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the current value. Use [`with`](Self::with) to borrow instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without comparing.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Mutate the value in place, returning whatever the closure returns.
    ///
    /// The caller decides whether the mutation counts as a change.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.value.write())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value` if it differs from the current one.
    ///
    /// Returns whether it was stored; emit the change signal when it was.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Like [`set`](Self::set), but hands back the previous value.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        (*current != value).then(|| std::mem::replace(&mut *current, value))
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
