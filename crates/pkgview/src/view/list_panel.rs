//! Headless list panel state.

use parking_lot::RwLock;
use pkgview_core::{Property, Signal};

use super::{DisplayItem, ListType, ListView};

/// Sort state and rows for one list panel.
///
/// `set_sort_descending` and `set_sort_method` stand in for the user's
/// interaction with the panel and emit their signal only on change.
#[derive(Debug)]
pub struct ListPanel {
    list_type: ListType,
    sort_descending: Property<bool>,
    sort_method: Property<usize>,
    show_sort_pane: Property<bool>,
    sort_method_captions: Property<Vec<String>>,
    items: RwLock<Vec<DisplayItem>>,
    /// Number of times the rows were replaced.
    generation: Property<u64>,

    sort_descending_changed: Signal<()>,
    sort_method_changed: Signal<()>,
}

impl ListPanel {
    /// Create an empty panel sorted ascending by its first sort method.
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            sort_descending: Property::new(false),
            sort_method: Property::new(0),
            show_sort_pane: Property::new(false),
            sort_method_captions: Property::new(Vec::new()),
            items: RwLock::new(Vec::new()),
            generation: Property::new(0),
            sort_descending_changed: Signal::new(),
            sort_method_changed: Signal::new(),
        }
    }

    pub fn set_sort_descending(&self, descending: bool) {
        if self.sort_descending.set(descending) {
            self.sort_descending_changed.emit(());
        }
    }

    pub fn set_sort_method(&self, method: usize) {
        if self.sort_method.set(method) {
            self.sort_method_changed.emit(());
        }
    }

    pub fn show_sort_pane(&self) -> bool {
        self.show_sort_pane.get()
    }

    pub fn sort_method_captions(&self) -> Vec<String> {
        self.sort_method_captions.get()
    }

    /// A copy of the current rows.
    pub fn items(&self) -> Vec<DisplayItem> {
        self.items.read().clone()
    }

    /// Captions of the current rows, in display order.
    pub fn captions(&self) -> Vec<String> {
        self.items.read().iter().map(|item| item.caption.clone()).collect()
    }

    /// How many times [`ListView::set_items`] has been called.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

impl ListView for ListPanel {
    fn list_type(&self) -> ListType {
        self.list_type
    }

    fn sort_descending_changed(&self) -> &Signal<()> {
        &self.sort_descending_changed
    }

    fn sort_method_changed(&self) -> &Signal<()> {
        &self.sort_method_changed
    }

    fn sort_descending(&self) -> bool {
        self.sort_descending.get()
    }

    fn sort_method(&self) -> usize {
        self.sort_method.get()
    }

    fn set_show_sort_pane(&self, show: bool) {
        self.show_sort_pane.set(show);
    }

    fn set_sort_method_captions(&self, captions: Vec<String>) {
        self.sort_method_captions.set(captions);
    }

    fn set_items(&self, items: Vec<DisplayItem>) {
        *self.items.write() = items;
        self.generation.update(|g| *g += 1);
    }
}
