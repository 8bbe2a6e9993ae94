//! The view contract: list panels, view mode and display items.
//!
//! Widgets are drawn by the host. The sync layer only talks to them through
//! [`PackageView`] and [`ListView`]: it reads view mode and per-list sort
//! state, writes sort captions once, and replaces each list's items on every
//! recompute. [`PmView`] and [`ListPanel`] are headless state holders that
//! implement the contract with properties and signals.

mod list_panel;
mod pm_view;

use std::fmt;
use std::sync::Arc;

use pkgview_core::Signal;

use crate::caption::CaptionMark;
use crate::model::{PackageInfo, ReleaseInfo};

pub use list_panel::ListPanel;
pub use pm_view::PmView;

/// Identifies one of the four list panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListType {
    Release,
    Package,
    PluginItem,
    AssetItem,
}

impl ListType {
    /// Every list type, in panel order.
    pub const ALL: [ListType; 4] = [
        ListType::Release,
        ListType::Package,
        ListType::PluginItem,
        ListType::AssetItem,
    ];

    /// Short lowercase name used in logs and signal names.
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Release => "release",
            ListType::Package => "package",
            ListType::PluginItem => "plugin_item",
            ListType::AssetItem => "asset_item",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pair of panels the view is currently presenting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewState {
    #[default]
    ReleasesAndPackages,
    PackagesAndProject,
    Project,
    ProjectAndVisualStudio,
}

/// The record a display row stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRef {
    Release(Arc<ReleaseInfo>),
    Package(Arc<PackageInfo>),
    /// A plugin or asset item, identified by its name.
    ProjectItem(String),
}

impl ItemRef {
    /// Whether both refer to the very same model record.
    ///
    /// Shared records compare by pointer; project items compare by name.
    pub fn same_ref(&self, other: &ItemRef) -> bool {
        match (self, other) {
            (ItemRef::Release(a), ItemRef::Release(b)) => Arc::ptr_eq(a, b),
            (ItemRef::Package(a), ItemRef::Package(b)) => Arc::ptr_eq(a, b),
            (ItemRef::ProjectItem(a), ItemRef::ProjectItem(b)) => a == b,
            _ => false,
        }
    }

    /// The name of the referenced record.
    pub fn name(&self) -> &str {
        match self {
            ItemRef::Release(info) => &info.name,
            ItemRef::Package(info) => &info.name,
            ItemRef::ProjectItem(name) => name,
        }
    }
}

/// One renderable row: decorated caption plus the record behind it.
///
/// Display items are values. They are rebuilt on every recompute and carry
/// no identity of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub caption: String,
    pub model: ItemRef,
}

impl DisplayItem {
    pub fn new(caption: impl Into<String>, model: ItemRef) -> Self {
        Self {
            caption: caption.into(),
            model,
        }
    }
}

/// One list panel as seen by the sync layer.
pub trait ListView: Send + Sync {
    /// Which panel this is.
    fn list_type(&self) -> ListType;

    /// Emitted when the user flips the sort direction.
    fn sort_descending_changed(&self) -> &Signal<()>;

    /// Emitted when the user picks another sort method.
    fn sort_method_changed(&self) -> &Signal<()>;

    fn sort_descending(&self) -> bool;

    /// Raw index of the selected sort method. Its meaning depends on the list.
    fn sort_method(&self) -> usize;

    fn set_show_sort_pane(&self, show: bool);

    /// Captions for the sort-method picker, in sort-method order.
    fn set_sort_method_captions(&self, captions: Vec<String>);

    /// Replace the displayed rows.
    fn set_items(&self, items: Vec<DisplayItem>);
}

/// The view as seen by the sync layer.
pub trait PackageView: Send + Sync {
    /// Emitted when the view mode changed.
    fn view_state_changed(&self) -> &Signal<()>;

    fn view_state(&self) -> ViewState;

    /// Every list panel the view currently exposes.
    fn lists(&self) -> Vec<&dyn ListView>;

    /// The panel for `list_type`.
    fn list(&self, list_type: ListType) -> &dyn ListView;

    /// Style `text` with the given mark. How it renders is up to the view.
    fn decorate(&self, text: &str, mark: CaptionMark) -> String;
}
