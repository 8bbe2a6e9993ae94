//! Model/view synchronisation for package-browsing list panels.
//!
//! A package browser shows four lists: available releases, installed
//! packages, and the plugin and asset items of the current project. This
//! crate keeps those lists consistent with the underlying model:
//!
//! - [`model`]: the [`PackageModel`](model::PackageModel) contract and an
//!   in-memory implementation
//! - [`view`]: the [`PackageView`](view::PackageView) contract and headless
//!   panel state
//! - [`sort`]: per-list sort methods and stable ordering
//! - [`caption`]: caption decoration and safe template formatting
//! - [`settings`]: TOML/JSON configuration
//! - [`syncer`]: the [`ModelViewSyncer`] tying it all together
//!
//! Signals and the event coalescer live in [`pkgview_core`].

pub mod caption;
mod error;
pub mod model;
pub mod settings;
pub mod sort;
pub mod syncer;
pub mod view;

pub use caption::{CaptionMark, CaptionStyler, Color, PlainStyler, RichTextStyler, Theme, fmt_safe};
pub use error::{Result, SyncError};
pub use model::{PackageModel, PmModel};
pub use settings::SyncSettings;
pub use sort::{PackagesSortMethod, ReleasesSortMethod, SortKey, SortMethod, SortSpec};
pub use syncer::{ModelViewSyncer, SignalBinding, SignalSource};
pub use view::{DisplayItem, ItemRef, ListPanel, ListType, ListView, PackageView, PmView, ViewState};
