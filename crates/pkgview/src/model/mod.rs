//! The data model the list panels are derived from.
//!
//! The sync layer consumes the model through the [`PackageModel`] trait: four
//! change signals, four collection queries and two membership queries.
//! [`PmModel`] is a headless in-memory implementation for hosts that load
//! their data elsewhere and push it in.

mod pm_model;
mod records;

use std::sync::Arc;

use pkgview_core::Signal;

pub use pm_model::PmModel;
pub use records::{AssetStoreInfo, InstallInfo, PackageInfo, ReleaseInfo};

/// Read access to the package model plus its change notifications.
///
/// Collection queries return the model's current state in source order.
/// Records are shared, so display items can point at the same record the
/// model holds.
pub trait PackageModel: Send + Sync {
    /// Emitted when the plugin item collection changed.
    fn plugin_items_changed(&self) -> &Signal<()>;

    /// Emitted when the asset item collection changed.
    fn asset_items_changed(&self) -> &Signal<()>;

    /// Emitted when the installed package collection changed.
    fn packages_changed(&self) -> &Signal<()>;

    /// Emitted when the available release collection changed.
    fn releases_changed(&self) -> &Signal<()>;

    /// Names of the packages added to the project as plugins.
    fn plugin_items(&self) -> Vec<String>;

    /// Names of the packages added to the project as assets.
    fn asset_items(&self) -> Vec<String>;

    /// Installed packages.
    fn packages(&self) -> Vec<Arc<PackageInfo>>;

    /// Available releases.
    fn releases(&self) -> Vec<Arc<ReleaseInfo>>;

    /// Whether some installed package came from `release`.
    fn is_release_installed(&self, release: &ReleaseInfo) -> bool;

    /// Whether a package called `name` is part of the project.
    fn is_package_added_to_project(&self, name: &str) -> bool;
}
