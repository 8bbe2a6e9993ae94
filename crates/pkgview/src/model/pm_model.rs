//! Headless in-memory package model.

use std::sync::Arc;

use pkgview_core::{Property, Signal};

use super::{PackageInfo, PackageModel, ReleaseInfo};

/// In-memory [`PackageModel`].
///
/// Every setter emits the matching change signal, and only when the stored
/// collection actually changed.
///
/// # Example
///
/// ```
/// use pkgview::model::{PackageModel, PmModel, ReleaseInfo};
///
/// let model = PmModel::new();
/// model.releases_changed().connect(|_| println!("releases changed"));
///
/// model.set_releases(vec![ReleaseInfo::new("foo", "Foo").with_version("1.2")]);
/// assert_eq!(model.releases().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PmModel {
    plugin_items: Property<Vec<String>>,
    asset_items: Property<Vec<String>>,
    packages: Property<Vec<Arc<PackageInfo>>>,
    releases: Property<Vec<Arc<ReleaseInfo>>>,

    plugin_items_changed: Signal<()>,
    asset_items_changed: Signal<()>,
    packages_changed: Signal<()>,
    releases_changed: Signal<()>,
}

impl PmModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the available releases.
    pub fn set_releases(&self, releases: Vec<ReleaseInfo>) {
        let releases = releases.into_iter().map(Arc::new).collect();
        if self.releases.set(releases) {
            self.releases_changed.emit(());
        }
    }

    /// Replace the installed packages.
    pub fn set_packages(&self, packages: Vec<PackageInfo>) {
        let packages = packages.into_iter().map(Arc::new).collect();
        if self.packages.set(packages) {
            self.packages_changed.emit(());
        }
    }

    /// Replace the plugin items.
    pub fn set_plugin_items(&self, items: Vec<String>) {
        if self.plugin_items.set(items) {
            self.plugin_items_changed.emit(());
        }
    }

    /// Replace the asset items.
    pub fn set_asset_items(&self, items: Vec<String>) {
        if self.asset_items.set(items) {
            self.asset_items_changed.emit(());
        }
    }

    /// Add a plugin item. Returns `false` if it was already present.
    pub fn add_plugin_item(&self, name: impl Into<String>) -> bool {
        Self::add_item(&self.plugin_items, &self.plugin_items_changed, name.into())
    }

    /// Remove a plugin item. Returns `false` if it was not present.
    pub fn remove_plugin_item(&self, name: &str) -> bool {
        Self::remove_item(&self.plugin_items, &self.plugin_items_changed, name)
    }

    /// Add an asset item. Returns `false` if it was already present.
    pub fn add_asset_item(&self, name: impl Into<String>) -> bool {
        Self::add_item(&self.asset_items, &self.asset_items_changed, name.into())
    }

    /// Remove an asset item. Returns `false` if it was not present.
    pub fn remove_asset_item(&self, name: &str) -> bool {
        Self::remove_item(&self.asset_items, &self.asset_items_changed, name)
    }

    /// Remove all plugin items.
    pub fn clear_plugin_items(&self) {
        self.set_plugin_items(Vec::new());
    }

    /// Remove all asset items.
    pub fn clear_asset_items(&self) {
        self.set_asset_items(Vec::new());
    }

    /// Remove all installed packages.
    pub fn clear_packages(&self) {
        self.set_packages(Vec::new());
    }

    /// Remove all releases.
    pub fn clear_releases(&self) {
        self.set_releases(Vec::new());
    }

    fn add_item(items: &Property<Vec<String>>, changed: &Signal<()>, name: String) -> bool {
        let added = items.update(|items| {
            if items.contains(&name) {
                false
            } else {
                items.push(name);
                true
            }
        });
        if added {
            changed.emit(());
        }
        added
    }

    fn remove_item(items: &Property<Vec<String>>, changed: &Signal<()>, name: &str) -> bool {
        let removed = items.update(|items| match items.iter().position(|x| x == name) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        });
        if removed {
            changed.emit(());
        }
        removed
    }
}

impl PackageModel for PmModel {
    fn plugin_items_changed(&self) -> &Signal<()> {
        &self.plugin_items_changed
    }

    fn asset_items_changed(&self) -> &Signal<()> {
        &self.asset_items_changed
    }

    fn packages_changed(&self) -> &Signal<()> {
        &self.packages_changed
    }

    fn releases_changed(&self) -> &Signal<()> {
        &self.releases_changed
    }

    fn plugin_items(&self) -> Vec<String> {
        self.plugin_items.get()
    }

    fn asset_items(&self) -> Vec<String> {
        self.asset_items.get()
    }

    fn packages(&self) -> Vec<Arc<PackageInfo>> {
        self.packages.get()
    }

    fn releases(&self) -> Vec<Arc<ReleaseInfo>> {
        self.releases.get()
    }

    fn is_release_installed(&self, release: &ReleaseInfo) -> bool {
        self.packages.with(|packages| {
            packages
                .iter()
                .any(|p| p.install_info.release_info.is_same_release(release))
        })
    }

    fn is_package_added_to_project(&self, name: &str) -> bool {
        self.plugin_items.with(|items| items.iter().any(|x| x == name))
            || self.asset_items.with(|items| items.iter().any(|x| x == name))
    }
}

static_assertions::assert_impl_all!(PmModel: Send, Sync);
