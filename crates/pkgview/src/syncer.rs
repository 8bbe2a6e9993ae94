//! Keeps the four list panels in sync with the model.
//!
//! [`ModelViewSyncer`] wires every change signal of the model and the view to
//! one refresh handler through an [`EventCoalescer`]. Signals only mark the
//! lists as stale; the refresh runs when the host calls
//! [`update`](ModelViewSyncer::update), at most once per call, and rebuilds
//! all four lists.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pkgview::model::{PmModel, ReleaseInfo};
//! use pkgview::settings::SyncSettings;
//! use pkgview::syncer::ModelViewSyncer;
//! use pkgview::view::{ListType, PmView};
//!
//! let model = Arc::new(PmModel::new());
//! let view = Arc::new(PmView::new());
//! let mut syncer = ModelViewSyncer::new(model.clone(), view.clone(), SyncSettings::default());
//! syncer.initialize().unwrap();
//!
//! model.set_releases(vec![ReleaseInfo::new("foo", "Foo").with_version("1.2")]);
//! model.add_plugin_item("Zenject");
//!
//! // One refresh, no matter how many signals fired.
//! assert_eq!(syncer.update(), 1);
//! assert_eq!(view.panel(ListType::Release).captions(), vec!["Foo v1.2"]);
//! assert_eq!(view.panel(ListType::PluginItem).captions(), vec!["Zenject"]);
//!
//! syncer.teardown();
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use pkgview_core::logging::targets;
use pkgview_core::{ConnectionId, EventCoalescer, Handler, PerfSpan, QueueMode, Signal};

use crate::caption::CaptionBuilder;
use crate::error::Result;
use crate::model::PackageModel;
use crate::settings::SyncSettings;
use crate::sort::{SortSpec, order_names, order_packages, order_releases};
use crate::view::{DisplayItem, ItemRef, ListType, PackageView};

/// Names one change signal of the model or the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSource {
    PluginItemsChanged,
    AssetItemsChanged,
    PackagesChanged,
    ReleasesChanged,
    ViewStateChanged,
    SortDescendingChanged(ListType),
    SortMethodChanged(ListType),
}

impl SignalSource {
    /// The model's change signals.
    pub const MODEL: [SignalSource; 4] = [
        SignalSource::PluginItemsChanged,
        SignalSource::AssetItemsChanged,
        SignalSource::PackagesChanged,
        SignalSource::ReleasesChanged,
    ];

    /// Look up the signal this source names.
    pub fn resolve<'a>(
        self,
        model: &'a dyn PackageModel,
        view: &'a dyn PackageView,
    ) -> &'a Signal<()> {
        match self {
            SignalSource::PluginItemsChanged => model.plugin_items_changed(),
            SignalSource::AssetItemsChanged => model.asset_items_changed(),
            SignalSource::PackagesChanged => model.packages_changed(),
            SignalSource::ReleasesChanged => model.releases_changed(),
            SignalSource::ViewStateChanged => view.view_state_changed(),
            SignalSource::SortDescendingChanged(list) => view.list(list).sort_descending_changed(),
            SignalSource::SortMethodChanged(list) => view.list(list).sort_method_changed(),
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::PluginItemsChanged => f.write_str("model.plugin_items_changed"),
            SignalSource::AssetItemsChanged => f.write_str("model.asset_items_changed"),
            SignalSource::PackagesChanged => f.write_str("model.packages_changed"),
            SignalSource::ReleasesChanged => f.write_str("model.releases_changed"),
            SignalSource::ViewStateChanged => f.write_str("view.view_state_changed"),
            SignalSource::SortDescendingChanged(list) => {
                write!(f, "list.{list}.sort_descending_changed")
            }
            SignalSource::SortMethodChanged(list) => write!(f, "list.{list}.sort_method_changed"),
        }
    }
}

/// A live connection from a change signal to the refresh handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalBinding {
    pub source: SignalSource,
    pub connection: ConnectionId,
}

/// What the refresh handler reads and writes.
struct SyncContext {
    model: Arc<dyn PackageModel>,
    view: Arc<dyn PackageView>,
    settings: SyncSettings,
}

impl SyncContext {
    fn refresh(&self) -> Result<()> {
        let _perf = PerfSpan::new("ModelViewSyncer::refresh");
        let model = self.model.as_ref();
        let view = self.view.as_ref();

        let mut releases = model.releases();
        order_releases(&mut releases, SortSpec::of(view.list(ListType::Release)))?;
        let mut packages = model.packages();
        order_packages(&mut packages, SortSpec::of(view.list(ListType::Package)))?;
        let mut plugin_items = model.plugin_items();
        order_names(&mut plugin_items, view.list(ListType::PluginItem).sort_descending());
        let mut asset_items = model.asset_items();
        order_names(&mut asset_items, view.list(ListType::AssetItem).sort_descending());

        let captions = CaptionBuilder {
            model,
            view,
            templates: &self.settings.captions,
        };
        let release_rows: Vec<DisplayItem> = releases
            .into_iter()
            .map(|info| DisplayItem::new(captions.release(&info), ItemRef::Release(info)))
            .collect();
        let package_rows: Vec<DisplayItem> = packages
            .into_iter()
            .map(|info| DisplayItem::new(captions.package(&info), ItemRef::Package(info)))
            .collect();
        let plugin_rows = project_rows(&captions, plugin_items);
        let asset_rows = project_rows(&captions, asset_items);

        tracing::debug!(
            target: targets::SYNC,
            releases = release_rows.len(),
            packages = package_rows.len(),
            plugin_items = plugin_rows.len(),
            asset_items = asset_rows.len(),
            view_state = ?view.view_state(),
            "lists rebuilt"
        );

        view.list(ListType::Release).set_items(release_rows);
        view.list(ListType::Package).set_items(package_rows);
        view.list(ListType::PluginItem).set_items(plugin_rows);
        view.list(ListType::AssetItem).set_items(asset_rows);
        Ok(())
    }
}

fn project_rows(captions: &CaptionBuilder<'_>, names: Vec<String>) -> Vec<DisplayItem> {
    names
        .into_iter()
        .map(|name| DisplayItem::new(captions.project_item(&name), ItemRef::ProjectItem(name)))
        .collect()
}

/// Coalesces model and view changes into one list rebuild per host tick.
///
/// Lifecycle: [`new`](Self::new), then [`initialize`](Self::initialize) once,
/// [`update`](Self::update) every tick, and [`teardown`](Self::teardown) when
/// the panels go away. Dropping an initialized syncer tears it down.
pub struct ModelViewSyncer {
    context: Arc<SyncContext>,
    coalescer: EventCoalescer,
    refresh: Handler,
    bindings: Vec<SignalBinding>,
    initialized: bool,
}

impl ModelViewSyncer {
    pub fn new(
        model: Arc<dyn PackageModel>,
        view: Arc<dyn PackageView>,
        settings: SyncSettings,
    ) -> Self {
        let context = Arc::new(SyncContext {
            model,
            view,
            settings,
        });
        let refresh = refresh_handler(Arc::downgrade(&context));
        Self {
            context,
            coalescer: EventCoalescer::new(),
            refresh,
            bindings: Vec::new(),
            initialized: false,
        }
    }

    /// Wire every change signal to the refresh, set up the sort pickers and
    /// schedule the first refresh.
    ///
    /// Fails without wiring anything if the settings are invalid. Calling it
    /// again on an initialized syncer does nothing.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            tracing::warn!(target: targets::SYNC, "syncer already initialized, ignoring");
            return Ok(());
        }
        self.context.settings.validate()?;

        let model = self.context.model.as_ref();
        let view = self.context.view.as_ref();

        let mut sources = SignalSource::MODEL.to_vec();
        sources.push(SignalSource::ViewStateChanged);
        for list in view.lists() {
            sources.push(SignalSource::SortDescendingChanged(list.list_type()));
            sources.push(SignalSource::SortMethodChanged(list.list_type()));
        }

        for source in sources {
            let dispatch = self.coalescer.register(&self.refresh, QueueMode::LatestOnly);
            let connection = source.resolve(model, view).connect(dispatch.slot::<()>());
            tracing::trace!(target: targets::SYNC, %source, "signal wired");
            self.bindings.push(SignalBinding { source, connection });
        }

        let settings = &self.context.settings;
        let releases = view.list(ListType::Release);
        releases.set_show_sort_pane(true);
        releases.set_sort_method_captions(settings.release_sort_captions.clone());
        let packages = view.list(ListType::Package);
        packages.set_show_sort_pane(true);
        packages.set_sort_method_captions(settings.package_sort_captions.clone());

        self.coalescer.trigger(&self.refresh);
        self.initialized = true;
        tracing::debug!(target: targets::SYNC, wired = self.bindings.len(), "syncer initialized");
        Ok(())
    }

    /// Run the refresh if anything changed since the last call.
    ///
    /// Call once per host tick. Returns the number of refreshes run, which is
    /// 0 or 1.
    ///
    /// # Panics
    ///
    /// Panics if a list reports a sort method outside its enumeration.
    pub fn update(&self) -> usize {
        self.coalescer.flush()
    }

    /// Rebuild all four lists right away.
    ///
    /// No list is touched if this fails.
    pub fn refresh(&self) -> Result<()> {
        self.context.refresh()
    }

    /// Disconnect every signal wired by [`initialize`](Self::initialize).
    ///
    /// Does nothing on a syncer that is not initialized.
    ///
    /// # Panics
    ///
    /// Panics if a wiring cannot be removed or one is left over afterwards.
    pub fn teardown(&mut self) {
        if !self.initialized {
            return;
        }
        let model = self.context.model.as_ref();
        let view = self.context.view.as_ref();

        for binding in self.bindings.drain(..) {
            if let Err(err) = binding.source.resolve(model, view).try_disconnect(binding.connection) {
                tracing::error!(target: targets::SYNC, source = %binding.source, %err, "unwire failed");
                panic!("ModelViewSyncer::teardown: {} was not connected: {err}", binding.source);
            }
            if let Err(err) = self.coalescer.unregister(&self.refresh) {
                tracing::error!(target: targets::SYNC, source = %binding.source, %err, "unwire failed");
                panic!("ModelViewSyncer::teardown: {err}");
            }
            tracing::trace!(target: targets::SYNC, source = %binding.source, "signal unwired");
        }

        let dropped = self.coalescer.cancel(&self.refresh);
        if dropped > 0 {
            tracing::debug!(target: targets::SYNC, dropped, "dropped pending refresh");
        }
        self.coalescer.assert_empty();
        self.initialized = false;
        tracing::debug!(target: targets::SYNC, "syncer torn down");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The live signal bindings.
    pub fn bindings(&self) -> &[SignalBinding] {
        &self.bindings
    }

    /// The coalescer behind [`update`](Self::update).
    pub fn coalescer(&self) -> &EventCoalescer {
        &self.coalescer
    }

    /// The handler every binding schedules.
    pub fn refresh_handler(&self) -> &Handler {
        &self.refresh
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.context.settings
    }
}

fn refresh_handler(context: Weak<SyncContext>) -> Handler {
    Handler::new(move || {
        let Some(context) = context.upgrade() else {
            return;
        };
        if let Err(err) = context.refresh() {
            tracing::error!(target: targets::SYNC, %err, "refresh failed");
            panic!("ModelViewSyncer refresh failed: {err}");
        }
    })
}

impl Drop for ModelViewSyncer {
    fn drop(&mut self) {
        if !self.initialized || std::thread::panicking() {
            return;
        }
        tracing::warn!(target: targets::SYNC, "syncer dropped without teardown");
        self.teardown();
    }
}

impl fmt::Debug for ModelViewSyncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelViewSyncer")
            .field("initialized", &self.initialized)
            .field("bindings", &self.bindings.len())
            .field("coalescer", &self.coalescer)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ModelViewSyncer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PmModel, ReleaseInfo};
    use crate::sort::ReleasesSortMethod;
    use crate::view::{ListView, PmView};

    fn setup() -> (Arc<PmModel>, Arc<PmView>, ModelViewSyncer) {
        let model = Arc::new(PmModel::new());
        let view = Arc::new(PmView::new());
        let syncer = ModelViewSyncer::new(model.clone(), view.clone(), SyncSettings::default());
        (model, view, syncer)
    }

    #[test]
    fn test_signal_source_names() {
        assert_eq!(SignalSource::PackagesChanged.to_string(), "model.packages_changed");
        assert_eq!(SignalSource::ViewStateChanged.to_string(), "view.view_state_changed");
        assert_eq!(
            SignalSource::SortMethodChanged(ListType::Release).to_string(),
            "list.release.sort_method_changed"
        );
        assert_eq!(
            SignalSource::SortDescendingChanged(ListType::AssetItem).to_string(),
            "list.asset_item.sort_descending_changed"
        );
    }

    #[test]
    fn test_initialize_wires_every_source() {
        let (model, view, mut syncer) = setup();
        syncer.initialize().unwrap();

        // 4 model signals, the view state and 2 per list.
        assert_eq!(syncer.bindings().len(), 4 + 1 + 2 * 4);
        assert_eq!(syncer.coalescer().wired_count(), syncer.bindings().len());
        assert_eq!(model.packages_changed().connection_count(), 1);
        assert_eq!(view.view_state_changed().connection_count(), 1);
        assert!(syncer.coalescer().is_pending(syncer.refresh_handler()));

        syncer.teardown();
    }

    #[test]
    fn test_initialize_sets_up_sort_pickers() {
        let (_model, view, mut syncer) = setup();
        syncer.initialize().unwrap();

        let releases = view.panel(ListType::Release);
        assert!(releases.show_sort_pane());
        assert_eq!(releases.sort_method_captions(), SyncSettings::default().release_sort_captions);
        assert!(view.panel(ListType::Package).show_sort_pane());
        assert!(!view.panel(ListType::PluginItem).show_sort_pane());
        assert!(view.panel(ListType::AssetItem).sort_method_captions().is_empty());

        syncer.teardown();
    }

    #[test]
    fn test_second_initialize_is_noop() {
        let (_model, _view, mut syncer) = setup();
        syncer.initialize().unwrap();
        let wired = syncer.bindings().len();

        syncer.initialize().unwrap();
        assert_eq!(syncer.bindings().len(), wired);
        assert_eq!(syncer.coalescer().wired_count(), wired);

        syncer.teardown();
    }

    #[test]
    fn test_invalid_settings_wire_nothing() {
        let model = Arc::new(PmModel::new());
        let view = Arc::new(PmView::new());
        let mut settings = SyncSettings::default();
        settings.release_sort_captions.pop();

        let mut syncer = ModelViewSyncer::new(model, view, settings);
        assert!(syncer.initialize().is_err());
        assert!(!syncer.is_initialized());
        assert_eq!(syncer.coalescer().wired_count(), 0);
    }

    #[test]
    fn test_first_update_populates_lists() {
        let (model, view, mut syncer) = setup();
        model.set_releases(vec![ReleaseInfo::new("b", "B"), ReleaseInfo::new("a", "A")]);
        syncer.initialize().unwrap();

        assert_eq!(syncer.update(), 1);
        assert_eq!(view.panel(ListType::Release).captions(), vec!["A", "B"]);
        assert_eq!(syncer.update(), 0);

        syncer.teardown();
    }

    #[test]
    fn test_refresh_error_leaves_lists_untouched() {
        let (model, view, syncer) = setup();
        model.set_plugin_items(vec!["a".to_string()]);
        view.panel(ListType::Package).set_sort_method(7);

        assert!(syncer.refresh().is_err());
        for list_type in ListType::ALL {
            assert_eq!(view.panel(list_type).generation(), 0);
        }
    }

    #[test]
    #[should_panic(expected = "refresh failed")]
    fn test_unknown_sort_method_panics_in_update() {
        let (_model, view, mut syncer) = setup();
        syncer.initialize().unwrap();
        view.panel(ListType::Release).set_sort_method(ReleasesSortMethod::ALL.len());
        syncer.update();
    }

    #[test]
    fn test_teardown_is_symmetric() {
        let (model, view, mut syncer) = setup();
        syncer.initialize().unwrap();
        syncer.update();
        syncer.teardown();

        assert!(syncer.bindings().is_empty());
        assert_eq!(syncer.coalescer().check_empty(), Ok(()));
        assert_eq!(model.releases_changed().connection_count(), 0);
        assert_eq!(view.panel(ListType::Release).sort_method_changed().connection_count(), 0);

        model.set_releases(vec![ReleaseInfo::new("a", "A")]);
        assert_eq!(syncer.update(), 0);
    }

    #[test]
    fn test_teardown_drops_pending_refresh() {
        let (model, view, mut syncer) = setup();
        syncer.initialize().unwrap();
        model.set_releases(vec![ReleaseInfo::new("a", "A")]);
        assert!(syncer.coalescer().is_pending(syncer.refresh_handler()));

        syncer.teardown();
        assert_eq!(syncer.coalescer().pending_count(), 0);
        assert_eq!(syncer.update(), 0);
        assert_eq!(view.panel(ListType::Release).generation(), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let (model, _view, mut syncer) = setup();
        syncer.initialize().unwrap();
        drop(syncer);
        assert_eq!(model.packages_changed().connection_count(), 0);
    }
}
