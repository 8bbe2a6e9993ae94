//! Headless view state holder.

use std::fmt;

use pkgview_core::logging::targets;
use pkgview_core::{Property, Signal};

use super::{ListPanel, ListType, ListView, PackageView, ViewState};
use crate::caption::{CaptionMark, CaptionStyler, PlainStyler, RichTextStyler};
use crate::error::Result;
use crate::settings::SyncSettings;

/// View mode, four list panels and a caption styler.
///
/// Hosts with their own widgets implement [`PackageView`] directly. This type
/// covers hosts that mirror the state into widgets themselves, and tests.
pub struct PmView {
    view_state: Property<ViewState>,
    view_state_changed: Signal<()>,
    /// One panel per list type, in [`ListType::ALL`] order.
    lists: Vec<ListPanel>,
    styler: Box<dyn CaptionStyler>,
}

impl PmView {
    /// A view with plain captions.
    pub fn new() -> Self {
        Self::with_styler(PlainStyler)
    }

    pub fn with_styler(styler: impl CaptionStyler + 'static) -> Self {
        Self {
            view_state: Property::new(ViewState::default()),
            view_state_changed: Signal::new(),
            lists: ListType::ALL.iter().map(|&t| ListPanel::new(t)).collect(),
            styler: Box::new(styler),
        }
    }

    /// A view with rich-text captions colored by the settings' theme.
    pub fn from_settings(settings: &SyncSettings) -> Result<Self> {
        Ok(Self::with_styler(RichTextStyler::new(settings.theme()?)))
    }

    /// Switch the view mode. Emits `view_state_changed` only on change.
    pub fn set_view_state(&self, state: ViewState) {
        if self.view_state.set(state) {
            tracing::debug!(target: targets::VIEW, ?state, "view state changed");
            self.view_state_changed.emit(());
        }
    }

    /// The concrete panel for `list_type`.
    pub fn panel(&self, list_type: ListType) -> &ListPanel {
        // `lists` is built from `ListType::ALL`, so every type is present.
        &self.lists[list_type as usize]
    }
}

impl Default for PmView {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageView for PmView {
    fn view_state_changed(&self) -> &Signal<()> {
        &self.view_state_changed
    }

    fn view_state(&self) -> ViewState {
        self.view_state.get()
    }

    fn lists(&self) -> Vec<&dyn ListView> {
        self.lists.iter().map(|l| l as &dyn ListView).collect()
    }

    fn list(&self, list_type: ListType) -> &dyn ListView {
        self.panel(list_type)
    }

    fn decorate(&self, text: &str, mark: CaptionMark) -> String {
        self.styler.decorate(text, mark)
    }
}

impl fmt::Debug for PmView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PmView")
            .field("view_state", &self.view_state.get())
            .field("lists", &self.lists)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(PmView: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_panels_follow_list_type_order() {
        let view = PmView::new();
        for list_type in ListType::ALL {
            assert_eq!(view.panel(list_type).list_type(), list_type);
            assert_eq!(view.list(list_type).list_type(), list_type);
        }
        let types: Vec<ListType> = view.lists().iter().map(|l| l.list_type()).collect();
        assert_eq!(types, ListType::ALL.to_vec());
    }

    #[test]
    fn test_set_view_state_emits_on_change() {
        let view = PmView::new();
        let emits = Arc::new(AtomicUsize::new(0));
        let emits_clone = emits.clone();
        view.view_state_changed().connect(move |_| {
            emits_clone.fetch_add(1, Ordering::SeqCst);
        });

        view.set_view_state(ViewState::ReleasesAndPackages);
        assert_eq!(emits.load(Ordering::SeqCst), 0);

        view.set_view_state(ViewState::Project);
        view.set_view_state(ViewState::Project);
        assert_eq!(emits.load(Ordering::SeqCst), 1);
        assert_eq!(view.view_state(), ViewState::Project);
    }

    #[test]
    fn test_from_settings_uses_theme() {
        let view = PmView::from_settings(&SyncSettings::default()).unwrap();
        assert_eq!(
            view.decorate("Foo", CaptionMark::AlreadyAdded),
            "<color=#5CA05CFF>Foo</color>"
        );
        assert_eq!(PmView::new().decorate("Foo", CaptionMark::AlreadyAdded), "Foo");
    }
}
