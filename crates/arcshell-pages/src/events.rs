//! Events reported outward by the page controllers, and their effect on
//! the data managers.

use arcshell_store::{DataManager, SettingsMap};

/// An application-level request produced by a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    NavigateTo(String),
    Search(String),
    ClearHistory,
    AddBookmark { title: String, url: String },
    DeleteBookmark(String),
    SaveSettings(SettingsMap),
    /// Restore default settings. Carries the empty mapping of the wire
    /// command implicitly.
    ResetSettings,
    BackgroundChange(String),
    /// An `internal://` URL with no dedicated command, forwarded whole.
    GenericNavigate(String),
}

impl PageEvent {
    /// Events whose page must be re-rendered once the data change lands.
    pub fn needs_refresh(&self) -> bool {
        matches!(
            self,
            Self::ClearHistory
                | Self::AddBookmark { .. }
                | Self::DeleteBookmark(_)
                | Self::ResetSettings
        )
    }
}

/// Apply the data side effect of a mutation event. Returns `true` if the
/// event was a data mutation (whether or not anything actually changed).
///
/// Writes are synchronous, so a re-render scheduled after this call always
/// observes them.
pub fn apply_event(data: &mut DataManager, event: &PageEvent) -> bool {
    match event {
        PageEvent::ClearHistory => {
            data.history.clear();
            log::info!("History cleared");
        },
        PageEvent::AddBookmark { title, url } => {
            if data.bookmarks.add(title, url) {
                log::info!("Bookmark added: {url}");
            } else {
                log::debug!("Bookmark retitled: {url}");
            }
        },
        PageEvent::DeleteBookmark(url) => {
            if !data.bookmarks.remove(url) {
                log::debug!("No bookmark for {url}");
            }
        },
        PageEvent::SaveSettings(changes) => {
            data.settings.merge(changes);
            log::info!("Settings saved ({} section(s))", changes.len());
        },
        PageEvent::ResetSettings => {
            data.settings.reset();
            log::info!("Settings reset to defaults");
        },
        PageEvent::NavigateTo(_)
        | PageEvent::Search(_)
        | PageEvent::BackgroundChange(_)
        | PageEvent::GenericNavigate(_) => return false,
    }
    true
}
