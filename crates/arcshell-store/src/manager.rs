//! The aggregate of all data managers.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use arcshell_types::Result;

use crate::bookmarks::{Bookmark, BookmarkStore};
use crate::history::{HistoryEntry, HistoryStore};
use crate::persist::{load_json, save_json};
use crate::profiles::ProfileStore;
use crate::settings::{SettingsMap, SettingsStore};

const BOOKMARKS_FILE: &str = "bookmarks.json";
const HISTORY_FILE: &str = "history.json";
const SETTINGS_FILE: &str = "settings.json";
const PROFILES_DIR: &str = "profiles";

/// Handle shared between the shell and its page controllers. Everything
/// runs on the event-loop thread, so `Rc<RefCell<_>>` is enough.
pub type SharedData = Rc<RefCell<DataManager>>;

/// Bookmarks, history, settings and profiles, optionally backed by a
/// directory of JSON files.
#[derive(Debug)]
pub struct DataManager {
    pub bookmarks: BookmarkStore,
    pub history: HistoryStore,
    pub settings: SettingsStore,
    pub profiles: ProfileStore,
    dir: Option<PathBuf>,
}

impl DataManager {
    /// Fresh, unpersisted data: no bookmarks, no history, default settings.
    pub fn in_memory() -> Self {
        Self {
            bookmarks: BookmarkStore::new(),
            history: HistoryStore::new(),
            settings: SettingsStore::new(),
            profiles: ProfileStore::in_memory(),
            dir: None,
        }
    }

    /// Load from `dir`. Missing files start empty (settings start from the
    /// defaults).
    pub fn open(dir: &Path) -> Result<Self> {
        let bookmarks: Vec<Bookmark> = load_json(&dir.join(BOOKMARKS_FILE))?;
        let history: Vec<HistoryEntry> = load_json(&dir.join(HISTORY_FILE))?;
        let settings_path = dir.join(SETTINGS_FILE);
        let settings = if settings_path.is_file() {
            SettingsStore::from_map(load_json::<SettingsMap>(&settings_path)?)
        } else {
            SettingsStore::new()
        };
        let profiles = ProfileStore::open(&dir.join(PROFILES_DIR))?;
        log::info!(
            "Opened data in {}: {} bookmarks, {} history entries",
            dir.display(),
            bookmarks.len(),
            history.len(),
        );
        Ok(Self {
            bookmarks: BookmarkStore::from_records(bookmarks),
            history: HistoryStore::from_records(history),
            settings,
            profiles,
            dir: Some(dir.to_path_buf()),
        })
    }

    /// Write bookmarks, history and settings back. No-op when in memory.
    pub fn save(&self) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        save_json(&dir.join(BOOKMARKS_FILE), self.bookmarks.list())?;
        save_json(&dir.join(HISTORY_FILE), self.history.list())?;
        save_json(&dir.join(SETTINGS_FILE), self.settings.snapshot())?;
        log::debug!("Saved data to {}", dir.display());
        Ok(())
    }

    pub fn into_shared(self) -> SharedData {
        Rc::new(RefCell::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_starts_empty_with_defaults() {
        let data = DataManager::in_memory();
        assert!(data.bookmarks.is_empty());
        assert!(data.history.is_empty());
        assert_eq!(data.settings.get_str("appearance", "theme", ""), "dark");
        assert!(data.save().is_ok());
    }

    #[test]
    fn save_and_reopen_round_trips_all_stores() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut data = DataManager::open(dir.path()).unwrap();
            data.bookmarks.add("Rust", "https://rust-lang.org");
            data.history.add("https://rust-lang.org", "Rust", "t");
            data.settings.set("appearance", "theme", "light");
            data.save().unwrap();
        }
        let data = DataManager::open(dir.path()).unwrap();
        assert_eq!(data.bookmarks.list()[0].title, "Rust");
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.settings.get_str("appearance", "theme", ""), "light");
        assert_eq!(data.profiles.list().len(), 1);
    }

    #[test]
    fn shared_handle_sees_mutations() {
        let shared = DataManager::in_memory().into_shared();
        let other = Rc::clone(&shared);
        shared.borrow_mut().bookmarks.add("A", "https://a.com");
        assert_eq!(other.borrow().bookmarks.len(), 1);
    }
}
