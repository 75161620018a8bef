//! Data managers for arcshell.
//!
//! Plain in-memory records (bookmarks, history, settings, profiles) with
//! optional JSON persistence. The [`DataManager`] aggregate is owned by the
//! shell and shared with page controllers through a [`SharedData`] handle.

pub mod bookmarks;
pub mod history;
mod manager;
pub mod persist;
pub mod profiles;
pub mod settings;

pub use bookmarks::{Bookmark, BookmarkStore};
pub use history::{HistoryEntry, HistoryStore};
pub use manager::{DataManager, SharedData};
pub use profiles::{Profile, ProfileStore};
pub use settings::{SettingValue, SettingsMap, SettingsStore};
