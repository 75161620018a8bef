//! Bookmark records, unique by URL, kept in insertion order.

use serde::{Deserialize, Serialize};

/// A bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

/// Ordered bookmark list. No two records share a `url`.
#[derive(Debug, Clone, Default)]
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted records, dropping later duplicates of a
    /// URL.
    pub fn from_records(records: Vec<Bookmark>) -> Self {
        let mut store = Self::new();
        for bm in records {
            if store.contains(&bm.url) {
                log::warn!("Dropping duplicate bookmark for {}", bm.url);
                continue;
            }
            store.bookmarks.push(bm);
        }
        store
    }

    /// Add a bookmark. Returns `true` if a new record was appended; an
    /// existing URL keeps its position and takes the new title.
    pub fn add(&mut self, title: &str, url: &str) -> bool {
        if let Some(existing) = self.bookmarks.iter_mut().find(|bm| bm.url == url) {
            existing.title = title.to_string();
            return false;
        }
        self.bookmarks.push(Bookmark {
            title: title.to_string(),
            url: url.to_string(),
        });
        true
    }

    /// Remove a bookmark by URL. Returns `true` if one was removed.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|bm| bm.url != url);
        self.bookmarks.len() != before
    }

    pub fn contains(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|bm| bm.url == url)
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = BookmarkStore::new();
        store.add("B", "https://b.com");
        store.add("A", "https://a.com");
        let urls: Vec<&str> = store.list().iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.com", "https://a.com"]);
    }

    #[test]
    fn re_adding_a_url_updates_title_in_place() {
        let mut store = BookmarkStore::new();
        assert!(store.add("Old", "https://a.com"));
        store.add("Other", "https://b.com");
        assert!(!store.add("New", "https://a.com"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].title, "New");
    }

    #[test]
    fn remove_missing_url_is_noop() {
        let mut store = BookmarkStore::new();
        store.add("A", "https://a.com");
        assert!(!store.remove("https://missing.com"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn from_records_drops_duplicates() {
        let store = BookmarkStore::from_records(vec![
            Bookmark { title: "A".into(), url: "u".into() },
            Bookmark { title: "B".into(), url: "u".into() },
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "A");
    }

    proptest! {
        #[test]
        fn add_then_remove_leaves_no_record(
            seed in proptest::collection::vec(("[a-z]{1,6}", "[a-z:/.]{1,12}"), 0..8),
            title in "[a-zA-Z ]{0,10}",
            url in "[a-z:/.]{1,12}",
        ) {
            let mut store = BookmarkStore::new();
            for (t, u) in &seed {
                store.add(t, u);
            }
            store.add(&title, &url);
            store.remove(&url);
            prop_assert!(!store.list().iter().any(|b| b.url == url));
        }

        #[test]
        fn urls_stay_unique(ops in proptest::collection::vec("[abc]", 0..20)) {
            let mut store = BookmarkStore::new();
            for u in &ops {
                store.add("t", u);
            }
            let mut urls: Vec<&str> = store.list().iter().map(|b| b.url.as_str()).collect();
            let total = urls.len();
            urls.sort_unstable();
            urls.dedup();
            prop_assert_eq!(urls.len(), total);
        }
    }
}
