//! Render snapshots and the data-injection contract.
//!
//! Before a page reaches its surface, the controller places a `<script>`
//! ahead of `</head>` that defines the globals client script reads once at
//! load time:
//!
//! - internal pages: `window.historyData`, `window.bookmarksData`,
//!   `window.settingsData` (the page's own source populated, the others
//!   empty);
//! - the landing page: `window.landingBookmarks`, `window.currentBackground`.
//!
//! There are no incremental updates; new data means a new snapshot and a
//! full re-render.

use serde::Serialize;

use arcshell_store::{Bookmark, DataManager, HistoryEntry, SettingsMap};

use crate::identity::PageIdentity;

/// Data serialized into a page.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedData {
    History(Vec<HistoryEntry>),
    Bookmarks(Vec<Bookmark>),
    Settings(SettingsMap),
    Landing {
        bookmarks: Vec<Bookmark>,
        background: String,
    },
    /// No data source: every global defaults to empty.
    Empty,
}

impl InjectedData {
    /// Capture the data an internal page of `identity` shows.
    pub fn for_page(identity: &PageIdentity, data: Option<&DataManager>) -> Self {
        let Some(data) = data else {
            return Self::Empty;
        };
        match identity {
            PageIdentity::History => Self::History(data.history.list().to_vec()),
            PageIdentity::Bookmarks => Self::Bookmarks(data.bookmarks.list().to_vec()),
            PageIdentity::Settings => Self::Settings(data.settings.snapshot().clone()),
            PageIdentity::Landing | PageIdentity::Other(_) => Self::Empty,
        }
    }

    /// The JavaScript statements defining this data's globals.
    pub fn script(&self) -> String {
        match self {
            Self::Landing {
                bookmarks,
                background,
            } => format!(
                "window.landingBookmarks = {}; window.currentBackground = {};",
                to_js(bookmarks, "[]"),
                to_js(background, "\"\""),
            ),
            _ => {
                let (history, bookmarks, settings) = match self {
                    Self::History(h) => (to_js(h, "[]"), "[]".into(), "{}".into()),
                    Self::Bookmarks(b) => ("[]".into(), to_js(b, "[]"), "{}".into()),
                    Self::Settings(s) => ("[]".into(), "[]".into(), to_js(s, "{}")),
                    _ => ("[]".into(), "[]".into(), "{}".into()),
                };
                format!(
                    "window.historyData = {history}; window.bookmarksData = {bookmarks}; \
                     window.settingsData = {settings};"
                )
            },
        }
    }
}

/// Serialize for embedding in a `<script>` element. `</` is escaped so
/// data cannot close the element early.
fn to_js<T: Serialize + ?Sized>(value: &T, empty: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            log::warn!("Could not serialize page data: {e}");
            empty.to_string()
        },
    }
}

/// Insert `script` before the first `</head>`, or at the very start of a
/// document that has none.
pub fn inject_script(html: &str, script: &str) -> String {
    let tag = format!("<script>{script}</script>");
    if html.contains("</head>") {
        html.replacen("</head>", &format!("{tag}</head>"), 1)
    } else {
        format!("{tag}{html}")
    }
}

/// Everything one render pass produced. Never mutated; a new render makes
/// a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    identity: PageIdentity,
    data: InjectedData,
    script: String,
    html: String,
}

impl RenderSnapshot {
    /// Build a snapshot by injecting `data` into `template`.
    pub fn build(identity: PageIdentity, data: InjectedData, template: &str) -> Self {
        let script = data.script();
        let html = inject_script(template, &script);
        Self {
            identity,
            data,
            script,
            html,
        }
    }

    pub fn identity(&self) -> &PageIdentity {
        &self.identity
    }

    pub fn data(&self) -> &InjectedData {
        &self.data
    }

    /// The injected script text, exactly as placed in the document.
    pub fn injected_payload(&self) -> &str {
        &self.script
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}
