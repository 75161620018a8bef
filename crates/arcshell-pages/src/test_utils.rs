//! Shared fixtures for controller tests.

use arcshell_store::{DataManager, SharedData};
use arcshell_types::config::TimingConfig;

/// Minimal page template with a `</head>` injection point.
pub fn history_template() -> &'static str {
    "<html><head><title>Page</title></head><body><ul id=\"list\"></ul></body></html>"
}

/// In-memory data with one bookmark and one history entry.
pub fn sample_data() -> SharedData {
    let mut data = DataManager::in_memory();
    data.bookmarks.add("Docs", "https://docs.example");
    data.history
        .add("https://visited.example", "Visited", "2026-01-01T00:00:00Z");
    data.into_shared()
}

pub fn timing(refresh_delay_ms: u64, guard_settle_ms: u64) -> TimingConfig {
    TimingConfig {
        refresh_delay_ms,
        guard_settle_ms,
    }
}
