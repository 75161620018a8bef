//! The `internal://` command grammar.
//!
//! Pages talk to the native side by navigating to synthetic URLs. A URL is
//! matched against [`PREFIX_TABLE`] in order (first match wins; some
//! prefixes are prefixes of others), producing a [`NavigationIntent`]. The
//! intent's payload is then decoded into a [`PageEvent`].
//!
//! | URL | Event |
//! |---|---|
//! | `internal://navigate/<target>` | `NavigateTo(target)`, target verbatim |
//! | `internal://search/<query>` | `Search(query)`, percent-decoded |
//! | `internal://clear-history` | `ClearHistory` (exact) |
//! | `internal://add-bookmark/<title>/<url>` | `AddBookmark`, both segments decoded |
//! | `internal://delete-bookmark/<url>` | `DeleteBookmark`, decoded |
//! | `internal://save-settings/<json>` | `SaveSettings`, decoded then parsed |
//! | `internal://reset-settings` | `ResetSettings` (exact) |
//! | `internal://background/<data>` | `BackgroundChange(data)`, landing page only |
//! | `internal://<anything else>` | `GenericNavigate(url)` |

use std::borrow::Cow;

use arcshell_store::SettingsMap;

use crate::events::PageEvent;

/// The synthetic scheme prefix.
pub const INTERNAL_SCHEME: &str = "internal://";

/// Recognized command tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Navigate,
    Search,
    ClearHistory,
    AddBookmark,
    DeleteBookmark,
    SaveSettings,
    ResetSettings,
    Background,
    /// Any other `internal://` URL; payload is the whole URL.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Prefix,
    Exact,
}

/// Command prefixes in priority order. [`Scheme::Other`] is implicit.
const PREFIX_TABLE: &[(Scheme, &str, Match)] = &[
    (Scheme::Navigate, "internal://navigate/", Match::Prefix),
    (Scheme::Search, "internal://search/", Match::Prefix),
    (Scheme::ClearHistory, "internal://clear-history", Match::Exact),
    (Scheme::AddBookmark, "internal://add-bookmark/", Match::Prefix),
    (Scheme::DeleteBookmark, "internal://delete-bookmark/", Match::Prefix),
    (Scheme::SaveSettings, "internal://save-settings/", Match::Prefix),
    (Scheme::ResetSettings, "internal://reset-settings", Match::Exact),
    (Scheme::Background, "internal://background/", Match::Prefix),
];

/// Which kind of page reported the URL. Landing pages understand a
/// narrower command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Internal,
    Landing,
}

impl SurfaceKind {
    /// Whether a command is part of this surface's vocabulary.
    pub fn accepts(self, scheme: Scheme) -> bool {
        match self {
            Self::Landing => matches!(
                scheme,
                Scheme::Navigate | Scheme::Search | Scheme::Background
            ),
            Self::Internal => scheme != Scheme::Background,
        }
    }
}

/// A parsed internal URL: the command tag and the raw remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub scheme: Scheme,
    pub payload: String,
}

/// Why a matched command produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Payload has the wrong shape (e.g. a missing segment). Dropped
    /// silently.
    Malformed,
    /// Payload could not be parsed. Dropped with a diagnostic.
    Unparseable(String),
}

/// Result of classifying one navigation URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Not an internal URL; real web navigation, left alone.
    External,
    /// An internal command this surface does not handle.
    Unhandled(Scheme),
    /// The command matched but its payload was unusable.
    Rejected { scheme: Scheme, reason: Rejection },
    /// A command to report outward.
    Event(PageEvent),
}

/// Match `url` against the prefix table. Returns `None` for URLs outside
/// the internal scheme.
///
/// `kind` only affects the background command: on an internal page it is
/// not a command, so the URL falls through to [`Scheme::Other`].
pub fn parse(url: &str, kind: SurfaceKind) -> Option<NavigationIntent> {
    if !url.starts_with(INTERNAL_SCHEME) {
        return None;
    }
    for &(scheme, prefix, mode) in PREFIX_TABLE {
        if scheme == Scheme::Background && kind == SurfaceKind::Internal {
            continue;
        }
        let payload = match mode {
            Match::Exact if url == prefix => Some(""),
            Match::Prefix => url.strip_prefix(prefix),
            Match::Exact => None,
        };
        if let Some(payload) = payload {
            return Some(NavigationIntent {
                scheme,
                payload: payload.to_string(),
            });
        }
    }
    Some(NavigationIntent {
        scheme: Scheme::Other,
        payload: url.to_string(),
    })
}

impl NavigationIntent {
    /// Decode the payload into the event this command reports.
    pub fn into_event(self) -> Result<PageEvent, Rejection> {
        match self.scheme {
            Scheme::Navigate => Ok(PageEvent::NavigateTo(self.payload)),
            Scheme::Search => Ok(PageEvent::Search(decode_segment(&self.payload).into_owned())),
            Scheme::ClearHistory => Ok(PageEvent::ClearHistory),
            Scheme::AddBookmark => {
                let mut parts = self.payload.split('/');
                match (parts.next(), parts.next()) {
                    (Some(title), Some(url)) => Ok(PageEvent::AddBookmark {
                        title: decode_segment(title).into_owned(),
                        url: decode_segment(url).into_owned(),
                    }),
                    _ => Err(Rejection::Malformed),
                }
            },
            Scheme::DeleteBookmark => Ok(PageEvent::DeleteBookmark(
                decode_segment(&self.payload).into_owned(),
            )),
            Scheme::SaveSettings => {
                let json = decode_segment(&self.payload);
                serde_json::from_str::<SettingsMap>(&json)
                    .map(PageEvent::SaveSettings)
                    .map_err(|e| Rejection::Unparseable(format!("settings payload: {e}")))
            },
            Scheme::ResetSettings => Ok(PageEvent::ResetSettings),
            Scheme::Background => Ok(PageEvent::BackgroundChange(self.payload)),
            Scheme::Other => Ok(PageEvent::GenericNavigate(self.payload)),
        }
    }
}

/// Classify a navigation URL reported by a surface of the given kind.
pub fn classify(url: &str, kind: SurfaceKind) -> Classification {
    let Some(intent) = parse(url, kind) else {
        return Classification::External;
    };
    if !kind.accepts(intent.scheme) {
        return Classification::Unhandled(intent.scheme);
    }
    let scheme = intent.scheme;
    match intent.into_event() {
        Ok(event) => Classification::Event(event),
        Err(reason) => Classification::Rejected { scheme, reason },
    }
}

/// Percent-decode one path segment. Input that does not decode to UTF-8
/// is returned as-is.
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(segment),
    }
}

/// Whether `url` uses the internal scheme.
pub fn is_internal(url: &str) -> bool {
    url.starts_with(INTERNAL_SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcshell_store::SettingValue;

    fn event(url: &str) -> PageEvent {
        match classify(url, SurfaceKind::Internal) {
            Classification::Event(e) => e,
            other => panic!("expected event for {url}, got {other:?}"),
        }
    }

    #[test]
    fn navigate_payload_is_verbatim() {
        assert_eq!(
            event("internal://navigate/https://example.com/a%20b?x=1"),
            PageEvent::NavigateTo("https://example.com/a%20b?x=1".into())
        );
    }

    #[test]
    fn search_query_is_decoded() {
        assert_eq!(
            event("internal://search/rust%20lang"),
            PageEvent::Search("rust lang".into())
        );
    }

    #[test]
    fn clear_history_is_exact() {
        assert_eq!(event("internal://clear-history"), PageEvent::ClearHistory);
        assert_eq!(
            event("internal://clear-history/now"),
            PageEvent::GenericNavigate("internal://clear-history/now".into())
        );
    }

    #[test]
    fn add_bookmark_decodes_both_segments() {
        assert_eq!(
            event("internal://add-bookmark/alice/https%3A%2F%2Fexample.com"),
            PageEvent::AddBookmark {
                title: "alice".into(),
                url: "https://example.com".into(),
            }
        );
    }

    #[test]
    fn add_bookmark_with_one_segment_is_malformed() {
        assert_eq!(
            classify("internal://add-bookmark/lonely", SurfaceKind::Internal),
            Classification::Rejected {
                scheme: Scheme::AddBookmark,
                reason: Rejection::Malformed,
            }
        );
    }

    #[test]
    fn delete_bookmark_decodes_url() {
        assert_eq!(
            event("internal://delete-bookmark/https%3A%2F%2Fa.com%2Fx"),
            PageEvent::DeleteBookmark("https://a.com/x".into())
        );
    }

    #[test]
    fn save_settings_parses_json() {
        let PageEvent::SaveSettings(map) = event(
            "internal://save-settings/%7B%22appearance%22%3A%7B%22theme%22%3A%22light%22%7D%7D",
        ) else {
            panic!("not a save-settings event");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(
            map["appearance"]["theme"],
            SettingValue::Text("light".into())
        );
    }

    #[test]
    fn save_settings_with_bad_json_is_rejected() {
        let c = classify("internal://save-settings/not-json", SurfaceKind::Internal);
        assert!(matches!(
            c,
            Classification::Rejected {
                scheme: Scheme::SaveSettings,
                reason: Rejection::Unparseable(_),
            }
        ));
    }

    #[test]
    fn reset_settings_is_exact() {
        assert_eq!(event("internal://reset-settings"), PageEvent::ResetSettings);
    }

    #[test]
    fn unknown_internal_url_is_generic() {
        assert_eq!(
            event("internal://downloads/"),
            PageEvent::GenericNavigate("internal://downloads/".into())
        );
    }

    #[test]
    fn background_is_generic_on_internal_pages() {
        assert_eq!(
            event("internal://background/color/red"),
            PageEvent::GenericNavigate("internal://background/color/red".into())
        );
    }

    #[test]
    fn landing_accepts_background() {
        assert_eq!(
            classify("internal://background/preset/3", SurfaceKind::Landing),
            Classification::Event(PageEvent::BackgroundChange("preset/3".into()))
        );
    }

    #[test]
    fn landing_ignores_mutation_commands() {
        assert_eq!(
            classify("internal://clear-history", SurfaceKind::Landing),
            Classification::Unhandled(Scheme::ClearHistory)
        );
        assert_eq!(
            classify("internal://bookmarks/", SurfaceKind::Landing),
            Classification::Unhandled(Scheme::Other)
        );
    }

    #[test]
    fn web_urls_are_external() {
        assert_eq!(
            classify("https://example.com", SurfaceKind::Internal),
            Classification::External
        );
        assert_eq!(classify("about:blank", SurfaceKind::Landing), Classification::External);
    }

    #[test]
    fn undecodable_segment_is_kept_literal() {
        // %FF is not valid UTF-8 on its own.
        assert_eq!(decode_segment("bad%FF"), "bad%FF");
        assert_eq!(
            event("internal://delete-bookmark/bad%FF"),
            PageEvent::DeleteBookmark("bad%FF".into())
        );
    }

    #[test]
    fn parse_exposes_raw_payload() {
        assert_eq!(
            parse("internal://add-bookmark/a%20b/c", SurfaceKind::Internal),
            Some(NavigationIntent {
                scheme: Scheme::AddBookmark,
                payload: "a%20b/c".into(),
            })
        );
        assert_eq!(parse("file:///tmp", SurfaceKind::Internal), None);
    }
}
