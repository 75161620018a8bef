//! Page identities: which synthetic page a surface is showing.

use std::fmt;

use crate::scheme::INTERNAL_SCHEME;

/// The synthetic page shown by a controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageIdentity {
    History,
    Bookmarks,
    Settings,
    /// The new-tab page.
    Landing,
    /// A caller-defined page with no built-in data source.
    Other(String),
}

impl PageIdentity {
    /// Map a page name (`history`, `newtab`, ...) to an identity.
    pub fn from_name(name: &str) -> Self {
        match name {
            "history" => Self::History,
            "bookmarks" => Self::Bookmarks,
            "settings" => Self::Settings,
            "newtab" => Self::Landing,
            other => Self::Other(other.to_string()),
        }
    }

    /// Identity named by an `internal://<name>[/...]` URL.
    pub fn from_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix(INTERNAL_SCHEME)?;
        let name = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(Self::from_name(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::History => "history",
            Self::Bookmarks => "bookmarks",
            Self::Settings => "settings",
            Self::Landing => "newtab",
            Self::Other(name) => name,
        }
    }

    /// The base URL a rendered page of this identity reports.
    pub fn url(&self) -> String {
        format!("{INTERNAL_SCHEME}{}/", self.name())
    }

    /// Base URL of the transient confirmation page shown after a save.
    pub fn success_url(&self) -> String {
        format!("{INTERNAL_SCHEME}{}-success/", self.name())
    }

    /// Template file backing this page.
    pub fn template_name(&self) -> String {
        match self {
            Self::Landing => "landing_page.html".to_string(),
            other => format!("{}.html", other.name()),
        }
    }

    /// Human-readable title: `"History"`, `"New Tab"`, `"Download Queue"`.
    pub fn title(&self) -> String {
        if *self == Self::Landing {
            return "New Tab".to_string();
        }
        self.name()
            .split(['-', '_'])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for PageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for id in [
            PageIdentity::History,
            PageIdentity::Bookmarks,
            PageIdentity::Settings,
            PageIdentity::Landing,
            PageIdentity::Other("downloads".into()),
        ] {
            assert_eq!(PageIdentity::from_name(id.name()), id);
        }
    }

    #[test]
    fn urls_carry_trailing_slash() {
        assert_eq!(PageIdentity::History.url(), "internal://history/");
        assert_eq!(PageIdentity::Landing.url(), "internal://newtab/");
        assert_eq!(
            PageIdentity::Settings.success_url(),
            "internal://settings-success/"
        );
    }

    #[test]
    fn from_url_takes_first_segment() {
        assert_eq!(
            PageIdentity::from_url("internal://settings"),
            Some(PageIdentity::Settings)
        );
        assert_eq!(
            PageIdentity::from_url("internal://bookmarks/extra?x"),
            Some(PageIdentity::Bookmarks)
        );
        assert_eq!(PageIdentity::from_url("internal://"), None);
        assert_eq!(PageIdentity::from_url("https://history"), None);
    }

    #[test]
    fn template_names() {
        assert_eq!(PageIdentity::Bookmarks.template_name(), "bookmarks.html");
        assert_eq!(PageIdentity::Landing.template_name(), "landing_page.html");
    }

    #[test]
    fn titles_are_title_cased() {
        assert_eq!(PageIdentity::History.title(), "History");
        assert_eq!(PageIdentity::Landing.title(), "New Tab");
        assert_eq!(
            PageIdentity::Other("download-queue".into()).title(),
            "Download Queue"
        );
    }
}
