//! Page templates: HTML files on disk, in-memory overrides, and the
//! built-in documents used when neither exists.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arcshell_types::{Result, ShellError};

use crate::identity::PageIdentity;

/// Template source for page controllers.
///
/// Lookup order: in-memory templates registered with
/// [`Templates::with_template`], then `<dir>/<name>`. Names are restricted
/// to `[A-Za-z0-9_.-]` so page names taken from URLs cannot escape `dir`.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    dir: Option<PathBuf>,
    embedded: HashMap<String, String>,
}

impl Templates {
    /// No templates at all: every page uses its built-in fallback.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_dir(dir: &Path) -> Self {
        Self {
            dir: Some(dir.to_path_buf()),
            embedded: HashMap::new(),
        }
    }

    /// Templates under `dir`. A missing directory is allowed (every page
    /// falls back to its built-in document); a path that exists but is not
    /// a directory is a configuration mistake.
    pub fn open(dir: &Path) -> Result<Self> {
        if dir.exists() && !dir.is_dir() {
            return Err(ShellError::Template(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        if !dir.exists() {
            log::info!("No template directory at {} -- using built-in pages", dir.display());
        }
        Ok(Self::from_dir(dir))
    }

    /// Register an in-memory template, shadowing any file of the same name.
    pub fn with_template(mut self, name: &str, html: &str) -> Self {
        self.embedded.insert(name.to_string(), html.to_string());
        self
    }

    /// Fetch a template. Missing or unreadable templates yield `None`.
    pub fn load(&self, name: &str) -> Option<String> {
        if let Some(html) = self.embedded.get(name) {
            return Some(html.clone());
        }
        if !is_safe_name(name) {
            log::warn!("Refusing template name {name:?}");
            return None;
        }
        let path = self.dir.as_ref()?.join(name);
        match fs::read_to_string(&path) {
            Ok(html) => Some(html),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No template at {}", path.display());
                None
            },
            Err(e) => {
                log::warn!("Cannot read template {}: {e}", path.display());
                None
            },
        }
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Escape text for use inside HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_STYLE: &str = "background: #1a1a1a; color: white; font-family: Arial; \
                          padding: 40px; text-align: center;";
const BUTTON_STYLE: &str = "padding: 10px 20px; background: #ff6f3c; color: white; \
                            border: none; border-radius: 5px; cursor: pointer;";

/// Placeholder for an internal page whose template is missing. Offers only
/// a way back to the new-tab page and needs no data.
pub fn fallback_page(identity: &PageIdentity) -> String {
    let title = escape_html(&identity.title());
    let name = escape_html(identity.name());
    format!(
        "<html><head><title>{title}</title></head>\
         <body style=\"{PAGE_STYLE}\">\
         <h1>{title} Page</h1>\
         <p>This is the {name} page.</p>\
         <button onclick=\"window.location.href='internal://newtab'\" style=\"{BUTTON_STYLE}\">\
         Back to Browser</button>\
         </body></html>"
    )
}

/// Transient confirmation page shown after settings are saved, linking
/// back to `identity`.
pub fn success_page(identity: &PageIdentity, message: &str) -> String {
    let title = escape_html(&identity.title());
    let message = escape_html(message);
    let name = escape_html(identity.name());
    format!(
        "<html><head><title>Saved</title></head>\
         <body style=\"{PAGE_STYLE}\">\
         <h1 style=\"color: #4CAF50;\">&#10003; Success</h1>\
         <p>{message}</p>\
         <button onclick=\"window.location.href='internal://{name}'\" style=\"{BUTTON_STYLE}\">\
         Back to {title}</button>\
         </body></html>"
    )
}

/// Declaration the landing template ships with; replaced by the resolved
/// background at render time.
pub const LANDING_DEFAULT_BACKGROUND: &str =
    "background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);";

/// Built-in new-tab page. Reads `window.landingBookmarks`; the injection
/// step supplies the script before `</head>`.
pub fn landing_fallback() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>New Tab</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; font-family: "Inter", sans-serif; }}
body {{ {LANDING_DEFAULT_BACKGROUND} background-size: cover; min-height: 100vh; color: #fff; }}
.container {{ max-width: 1200px; margin: 0 auto; padding: 40px 20px; }}
.title {{ font-size: 4rem; font-weight: 700; text-align: center; color: #ff6f3c; }}
.search-bar {{ display: flex; max-width: 600px; margin: 30px auto 50px; padding: 15px 25px;
  background: rgba(255,255,255,0.1); border-radius: 50px; }}
.search-bar input {{ flex: 1; background: transparent; border: none; outline: none;
  color: white; font-size: 1.1rem; }}
.bookmarks-section {{ background: rgba(25,25,25,0.6); border-radius: 20px; padding: 30px;
  margin-bottom: 30px; }}
.bookmarks-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(120px, 1fr));
  gap: 15px; }}
.bookmark-item {{ background: rgba(255,255,255,0.08); border-radius: 12px; padding: 20px 15px;
  text-align: center; text-decoration: none; color: #ddd; }}
.quick-links {{ display: flex; justify-content: center; gap: 15px; flex-wrap: wrap; }}
.quick-links a {{ background: rgba(255,255,255,0.1); border-radius: 12px; padding: 12px 20px;
  text-decoration: none; color: #fff; }}
</style>
</head>
<body>
<div class="container">
  <h1 class="title">ARC</h1>
  <div class="search-bar">
    <input type="text" id="searchInput" placeholder="Search or enter address...">
  </div>
  <div class="bookmarks-section">
    <div class="bookmarks-grid" id="bookmarksContainer"></div>
  </div>
  <div class="quick-links">
    <a href="internal://navigate/https://www.google.com">Google</a>
    <a href="internal://navigate/https://www.youtube.com">YouTube</a>
    <a href="internal://navigate/https://github.com">GitHub</a>
    <a href="internal://navigate/https://mail.google.com">Gmail</a>
  </div>
</div>
<script>
function escapeHtml(text) {{
  const div = document.createElement('div');
  div.textContent = text;
  return div.innerHTML;
}}
function loadBookmarks() {{
  const bookmarks = window.landingBookmarks || [];
  const container = document.getElementById('bookmarksContainer');
  if (bookmarks.length === 0) {{
    container.innerHTML = '<div>No bookmarks yet.</div>';
    return;
  }}
  container.innerHTML = '';
  bookmarks.forEach(bookmark => {{
    const a = document.createElement('a');
    a.className = 'bookmark-item';
    a.href = `internal://navigate/${{bookmark.url}}`;
    a.innerHTML = escapeHtml(bookmark.title);
    container.appendChild(a);
  }});
}}
document.getElementById('searchInput').addEventListener('keypress', event => {{
  const query = event.target.value.trim();
  if (event.key === 'Enter' && query) {{
    window.location.href = `internal://search/${{encodeURIComponent(query)}}`;
  }}
}});
loadBookmarks();
</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_template_wins() {
        let t = Templates::none().with_template("history.html", "<p>h</p>");
        assert_eq!(t.load("history.html").as_deref(), Some("<p>h</p>"));
        assert_eq!(t.load("bookmarks.html"), None);
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.html"), "<html></html>").unwrap();
        let t = Templates::from_dir(dir.path());
        assert_eq!(t.load("settings.html").as_deref(), Some("<html></html>"));
        assert_eq!(t.load("history.html"), None);
    }

    #[test]
    fn open_accepts_missing_dir_and_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let t = Templates::open(&dir.path().join("absent")).unwrap();
        assert_eq!(t.load("history.html"), None);

        let file = dir.path().join("pages");
        fs::write(&file, "not a dir").unwrap();
        let err = Templates::open(&file).unwrap_err();
        assert!(matches!(err, ShellError::Template(_)));
    }

    #[test]
    fn path_like_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let t = Templates::from_dir(&dir.path().join("pages"));
        fs::write(dir.path().join("secret.html"), "x").unwrap();
        assert_eq!(t.load("../secret.html"), None);
        assert_eq!(t.load(".hidden.html"), None);
    }

    #[test]
    fn fallback_offers_only_newtab() {
        let html = fallback_page(&PageIdentity::Other("downloads".into()));
        assert!(html.contains("<h1>Downloads Page</h1>"));
        assert!(html.contains("internal://newtab"));
        assert_eq!(html.matches("internal://").count(), 1);
    }

    #[test]
    fn success_page_links_back() {
        let html = success_page(&PageIdentity::Settings, "Settings saved successfully!");
        assert!(html.contains("Settings saved successfully!"));
        assert!(html.contains("internal://settings'"));
        assert!(html.contains("Back to Settings"));
    }

    #[test]
    fn escape_html_covers_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn landing_fallback_has_default_background_and_head() {
        let html = landing_fallback();
        assert!(html.contains(LANDING_DEFAULT_BACKGROUND));
        assert!(html.contains("</head>"));
        assert!(html.contains("internal://search/"));
    }
}
