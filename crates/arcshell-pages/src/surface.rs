//! The rendering surface a controller drives.
//!
//! [`HostSurface`] is the seam to the embedded web engine. [`HeadlessSurface`]
//! is a complete in-process implementation with a session history, used by
//! the shell binary and by tests.

/// Zoom bounds accepted by [`HeadlessSurface::set_zoom`].
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 5.0;

/// An embedded web view.
///
/// Engines report every URL change as a navigation attempt, including the
/// ones caused by [`render`](HostSurface::render) itself. Controllers pull
/// those reports with [`take_navigation_attempts`](HostSurface::take_navigation_attempts).
pub trait HostSurface {
    /// Show an HTML document under the given base URL.
    fn render(&mut self, html: &str, identity_url: &str);

    /// Navigate to a real URL.
    fn load_url(&mut self, url: &str);

    /// URL of the document currently shown.
    fn current_url(&self) -> &str;

    /// Title of the document currently shown.
    fn title(&self) -> &str;

    /// Drain navigation attempts reported since the last call, oldest
    /// first.
    fn take_navigation_attempts(&mut self) -> Vec<String>;

    /// Go back in session history. Returns `false` if there is nowhere to go.
    fn back(&mut self) -> bool;

    /// Go forward in session history. Returns `false` if there is nowhere
    /// to go.
    fn forward(&mut self) -> bool;

    fn reload(&mut self);

    fn zoom(&self) -> f64;

    fn set_zoom(&mut self, factor: f64);
}

/// One document in a surface's session history.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub url: String,
    pub title: String,
    /// The document, when it was rendered from a string rather than loaded.
    pub html: Option<String>,
}

/// A surface with no engine behind it.
///
/// Keeps a back/forward session history, records every rendered document,
/// and -- like real engines -- reports each document change as a navigation
/// attempt. [`attempt`](Self::attempt) injects a user-initiated navigation
/// (a clicked link or script redirect).
#[derive(Debug)]
pub struct HeadlessSurface {
    back_stack: Vec<SessionEntry>,
    forward_stack: Vec<SessionEntry>,
    current: Option<SessionEntry>,
    attempts: Vec<String>,
    zoom: f64,
    renders: usize,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
            current: None,
            attempts: Vec::new(),
            zoom: 1.0,
            renders: 0,
        }
    }

    /// Simulate a navigation the page itself initiated.
    pub fn attempt(&mut self, url: &str) {
        self.attempts.push(url.to_string());
    }

    /// The document most recently rendered from a string, if the current
    /// entry is one.
    pub fn html(&self) -> Option<&str> {
        self.current.as_ref().and_then(|e| e.html.as_deref())
    }

    /// How many times [`HostSurface::render`] has been called.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }

    /// Push a new entry, clearing forward history.
    fn push(&mut self, entry: SessionEntry) {
        if let Some(previous) = self.current.take() {
            self.back_stack.push(previous);
        }
        self.forward_stack.clear();
        self.attempts.push(entry.url.clone());
        self.current = Some(entry);
    }
}

impl HostSurface for HeadlessSurface {
    /// A render under the URL already shown replaces the current entry, so
    /// re-rendering a page does not grow the session history.
    fn render(&mut self, html: &str, identity_url: &str) {
        self.renders += 1;
        let entry = SessionEntry {
            url: identity_url.to_string(),
            title: extract_title(html).unwrap_or_default(),
            html: Some(html.to_string()),
        };
        match &mut self.current {
            Some(current) if current.url == identity_url => {
                *current = entry;
                self.attempts.push(identity_url.to_string());
            },
            _ => self.push(entry),
        }
    }

    fn load_url(&mut self, url: &str) {
        self.push(SessionEntry {
            url: url.to_string(),
            title: url.to_string(),
            html: None,
        });
    }

    fn current_url(&self) -> &str {
        self.current.as_ref().map_or("about:blank", |e| e.url.as_str())
    }

    fn title(&self) -> &str {
        self.current.as_ref().map_or("", |e| e.title.as_str())
    }

    fn take_navigation_attempts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.attempts)
    }

    fn back(&mut self) -> bool {
        let Some(prev) = self.back_stack.pop() else {
            return false;
        };
        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }
        self.attempts.push(prev.url.clone());
        self.current = Some(prev);
        true
    }

    fn forward(&mut self) -> bool {
        let Some(next) = self.forward_stack.pop() else {
            return false;
        };
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.attempts.push(next.url.clone());
        self.current = Some(next);
        true
    }

    fn reload(&mut self) {
        if let Some(entry) = &self.current {
            self.attempts.push(entry.url.clone());
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, factor: f64) {
        self.zoom = factor.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Text of the first `<title>` element.
fn extract_title(html: &str) -> Option<String> {
    let start = html.find("<title>")? + "<title>".len();
    let len = html[start..].find("</title>")?;
    Some(html[start..start + len].trim().to_string())
}
