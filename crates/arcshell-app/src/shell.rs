//! The orchestrator: owns the tabs and the data manager, and acts on the
//! events the page controllers report.

use std::borrow::Cow;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use arcshell_pages::scheme::is_internal;
use arcshell_pages::{
    HeadlessSurface, HostSurface, InternalPageController, LandingPageController, PageEvent,
    PageIdentity, Templates, apply_event,
};
use arcshell_store::{Profile, SharedData};
use arcshell_types::ShellConfig;
use arcshell_types::config::{NavigationConfig, TimingConfig};

use crate::commands::{Command, HELP, ProfileCommand};

/// Upper bound on event rounds per tick. Each round may open or replace
/// tabs, which may report further navigations.
const MAX_ROUNDS: usize = 16;

const ZOOM_STEP: f64 = 0.1;

/// Whether the command loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A plain web page. History is recorded when its URL changes.
pub struct WebTab {
    surface: HeadlessSurface,
    committed: String,
}

impl WebTab {
    fn open(url: &str, data: &SharedData) -> Self {
        let mut tab = Self {
            surface: HeadlessSurface::new(),
            committed: String::new(),
        };
        tab.load(url, data);
        tab
    }

    fn load(&mut self, url: &str, data: &SharedData) {
        self.surface.load_url(url);
        // Drop the surface's report of this load; the commit covers it.
        self.surface.take_navigation_attempts();
        self.commit(data);
    }

    fn commit(&mut self, data: &SharedData) {
        let url = self.surface.current_url();
        if url == self.committed {
            return;
        }
        self.committed = url.to_string();
        if records_history(url) {
            data.borrow_mut()
                .history
                .record_visit(url, self.surface.title());
        }
    }

    /// Follow links the page activated. `internal://` links open the
    /// matching internal page.
    fn pump(&mut self, data: &SharedData) -> Vec<PageEvent> {
        let mut events = Vec::new();
        for url in self.surface.take_navigation_attempts() {
            if url == self.surface.current_url() {
                self.commit(data);
            } else if is_internal(&url) {
                events.push(PageEvent::GenericNavigate(url));
            } else {
                self.load(&url, data);
            }
        }
        events
    }
}

fn records_history(url: &str) -> bool {
    url != "about:blank" && !is_internal(url)
}

pub enum Tab {
    Landing(LandingPageController<HeadlessSurface>),
    Internal(InternalPageController<HeadlessSurface>),
    Web(WebTab),
}

impl Tab {
    pub fn surface(&self) -> &HeadlessSurface {
        match self {
            Self::Landing(c) => c.surface(),
            Self::Internal(c) => c.surface(),
            Self::Web(w) => &w.surface,
        }
    }

    fn surface_mut(&mut self) -> &mut HeadlessSurface {
        match self {
            Self::Landing(c) => c.surface_mut(),
            Self::Internal(c) => c.surface_mut(),
            Self::Web(w) => &mut w.surface,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Landing(_) => "home",
            Self::Internal(_) => "internal",
            Self::Web(_) => "web",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Landing(_) => "Home".to_string(),
            Self::Internal(c) => c.identity().title(),
            Self::Web(w) => w.surface.title().to_string(),
        }
    }
}

/// Turn address-bar input into a URL. `http(s)://` and `internal://` pass
/// through; dotted input without spaces gets `https://`; the rest is a
/// search.
pub fn process_url(input: &str, search_url: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") || is_internal(input) {
        return input.to_string();
    }
    if input.contains('.') && !input.contains(' ') {
        return format!("https://{input}");
    }
    search_query_url(input, search_url)
}

/// `search_url` followed by the query with spaces as `+`.
pub fn search_query_url(query: &str, search_url: &str) -> String {
    let terms: Vec<Cow<'_, str>> = query.split(' ').map(urlencoding::encode).collect();
    format!("{search_url}{}", terms.join("+"))
}

pub struct Shell {
    data: SharedData,
    templates: Rc<Templates>,
    asset_dir: Option<PathBuf>,
    navigation: NavigationConfig,
    timing: TimingConfig,
    tabs: Vec<Tab>,
    current: usize,
    output: Vec<String>,
}

impl Shell {
    /// Build the shell and open the first (landing) tab.
    pub fn new(config: &ShellConfig, data: SharedData) -> arcshell_types::Result<Self> {
        let templates = Templates::open(&config.paths.template_dir)?;
        let asset_dir = Some(config.paths.asset_dir.clone()).filter(|dir| dir.is_dir());
        if asset_dir.is_none() {
            log::debug!("No asset directory -- landing assets stay relative");
        }
        let mut shell = Self {
            data,
            templates: Rc::new(templates),
            asset_dir,
            navigation: config.navigation.clone(),
            timing: config.timing.clone(),
            tabs: Vec::new(),
            current: 0,
            output: Vec::new(),
        };
        shell.open_landing();
        Ok(shell)
    }

    pub fn data(&self) -> &SharedData {
        &self.data
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.current)
    }

    /// Drain the lines produced since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn say(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    // -- Tabs ---------------------------------------------------------------

    fn push_tab(&mut self, tab: Tab) {
        self.tabs.push(tab);
        self.current = self.tabs.len() - 1;
    }

    pub fn open_landing(&mut self) {
        let controller = LandingPageController::new(
            HeadlessSurface::new(),
            Some(Rc::clone(&self.data)),
            Rc::clone(&self.templates),
            self.asset_dir.as_deref(),
        );
        self.push_tab(Tab::Landing(controller));
    }

    pub fn open_internal(&mut self, identity: PageIdentity) {
        if identity == PageIdentity::Landing {
            self.open_landing();
            return;
        }
        log::info!("Opening internal page {identity}");
        let controller = InternalPageController::new(
            identity,
            HeadlessSurface::new(),
            Some(Rc::clone(&self.data)),
            Rc::clone(&self.templates),
            self.timing.clone(),
        );
        self.push_tab(Tab::Internal(controller));
    }

    /// Open the page an `internal://<name>` URL names.
    pub fn open_internal_url(&mut self, url: &str) {
        match PageIdentity::from_url(url) {
            Some(identity) => self.open_internal(identity),
            None => log::warn!("No internal page for {url}"),
        }
    }

    pub fn open_web(&mut self, url: &str) {
        let tab = WebTab::open(url, &self.data);
        self.push_tab(Tab::Web(tab));
    }

    /// Open a new tab on `input` (processed like address-bar input), or on
    /// the configured default URL.
    pub fn open_new_tab(&mut self, input: Option<&str>) {
        let url = match input {
            Some(input) => process_url(input, &self.navigation.search_url),
            None => self.navigation.default_url.clone(),
        };
        if is_internal(&url) {
            self.open_internal_url(&url);
        } else {
            self.open_web(&url);
        }
    }

    /// Handle an `internal://<name>` link activated inside tab `source`. A
    /// link to the page the tab already owns (such as the success page's
    /// way back) re-renders that tab instead of opening another.
    fn open_internal_from(&mut self, source: usize, url: &str) {
        let Some(identity) = PageIdentity::from_url(url) else {
            log::warn!("No internal page for {url}");
            return;
        };
        let same_page = match self.tabs.get(source) {
            Some(Tab::Internal(c)) => *c.identity() == identity,
            Some(Tab::Landing(_)) => identity == PageIdentity::Landing,
            _ => false,
        };
        if !same_page {
            self.open_internal(identity);
            return;
        }
        log::debug!("Re-rendering {identity} in place");
        self.current = source;
        match self.tabs.get_mut(source) {
            Some(Tab::Internal(c)) => c.refresh(),
            Some(Tab::Landing(c)) => c.refresh(),
            _ => {},
        }
    }

    /// Focus tab `index`.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Focus the first landing tab, opening one if there is none.
    pub fn go_home(&mut self) {
        match self.tabs.iter().position(|t| matches!(t, Tab::Landing(_))) {
            Some(index) => self.current = index,
            None => self.open_landing(),
        }
    }

    fn close_current(&mut self) -> Flow {
        if self.current < self.tabs.len() {
            self.tabs.remove(self.current);
        }
        if self.tabs.is_empty() {
            return Flow::Quit;
        }
        self.current = self.current.min(self.tabs.len() - 1);
        Flow::Continue
    }

    // -- Navigation ---------------------------------------------------------

    /// Address-bar navigation in the current tab. A page tab is replaced by
    /// a web tab; a web tab navigates in place.
    pub fn navigate_to(&mut self, input: &str) {
        let url = process_url(input, &self.navigation.search_url);
        log::info!("Navigating to: {url}");
        if is_internal(&url) {
            self.open_internal_url(&url);
            return;
        }
        match self.tabs.get_mut(self.current) {
            Some(Tab::Web(web)) => web.load(&url, &self.data),
            Some(tab) => *tab = Tab::Web(WebTab::open(&url, &self.data)),
            None => self.open_web(&url),
        }
    }

    pub fn search(&mut self, query: &str) {
        if query.starts_with("http://") || query.starts_with("https://") {
            self.navigate_to(query);
        } else {
            let url = search_query_url(query, &self.navigation.search_url);
            self.navigate_to(&url);
        }
    }

    /// Apply `preset/<n>`, `color/<css>` or `gradient/<css>` to the
    /// appearance settings and re-render landing pages.
    pub fn change_background(&mut self, payload: &str) -> bool {
        let Some((kind, value)) = payload.split_once('/') else {
            log::warn!("Malformed background change: {payload}");
            return false;
        };
        let value = urlencoding::decode(value)
            .map(Cow::into_owned)
            .unwrap_or_else(|_| value.to_string());
        {
            let mut data = self.data.borrow_mut();
            let settings = &mut data.settings;
            match kind {
                "preset" => {
                    let Ok(n) = value.trim_start_matches("bg").parse::<i64>() else {
                        log::warn!("Bad preset background: {value}");
                        return false;
                    };
                    settings.set("appearance", "background_type", "preset");
                    settings.set("appearance", "preset_bg", n);
                },
                "color" => {
                    settings.set("appearance", "background_type", "color");
                    settings.set("appearance", "background_color", value);
                },
                "gradient" => {
                    settings.set("appearance", "background_type", "gradient");
                    settings.set("appearance", "background_gradient", value);
                },
                other => {
                    log::warn!("Unknown background kind {other:?}");
                    return false;
                },
            }
        }
        log::info!("Background changed: {payload}");
        self.refresh_views(None);
        true
    }

    /// Re-render every page tab except `except`.
    fn refresh_views(&mut self, except: Option<usize>) {
        for (idx, tab) in self.tabs.iter_mut().enumerate() {
            if Some(idx) == except {
                continue;
            }
            match tab {
                Tab::Landing(c) => c.refresh(),
                Tab::Internal(c) => c.refresh(),
                Tab::Web(_) => {},
            }
        }
    }

    // -- Events -------------------------------------------------------------

    fn handle_event(&mut self, source: usize, event: PageEvent) {
        log::debug!("Tab {source} event: {event:?}");
        match event {
            PageEvent::NavigateTo(url) => {
                self.current = source;
                self.navigate_to(&url);
            },
            PageEvent::Search(query) => {
                self.current = source;
                self.search(&query);
            },
            PageEvent::BackgroundChange(payload) => {
                self.change_background(&payload);
            },
            PageEvent::GenericNavigate(url) => self.open_internal_from(source, &url),
            mutation => {
                apply_event(&mut self.data.borrow_mut(), &mutation);
                if let Some(Tab::Internal(c)) = self.tabs.get_mut(source) {
                    c.acknowledge_mutation();
                }
                self.refresh_views(Some(source));
            },
        }
    }

    fn collect_events(&mut self, now: Instant) -> Vec<(usize, PageEvent)> {
        let mut events = Vec::new();
        for (idx, tab) in self.tabs.iter_mut().enumerate() {
            let tab_events = match tab {
                Tab::Landing(c) => c.pump(),
                Tab::Internal(c) => c.pump(now),
                Tab::Web(w) => w.pump(&self.data),
            };
            events.extend(tab_events.into_iter().map(|e| (idx, e)));
        }
        events
    }

    /// Run due timers and act on every reported navigation. Returns the
    /// number of events handled.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        for _ in 0..MAX_ROUNDS {
            let events = self.collect_events(now);
            if events.is_empty() {
                break;
            }
            handled += events.len();
            for (source, event) in events {
                self.handle_event(source, event);
            }
        }
        handled
    }

    /// The earliest pending timer across internal tabs.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tabs
            .iter()
            .filter_map(|tab| match tab {
                Tab::Internal(c) => c.next_deadline(),
                _ => None,
            })
            .min()
    }

    // -- Commands -----------------------------------------------------------

    pub fn execute(&mut self, command: Command, now: Instant) -> Flow {
        let flow = self.run(command);
        self.tick(now);
        flow
    }

    fn run(&mut self, command: Command) -> Flow {
        match command {
            Command::Open(input) => self.navigate_to(&input),
            Command::New(input) => self.open_new_tab(input.as_deref()),
            Command::Click(url) => match self.tabs.get_mut(self.current) {
                Some(tab) => tab.surface_mut().attempt(&url),
                None => self.say("No open tab."),
            },
            Command::Back => {
                if !self.with_surface(|s| s.back()) {
                    self.say("Nothing to go back to.");
                }
            },
            Command::Forward => {
                if !self.with_surface(|s| s.forward()) {
                    self.say("Nothing to go forward to.");
                }
            },
            Command::Reload => match self.tabs.get_mut(self.current) {
                Some(Tab::Landing(c)) => c.refresh(),
                Some(Tab::Internal(c)) => c.refresh(),
                Some(Tab::Web(w)) => w.surface.reload(),
                None => {},
            },
            Command::ZoomIn => self.zoom_by(ZOOM_STEP),
            Command::ZoomOut => self.zoom_by(-ZOOM_STEP),
            Command::Tab(name) => self.open_internal(PageIdentity::from_name(&name)),
            Command::Switch(index) => {
                if !self.switch_to(index) {
                    self.say(format!("No tab {index}."));
                }
            },
            Command::Home => self.go_home(),
            Command::Close => return self.close_current(),
            Command::Profile(cmd) => self.profile(cmd),
            Command::Bookmark => self.bookmark_current(),
            Command::Tabs => self.list_tabs(),
            Command::Show => self.show_current(),
            Command::Help => {
                for line in HELP.lines() {
                    self.say(line);
                }
            },
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn with_surface(&mut self, f: impl FnOnce(&mut HeadlessSurface) -> bool) -> bool {
        self.tabs
            .get_mut(self.current)
            .is_some_and(|tab| f(tab.surface_mut()))
    }

    fn zoom_by(&mut self, delta: f64) {
        let Some(tab) = self.tabs.get_mut(self.current) else {
            return;
        };
        let surface = tab.surface_mut();
        surface.set_zoom(surface.zoom() + delta);
        let zoom = surface.zoom();
        self.say(format!("Zoom: {:.0}%", zoom * 100.0));
    }

    /// Bookmark the current web page. Page tabs and blank pages are skipped.
    fn bookmark_current(&mut self) {
        let Some(Tab::Web(web)) = self.tabs.get(self.current) else {
            self.say("Only web pages can be bookmarked.");
            return;
        };
        let url = web.surface.current_url().to_string();
        let title = web.surface.title().to_string();
        if !records_history(&url) {
            self.say("Nothing to bookmark.");
            return;
        }
        self.data.borrow_mut().bookmarks.add(&title, &url);
        self.say(format!("Added '{title}' to bookmarks!"));
        self.refresh_views(None);
    }

    fn profile(&mut self, command: ProfileCommand) {
        let mut data = self.data.borrow_mut();
        let profiles = &mut data.profiles;
        let lines = match command {
            ProfileCommand::List => {
                let current = profiles.current().map(|p| p.name.clone());
                profiles
                    .list()
                    .iter()
                    .map(|p| {
                        let marker = if Some(&p.name) == current.as_ref() { '*' } else { ' ' };
                        if p.email.is_empty() {
                            format!("{marker} {}", p.name)
                        } else {
                            format!("{marker} {} <{}>", p.name, p.email)
                        }
                    })
                    .collect()
            },
            ProfileCommand::Add { name, email } => {
                let mut profile = Profile::new(&name);
                profile.email = email.unwrap_or_default();
                match profiles.add(profile) {
                    Ok(()) => vec![format!("Profile '{}' added.", name.trim())],
                    Err(e) => vec![format!("error: {e}")],
                }
            },
            ProfileCommand::Switch(name) => {
                if profiles.switch_to(&name) {
                    log::info!("Switched to profile {name}");
                    vec![format!("Current profile: {name}")]
                } else {
                    vec![format!("No profile '{name}'.")]
                }
            },
            ProfileCommand::Delete(name) => match profiles.delete(&name) {
                Ok(true) => vec![format!("Profile '{name}' deleted.")],
                Ok(false) => vec![format!("No profile '{name}'.")],
                Err(e) => vec![format!("error: {e}")],
            },
        };
        drop(data);
        self.output.extend(lines);
    }

    fn list_tabs(&mut self) {
        let lines: Vec<String> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(idx, tab)| {
                let marker = if idx == self.current_index() { '*' } else { ' ' };
                format!(
                    "{marker} {idx} [{}] {} | {}",
                    tab.kind(),
                    tab.label(),
                    tab.surface().current_url()
                )
            })
            .collect();
        self.output.extend(lines);
    }

    fn show_current(&mut self) {
        let Some(tab) = self.current_tab() else {
            self.say("No open tab.");
            return;
        };
        let surface = tab.surface();
        let mut lines = vec![
            format!("url:   {}", surface.current_url()),
            format!("title: {}", tab.label()),
            format!("zoom:  {:.0}%", surface.zoom() * 100.0),
        ];
        let payload = match tab {
            Tab::Landing(c) => c.snapshot().map(|s| s.injected_payload().to_string()),
            Tab::Internal(c) => c.snapshot().map(|s| s.injected_payload().to_string()),
            Tab::Web(_) => None,
        };
        if let Some(payload) = payload {
            lines.push(format!("data:  {payload}"));
        }
        self.output.extend(lines);
    }
}
