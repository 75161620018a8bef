//! Controller for `internal://<name>/` pages (history, bookmarks, settings,
//! and caller-defined pages).
//!
//! Rendering a page makes the engine report the page's own URL as a
//! navigation. Those reports must never be read as commands, so dispatch
//! is gated three ways:
//!
//! 1. the subscription is disarmed while a render is in progress;
//! 2. a URL equal to the identity URL last rendered is ignored;
//! 3. `processing_navigation` is raised for each dispatched command and
//!    released only after `guard_settle`, swallowing whatever the surface
//!    reports while it settles.
//!
//! Mutation commands schedule a re-render after `refresh_delay`, giving the
//! shell time to apply the change. A shell that applies changes
//! synchronously can call [`InternalPageController::acknowledge_mutation`]
//! to re-render immediately instead.

use std::rc::Rc;
use std::time::Instant;

use arcshell_store::{DataManager, SharedData};
use arcshell_types::config::TimingConfig;

use crate::deferred::DeferredQueue;
use crate::events::PageEvent;
use crate::identity::PageIdentity;
use crate::inject::{InjectedData, RenderSnapshot};
use crate::scheme::{Classification, Rejection, SurfaceKind, classify, is_internal};
use crate::surface::HostSurface;
use crate::templates::{Templates, fallback_page, success_page};

const SETTINGS_SAVED: &str = "Settings saved successfully!";

/// What the controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Rendering,
    Dispatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Refresh,
    ReleaseGuard,
}

/// Owns one surface showing one internal page.
pub struct InternalPageController<S: HostSurface> {
    identity: PageIdentity,
    surface: S,
    data: Option<SharedData>,
    templates: Rc<Templates>,
    timing: TimingConfig,
    state: ControllerState,
    armed: bool,
    processing_navigation: bool,
    /// Identity URL of the document on the surface (page or success page).
    shown_url: String,
    snapshot: Option<RenderSnapshot>,
    deferred: DeferredQueue<Deferred>,
    last_warning: Option<String>,
}

impl<S: HostSurface> InternalPageController<S> {
    /// Create the controller and render the page.
    pub fn new(
        identity: PageIdentity,
        surface: S,
        data: Option<SharedData>,
        templates: Rc<Templates>,
        timing: TimingConfig,
    ) -> Self {
        let shown_url = identity.url();
        let mut controller = Self {
            identity,
            surface,
            data,
            templates,
            timing,
            state: ControllerState::Idle,
            armed: false,
            processing_navigation: false,
            shown_url,
            snapshot: None,
            deferred: DeferredQueue::new(),
            last_warning: None,
        };
        controller.refresh();
        controller
    }

    /// Recompute the snapshot from current data and render it.
    pub fn refresh(&mut self) {
        self.state = ControllerState::Rendering;
        self.armed = false;

        let snapshot = self.build_snapshot();
        let url = self.identity.url();
        self.surface.render(snapshot.html(), &url);
        self.shown_url = url;
        self.snapshot = Some(snapshot);

        self.armed = true;
        self.state = ControllerState::Idle;
    }

    fn build_snapshot(&self) -> RenderSnapshot {
        let injected = match &self.data {
            Some(shared) => match shared.try_borrow() {
                Ok(data) => InjectedData::for_page(&self.identity, Some(&*data)),
                Err(_) => {
                    log::warn!("Data busy while rendering {}; injecting empty data", self.identity);
                    InjectedData::Empty
                },
            },
            None => InjectedData::for_page(&self.identity, None::<&DataManager>),
        };
        match self.templates.load(&self.identity.template_name()) {
            Some(template) => RenderSnapshot::build(self.identity.clone(), injected, &template),
            None => {
                log::debug!("No template for {} -- using placeholder", self.identity);
                RenderSnapshot::build(
                    self.identity.clone(),
                    InjectedData::Empty,
                    &fallback_page(&self.identity),
                )
            },
        }
    }

    /// Show the transient confirmation page. It bypasses data injection.
    fn show_success(&mut self, message: &str) {
        self.state = ControllerState::Rendering;
        self.armed = false;

        let url = self.identity.success_url();
        self.surface
            .render(&success_page(&self.identity, message), &url);
        self.shown_url = url;

        self.armed = true;
        self.state = ControllerState::Dispatching;
    }

    /// Interpret one navigation attempt reported by the surface.
    ///
    /// Returns the event to hand to the shell, or `None` when the URL is
    /// not a command for this page (ignored, rejected, or guarded).
    pub fn handle_navigation(&mut self, url: &str, now: Instant) -> Option<PageEvent> {
        if !self.armed || self.processing_navigation {
            log::debug!("Ignoring {url}: navigation already in progress");
            return None;
        }
        if url == self.shown_url || url == self.identity.url() || !is_internal(url) {
            return None;
        }

        self.processing_navigation = true;
        self.state = ControllerState::Dispatching;
        log::info!("Internal page handling: {url}");

        let event = match classify(url, SurfaceKind::Internal) {
            Classification::Event(event) => Some(event),
            Classification::Rejected {
                scheme,
                reason: Rejection::Malformed,
            } => {
                log::debug!("Dropping malformed {scheme:?} command: {url}");
                None
            },
            Classification::Rejected {
                scheme,
                reason: Rejection::Unparseable(reason),
            } => {
                log::warn!("Dropping {scheme:?} command: {reason}");
                self.last_warning = Some(reason);
                None
            },
            Classification::External | Classification::Unhandled(_) => None,
        };

        if let Some(event) = &event {
            if event.needs_refresh() {
                self.deferred.cancel_where(|t| *t == Deferred::Refresh);
                self.deferred
                    .schedule(now + self.timing.refresh_delay(), Deferred::Refresh);
            }
            if matches!(event, PageEvent::SaveSettings(_)) {
                self.show_success(SETTINGS_SAVED);
            }
        }

        self.deferred
            .schedule(now + self.timing.guard_settle(), Deferred::ReleaseGuard);
        self.state = ControllerState::Idle;
        event
    }

    /// Run deferred tasks due at `now`. Returns how many ran.
    pub fn poll(&mut self, now: Instant) -> usize {
        let due = self.deferred.take_due(now);
        let count = due.len();
        for task in due {
            match task {
                Deferred::Refresh => self.refresh(),
                Deferred::ReleaseGuard => self.processing_navigation = false,
            }
        }
        count
    }

    /// Run due tasks, then interpret every navigation the surface has
    /// reported since the last pump.
    pub fn pump(&mut self, now: Instant) -> Vec<PageEvent> {
        self.poll(now);
        self.surface
            .take_navigation_attempts()
            .iter()
            .filter_map(|url| self.handle_navigation(url, now))
            .collect()
    }

    /// The shell has applied the last mutation: re-render now instead of
    /// waiting for the refresh delay. Returns `false` if no refresh was
    /// pending.
    pub fn acknowledge_mutation(&mut self) -> bool {
        if self.deferred.cancel_where(|t| *t == Deferred::Refresh) == 0 {
            return false;
        }
        self.refresh();
        true
    }

    /// When the next deferred task falls due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred.next_deadline()
    }

    pub fn identity(&self) -> &PageIdentity {
        &self.identity
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_processing(&self) -> bool {
        self.processing_navigation
    }

    pub fn refresh_pending(&self) -> bool {
        self.deferred.contains_where(|t| *t == Deferred::Refresh)
    }

    /// The last data-injected render. The success page is not a snapshot.
    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.snapshot.as_ref()
    }

    /// The most recent diagnostic for a dropped command.
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
