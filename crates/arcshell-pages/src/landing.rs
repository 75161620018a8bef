//! Controller for the new-tab page.
//!
//! The landing surface is rendered once and replaced (not re-rendered in
//! place) when the user navigates away, so it needs no navigation guard.
//! It does not own any mutation commands; bookmark and settings edits go
//! through the internal pages.

use std::path::Path;
use std::rc::Rc;

use arcshell_store::settings::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_BACKGROUND_GRADIENT, DEFAULT_PRESET_BG,
};
use arcshell_store::{Bookmark, SettingsStore, SharedData};

use crate::events::PageEvent;
use crate::identity::PageIdentity;
use crate::inject::{InjectedData, RenderSnapshot};
use crate::scheme::{Classification, SurfaceKind, classify};
use crate::surface::HostSurface;
use crate::templates::{LANDING_DEFAULT_BACKGROUND, Templates, landing_fallback};

/// Asset base used when no asset directory is configured.
const RELATIVE_ASSETS: &str = "assets";

/// The new-tab background preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    /// A bundled image, `bg<N>`.
    Preset(i64),
    /// A CSS color.
    Color(String),
    /// A CSS gradient.
    Gradient(String),
}

impl Background {
    /// The preference value: the asset reference for presets, the CSS
    /// value otherwise.
    pub fn value(&self) -> String {
        match self {
            Self::Preset(n) => format!("bg{n}"),
            Self::Color(c) => c.clone(),
            Self::Gradient(g) => g.clone(),
        }
    }

    /// CSS `background` value, resolving presets under `asset_base`.
    pub fn css(&self, asset_base: &str) -> String {
        match self {
            Self::Preset(n) => format!("url('{asset_base}/backgrounds/bg{n}.jpg')"),
            Self::Color(c) => c.clone(),
            Self::Gradient(g) => g.clone(),
        }
    }
}

/// Resolve the background from `appearance.*` settings.
///
/// `background_type` selects preset (the default), color or gradient; each
/// reads its own key with a fixed default. Unknown types resolve to the
/// default preset.
pub fn resolve_background(settings: Option<&SettingsStore>) -> Background {
    let Some(settings) = settings else {
        return Background::Preset(DEFAULT_PRESET_BG);
    };
    match settings
        .get_str("appearance", "background_type", "preset")
        .as_str()
    {
        "preset" => Background::Preset(settings.get_int(
            "appearance",
            "preset_bg",
            DEFAULT_PRESET_BG,
        )),
        "color" => Background::Color(settings.get_str(
            "appearance",
            "background_color",
            DEFAULT_BACKGROUND_COLOR,
        )),
        "gradient" => Background::Gradient(settings.get_str(
            "appearance",
            "background_gradient",
            DEFAULT_BACKGROUND_GRADIENT,
        )),
        other => {
            log::debug!("Unknown background_type {other:?}; using default preset");
            Background::Preset(DEFAULT_PRESET_BG)
        },
    }
}

/// `file://` URL for a local directory.
fn file_url(dir: &Path) -> String {
    let abs = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let path = abs.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

/// Owns the new-tab surface.
pub struct LandingPageController<S: HostSurface> {
    surface: S,
    data: Option<SharedData>,
    templates: Rc<Templates>,
    /// Absolute asset URL base, or `None` to keep template paths relative.
    asset_base: Option<String>,
    background: Background,
    snapshot: Option<RenderSnapshot>,
}

impl<S: HostSurface> LandingPageController<S> {
    /// Create the controller and render the page.
    pub fn new(
        surface: S,
        data: Option<SharedData>,
        templates: Rc<Templates>,
        asset_dir: Option<&Path>,
    ) -> Self {
        let mut controller = Self {
            surface,
            data,
            templates,
            asset_base: asset_dir.map(file_url),
            background: Background::Preset(DEFAULT_PRESET_BG),
            snapshot: None,
        };
        controller.refresh();
        controller
    }

    /// Rebuild from current bookmarks and settings, and render.
    pub fn refresh(&mut self) {
        let (bookmarks, background) = self.read_data();
        let base = self
            .asset_base
            .clone()
            .unwrap_or_else(|| RELATIVE_ASSETS.to_string());
        let css = background.css(&base);

        let template = self
            .templates
            .load(&PageIdentity::Landing.template_name())
            .unwrap_or_else(|| {
                log::debug!("No landing template -- using built-in page");
                landing_fallback()
            });
        let document = self
            .rewrite_assets(&template)
            .replace(LANDING_DEFAULT_BACKGROUND, &format!("background: {css};"));

        let snapshot = RenderSnapshot::build(
            PageIdentity::Landing,
            InjectedData::Landing {
                bookmarks,
                background: css,
            },
            &document,
        );
        self.surface
            .render(snapshot.html(), &PageIdentity::Landing.url());
        self.background = background;
        self.snapshot = Some(snapshot);
    }

    fn read_data(&self) -> (Vec<Bookmark>, Background) {
        let Some(shared) = &self.data else {
            return (Vec::new(), resolve_background(None));
        };
        match shared.try_borrow() {
            Ok(data) => (
                data.bookmarks.list().to_vec(),
                resolve_background(Some(&data.settings)),
            ),
            Err(_) => {
                log::warn!("Data busy while rendering the landing page");
                (Vec::new(), resolve_background(None))
            },
        }
    }

    fn rewrite_assets(&self, html: &str) -> String {
        let Some(base) = &self.asset_base else {
            return html.to_string();
        };
        html.replace("src=\"assets/", &format!("src=\"{base}/"))
            .replace("url(\"assets/", &format!("url(\"{base}/"))
            .replace("url('assets/", &format!("url('{base}/"))
    }

    /// Interpret one navigation attempt. Only navigate, search and
    /// background commands produce events here.
    pub fn handle_navigation(&mut self, url: &str) -> Option<PageEvent> {
        if url == PageIdentity::Landing.url() {
            return None;
        }
        match classify(url, SurfaceKind::Landing) {
            Classification::Event(event) => {
                log::info!("Landing page handling: {url}");
                Some(event)
            },
            Classification::Unhandled(scheme) => {
                log::debug!("Landing page ignores {scheme:?}: {url}");
                None
            },
            Classification::Rejected { .. } | Classification::External => None,
        }
    }

    /// Interpret every navigation the surface has reported.
    pub fn pump(&mut self) -> Vec<PageEvent> {
        self.surface
            .take_navigation_attempts()
            .iter()
            .filter_map(|url| self.handle_navigation(url))
            .collect()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
