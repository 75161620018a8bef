//! Page controllers for arcshell.
//!
//! Two controllers own the application's synthetic pages:
//!
//! - **[`InternalPageController`]** -- history, bookmarks, settings and any
//!   other `internal://<name>/` page. Renders a data-injected document,
//!   interprets `internal://` commands clicked inside it, and re-renders
//!   itself after mutations.
//!
//! - **[`LandingPageController`]** -- the new-tab page. Renders once from
//!   the current bookmarks and background preference and forwards
//!   navigate/search/background commands.
//!
//! Both speak the grammar in [`scheme`] and report outward through
//! [`PageEvent`]. The engine behind a page is abstracted by
//! [`HostSurface`].

pub mod deferred;
pub mod events;
pub mod identity;
pub mod inject;
pub mod internal;
pub mod landing;
pub mod scheme;
pub mod surface;
pub mod templates;

#[cfg(test)]
mod test_utils;

pub use deferred::DeferredQueue;
pub use events::{PageEvent, apply_event};
pub use identity::PageIdentity;
pub use inject::{InjectedData, RenderSnapshot};
pub use internal::{ControllerState, InternalPageController};
pub use landing::{Background, LandingPageController, resolve_background};
pub use scheme::{Classification, NavigationIntent, Rejection, Scheme, SurfaceKind, classify};
pub use surface::{HeadlessSurface, HostSurface};
pub use templates::Templates;
