//! Navigation guard
//!
//! Role-based route resolution, recomputed on every navigation event. The
//! guard is a short-circuit priority chain with three mutually exclusive
//! outcomes: redirect annotator-only users to their home page, record the
//! location for default navigation bookkeeping, or pass through.

use crate::store::groups::{ANNOTATOR_ROLE, MANAGER_ROLE};
use std::sync::RwLock;
use umd_common::api::{AnnotationMode, GroupMap, SessionUser};

/// Path annotator-only users are redirected to
pub const ANNOTATOR_HOME_PATH: &str = "/annotatorHome";

/// Route identity used by the guard's name checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteName {
    Home,
    Viewer,
    AnnotatorHome,
    Other(String),
}

/// A navigation target: route name plus the concrete path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub name: RouteName,
    pub path: String,
}

impl RouteTarget {
    pub fn home() -> Self {
        Self {
            name: RouteName::Home,
            path: "/".to_string(),
        }
    }

    pub fn annotator_home() -> Self {
        Self {
            name: RouteName::AnnotatorHome,
            path: ANNOTATOR_HOME_PATH.to_string(),
        }
    }

    /// Viewer route for a dataset folder, optionally in a specific
    /// annotation mode
    pub fn viewer(folder_id: &str, mode: Option<AnnotationMode>) -> Self {
        let path = match mode {
            Some(mode) => format!("/viewer/{folder_id}?mode={mode}"),
            None => format!("/viewer/{folder_id}"),
        };
        Self {
            name: RouteName::Viewer,
            path,
        }
    }

    pub fn named(name: &str, path: &str) -> Self {
        Self {
            name: RouteName::Other(name.to_string()),
            path: path.to_string(),
        }
    }
}

/// Outcome of evaluating one navigation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Continue to the requested target
    Proceed,
    /// Navigate to the given target instead
    Redirect(RouteTarget),
    /// Record the target as the current location, then continue
    RecordLocation,
}

/// Evaluate the guard chain for one navigation event
///
/// Priority order is fixed: the role check runs first for signed-in,
/// non-admin users with group memberships heading anywhere but the viewer
/// or annotator home; only when that whole gate does not apply is the
/// Home-route location bookkeeping considered. When the gate applies but
/// the user is not annotator-only, the event passes through with NO
/// location recording.
///
/// An empty group map (the one-shot load has not finished) makes both
/// membership lookups miss, so the guard falls through without a redirect.
/// That race is tolerated by design; there is no blocking wait.
pub fn evaluate_navigation(
    user: Option<&SessionUser>,
    groups: &GroupMap,
    to: &RouteTarget,
) -> RouteDecision {
    if let Some(user) = user {
        if !user.admin
            && !user.groups.is_empty()
            && to.name != RouteName::Viewer
            && to.name != RouteName::AnnotatorHome
        {
            let is_annotator = groups
                .get(ANNOTATOR_ROLE)
                .is_some_and(|id| user.groups.contains(id));
            let is_manager = groups
                .get(MANAGER_ROLE)
                .is_some_and(|id| user.groups.contains(id));

            if is_annotator && !is_manager {
                return RouteDecision::Redirect(RouteTarget::annotator_home());
            }

            if groups.is_empty() {
                tracing::debug!("group map not loaded yet, skipping role redirect");
            }
            return RouteDecision::Proceed;
        }
    }

    if to.name == RouteName::Home {
        return RouteDecision::RecordLocation;
    }

    RouteDecision::Proceed
}

/// Records the current navigation location
pub struct LocationStore {
    location: RwLock<Option<RouteTarget>>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self {
            location: RwLock::new(None),
        }
    }

    pub fn record(&self, target: &RouteTarget) {
        *self.location.write().unwrap() = Some(target.clone());
    }

    pub fn current(&self) -> Option<RouteTarget> {
        self.location.read().unwrap().clone()
    }
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}
