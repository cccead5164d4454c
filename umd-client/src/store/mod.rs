//! Application store
//!
//! State shared across the client: the group map cache and the navigation
//! location. The store is constructed explicitly and passed to consumers;
//! there are no module-level singletons.

pub mod groups;
pub mod navigation;

pub use groups::{GroupStore, ANNOTATOR_ROLE, MANAGER_ROLE};
pub use navigation::{
    evaluate_navigation, LocationStore, RouteDecision, RouteName, RouteTarget,
    ANNOTATOR_HOME_PATH,
};

use umd_common::api::SessionUser;

/// Dependency-injected container bundling the client's shared state
pub struct AppStore {
    pub groups: GroupStore,
    pub location: LocationStore,
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            groups: GroupStore::new(),
            location: LocationStore::new(),
        }
    }

    /// Run the navigation guard for one event and apply its bookkeeping
    ///
    /// Returns the decision so the caller can perform the actual
    /// navigation (or redirect).
    pub fn before_navigation(
        &self,
        user: Option<&SessionUser>,
        to: &RouteTarget,
    ) -> RouteDecision {
        let decision = evaluate_navigation(user, &self.groups.snapshot(), to);
        if decision == RouteDecision::RecordLocation {
            self.location.record(to);
        }
        decision
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
