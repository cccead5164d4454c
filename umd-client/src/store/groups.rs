//! Group store
//!
//! Caches the role-name → group-id mapping fetched from the backend.
//! Merges are union semantics: later loads add or overwrite keys, never
//! remove them. A missing key means the role is unknown (e.g. not loaded
//! yet), not that the role has no members.

use crate::api::UmdClient;
use crate::error::ApiResult;
use std::sync::RwLock;
use umd_common::api::GroupMap;

/// Role name of the annotator group
pub const ANNOTATOR_ROLE: &str = "Annotator";

/// Role name of the manager group
pub const MANAGER_ROLE: &str = "Manager";

/// Cached group-name → group-id mapping
pub struct GroupStore {
    group_map: RwLock<GroupMap>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self {
            group_map: RwLock::new(GroupMap::new()),
        }
    }

    /// Fetch the mapping once and merge it in
    ///
    /// No retry, no TTL, no concurrency guard: concurrent loads may race,
    /// but the merge is commutative and idempotent per key, so
    /// last-response-wins per key is acceptable. Backend failures
    /// propagate to the caller unhandled.
    pub async fn load_groups(&self, client: &UmdClient) -> ApiResult<()> {
        let incoming = client.get_group_ids().await?;
        tracing::debug!(groups = incoming.len(), "Merging group map");
        self.merge(incoming);
        Ok(())
    }

    /// Union-merge: adds and overwrites keys, never removes
    pub fn merge(&self, incoming: GroupMap) {
        self.group_map.write().unwrap().extend(incoming);
    }

    /// Group id for a role name, if known
    pub fn group_id(&self, role: &str) -> Option<String> {
        self.group_map.read().unwrap().get(role).cloned()
    }

    /// Copy of the current mapping
    pub fn snapshot(&self) -> GroupMap {
        self.group_map.read().unwrap().clone()
    }

    /// True until the first successful load merges something in
    pub fn is_empty(&self) -> bool {
        self.group_map.read().unwrap().is_empty()
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
