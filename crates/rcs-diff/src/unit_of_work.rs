//! Clean-snapshot store.
//!
//! [`UnitOfWork`] keeps the last server-confirmed state of each entity in a
//! `HashMap` behind a `RwLock`, keyed by canonical [`EntityId`]. Snapshots are
//! stored as `Arc<Model>`: the store owns its copy, so later mutation of the
//! caller's model never reaches it, and readers share it without cloning.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use rcs_mapping::{ClassMetadata, Mapping};
use rcs_types::{EntityId, Model};

use crate::dirty::dirty_data;
use crate::error::DiffResult;

/// Snapshot store plus dirty-data diff for one client.
///
/// There is no eviction: the store grows for the lifetime of the owning
/// client.
pub struct UnitOfWork {
    mapping: Arc<Mapping>,
    enabled: bool,
    snapshots: RwLock<HashMap<EntityId, Arc<Model>>>,
}

impl UnitOfWork {
    /// Create an enabled unit of work over `mapping`.
    pub fn new(mapping: Arc<Mapping>) -> Self {
        Self::with_enabled(mapping, true)
    }

    /// Create a unit of work that may ignore registrations.
    ///
    /// When disabled, [`register_clean`](Self::register_clean) is a no-op and
    /// the store stays empty.
    pub fn with_enabled(mapping: Arc<Mapping>, enabled: bool) -> Self {
        Self {
            mapping,
            enabled,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mapping(&self) -> &Arc<Mapping> {
        &self.mapping
    }

    /// Store the clean state of an entity, replacing any earlier snapshot.
    ///
    /// Accepts an owned [`Model`] or an already shared `Arc<Model>`.
    pub fn register_clean(&self, id: impl Into<EntityId>, entity: impl Into<Arc<Model>>) {
        if !self.enabled {
            return;
        }
        let id = id.into();
        trace!(%id, "registering clean snapshot");
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entity.into());
    }

    /// The clean snapshot registered for `id`, if any.
    pub fn dirty_entity(&self, id: impl Into<EntityId>) -> Option<Arc<Model>> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id.into())
            .cloned()
    }

    /// Forget the snapshot registered for `id`. No-op if there is none.
    pub fn clear(&self, id: impl Into<EntityId>) {
        let id = id.into();
        let removed = self
            .snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            trace!(%id, "cleared snapshot");
        }
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute the changed fields of `new` relative to `old`.
    ///
    /// See [`dirty_data`] for the rules.
    pub fn dirty_data(&self, new: &Model, old: &Model, meta: &ClassMetadata) -> DiffResult<Model> {
        dirty_data(&self.mapping, new, old, meta)
    }

    /// Diff `new` against the registered snapshot for `id`, or against the
    /// metadata's default model when nothing is registered.
    pub fn dirty_data_for(
        &self,
        id: Option<&EntityId>,
        new: &Model,
        meta: &ClassMetadata,
    ) -> DiffResult<Model> {
        match id.and_then(|id| self.dirty_entity(id.clone())) {
            Some(clean) => self.dirty_data(new, &clean, meta),
            None => self.dirty_data(new, &meta.default_serialized_model(), meta),
        }
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("enabled", &self.enabled)
            .field("snapshot_count", &self.len())
            .finish()
    }
}
