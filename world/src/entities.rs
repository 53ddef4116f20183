//! Authoritative storage for host objects and their per-object state.

use std::collections::{BTreeMap, HashMap};

use palxel_core::{EntityHandle, Position, RegionId};

/// State stored for a single live object.
#[derive(Clone, Debug)]
pub(crate) struct EntityRecord {
    /// Entity type id the object was spawned with.
    pub(crate) kind: String,
    /// Region the object lives in.
    pub(crate) region: RegionId,
    /// Position fixed at spawn time.
    pub(crate) position: Position,
    /// Arbitrary-key integer tags.
    pub(crate) tags: HashMap<String, i64>,
    /// Typed numeric properties.
    pub(crate) properties: HashMap<String, u32>,
}

/// Registry that stores live objects and allocates handles.
///
/// Handles are never reused, so a handle to a removed object stays invalid
/// even after another object spawns.
#[derive(Debug)]
pub(crate) struct EntityRegistry {
    entries: BTreeMap<EntityHandle, EntityRecord>,
    next_handle: u64,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// Inserts a fresh object and returns its handle.
    pub(crate) fn insert(
        &mut self,
        kind: &str,
        region: RegionId,
        position: Position,
    ) -> EntityHandle {
        let handle = EntityHandle::new(self.next_handle);
        self.next_handle += 1;
        let _ = self.entries.insert(
            handle,
            EntityRecord {
                kind: kind.to_owned(),
                region,
                position,
                tags: HashMap::new(),
                properties: HashMap::new(),
            },
        );
        handle
    }

    /// Removes an object, returning whether it existed.
    pub(crate) fn remove(&mut self, handle: EntityHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }

    /// Looks up a live object.
    pub(crate) fn get(&self, handle: EntityHandle) -> Option<&EntityRecord> {
        self.entries.get(&handle)
    }

    /// Looks up a live object mutably.
    pub(crate) fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut EntityRecord> {
        self.entries.get_mut(&handle)
    }

    /// Handles of live objects of `kind` in `region`, in spawn order.
    pub(crate) fn of_kind_in(&self, region: RegionId, kind: &str) -> Vec<EntityHandle> {
        self.entries
            .iter()
            .filter(|(_, record)| record.region == region && record.kind == kind)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Number of live objects across every region.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
