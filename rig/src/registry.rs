//! Part id registry
//!
//! Assigns dense, stable ids to part names (`"<object>.<group>"`). Ids are
//! handed out in first-seen order starting at 0 and are never reused. One
//! registry is shared by every mesh in a scene and by the rig, so the id a
//! mesh vertex carries is the same id the rig writes a matrix for.

use hashbrown::HashMap;

/// Dense identifier of a rigid part.
///
/// Doubles as the slot index into the [`crate::TransformTable`] and is
/// written into every vertex the part owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartId(u32);

impl PartId {
    /// Raw value reserved for "no part" in GPU-side data. Never assigned.
    pub const SENTINEL_RAW: u32 = u32::MAX;

    /// Raw id as stored in vertex data
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index into per-part tables
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Build from a raw value, rejecting the sentinel
    pub const fn from_raw(raw: u32) -> Option<Self> {
        if raw == Self::SENTINEL_RAW {
            None
        } else {
            Some(Self(raw))
        }
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grow-only map from part name to [`PartId`].
///
/// Mutation requires `&mut`, so only one loader can assign ids at a time.
/// Hosts that load assets in parallel must wrap the registry in a mutex.
#[derive(Debug, Default, Clone)]
pub struct PartRegistry {
    ids: HashMap<String, PartId>,
    /// Names indexed by id
    names: Vec<String>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, registering it if it has not been seen before.
    pub fn get_id(&mut self, name: &str) -> PartId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        debug_assert!(
            (self.names.len() as u64) < PartId::SENTINEL_RAW as u64,
            "part registry exhausted"
        );
        let id = PartId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Id for `name` without registering it
    pub fn lookup(&self, name: &str) -> Option<PartId> {
        self.ids.get(name).copied()
    }

    /// Name registered for `id`
    pub fn name_of(&self, id: PartId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All `(id, name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (PartId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (PartId(i as u32), name.as_str()))
    }

    /// Dump the registry at debug level
    pub fn log_ids(&self) {
        tracing::debug!("part ids ({}):", self.len());
        for (id, name) in self.iter() {
            tracing::debug!("  {} {}", name, id.raw());
        }
    }
}

/// Full part name for a group of an object
pub fn part_name(object: &str, group: &str) -> String {
    format!("{object}.{group}")
}
