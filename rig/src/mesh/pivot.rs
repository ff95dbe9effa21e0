//! Pivot extraction from joint vertices
//!
//! A part's pivot is the mean position of its joint vertices, i.e. the
//! vertices it shares with another part. A part with no joint vertices has
//! no pivot at all; callers must skip rotation about it rather than rotate
//! around the origin.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::registry::PartId;

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: Vec3,
    count: u32,
}

/// Part id -> pivot point for every part that appears in a mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    pivots: BTreeMap<PartId, Vec3>,
    parts: BTreeSet<PartId>,
}

impl PivotTable {
    /// Average the joint vertices of each part.
    ///
    /// `positions`, `owners` and `joints` are parallel arrays over the
    /// position pool. Every owned vertex registers its part; only joint
    /// vertices contribute to a pivot.
    pub(crate) fn from_joints(
        positions: &[Vec3],
        owners: &[Option<PartId>],
        joints: &[bool],
    ) -> Self {
        let mut sums: BTreeMap<PartId, Accumulator> = BTreeMap::new();
        let mut parts = BTreeSet::new();

        for ((position, owner), &is_joint) in positions.iter().zip(owners).zip(joints) {
            let Some(owner) = *owner else {
                continue;
            };
            parts.insert(owner);
            if !is_joint {
                continue;
            }
            let acc = sums.entry(owner).or_default();
            acc.sum += *position;
            acc.count += 1;
        }

        let pivots = sums
            .into_iter()
            .map(|(id, acc)| (id, acc.sum / acc.count as f32))
            .collect();

        Self { pivots, parts }
    }

    /// Pivot of `id`, or `None` if the part has no joint vertices
    /// (or is not part of this mesh).
    pub fn pivot(&self, id: PartId) -> Option<Vec3> {
        self.pivots.get(&id).copied()
    }

    /// Whether `id` owns any vertex of this mesh
    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains(&id)
    }

    /// Every part of the mesh with its pivot, in id order
    pub fn iter(&self) -> impl Iterator<Item = (PartId, Option<Vec3>)> + '_ {
        self.parts.iter().map(|&id| (id, self.pivot(id)))
    }

    /// Number of parts in the mesh
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
