//! Output types of mesh segmentation

use std::collections::BTreeMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::registry::PartId;

/// One expanded triangle corner as uploaded to the GPU (36 bytes).
///
/// `part` is the raw [`PartId`] the vertex belongs to; the vertex shader
/// uses it to pick the part's world matrix from the transform table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub part: u32,
}

impl Vertex {
    /// Part that owns this vertex
    pub fn part_id(&self) -> Option<PartId> {
        PartId::from_raw(self.part)
    }
}

/// Flat, per-triangle-expanded vertex list tagged with part ids.
///
/// Holds exactly three vertices per source face, in face declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentedMesh {
    pub(crate) vertices: Vec<Vertex>,
    /// Number of position-pool vertices flagged as joints
    pub(crate) joint_count: usize,
    /// Object names in declaration order
    pub(crate) objects: Vec<String>,
}

impl SegmentedMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of source vertices shared by more than one part
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// Objects declared by `o` lines, in order
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    /// Vertex data as raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Maximal contiguous vertex runs per part, in vertex order.
    pub fn part_ranges(&self) -> BTreeMap<PartId, Vec<Range<usize>>> {
        let mut ranges: BTreeMap<PartId, Vec<Range<usize>>> = BTreeMap::new();
        let mut start = 0;

        for i in 1..=self.vertices.len() {
            let run_ends =
                i == self.vertices.len() || self.vertices[i].part != self.vertices[start].part;
            if !run_ends {
                continue;
            }
            if let Some(id) = self.vertices[start].part_id() {
                ranges.entry(id).or_default().push(start..i);
            }
            start = i;
        }

        ranges
    }

    /// Number of expanded vertices per part
    pub fn part_vertex_counts(&self) -> BTreeMap<PartId, usize> {
        let mut counts = BTreeMap::new();
        for id in self.vertices.iter().filter_map(Vertex::part_id) {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }
}
