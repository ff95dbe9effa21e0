//! Two-pass mesh segmentation
//!
//! Pass 1 walks every line, fills the attribute pools and decides which
//! part owns each position vertex. Every face index must refer to an
//! attribute declared on an earlier line. A vertex touched by faces of more than
//! one part is flagged as a joint. Ownership follows one rule: a vertex is
//! claimed if it is still unowned, or if the claiming part is not the
//! object's "off" part. Named groups therefore take vertices away from the
//! catch-all group regardless of file order, while "off" only fills gaps.
//!
//! Pass 2 replays the recorded faces and expands every corner into a
//! [`Vertex`] carrying the final owner from pass 1. Ownership can change
//! after a face is read, so emission has to wait until pass 1 is done.

use glam::{Vec2, Vec3};

use super::parse::{Corner, DEFAULT_GROUP, Directive, parse_line};
use super::pivot::PivotTable;
use super::types::{SegmentedMesh, Vertex};
use crate::error::{MeshError, Pool};
use crate::registry::{PartId, PartRegistry, part_name};

/// Result of segmenting one mesh source
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub mesh: SegmentedMesh,
    pub pivots: PivotTable,
}

/// Face recorded in pass 1 for emission in pass 2, indices already checked
struct Face {
    corners: [Corner; 3],
}

/// Attribute pools indexed by the 0-based source index
#[derive(Default)]
struct Pools {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    /// Owning part per position
    owners: Vec<Option<PartId>>,
    /// Joint flag per position
    joints: Vec<bool>,
}

impl Pools {
    fn push_position(&mut self, position: Vec3) {
        self.positions.push(position);
        self.owners.push(None);
        self.joints.push(false);
    }

    /// Apply the ownership rule to one face corner.
    fn claim(&mut self, vertex: usize, part: PartId, off_part: Option<PartId>) {
        let owner = self.owners[vertex];
        if owner.is_some_and(|owner| owner != part) {
            self.joints[vertex] = true;
        }
        if owner.is_none() || Some(part) != off_part {
            self.owners[vertex] = Some(part);
        }
    }
}

/// Segment a mesh source into a tagged vertex list and pivot table.
///
/// Part ids are taken from `registry`, which is shared with everything
/// else that names parts. Each `o name` line eagerly registers
/// `name.off`, so every object owns at least that id even if all of its
/// faces sit in named groups.
pub fn segment(source: &str, registry: &mut PartRegistry) -> Result<Segmentation, MeshError> {
    let mut pools = Pools::default();
    let mut faces = Vec::new();
    let mut objects = Vec::new();

    let mut object = String::new();
    let mut group = DEFAULT_GROUP.to_string();
    let mut off_part: Option<PartId> = None;

    // Pass 1: pools, ownership and joints
    for (i, text) in source.lines().enumerate() {
        let line = i + 1;
        match parse_line(line, text)? {
            Directive::Position(p) => pools.push_position(p),
            Directive::TexCoord(t) => pools.tex_coords.push(t),
            Directive::Normal(n) => pools.normals.push(n),
            Directive::Object(name) => {
                object = name.to_string();
                off_part = Some(registry.get_id(&part_name(&object, DEFAULT_GROUP)));
                objects.push(object.clone());
            }
            Directive::Group(name) => group = name.to_string(),
            Directive::Face(corners) => {
                let part = registry.get_id(&part_name(&object, &group));

                for corner in &corners {
                    check_index(line, Pool::Position, corner.position, pools.positions.len())?;
                    check_index(line, Pool::TexCoord, corner.tex_coord, pools.tex_coords.len())?;
                    check_index(line, Pool::Normal, corner.normal, pools.normals.len())?;
                    pools.claim(corner.position, part, off_part);
                }
                faces.push(Face { corners });
            }
            Directive::Skip => {}
        }
    }

    // Pass 2: emission in face order
    let mut vertices = Vec::with_capacity(faces.len() * 3);
    for face in &faces {
        for corner in &face.corners {
            let part = pools.owners[corner.position]
                .map(PartId::raw)
                .unwrap_or(PartId::SENTINEL_RAW);

            vertices.push(Vertex {
                position: pools.positions[corner.position].to_array(),
                normal: pools.normals[corner.normal].to_array(),
                tex_coord: pools.tex_coords[corner.tex_coord].to_array(),
                part,
            });
        }
    }

    let pivots = PivotTable::from_joints(&pools.positions, &pools.owners, &pools.joints);
    let joint_count = pools.joints.iter().filter(|&&j| j).count();

    for (id, pivot) in pivots.iter() {
        if pivot.is_none() {
            tracing::debug!(
                "part {} ({}) has no joint vertices, no pivot",
                registry.name_of(id).unwrap_or("?"),
                id
            );
        }
    }
    tracing::debug!(
        "segmented {} faces: {} positions, {} texcoords, {} normals, {} joints, {} parts",
        faces.len(),
        pools.positions.len(),
        pools.tex_coords.len(),
        pools.normals.len(),
        joint_count,
        pivots.len()
    );

    Ok(Segmentation {
        mesh: SegmentedMesh {
            vertices,
            joint_count,
            objects,
        },
        pivots,
    })
}

fn check_index(line: usize, pool: Pool, index: usize, len: usize) -> Result<(), MeshError> {
    if index < len {
        Ok(())
    } else {
        Err(MeshError::IndexOutOfRange {
            line,
            pool,
            // Report the index as written in the source
            index: index + 1,
            len,
        })
    }
}
