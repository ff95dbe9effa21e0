//! `walkabout inspect`: segment one mesh and report its parts

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use walkabout_rig::{PartRegistry, segment};

#[derive(Debug, Serialize)]
pub struct PartReport {
    pub id: u32,
    pub name: String,
    pub vertices: usize,
    /// `None` when the part shares no vertex with another part
    pub pivot: Option<[f32; 3]>,
}

#[derive(Debug, Serialize)]
pub struct MeshReport {
    pub objects: Vec<String>,
    pub faces: usize,
    pub vertices: usize,
    pub joints: usize,
    pub parts: Vec<PartReport>,
}

/// Segment the mesh at `input` with a fresh registry.
pub fn inspect_mesh(input: &Path) -> Result<MeshReport> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read mesh: {:?}", input))?;

    let mut registry = PartRegistry::new();
    let seg = segment(&source, &mut registry)
        .with_context(|| format!("Failed to segment mesh: {:?}", input))?;

    let counts = seg.mesh.part_vertex_counts();
    let parts = seg
        .pivots
        .iter()
        .map(|(id, pivot)| PartReport {
            id: id.raw(),
            name: registry.name_of(id).unwrap_or_default().to_string(),
            vertices: counts.get(&id).copied().unwrap_or(0),
            pivot: pivot.map(|p| p.to_array()),
        })
        .collect();

    Ok(MeshReport {
        objects: seg.mesh.objects().to_vec(),
        faces: seg.mesh.face_count(),
        vertices: seg.mesh.len(),
        joints: seg.mesh.joint_count(),
        parts,
    })
}

pub fn print_report(input: &Path, report: &MeshReport) {
    println!(
        "{}: {} faces, {} vertices, {} joints",
        input.display(),
        report.faces,
        report.vertices,
        report.joints
    );
    for part in &report.parts {
        let pivot = match part.pivot {
            Some([x, y, z]) => format!("({x:.3}, {y:.3}, {z:.3})"),
            None => "none".to_string(),
        };
        println!(
            "  #{:<3} {:<24} {:>6} vertices  pivot {}",
            part.id, part.name, part.vertices, pivot
        );
    }
}
