//! End-to-end segmentation of small synthetic meshes

use glam::Vec3;
use walkabout_rig::{PartRegistry, segment};

/// Two unit triangles; the arm triangle shares vertex 2 with the body.
const BODY_WITH_ARM: &str = "\
o body
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
g arm
f 2/1/1 4/1/1 3/1/1
";

#[test]
fn test_body_with_arm() {
    let mut registry = PartRegistry::new();
    let seg = segment(BODY_WITH_ARM, &mut registry).unwrap();

    assert_eq!(registry.len(), 2);
    let body = registry.lookup("body.off").unwrap();
    let arm = registry.lookup("body.arm").unwrap();
    assert_ne!(body, arm);

    // Vertices 2 and 3 are touched by both parts
    assert_eq!(seg.mesh.joint_count(), 2);
    let shared = Vec3::new(1.0, 0.0, 0.0);
    for vertex in seg.mesh.vertices() {
        if Vec3::from_array(vertex.position) == shared {
            assert_eq!(vertex.part_id(), Some(arm));
        }
    }

    // The arm owns both joints and pivots about their mean
    let pivot = seg.pivots.pivot(arm).unwrap();
    assert!(pivot.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0), 1e-5));
    assert_eq!(seg.pivots.pivot(body), None);
}

#[test]
fn test_segmentation_is_deterministic() {
    let first = segment(BODY_WITH_ARM, &mut PartRegistry::new()).unwrap();
    let second = segment(BODY_WITH_ARM, &mut PartRegistry::new()).unwrap();
    assert_eq!(first.mesh.as_bytes(), second.mesh.as_bytes());
    assert_eq!(first.pivots, second.pivots);
}

#[test]
fn test_vertex_count_is_three_per_face() {
    let seg = segment(BODY_WITH_ARM, &mut PartRegistry::new()).unwrap();
    let faces = BODY_WITH_ARM
        .lines()
        .filter(|line| line.starts_with("f "))
        .count();
    assert_eq!(seg.mesh.len(), 3 * faces);
    assert_eq!(seg.mesh.face_count(), faces);
}

#[test]
fn test_registry_is_shared_across_meshes() {
    let mut registry = PartRegistry::new();
    segment(BODY_WITH_ARM, &mut registry).unwrap();
    let arm = registry.lookup("body.arm").unwrap();

    // Loading the same object again reuses its ids
    let seg = segment(BODY_WITH_ARM, &mut registry).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(seg.pivots.contains(arm));

    let other = "o crate\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
    let seg = segment(other, &mut registry).unwrap();
    let id = registry.lookup("crate.off").unwrap();
    assert_eq!(id.raw(), 2);
    assert!(seg.mesh.vertices().iter().all(|v| v.part == id.raw()));
}
