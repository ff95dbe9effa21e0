//! Scene assembly
//!
//! A [`SceneManifest`] lists the objects of a scene, where each one is placed
//! and which of them is driven by the walking rig. [`Scene::load`] reads and
//! segments every mesh through an [`AssetSource`], hands vertex data and
//! textures to a [`RenderBackend`], and resolves the rig against the shared
//! part registry. [`Scene::compose_frame`] then fills the transform table and
//! produces the shader constants for one frame.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{LightConfig, ProjectionConfig, RigConfig};
use crate::error::SceneError;
use crate::mesh::{DEFAULT_GROUP, Segmentation, Vertex, segment};
use crate::registry::{PartId, PartRegistry, part_name};
use crate::rig::{Rig, RigParts};
use crate::transform::{FrameConstants, TRANSFORM_TABLE_CAPACITY, TransformTable};

/// One object entry of a scene manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name as declared by the mesh's `o` line
    pub name: String,
    /// Mesh source path, resolved by the [`AssetSource`]
    pub mesh: PathBuf,
    /// Optional texture path, resolved by the [`RenderBackend`]
    #[serde(default)]
    pub texture: Option<PathBuf>,
    /// Static world translation of the object's body part
    #[serde(default)]
    pub translation: [f32; 3],
}

/// Scene description loaded from TOML.
///
/// ```toml
/// [[object]]
/// name = "house"
/// mesh = "house.obj"
/// texture = "house.png"
/// translation = [1.0, 0.0, 5.0]
///
/// [rig]
/// object = "person"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default, rename = "object")]
    pub objects: Vec<SceneObject>,
    /// Walking rig; a scene without one is static
    #[serde(default)]
    pub rig: Option<RigConfig>,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub light: LightConfig,
}

impl SceneManifest {
    pub fn from_toml_str(source: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(source)?)
    }
}

/// Renderer-side texture handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Renderer-side vertex buffer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexBufferHandle(pub u32);

/// Source of mesh text
///
/// The core never opens files itself. Implementations decide how a manifest
/// path maps onto storage.
pub trait AssetSource {
    /// Read the whole asset at `path` as text
    fn read_text(&mut self, path: &Path) -> Result<String, SceneError>;
}

/// Renderer the scene uploads its resources to
pub trait RenderBackend {
    /// Load the texture at `path`
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, SceneError>;

    /// Upload the expanded vertices of one object
    fn upload_vertices(&mut self, vertices: &[Vertex]) -> VertexBufferHandle;

    /// Free a texture loaded by a scene load that later failed
    fn release_texture(&mut self, _texture: TextureHandle) {
        // Default implementation does nothing (for backends that never free)
    }
}

/// An object after its mesh was segmented and uploaded
#[derive(Debug, Clone)]
pub struct LoadedObject {
    pub name: String,
    pub segmentation: Segmentation,
    pub vertex_buffer: VertexBufferHandle,
    pub texture: Option<TextureHandle>,
}

/// A loaded scene: objects, registry, static placements and the rig.
#[derive(Debug, Clone)]
pub struct Scene {
    registry: PartRegistry,
    objects: Vec<LoadedObject>,
    placements: Vec<(PartId, Mat4)>,
    rig: Option<Rig>,
    projection: ProjectionConfig,
    light: LightConfig,
    table: TransformTable,
}

impl Scene {
    /// Load every object of `manifest` and resolve the rig.
    ///
    /// Meshes are segmented and the rig is resolved before anything is
    /// handed to `backend`, so a failed load leaves no resources behind.
    pub fn load(
        manifest: &SceneManifest,
        assets: &mut dyn AssetSource,
        backend: &mut dyn RenderBackend,
    ) -> Result<Self, SceneError> {
        let mut registry = PartRegistry::new();
        let mut segmentations = Vec::with_capacity(manifest.objects.len());

        for entry in &manifest.objects {
            let text = assets.read_text(&entry.mesh)?;
            let segmentation =
                segment(&text, &mut registry).map_err(|source| SceneError::Mesh {
                    object: entry.name.clone(),
                    source,
                })?;
            if !segmentation.mesh.objects().contains(&entry.name) {
                tracing::warn!(
                    "mesh {:?} does not declare object '{}'",
                    entry.mesh,
                    entry.name
                );
            }
            tracing::debug!(
                "segmented '{}': {} vertices, {} parts",
                entry.name,
                segmentation.mesh.len(),
                segmentation.pivots.len()
            );
            segmentations.push(segmentation);
        }

        if registry.len() > TRANSFORM_TABLE_CAPACITY {
            return Err(SceneError::CapacityExceeded {
                parts: registry.len(),
                capacity: TRANSFORM_TABLE_CAPACITY,
            });
        }
        registry.log_ids();

        let mut placements = Vec::new();
        for entry in &manifest.objects {
            let name = part_name(&entry.name, DEFAULT_GROUP);
            match registry.lookup(&name) {
                Some(id) => placements.push((
                    id,
                    Mat4::from_translation(Vec3::from_array(entry.translation)),
                )),
                None => {
                    tracing::warn!("object '{}' has no '{}' part to place", entry.name, name)
                }
            }
        }

        let rig = match &manifest.rig {
            Some(config) => {
                let index = manifest
                    .objects
                    .iter()
                    .position(|entry| entry.name == config.object)
                    .ok_or_else(|| SceneError::UnknownObject(config.object.clone()))?;
                let pivots = &segmentations[index].pivots;
                let parts = RigParts::resolve(config, &registry, pivots)?;
                Some(Rig::new(config.clone(), parts))
            }
            None => None,
        };

        let textures = load_textures(manifest, backend)?;
        let objects: Vec<LoadedObject> = manifest
            .objects
            .iter()
            .zip(segmentations)
            .zip(textures)
            .map(|((entry, segmentation), texture)| LoadedObject {
                name: entry.name.clone(),
                vertex_buffer: backend.upload_vertices(segmentation.mesh.vertices()),
                segmentation,
                texture,
            })
            .collect();

        tracing::info!(
            "scene loaded: {} objects, {} parts{}",
            objects.len(),
            registry.len(),
            if rig.is_some() { ", rigged" } else { "" }
        );

        Ok(Self {
            registry,
            objects,
            placements,
            rig,
            projection: manifest.projection.clone(),
            light: manifest.light.clone(),
            table: TransformTable::new(),
        })
    }

    /// Fill the transform table for the current rig state and build the
    /// frame's shader constants.
    ///
    /// Every slot is reset to identity first, then static placements are
    /// written, then the rig's parts. A non-finite or non-positive `aspect`
    /// is replaced by 1.0.
    pub fn compose_frame(&mut self, aspect: f32) -> FrameConstants {
        self.table.reset();
        for &(id, placement) in &self.placements {
            self.table.set_world(id, placement);
        }
        if let Some(rig) = &self.rig {
            rig.compose(&mut self.table);
        }

        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let projection = &self.projection;
        let proj = Mat4::perspective_lh(
            projection.fov_y,
            aspect,
            projection.near,
            projection.far,
        );

        FrameConstants::new(&self.table, proj, self.light.color, self.light.direction)
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn objects(&self) -> &[LoadedObject] {
        &self.objects
    }

    pub fn rig(&self) -> Option<&Rig> {
        self.rig.as_ref()
    }

    pub fn rig_mut(&mut self) -> Option<&mut Rig> {
        self.rig.as_mut()
    }

    /// Table written by the last [`Scene::compose_frame`]
    pub fn transform_table(&self) -> &TransformTable {
        &self.table
    }
}

/// Load every object's texture, releasing the ones already loaded if any fails.
fn load_textures(
    manifest: &SceneManifest,
    backend: &mut dyn RenderBackend,
) -> Result<Vec<Option<TextureHandle>>, SceneError> {
    let mut textures = Vec::with_capacity(manifest.objects.len());
    for entry in &manifest.objects {
        let Some(path) = entry.texture.as_deref() else {
            textures.push(None);
            continue;
        };
        match backend.load_texture(path) {
            Ok(handle) => textures.push(Some(handle)),
            Err(err) => {
                for handle in textures.into_iter().flatten() {
                    backend.release_texture(handle);
                }
                return Err(err);
            }
        }
    }
    Ok(textures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::Control;
    use hashbrown::HashMap;

    /// Person with a body and four limbs, each limb sharing one vertex with
    /// the body.
    const PERSON: &str = "\
o person
v 0 1 0
v 1 1 0
v 0 2 0
v 0.5 0 0
v -1 1.5 0
v -1 2 0
v 2 1 0
v 2 2 0
v -1 0 0
v -1 1 0
v 1 -1 0
v 0 -1 0
v 0.5 1.5 0
vt 0 0
vn 0 0 -1
f 1/1/1 2/1/1 13/1/1
f 3/1/1 4/1/1 13/1/1
g left_hand
f 3/1/1 5/1/1 6/1/1
g right_hand
f 2/1/1 7/1/1 8/1/1
g left_leg
f 1/1/1 9/1/1 10/1/1
g right_leg
f 4/1/1 11/1/1 12/1/1
";

    const HOUSE: &str = "\
o house
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 -1
f 1/1/1 2/1/1 3/1/1
";

    const MANIFEST: &str = r#"
[[object]]
name = "house"
mesh = "house.obj"
texture = "house.png"
translation = [1.0, 0.0, 5.0]

[[object]]
name = "person"
mesh = "person.obj"

[rig]
"#;

    #[derive(Debug, Default)]
    struct MemoryAssets(HashMap<PathBuf, String>);

    impl MemoryAssets {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.0.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl AssetSource for MemoryAssets {
        fn read_text(&mut self, path: &Path) -> Result<String, SceneError> {
            self.0.get(path).cloned().ok_or_else(|| SceneError::Asset {
                path: path.to_path_buf(),
                reason: "not found".to_string(),
            })
        }
    }

    /// Records every call; fails to load `missing.png`
    #[derive(Debug, Default)]
    struct RecordingBackend {
        textures: Vec<PathBuf>,
        uploads: Vec<usize>,
        released: Vec<TextureHandle>,
    }

    impl RenderBackend for RecordingBackend {
        fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, SceneError> {
            if path == Path::new("missing.png") {
                return Err(SceneError::Asset {
                    path: path.to_path_buf(),
                    reason: "not found".to_string(),
                });
            }
            self.textures.push(path.to_path_buf());
            Ok(TextureHandle(self.textures.len() as u32 - 1))
        }

        fn release_texture(&mut self, texture: TextureHandle) {
            self.released.push(texture);
        }

        fn upload_vertices(&mut self, vertices: &[Vertex]) -> VertexBufferHandle {
            self.uploads.push(vertices.len());
            VertexBufferHandle(self.uploads.len() as u32 - 1)
        }
    }

    fn assets() -> MemoryAssets {
        MemoryAssets::default()
            .with("house.obj", HOUSE)
            .with("person.obj", PERSON)
    }

    fn load(manifest: &str) -> Result<(Scene, RecordingBackend), SceneError> {
        let manifest = SceneManifest::from_toml_str(manifest)?;
        let mut backend = RecordingBackend::default();
        let scene = Scene::load(&manifest, &mut assets(), &mut backend)?;
        Ok((scene, backend))
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = SceneManifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.objects.len(), 2);
        assert_eq!(manifest.objects[1].translation, [0.0; 3]);
        assert_eq!(manifest.objects[1].texture, None);
        assert_eq!(manifest.rig, Some(RigConfig::default()));
        assert_eq!(manifest.projection, ProjectionConfig::default());

        let empty = SceneManifest::from_toml_str("").unwrap();
        assert!(empty.objects.is_empty());
        assert!(empty.rig.is_none());
    }

    #[test]
    fn test_invalid_manifest() {
        let err = SceneManifest::from_toml_str("[[object]]\nname = 3").unwrap_err();
        assert!(matches!(err, SceneError::Manifest(_)));
    }

    #[test]
    fn test_load_uploads_every_object() {
        let (scene, backend) = load(MANIFEST).unwrap();
        assert_eq!(backend.textures, vec![PathBuf::from("house.png")]);
        assert_eq!(backend.uploads, vec![3, 18]);
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[0].texture, Some(TextureHandle(0)));
        assert_eq!(scene.objects()[1].vertex_buffer, VertexBufferHandle(1));
        // house.off, then the person's five parts
        assert_eq!(scene.registry().len(), 6);
    }

    #[test]
    fn test_rig_pivots_resolved() {
        let (scene, _) = load(MANIFEST).unwrap();
        let parts = scene.rig().unwrap().parts();
        assert_eq!(parts.left_hand.pivot, Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(parts.right_hand.pivot, Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(parts.left_leg.pivot, Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(parts.right_leg.pivot, Some(Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_compose_frame_places_static_objects() {
        let (mut scene, _) = load(MANIFEST).unwrap();
        let frame = scene.compose_frame(4.0 / 3.0);

        let house = scene.registry().lookup("house.off").unwrap();
        let placed = scene.transform_table().world(house).unwrap();
        assert_eq!(
            placed.transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 0.0, 5.0)
        );
        assert_eq!(frame.world[house.index()], placed.transpose());
        // Unused slots stay identity
        assert_eq!(frame.world[TRANSFORM_TABLE_CAPACITY - 1], Mat4::IDENTITY);
        assert_eq!(frame.light_direction, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_compose_frame_follows_rig() {
        let (mut scene, _) = load(MANIFEST).unwrap();
        let rig = scene.rig_mut().unwrap();
        rig.apply_input(Control::Forward, true);
        rig.update(1.0);
        scene.compose_frame(1.0);

        let body = scene.registry().lookup("person.off").unwrap();
        let origin = scene
            .transform_table()
            .world(body)
            .unwrap()
            .transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
        assert_eq!(
            scene.transform_table().view(),
            scene.rig().unwrap().view_matrix()
        );
    }

    #[test]
    fn test_bad_aspect_falls_back_to_square() {
        let (mut scene, _) = load(MANIFEST).unwrap();
        let square = scene.compose_frame(1.0);
        assert_eq!(scene.compose_frame(f32::INFINITY), square);
        assert_eq!(scene.compose_frame(0.0), square);
        assert_eq!(scene.compose_frame(f32::NAN), square);
    }

    #[test]
    fn test_missing_asset() {
        let manifest = r#"
[[object]]
name = "tree"
mesh = "tree.obj"
"#;
        let err = load(manifest).unwrap_err();
        assert!(matches!(err, SceneError::Asset { path, .. } if path == Path::new("tree.obj")));
    }

    #[test]
    fn test_mesh_error_names_object() {
        let manifest = SceneManifest::from_toml_str(
            r#"
[[object]]
name = "broken"
mesh = "broken.obj"
"#,
        )
        .unwrap();
        let mut assets =
            MemoryAssets::default().with("broken.obj", "o broken\nf 1/1/1 2/1/1 3/1/1\n");
        let err = Scene::load(&manifest, &mut assets, &mut RecordingBackend::default())
            .unwrap_err();
        assert!(matches!(err, SceneError::Mesh { object, .. } if object == "broken"));
    }

    #[test]
    fn test_rig_object_must_be_listed() {
        let manifest = r#"
[[object]]
name = "house"
mesh = "house.obj"

[rig]
object = "person"
"#;
        let err = load(manifest).unwrap_err();
        assert!(matches!(err, SceneError::UnknownObject(name) if name == "person"));
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut mesh = String::from("o crowd\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n");
        for i in 0..TRANSFORM_TABLE_CAPACITY {
            mesh.push_str(&format!("g part{i}\nf 1/1/1 2/1/1 3/1/1\n"));
        }
        let manifest = SceneManifest::from_toml_str(
            r#"
[[object]]
name = "crowd"
mesh = "crowd.obj"
"#,
        )
        .unwrap();
        let mut assets = MemoryAssets::default().with("crowd.obj", &mesh);
        let err = Scene::load(&manifest, &mut assets, &mut RecordingBackend::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::CapacityExceeded { parts, capacity }
                if parts == TRANSFORM_TABLE_CAPACITY + 1 && capacity == TRANSFORM_TABLE_CAPACITY
        ));
    }

    #[test]
    fn test_failed_load_hands_nothing_to_backend() {
        let manifest = SceneManifest::from_toml_str(
            r#"
[[object]]
name = "house"
mesh = "house.obj"
texture = "house.png"

[rig]
"#,
        )
        .unwrap();
        let mut backend = RecordingBackend::default();
        let err = Scene::load(&manifest, &mut assets(), &mut backend).unwrap_err();
        assert!(matches!(err, SceneError::UnknownObject(name) if name == "person"));
        assert!(backend.textures.is_empty());
        assert!(backend.uploads.is_empty());
    }

    #[test]
    fn test_texture_failure_releases_loaded_textures() {
        let manifest = SceneManifest::from_toml_str(
            r#"
[[object]]
name = "house"
mesh = "house.obj"
texture = "house.png"

[[object]]
name = "person"
mesh = "person.obj"
texture = "missing.png"
"#,
        )
        .unwrap();
        let mut backend = RecordingBackend::default();
        let err = Scene::load(&manifest, &mut assets(), &mut backend).unwrap_err();
        assert!(matches!(err, SceneError::Asset { .. }));
        assert_eq!(backend.released, vec![TextureHandle(0)]);
        assert!(backend.uploads.is_empty());
    }
}
