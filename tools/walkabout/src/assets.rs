//! Filesystem collaborators for scene loading

use std::path::{Path, PathBuf};

use walkabout_rig::{
    AssetSource, RenderBackend, SceneError, TextureHandle, Vertex, VertexBufferHandle,
};

/// Reads assets relative to a base directory (the manifest's directory)
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetSource for FsAssets {
    fn read_text(&mut self, path: &Path) -> Result<String, SceneError> {
        let full = self.resolve(path);
        tracing::debug!("reading {:?}", full);
        std::fs::read_to_string(&full).map_err(|e| SceneError::Asset {
            path: full,
            reason: e.to_string(),
        })
    }
}

/// Backend that only checks textures exist and counts uploads
pub struct RecordingBackend {
    root: PathBuf,
    pub textures: Vec<PathBuf>,
    pub uploaded_vertices: usize,
    buffers: u32,
}

impl RecordingBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: Vec::new(),
            uploaded_vertices: 0,
            buffers: 0,
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, SceneError> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(SceneError::Asset {
                path: full,
                reason: "texture not found".to_string(),
            });
        }
        self.textures.push(full);
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) -> VertexBufferHandle {
        self.uploaded_vertices += vertices.len();
        let handle = VertexBufferHandle(self.buffers);
        self.buffers += 1;
        handle
    }
}
