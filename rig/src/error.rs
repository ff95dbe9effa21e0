//! Error types for mesh segmentation and scene assembly

use std::path::PathBuf;

/// Which attribute pool a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Position,
    TexCoord,
    Normal,
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pool::Position => "position",
            Pool::TexCoord => "texcoord",
            Pool::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Failure while segmenting a mesh source.
///
/// All variants are fatal to loading the asset. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A line does not have the token shape its directive requires
    #[error("line {line}: malformed input: {reason}")]
    Malformed { line: usize, reason: String },

    /// A numeric field could not be parsed
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A face references an attribute that does not exist
    #[error("line {line}: {pool} index {index} out of range (pool has {len} entries)")]
    IndexOutOfRange {
        line: usize,
        pool: Pool,
        index: usize,
        len: usize,
    },
}

/// Failure while assembling a scene from a manifest.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The manifest is not valid TOML for [`crate::SceneManifest`]
    #[error("invalid scene manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    /// An asset could not be read by the asset source
    #[error("failed to read asset {path:?}: {reason}")]
    Asset { path: PathBuf, reason: String },

    /// An object's mesh failed to segment
    #[error("object '{object}': {source}")]
    Mesh {
        object: String,
        #[source]
        source: MeshError,
    },

    /// More parts were registered than the transform table can hold
    #[error("{parts} parts registered but the transform table holds {capacity}")]
    CapacityExceeded { parts: usize, capacity: usize },

    /// The rig names a part that no loaded mesh declares
    #[error("rig part '{name}' is not declared by any loaded mesh")]
    MissingRigPart { name: String },

    /// The rig names an object the manifest does not list
    #[error("rig object '{0}' is not listed in the manifest")]
    UnknownObject(String),
}
