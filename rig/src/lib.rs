//! Mesh segmentation and articulated rig animation for walkabout
//!
//! This crate turns an object-grouped Wavefront-style mesh into GPU-ready
//! vertex data tagged with a rigid part id, extracts a rotation pivot for
//! every part from the vertices it shares with its neighbours, and drives a
//! small walking rig that writes one world matrix per part every frame.
//!
//! # Modules
//!
//! - [`registry`] - Dense name -> part id assignment shared by every loaded object
//! - [`mesh`] - Two-pass segmentation parser and pivot calculator
//! - [`rig`] - Walking rig state, swing waveform and transform composition
//! - [`transform`] - Fixed-capacity transform table and per-frame constants
//! - [`scene`] - Scene assembly from a manifest through collaborator traits
//! - [`config`] - TOML-backed configuration with defaults
//! - [`error`] - Typed errors
//!
//! The crate performs no file I/O. Callers hand it text and receive
//! fully materialized structures back.

pub mod config;
pub mod error;
pub mod mesh;
pub mod registry;
pub mod rig;
pub mod scene;
pub mod transform;

pub use config::{LightConfig, ProjectionConfig, RigConfig};
pub use error::{MeshError, SceneError};
pub use mesh::{PivotTable, SegmentedMesh, Segmentation, Vertex, segment};
pub use registry::{PartId, PartRegistry};
pub use rig::{Control, Rig, RigParts, swing_wave, swing_wave_inverse};
pub use scene::{
    AssetSource, LoadedObject, RenderBackend, Scene, SceneManifest, SceneObject, TextureHandle,
    VertexBufferHandle,
};
pub use transform::{FrameConstants, TRANSFORM_TABLE_CAPACITY, TransformTable};
