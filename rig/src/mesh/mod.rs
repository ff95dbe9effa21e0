//! Mesh segmentation (object-grouped OBJ text -> part-tagged vertices + pivots)

mod parse;
mod pivot;
mod segment;
mod types;

// Re-export public API
pub use parse::DEFAULT_GROUP;
pub use pivot::PivotTable;
pub use segment::{Segmentation, segment};
pub use types::{SegmentedMesh, Vertex};
