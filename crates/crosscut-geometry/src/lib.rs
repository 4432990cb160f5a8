pub mod extract;
pub mod mesh;
pub mod plane;
pub mod transform;

pub use extract::{WorldGeometry, extract_world_geometry};
pub use mesh::MeshData;
pub use plane::{ClipSet, Plane};
pub use transform::Transform;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("mesh exposes no geometry")]
    NoGeometry,
    #[error("triangle index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
    #[error("vertex alpha count {alpha_count} does not match {vertex_count} vertices")]
    AlphaCountMismatch {
        alpha_count: usize,
        vertex_count: usize,
    },
    #[error("plane normal must be non-zero")]
    DegenerateNormal,
}

pub type Result<T> = std::result::Result<T, Error>;
