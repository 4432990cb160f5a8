pub mod controller;
pub mod volume;

pub use controller::ClipController;
pub use volume::{BoxVolume, ClipVolume};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("clip volume degenerated to {corners} corners, expected 8")]
    DegenerateVolume { corners: usize },
    #[error("scene has no meshes to clip")]
    EmptyScene,
    #[error(transparent)]
    Geometry(#[from] crosscut_geometry::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
