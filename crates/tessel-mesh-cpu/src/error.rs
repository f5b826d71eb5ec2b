use tessel_grid::Dims;
use thiserror::Error;

use crate::config::{ConfigError, IndexFormat};
use crate::face::Face;

/// Reasons a chunk build is rejected. No partial mesh is ever returned alongside one.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("mesh needs {vertices} vertices but {format:?} indices address at most {limit}")]
    Capacity {
        vertices: usize,
        limit: usize,
        format: IndexFormat,
    },

    #[error("{face:?} neighbour has dims {found:?}, expected cross-section {expected:?} and depth >= 1")]
    DimensionMismatch {
        face: Face,
        expected: [usize; 2],
        found: Dims,
    },

    #[error("voxel type {voxel} has no atlas entry")]
    MissingAtlasEntry { voxel: u8 },

    #[error("{face:?} pass wrote {written} quad(s) into a slot sized for {expected}")]
    OffsetDrift {
        face: Face,
        expected: usize,
        written: usize,
    },

    #[error("mesh build cancelled")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("mesher thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
