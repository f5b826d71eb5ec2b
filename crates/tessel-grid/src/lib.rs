//! Dense per-chunk voxel storage and neighbour wiring.
#![forbid(unsafe_code)]

mod chunk_coord;
mod grid;
mod neighbors;

pub use chunk_coord::ChunkCoord;
pub use grid::{Dims, EMPTY, VoxelAccess, VoxelGrid};
pub use neighbors::NeighborSet;
