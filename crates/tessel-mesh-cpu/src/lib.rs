//! CPU chunk mesher: per-face culling across chunk borders, two-pass buffer sizing,
//! atlas UVs with positional variants.
#![forbid(unsafe_code)]

pub mod config;
mod constants;
pub mod emit;
pub mod error;
pub mod face;
pub mod mesh_build;
pub mod mesher;
pub mod neighbors;
pub mod noise;
pub mod visibility;

pub use config::{ConfigError, EdgePolicy, IndexFormat, Jitter, MeshConfig};
pub use emit::{EmitCtx, Quad, assemble_quad, face_uvs};
pub use error::MeshError;
pub use face::Face;
pub use mesh_build::{Indices, MeshBuffers};
pub use mesher::{ChunkMesher, MeshStats};
pub use neighbors::NeighborsLoaded;
pub use noise::NoiseProvider;
pub use visibility::{FaceTally, count_visible, is_face_visible, validate_neighbors};

use tessel_atlas::AtlasLookup;
use tessel_geom::Vec3;
use tessel_grid::{NeighborSet, VoxelAccess};

/// Meshes one chunk with default settings: culled world edges, 32-bit indices, no jitter.
pub fn build_mesh<G, A>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
    atlas: &A,
    voxel_size: Vec3,
) -> Result<MeshBuffers, MeshError>
where
    G: VoxelAccess + Sync,
    A: AtlasLookup + Sync + ?Sized,
{
    let config = MeshConfig {
        voxel_size: voxel_size.to_array(),
        ..MeshConfig::default()
    };
    ChunkMesher::new(config).build(grid, neighbors, atlas)
}
