use hashbrown::HashMap;
use tessel_grid::{ChunkCoord, NeighborSet, VoxelGrid};

use crate::config::{SceneKind, SceneSection};
use crate::noise::SimplexNoise;

// Voxel types used by the demo scenes; `assets/atlas.toml` maps each to tiles.
pub const STONE: u8 = 0;
pub const DIRT: u8 = 1;
pub const GRASS: u8 = 2;
pub const SAND: u8 = 3;
pub const SNOW: u8 = 4;

/// A box of chunks, keyed by chunk coordinate.
pub struct Region {
    pub chunk_size: [usize; 3],
    pub chunks: [usize; 3],
    grids: HashMap<ChunkCoord, VoxelGrid>,
}

impl Region {
    pub fn generate(scene: &SceneSection, noise: &SimplexNoise) -> Self {
        let [sx, sy, sz] = scene.chunk_size;
        let [nx, ny, nz] = scene.chunks;
        let mut grids = HashMap::with_capacity(nx * ny * nz);
        for cy in 0..ny as i32 {
            for cz in 0..nz as i32 {
                for cx in 0..nx as i32 {
                    let coord = ChunkCoord::new(cx, cy, cz);
                    let origin = coord.lattice_origin(sx, sy, sz);
                    let grid = match scene.kind {
                        SceneKind::Terrain => terrain_chunk(scene, noise, origin),
                        SceneKind::Sphere => sphere_chunk(scene, origin),
                        SceneKind::Checker => checker_chunk(scene.chunk_size, origin),
                    };
                    grids.insert(coord, grid);
                }
            }
        }
        log::debug!(
            "generated {:?} region: {} chunks of {}x{}x{}",
            scene.kind,
            grids.len(),
            sx,
            sy,
            sz
        );
        Self {
            chunk_size: scene.chunk_size,
            chunks: scene.chunks,
            grids,
        }
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&VoxelGrid> {
        self.grids.get(&coord)
    }

    /// Chunk coordinates in y, z, x order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.grids.keys().copied().collect();
        v.sort_unstable_by_key(|c| (c.cy, c.cz, c.cx));
        v
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Loaded neighbours of `coord`; chunks outside the region are left out.
    pub fn neighbors(&self, coord: ChunkCoord) -> NeighborSet<'_> {
        NeighborSet {
            top: self.get(coord.offset(0, 1, 0)),
            bottom: self.get(coord.offset(0, -1, 0)),
            left: self.get(coord.offset(-1, 0, 0)),
            right: self.get(coord.offset(1, 0, 0)),
            front: self.get(coord.offset(0, 0, 1)),
            back: self.get(coord.offset(0, 0, -1)),
        }
    }

    pub fn world_height(&self) -> usize {
        self.chunk_size[1] * self.chunks[1]
    }
}

/// Heightmap column terrain: surface type by altitude, a topsoil band, stone beneath.
fn terrain_chunk(scene: &SceneSection, noise: &SimplexNoise, origin: [i32; 3]) -> VoxelGrid {
    let [sx, sy, sz] = scene.chunk_size;
    let world_h = (sy * scene.chunks[1]) as f32;
    let min_h = (world_h * scene.min_y_ratio) as i32;
    let max_h = (world_h * scene.max_y_ratio) as i32;
    let mut grid = VoxelGrid::new(sx, sy, sz);
    for z in 0..sz {
        for x in 0..sx {
            let wx = origin[0] + x as i32;
            let wz = origin[2] + z as i32;
            let h = noise.height(wx as f32, wz as f32);
            // map [-1,1] -> [min_h, max_h]
            let hh = ((h + 1.0) * 0.5 * (max_h - min_h) as f32) as i32 + min_h;
            let height = hh.clamp(1, (world_h as i32 - 1).max(1));
            let surface = if height as f32 >= world_h * 0.62 {
                SNOW
            } else if height as f32 <= world_h * 0.2 {
                SAND
            } else {
                GRASS
            };
            for y in 0..sy {
                let wy = origin[1] + y as i32;
                if wy >= height {
                    break;
                }
                let ty = if wy == height - 1 {
                    surface
                } else if wy + scene.topsoil_thickness as i32 >= height {
                    DIRT
                } else {
                    STONE
                };
                grid.set_type(x, y, z, ty);
            }
        }
    }
    grid
}

/// One ball centred in the region, banded by height.
fn sphere_chunk(scene: &SceneSection, origin: [i32; 3]) -> VoxelGrid {
    let [sx, sy, sz] = scene.chunk_size;
    let ext = [
        (sx * scene.chunks[0]) as f32,
        (sy * scene.chunks[1]) as f32,
        (sz * scene.chunks[2]) as f32,
    ];
    let center = ext.map(|e| e * 0.5);
    let radius = ext[0].min(ext[1]).min(ext[2]) * 0.45;
    let mut grid = VoxelGrid::new(sx, sy, sz);
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let p = [
                    (origin[0] + x as i32) as f32 + 0.5,
                    (origin[1] + y as i32) as f32 + 0.5,
                    (origin[2] + z as i32) as f32 + 0.5,
                ];
                let d2: f32 = (0..3).map(|i| (p[i] - center[i]).powi(2)).sum();
                if d2 > radius * radius {
                    continue;
                }
                let band = (p[1] - (center[1] - radius)) / (2.0 * radius);
                let ty = match band {
                    b if b > 0.8 => SNOW,
                    b if b > 0.6 => GRASS,
                    b if b > 0.4 => DIRT,
                    b if b > 0.2 => SAND,
                    _ => STONE,
                };
                grid.set_type(x, y, z, ty);
            }
        }
    }
    grid
}

/// 3D checkerboard: every solid cell shows all six faces.
fn checker_chunk(size: [usize; 3], origin: [i32; 3]) -> VoxelGrid {
    let [sx, sy, sz] = size;
    let mut grid = VoxelGrid::new(sx, sy, sz);
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let w = [
                    origin[0] + x as i32,
                    origin[1] + y as i32,
                    origin[2] + z as i32,
                ];
                if (w[0] ^ w[1] ^ w[2]) & 1 == 0 {
                    grid.set_type(x, y, z, (w[0] + w[2]).rem_euclid(5) as u8);
                }
            }
        }
    }
    grid
}
