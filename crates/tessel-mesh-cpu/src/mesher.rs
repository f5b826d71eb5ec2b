//! Two-pass chunk mesher: count visible faces per direction, allocate once, then fill
//! each direction's disjoint window of the output buffers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tessel_atlas::AtlasLookup;
use tessel_grid::{Dims, NeighborSet, VoxelAccess};

use crate::config::MeshConfig;
use crate::constants::{INDICES_PER_QUAD, VERTS_PER_QUAD};
use crate::emit::{EmitCtx, QuadWriter};
use crate::error::MeshError;
use crate::face::Face;
use crate::mesh_build::{IndexSliceMut, Indices, MeshBuffers};
use crate::neighbors::NeighborsLoaded;
use crate::noise::NoiseProvider;
use crate::visibility::{FaceTally, VoxelTypeSet, count_visible, try_for_each_visible, validate_neighbors};

/// Timing and per-direction face counts of one build.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshStats {
    pub dims: Dims,
    pub faces: [usize; 6],
    pub vertices: usize,
    pub indices: usize,
    pub elapsed: Duration,
}

impl MeshStats {
    #[inline]
    pub fn faces_for(&self, face: Face) -> usize {
        self.faces[face.index()]
    }

    #[inline]
    pub fn total_faces(&self) -> usize {
        self.faces.iter().sum()
    }
}

/// Reusable mesher. Holds configuration only; every build allocates fresh buffers.
#[derive(Clone)]
pub struct ChunkMesher {
    config: MeshConfig,
    noise: Option<Arc<dyn NoiseProvider>>,
    pool: Option<Arc<ThreadPool>>,
}

impl ChunkMesher {
    pub fn new(config: MeshConfig) -> Self {
        Self {
            config,
            noise: None,
            pool: None,
        }
    }

    /// Enables vertex-height perturbation when `config.jitter.amplitude` is non-zero.
    pub fn with_noise(mut self, noise: Arc<dyn NoiseProvider>) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Runs builds on a dedicated pool instead of rayon's global one.
    pub fn with_threads(mut self, threads: usize) -> Result<Self, MeshError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tessel-mesh-{i}"))
            .build()?;
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    /// Same mesher sampling noise from a different chunk origin.
    pub fn at_origin(&self, noise_origin: [i32; 3]) -> Self {
        let mut m = self.clone();
        m.config.noise_origin = noise_origin;
        m
    }

    #[inline]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn build<G, A>(
        &self,
        grid: &G,
        neighbors: &NeighborSet<'_, G>,
        atlas: &A,
    ) -> Result<MeshBuffers, MeshError>
    where
        G: VoxelAccess + Sync,
        A: AtlasLookup + Sync + ?Sized,
    {
        self.build_with_stats(grid, neighbors, atlas).map(|(mesh, _)| mesh)
    }

    pub fn build_with_stats<G, A>(
        &self,
        grid: &G,
        neighbors: &NeighborSet<'_, G>,
        atlas: &A,
    ) -> Result<(MeshBuffers, MeshStats), MeshError>
    where
        G: VoxelAccess + Sync,
        A: AtlasLookup + Sync + ?Sized,
    {
        self.run(|| self.build_inner(grid, neighbors, atlas, None))
    }

    /// Like `build_with_stats`, but gives up with [`MeshError::Cancelled`] if `cancel` is set
    /// once the count pass finishes. Never checked mid-pass.
    pub fn build_cancellable<G, A>(
        &self,
        grid: &G,
        neighbors: &NeighborSet<'_, G>,
        atlas: &A,
        cancel: &AtomicBool,
    ) -> Result<(MeshBuffers, MeshStats), MeshError>
    where
        G: VoxelAccess + Sync,
        A: AtlasLookup + Sync + ?Sized,
    {
        self.run(|| self.build_inner(grid, neighbors, atlas, Some(cancel)))
    }

    fn run<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    fn for_each_face<I, T>(&self, items: Vec<I>, f: impl Fn(I) -> T + Sync + Send) -> Vec<T>
    where
        I: Send,
        T: Send,
    {
        if self.config.parallel {
            items.into_par_iter().map(f).collect()
        } else {
            items.into_iter().map(f).collect()
        }
    }

    fn build_inner<G, A>(
        &self,
        grid: &G,
        neighbors: &NeighborSet<'_, G>,
        atlas: &A,
        cancel: Option<&AtomicBool>,
    ) -> Result<(MeshBuffers, MeshStats), MeshError>
    where
        G: VoxelAccess + Sync,
        A: AtlasLookup + Sync + ?Sized,
    {
        let t0 = Instant::now();
        let cfg = &self.config;
        cfg.validate()?;
        let dims = grid.dims();
        let mut stats = MeshStats {
            dims,
            ..MeshStats::default()
        };
        if dims.is_degenerate() {
            stats.elapsed = t0.elapsed();
            return Ok((MeshBuffers::empty(cfg.index_format), stats));
        }
        validate_neighbors(grid, neighbors).map_err(|e| rejected(dims, e))?;
        let policy = cfg.open_world_edges;

        // Pass 1: count
        let tallies: Vec<FaceTally> = self.for_each_face(Face::ALL.to_vec(), |face| {
            count_visible(grid, neighbors, face, policy)
        });

        let present = tallies
            .iter()
            .fold(VoxelTypeSet::default(), |acc, t| acc.union(t.types));
        if let Some(voxel) = present.iter().find(|&t| atlas.variant_count(t) == 0) {
            return Err(rejected(dims, MeshError::MissingAtlasEntry { voxel }));
        }

        if cancel.is_some_and(|c| c.load(Ordering::Acquire)) {
            log::debug!(target: "mesh", "build cancelled after count pass");
            return Err(MeshError::Cancelled);
        }

        let mut quad_offsets = [0usize; 7];
        for (i, t) in tallies.iter().enumerate() {
            quad_offsets[i + 1] = quad_offsets[i] + t.faces;
            stats.faces[i] = t.faces;
        }
        let total_quads = quad_offsets[6];
        let vertices = total_quads * VERTS_PER_QUAD;
        let limit = cfg.index_format.max_vertices();
        if vertices > limit {
            return Err(rejected(
                dims,
                MeshError::Capacity {
                    vertices,
                    limit,
                    format: cfg.index_format,
                },
            ));
        }

        // Allocate exactly once
        let mut mesh = MeshBuffers {
            positions: vec![[0.0; 3]; vertices],
            normals: vec![[0.0; 3]; vertices],
            tangents: vec![[0.0; 4]; vertices],
            uv0: vec![[0.0; 2]; vertices],
            indices: Indices::zeroed(cfg.index_format, total_quads * INDICES_PER_QUAD),
            quad_offsets,
        };

        // Pass 2: fill disjoint windows
        let ctx = EmitCtx {
            atlas,
            voxel_size: cfg.voxel_size(),
            jitter: self
                .noise
                .as_deref()
                .filter(|_| cfg.jitter.amplitude != 0.0)
                .map(|n| (n, cfg.jitter.amplitude)),
            origin: cfg.noise_origin,
        };
        let writers = split_windows(&mut mesh, &quad_offsets);
        let filled = self.for_each_face(writers, |mut w| {
            try_for_each_visible(grid, neighbors, w.face, policy, |x, y, z, cell| {
                w.push(&ctx, x, y, z, cell)
            })?;
            w.finish()
        });
        for (face, written) in Face::ALL.into_iter().zip(filled) {
            let written = written?;
            debug_assert_eq!(written, stats.faces_for(face));
        }

        stats.vertices = mesh.vertex_count();
        stats.indices = mesh.index_count();
        stats.elapsed = t0.elapsed();
        log::debug!(
            target: "mesh",
            "built {}x{}x{} chunk: {} faces, {} verts, {} indices in {:?} nmask={:?}",
            dims.sx,
            dims.sy,
            dims.sz,
            stats.total_faces(),
            stats.vertices,
            stats.indices,
            stats.elapsed,
            NeighborsLoaded::of(neighbors)
        );
        Ok((mesh, stats))
    }
}

fn rejected(dims: Dims, err: MeshError) -> MeshError {
    log::warn!(target: "mesh", "rejecting {}x{}x{} chunk: {}", dims.sx, dims.sy, dims.sz, err);
    err
}

/// Splits `rest` into consecutive windows of the given lengths.
fn carve<'a, T>(mut rest: &'a mut [T], lens: [usize; 6]) -> Vec<&'a mut [T]> {
    let mut out = Vec::with_capacity(lens.len());
    for n in lens {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(n);
        out.push(head);
        rest = tail;
    }
    out
}

fn split_windows<'a>(mesh: &'a mut MeshBuffers, quad_offsets: &[usize; 7]) -> Vec<QuadWriter<'a>> {
    let quads: [usize; 6] = std::array::from_fn(|i| quad_offsets[i + 1] - quad_offsets[i]);
    let verts = quads.map(|q| q * VERTS_PER_QUAD);
    let idxs = quads.map(|q| q * INDICES_PER_QUAD);

    let idx_windows: Vec<IndexSliceMut<'a>> = match &mut mesh.indices {
        Indices::U16(v) => carve(v, idxs).into_iter().map(IndexSliceMut::U16).collect(),
        Indices::U32(v) => carve(v, idxs).into_iter().map(IndexSliceMut::U32).collect(),
    };
    let pos = carve(&mut mesh.positions, verts);
    let norm = carve(&mut mesh.normals, verts);
    let tan = carve(&mut mesh.tangents, verts);
    let uv = carve(&mut mesh.uv0, verts);

    pos.into_iter()
        .zip(norm)
        .zip(tan)
        .zip(uv)
        .zip(idx_windows)
        .enumerate()
        .map(|(i, ((((p, n), t), u), ix))| {
            let base_vertex = (quad_offsets[i] * VERTS_PER_QUAD) as u32;
            QuadWriter::new(Face::ALL[i], p, n, t, u, ix, base_vertex)
        })
        .collect()
}
