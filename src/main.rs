mod config;
mod noise;
mod obj;
mod scene;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tessel_atlas::AtlasTable;
use tessel_geom::Vec3;
use tessel_mesh_cpu::{ChunkMesher, EdgePolicy, IndexFormat};

use crate::config::{AppConfig, SceneKind};
use crate::noise::SimplexNoise;
use crate::obj::ObjWriter;
use crate::scene::Region;

/// Mesh a generated region of voxel chunks and report per-chunk statistics.
#[derive(Parser, Debug)]
#[command(name = "tessel", version)]
struct Cli {
    /// Path to tessel.toml
    #[arg(long, default_value = "tessel.toml")]
    config: PathBuf,
    /// Atlas table (TOML)
    #[arg(long, default_value = "assets/atlas.toml")]
    atlas: PathBuf,
    /// Write all chunk meshes to this OBJ file
    #[arg(long)]
    obj: Option<PathBuf>,
    /// Dedicated mesher threads (default: rayon's global pool)
    #[arg(long)]
    threads: Option<usize>,
    #[arg(long, value_enum)]
    scene: Option<SceneKind>,
    /// Chunk size in voxels, e.g. 32,64,32
    #[arg(long, value_delimiter = ',', num_args = 3)]
    size: Option<Vec<usize>>,
    /// Chunk count per axis, e.g. 4,1,4
    #[arg(long, value_delimiter = ',', num_args = 3)]
    chunks: Option<Vec<usize>>,
    #[arg(long)]
    seed: Option<i32>,
    /// Draw faces at the region border instead of culling them
    #[arg(long)]
    draw_edges: bool,
    /// Emit 16-bit indices
    #[arg(long)]
    u16: bool,
    /// Vertex-height jitter amplitude in voxels
    #[arg(long)]
    jitter: Option<f32>,
    /// Mesh the six directions on the calling thread
    #[arg(long)]
    sequential: bool,
}

fn apply_overrides(cfg: &mut AppConfig, cli: &Cli) {
    if let Some(kind) = cli.scene {
        cfg.scene.kind = kind;
    }
    if let Some(s) = cli.size.as_deref().and_then(|s| <[usize; 3]>::try_from(s).ok()) {
        cfg.scene.chunk_size = s;
    }
    if let Some(n) = cli.chunks.as_deref().and_then(|s| <[usize; 3]>::try_from(s).ok()) {
        cfg.scene.chunks = n;
    }
    if let Some(seed) = cli.seed {
        cfg.noise.seed = seed;
    }
    if cli.draw_edges {
        cfg.mesher.open_world_edges = EdgePolicy::Draw;
    }
    if cli.u16 {
        cfg.mesher.index_format = IndexFormat::U16;
    }
    if let Some(a) = cli.jitter {
        cfg.mesher.jitter.amplitude = a;
    }
    if cli.sequential {
        cfg.mesher.parallel = false;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(&cli.config)?;
    apply_overrides(&mut cfg, &cli);
    cfg.mesher.validate()?;

    let atlas = AtlasTable::from_path(&cli.atlas)?;
    log::info!("atlas {}: {} voxel types", cli.atlas.display(), atlas.len());

    let noise = Arc::new(SimplexNoise::new(&cfg.noise));
    let t0 = Instant::now();
    let region = Region::generate(&cfg.scene, &noise);
    log::info!("generated {} chunks in {:?}", region.len(), t0.elapsed());

    let mut mesher = ChunkMesher::new(cfg.mesher.clone()).with_noise(noise.clone());
    if let Some(n) = cli.threads {
        mesher = mesher.with_threads(n)?;
    }

    let mut obj = match &cli.obj {
        Some(path) => Some(ObjWriter::new(BufWriter::new(File::create(path)?))?),
        None => None,
    };

    let [sx, sy, sz] = region.chunk_size;
    let vs = cfg.mesher.voxel_size();
    let (mut faces, mut verts, mut tris) = (0usize, 0usize, 0usize);
    let t_mesh = Instant::now();
    for coord in region.coords() {
        let Some(grid) = region.get(coord) else {
            continue;
        };
        let origin = coord.lattice_origin(sx, sy, sz);
        let (mesh, stats) = mesher
            .at_origin(origin)
            .build_with_stats(grid, &region.neighbors(coord), &atlas)?;
        log::info!(
            "chunk ({},{},{}): {} faces {:?}, {} verts in {:?}",
            coord.cx,
            coord.cy,
            coord.cz,
            stats.total_faces(),
            stats.faces,
            stats.vertices,
            stats.elapsed
        );
        faces += stats.total_faces();
        verts += mesh.vertex_count();
        tris += mesh.triangle_count();
        if let Some(w) = obj.as_mut() {
            let offset = Vec3::new(origin[0] as f32, origin[1] as f32, origin[2] as f32).mul_elem(vs);
            w.write_chunk(coord, offset, &mesh)?;
        }
    }
    log::info!(
        "meshed {} chunks in {:?}: {} faces, {} verts, {} triangles",
        region.len(),
        t_mesh.elapsed(),
        faces,
        verts,
        tris
    );

    if let (Some(w), Some(path)) = (obj, &cli.obj) {
        w.finish()?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
