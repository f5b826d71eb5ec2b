use std::path::Path;

use serde::Deserialize;
use tessel_mesh_cpu::MeshConfig;

/// Top-level `tessel.toml`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)] pub mesher: MeshConfig,
    #[serde(default)] pub noise: NoiseSection,
    #[serde(default)] pub scene: SceneSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoiseSection {
    #[serde(default = "default_seed")] pub seed: i32,
    #[serde(default = "default_frequency")] pub frequency: f32,
}
fn default_seed() -> i32 { 1337 }
fn default_frequency() -> f32 { 0.02 }
impl Default for NoiseSection { fn default() -> Self { Self { seed: default_seed(), frequency: default_frequency() } } }

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind { Terrain, Sphere, Checker }

fn default_kind() -> SceneKind { SceneKind::Terrain }

#[derive(Clone, Debug, Deserialize)]
pub struct SceneSection {
    #[serde(default = "default_kind")] pub kind: SceneKind,
    /// Chunk extent in voxels `[sx, sy, sz]`.
    #[serde(default = "default_chunk_size")] pub chunk_size: [usize; 3],
    /// Number of chunks along each axis.
    #[serde(default = "default_chunks")] pub chunks: [usize; 3],
    #[serde(default = "default_min_y_ratio")] pub min_y_ratio: f32,
    #[serde(default = "default_max_y_ratio")] pub max_y_ratio: f32,
    #[serde(default = "default_topsoil")] pub topsoil_thickness: usize,
}
fn default_chunk_size() -> [usize; 3] { [32, 32, 32] }
fn default_chunks() -> [usize; 3] { [2, 2, 2] }
fn default_min_y_ratio() -> f32 { 0.15 }
fn default_max_y_ratio() -> f32 { 0.70 }
fn default_topsoil() -> usize { 3 }
impl Default for SceneSection { fn default() -> Self { Self { kind: default_kind(), chunk_size: default_chunk_size(), chunks: default_chunks(), min_y_ratio: default_min_y_ratio(), max_y_ratio: default_max_y_ratio(), topsoil_thickness: default_topsoil() } } }

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let cfg: AppConfig = toml::from_str(s)?;
        cfg.mesher.validate()?;
        if cfg.scene.chunk_size.contains(&0) || cfg.scene.chunks.contains(&0) {
            return Err(format!(
                "scene chunk_size {:?} and chunks {:?} must be non-zero",
                cfg.scene.chunk_size, cfg.scene.chunks
            )
            .into());
        }
        Ok(cfg)
    }

    /// Reads `path` if it exists; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            log::info!("{} not found; using default config", path.display());
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
