use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessel_geom::Vec3;
use thiserror::Error;

/// What a missing neighbour (edge of the world) counts as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Missing neighbours are solid; boundary faces are not emitted.
    #[default]
    Cull,
    /// Missing neighbours are empty; boundary faces are emitted.
    Draw,
}

impl EdgePolicy {
    #[inline]
    pub fn absent_is_occupied(self) -> bool {
        matches!(self, EdgePolicy::Cull)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    U16,
    #[default]
    U32,
}

impl IndexFormat {
    /// Largest vertex count this format can address.
    #[inline]
    pub const fn max_vertices(self) -> usize {
        match self {
            IndexFormat::U16 => u16::MAX as usize,
            IndexFormat::U32 => u32::MAX as usize,
        }
    }
}

/// Vertex-height perturbation. Off when `amplitude` is zero or no noise provider is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jitter {
    /// Peak offset in voxels along Y.
    pub amplitude: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// World size of one voxel per axis.
    pub voxel_size: [f32; 3],
    #[serde(alias = "open-world-edges")]
    pub open_world_edges: EdgePolicy,
    pub index_format: IndexFormat,
    /// Run the six face directions on rayon.
    pub parallel: bool,
    pub jitter: Jitter,
    /// Lattice coordinate of the chunk's minimum corner, used to sample noise seamlessly.
    pub noise_origin: [i32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            voxel_size: [1.0, 1.0, 1.0],
            open_world_edges: EdgePolicy::Cull,
            index_format: IndexFormat::U32,
            parallel: true,
            jitter: Jitter::default(),
            noise_origin: [0, 0, 0],
        }
    }
}

impl MeshConfig {
    #[inline]
    pub fn voxel_size(&self) -> Vec3 {
        Vec3::from(self.voxel_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voxel_size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::InvalidVoxelSize(self.voxel_size));
        }
        if !self.jitter.amplitude.is_finite() {
            return Err(ConfigError::InvalidJitter(self.jitter.amplitude));
        }
        Ok(())
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: MeshConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("voxel size must be finite and positive, got {0:?}")]
    InvalidVoxelSize([f32; 3]),

    #[error("jitter amplitude must be finite, got {0}")]
    InvalidJitter(f32),
}
