//! Atlas lookup: voxel type + variant + face role to a UV rectangle.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod table;
pub mod types;

pub use error::AtlasError;
pub use table::{AtlasTable, FaceOrigins};
pub use types::{AtlasLookup, FaceRole, UvRect};
