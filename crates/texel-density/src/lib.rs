//! Texelscope texel density - screen-space texture resolution estimate
//!
//! Given a textured mesh and a camera, this crate finds the worst-case ratio
//! of screen pixels to UV area over all visible faces and turns it into a
//! recommended texture resolution:
//! - [`camera`] - Camera model and world-to-view projection
//! - [`visibility`] - Orientation and behind-camera culling
//! - [`clip`] - Sutherland-Hodgman clipping with interpolated attributes
//! - [`area`] - Shoelace polygon area
//! - [`density`] - Per-face density and the max reduction
//! - [`resolution`] - Power-of-two resolution, coverage and UDIM tiles
//! - [`mesh`] - Host-agnostic textured mesh input
//! - [`estimate`] - Complete estimation pass

pub mod area;
pub mod camera;
pub mod clip;
pub mod constants;
pub mod density;
pub mod error;
pub mod estimate;
pub mod mesh;
pub mod resolution;
pub mod types;
pub mod visibility;

pub use area::*;
pub use camera::*;
pub use clip::*;
pub use constants::*;
pub use density::*;
pub use error::*;
pub use estimate::*;
pub use mesh::*;
pub use resolution::*;
pub use types::*;
pub use visibility::*;

pub use glam;
pub use texelscope_config::{TexelDensityConfig, UdimTileResolution};
