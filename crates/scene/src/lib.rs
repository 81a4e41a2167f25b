//! Bevy integration for the texel density estimate
//!
//! Tag a mesh entity with [`TexelDensityTarget`] and a camera entity with
//! [`RenderCamera`]; [`TexelDensityPlugin`] keeps [`TexelDensityState`] in
//! sync with the scene.

use bevy::prelude::*;

mod extract;
mod render_camera;
mod system;

pub use extract::{ExtractError, textured_mesh_from_bevy, world_matrix};
pub use render_camera::{ActiveRenderCamera, RenderCamera};
pub use system::{
    SceneEstimateError, TexelDensityState, TexelDensityTarget, mark_stale_on_change,
    recalculate_texel_density, run_estimate,
};
pub use texelscope_config::TexelDensityConfig;

pub struct TexelDensityPlugin;

impl Plugin for TexelDensityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TexelDensityConfig>()
            .init_resource::<TexelDensityState>()
            .init_resource::<ActiveRenderCamera>()
            .add_systems(
                Update,
                (mark_stale_on_change, recalculate_texel_density).chain(),
            );
    }
}
