//! Keeps a texel density report for the target surface up to date.
//!
//! The estimate is recomputed only when something it depends on changed: the
//! density settings, the render camera (lens, resolution or transform) or the
//! target surface (mesh handle or transform).

use bevy::prelude::*;
use texel_density::{
    DensityResult, EstimateError, ResolutionReport, TexelDensityConfig, TexelDensityEstimate,
    estimate_texel_density,
};
use thiserror::Error;

use crate::extract::{ExtractError, textured_mesh_from_bevy};
use crate::render_camera::{ActiveRenderCamera, RenderCamera};

/// Marks the mesh entity whose texel density is estimated
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct TexelDensityTarget;

#[derive(Debug, Error)]
pub enum SceneEstimateError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error("Cannot read target mesh: {0}")]
    Extract(#[from] ExtractError),

    #[error("More than one texel density target in scene")]
    MultipleTargets,
}

/// Latest estimate as shown to the user
#[derive(Resource, Debug)]
pub struct TexelDensityState {
    pub report: Option<ResolutionReport>,
    pub density: Option<DensityResult>,
    /// Why the last pass produced no report
    pub last_error: Option<String>,
    /// Render resolution the report was computed for
    pub last_resolution: Option<UVec2>,
    /// Whether the report needs recomputation
    pub stale: bool,
}

impl Default for TexelDensityState {
    fn default() -> Self {
        Self {
            report: None,
            density: None,
            last_error: None,
            last_resolution: None,
            stale: true,
        }
    }
}

impl TexelDensityState {
    fn publish(&mut self, result: Result<TexelDensityEstimate, SceneEstimateError>) {
        match result {
            Ok(estimate) => {
                info!(
                    "Texel density: {} recommended ({} sampled of {} faces)",
                    estimate.report.recommended_label(),
                    estimate.density.faces_sampled,
                    estimate.density.faces_visited
                );
                self.report = Some(estimate.report);
                self.density = Some(estimate.density);
                self.last_error = None;
            }
            Err(e) => {
                warn!("Texel density not computed: {}", e);
                self.report = None;
                self.density = None;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

/// Run one estimate from Bevy-side inputs.
///
/// `target` is the target mesh with its world transform and `camera` the
/// render camera with its world transform. Either may be absent; the
/// resulting precondition error says which.
pub fn run_estimate(
    target: Option<(&Mesh, &GlobalTransform)>,
    camera: Option<(&RenderCamera, &GlobalTransform)>,
    config: &TexelDensityConfig,
) -> Result<TexelDensityEstimate, SceneEstimateError> {
    let mesh = target
        .map(|(mesh, transform)| textured_mesh_from_bevy(mesh, transform))
        .transpose()?;

    let viewport = camera
        .map(|(render_camera, _)| render_camera.viewport())
        .unwrap_or_default();
    let density_camera =
        camera.map(|(render_camera, transform)| render_camera.to_density_camera(transform));

    Ok(estimate_texel_density(
        mesh.as_ref(),
        density_camera.as_ref(),
        &viewport,
        config,
    )?)
}

/// Flag the report stale when any of its inputs changed.
pub fn mark_stale_on_change(
    mut state: ResMut<TexelDensityState>,
    config: Res<TexelDensityConfig>,
    active_camera: Res<ActiveRenderCamera>,
    changed_targets: Query<
        (),
        (
            With<TexelDensityTarget>,
            Or<(Changed<Mesh3d>, Changed<GlobalTransform>, Added<TexelDensityTarget>)>,
        ),
    >,
    changed_cameras: Query<
        (),
        (
            With<RenderCamera>,
            Or<(Changed<RenderCamera>, Changed<GlobalTransform>)>,
        ),
    >,
    cameras: Query<&RenderCamera>,
    mut removed_targets: RemovedComponents<TexelDensityTarget>,
) {
    let removed = removed_targets.read().count() > 0;

    let resolution_changed = active_camera
        .entity
        .and_then(|entity| cameras.get(entity).ok())
        .is_some_and(|camera| state.last_resolution != Some(camera.resolution));

    let changed = config.is_changed()
        || active_camera.is_changed()
        || !changed_targets.is_empty()
        || !changed_cameras.is_empty()
        || removed
        || resolution_changed;

    if changed && !state.stale {
        debug!("Texel density inputs changed, marking stale");
        state.stale = true;
    }
}

/// Recompute the report if it is stale.
///
/// When the target's mesh asset is not loaded yet the report stays stale and
/// the estimate is retried next frame.
pub fn recalculate_texel_density(
    mut state: ResMut<TexelDensityState>,
    config: Res<TexelDensityConfig>,
    active_camera: Res<ActiveRenderCamera>,
    meshes: Res<Assets<Mesh>>,
    targets: Query<(&Mesh3d, &GlobalTransform), With<TexelDensityTarget>>,
    cameras: Query<(&RenderCamera, &GlobalTransform)>,
) {
    if !state.stale {
        return;
    }

    let camera = match active_camera.entity {
        Some(entity) => cameras.get(entity).ok(),
        None => cameras.single().ok(),
    };

    let mut target_iter = targets.iter();
    let first_target = target_iter.next();
    if target_iter.next().is_some() {
        state.publish(Err(SceneEstimateError::MultipleTargets));
        state.stale = false;
        return;
    }

    let target = match first_target {
        Some((mesh3d, transform)) => match meshes.get(&mesh3d.0) {
            Some(mesh) => Some((mesh, transform)),
            None => {
                trace!("Texel density target mesh not loaded yet");
                return;
            }
        },
        None => None,
    };

    let result = run_estimate(target, camera, &config);
    state.publish(result);
    state.last_resolution = camera.map(|(render_camera, _)| render_camera.resolution);
    state.stale = false;
}
