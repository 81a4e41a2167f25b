//! One complete estimation pass: preconditions, density, resolution.
//!
//! Every input is borrowed for the duration of the call and the result is a
//! fresh value; nothing is cached between passes. Deciding when to re-run
//! (config edits, camera moves, render size changes) is up to the caller.

use texelscope_config::TexelDensityConfig;
use tracing::debug;

use crate::camera::Camera;
use crate::density::DensityResult;
use crate::error::EstimateError;
use crate::mesh::TexturedMesh;
use crate::resolution::{ResolutionReport, resolve_resolution};
use crate::types::{Face, Viewport};

/// Density aggregate plus the report derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexelDensityEstimate {
    pub density: DensityResult,
    pub report: ResolutionReport,
}

fn check_inputs(
    camera: Option<&Camera>,
    viewport: &Viewport,
    config: &TexelDensityConfig,
) -> Result<Camera, EstimateError> {
    let camera = *camera.ok_or(EstimateError::NoActiveCamera)?;
    if !camera.is_valid() {
        return Err(EstimateError::InvalidCamera);
    }
    if !viewport.is_valid() {
        return Err(EstimateError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    config.validate()?;
    Ok(camera)
}

#[cfg(not(feature = "parallel"))]
fn run_density<I>(faces: I, camera: &Camera, viewport: &Viewport) -> DensityResult
where
    I: Iterator<Item = Face>,
{
    crate::density::accumulate_density(faces, camera, viewport)
}

#[cfg(feature = "parallel")]
fn run_density<I>(faces: I, camera: &Camera, viewport: &Viewport) -> DensityResult
where
    I: Iterator<Item = Face>,
{
    let faces: Vec<Face> = faces.collect();
    crate::density::accumulate_density_par(&faces, camera, viewport)
}

fn finish(density: DensityResult, config: &TexelDensityConfig) -> TexelDensityEstimate {
    debug!(
        "Texel density pass: {} faces, {} sampled, {} culled, {} clipped, {} degenerate, \
         max ratio {:?}",
        density.faces_visited,
        density.faces_sampled,
        density.faces_culled,
        density.faces_clipped,
        density.faces_degenerate,
        density.max_ratio()
    );

    let report = resolve_resolution(
        &density,
        config.target_pixel_ratio_percent as f64,
        config.udim_tile_resolution.pixels(),
    );

    TexelDensityEstimate { density, report }
}

/// Estimate the texture resolution a mesh needs as seen through `camera`.
///
/// Fails fast on a missing target, UV map or camera, or on invalid settings.
/// A pass where every face is culled or degenerate is not an error: it
/// returns [`ResolutionReport::Failed`].
pub fn estimate_texel_density(
    mesh: Option<&TexturedMesh>,
    camera: Option<&Camera>,
    viewport: &Viewport,
    config: &TexelDensityConfig,
) -> Result<TexelDensityEstimate, EstimateError> {
    let mesh = mesh.ok_or(EstimateError::NoTargetSurface)?;
    let faces = mesh.faces()?;
    let camera = check_inputs(camera, viewport, config)?;

    let density = run_density(faces, &camera, viewport);
    Ok(finish(density, config))
}

/// Same as [`estimate_texel_density`] for callers that already hold
/// world-space faces.
pub fn estimate_faces<I>(
    faces: I,
    camera: Option<&Camera>,
    viewport: &Viewport,
    config: &TexelDensityConfig,
) -> Result<TexelDensityEstimate, EstimateError>
where
    I: IntoIterator<Item = Face>,
{
    let camera = check_inputs(camera, viewport, config)?;
    let density = run_density(faces.into_iter(), &camera, viewport);
    Ok(finish(density, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DMat4, DVec2, DVec3};
    use texelscope_config::UdimTileResolution;

    /// Orthographic camera at the origin looking down -Z; on 1920x1080 the
    /// frame spans x in [-1, 1] and y in [-0.5625, 0.5625].
    fn camera() -> Camera {
        Camera::orthographic(DMat4::IDENTITY, 2.0)
    }

    fn viewport() -> Viewport {
        Viewport::new(1920, 1080)
    }

    fn run(
        mesh: &TexturedMesh,
        camera: &Camera,
        config: &TexelDensityConfig,
    ) -> TexelDensityEstimate {
        estimate_texel_density(Some(mesh), Some(camera), &viewport(), config).unwrap()
    }

    /// Quad filling the whole frame, full unit-square UVs, at depth -z
    fn full_frame_mesh(z: f64) -> TexturedMesh {
        TexturedMesh::new(
            vec![
                DVec3::new(-1.0, -0.5625, 0.0),
                DVec3::new(1.0, -0.5625, 0.0),
                DVec3::new(1.0, 0.5625, 0.0),
                DVec3::new(-1.0, 0.5625, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
        .with_uv_layer("UVMap", vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y])
        .with_world_matrix(DMat4::from_translation(DVec3::new(0.0, 0.0, -z)))
    }

    #[test]
    fn test_full_frame_at_100_percent() {
        let config = TexelDensityConfig::new(100, UdimTileResolution::Res1024);
        let estimate = run(&full_frame_mesh(5.0), &camera(), &config);

        assert!((estimate.density.max_ratio().unwrap() - 2_073_600.0).abs() < 1e-3);
        let resolved = estimate.report.resolved().unwrap();
        assert!((resolved.required_resolution - 1440.0).abs() < 1e-6);
        assert!((resolved.effective_resolution - 1440.0).abs() < 1e-6);
        assert_eq!(resolved.recommended_resolution, 2048.0);
        assert!((resolved.coverage_percent.unwrap() - 142.2).abs() < 0.05);
        assert_eq!(estimate.report.udim_tile_count(), 2);
    }

    #[test]
    fn test_full_frame_at_50_percent() {
        let config = TexelDensityConfig::new(50, UdimTileResolution::Res1024);
        let estimate = run(&full_frame_mesh(5.0), &camera(), &config);

        let resolved = estimate.report.resolved().unwrap();
        assert!((resolved.effective_resolution - 720.0).abs() < 1e-6);
        assert_eq!(resolved.recommended_resolution, 1024.0);
        assert!((resolved.coverage_percent.unwrap() - 142.2).abs() < 0.05);
        assert_eq!(estimate.report.udim_tile_count(), 1);
    }

    #[test]
    fn test_face_behind_camera_fails() {
        // Same quad placed behind the camera
        let config = TexelDensityConfig::new(100, UdimTileResolution::Res1024);
        let estimate = run(&full_frame_mesh(-5.0), &camera(), &config);

        assert!(estimate.report.is_failed());
        assert_eq!(estimate.report.udim_tile_count(), -1);
        assert_eq!(estimate.density.faces_culled, 1);
    }

    #[test]
    fn test_perspective_distance_lowers_density() {
        let config = TexelDensityConfig::default();
        let camera = Camera::perspective(DMat4::IDENTITY, 50.0, 36.0);

        let near = run(&full_frame_mesh(5.0), &camera, &config);
        let far = run(&full_frame_mesh(10.0), &camera, &config);

        // Twice as far: a quarter of the screen area for the same UVs
        let near_ratio = near.density.max_ratio().unwrap();
        let far_ratio = far.density.max_ratio().unwrap();
        assert!((near_ratio / far_ratio - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_inputs() {
        let config = TexelDensityConfig::default();
        let mesh = full_frame_mesh(5.0);

        assert!(matches!(
            estimate_texel_density(None, Some(&camera()), &viewport(), &config),
            Err(EstimateError::NoTargetSurface)
        ));
        assert!(matches!(
            estimate_texel_density(Some(&mesh), None, &viewport(), &config),
            Err(EstimateError::NoActiveCamera)
        ));

        let no_uv = TexturedMesh::new(mesh.positions.clone(), mesh.face_loops.clone());
        assert!(matches!(
            estimate_texel_density(Some(&no_uv), Some(&camera()), &viewport(), &config),
            Err(EstimateError::NoUvChannel)
        ));
    }

    #[test]
    fn test_invalid_settings() {
        let mesh = full_frame_mesh(5.0);

        let bad_ratio = TexelDensityConfig::new(5, UdimTileResolution::Res2048);
        assert!(matches!(
            estimate_texel_density(Some(&mesh), Some(&camera()), &viewport(), &bad_ratio),
            Err(EstimateError::Config(_))
        ));

        let config = TexelDensityConfig::default();
        assert!(matches!(
            estimate_texel_density(Some(&mesh), Some(&camera()), &Viewport::new(0, 1080), &config),
            Err(EstimateError::InvalidViewport { width: 0, height: 1080 })
        ));

        let mut stretched = viewport();
        stretched.pixel_aspect_x = f64::INFINITY;
        assert!(matches!(
            estimate_texel_density(Some(&mesh), Some(&camera()), &stretched, &config),
            Err(EstimateError::InvalidViewport { .. })
        ));

        let flat = Camera::orthographic(DMat4::IDENTITY, 0.0);
        assert!(matches!(
            estimate_texel_density(Some(&mesh), Some(&flat), &viewport(), &config),
            Err(EstimateError::InvalidCamera)
        ));
    }

    #[test]
    fn test_estimate_faces_matches_mesh() {
        let config = TexelDensityConfig::default();
        let mesh = full_frame_mesh(5.0);
        let faces: Vec<Face> = mesh.faces().unwrap().collect();

        let from_mesh =
            estimate_texel_density(Some(&mesh), Some(&camera()), &viewport(), &config).unwrap();
        let from_faces = estimate_faces(faces, Some(&camera()), &viewport(), &config).unwrap();
        assert_eq!(from_mesh, from_faces);
    }
}
