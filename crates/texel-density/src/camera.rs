//! Camera model and world-to-view projection.
//!
//! A camera maps world points to normalized view coordinates `(nx, ny)` that
//! run from 0 to 1 across the render frame, plus a depth that is positive in
//! front of the camera. Points outside the frustum are not rejected here: they
//! simply land outside `[0, 1]` or get a non-positive depth, and the clipper
//! discards them later.
//!
//! The frame is derived the way DCC cameras describe it: a sensor size and
//! focal length (or an orthographic scale), fitted to the wider render axis
//! unless a fit is forced, with an optional lens shift measured in units of
//! the fitted frame size.

use glam::{DAffine3, DMat4, DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::types::Viewport;

/// Which sensor dimension is matched to the render frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorFit {
    /// Fit the sensor width to the wider render axis
    #[default]
    Auto,
    /// Fit the sensor width to the render width
    Horizontal,
    /// Fit the sensor height to the render height
    Vertical,
}

/// How view-space points are flattened onto the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraProjection {
    Perspective {
        /// Lens focal length (same unit as the sensor, usually mm)
        focal_length: f64,
        /// Sensor width, used for horizontal and automatic fit
        sensor_width: f64,
        /// Sensor height, used for vertical fit
        sensor_height: f64,
    },
    Orthographic {
        /// World-space extent of the fitted frame axis
        scale: f64,
    },
}

impl CameraProjection {
    /// Frame size at unit depth (perspective) or in world units (orthographic)
    /// along the fitted axis.
    fn frame_extent(&self, fit: SensorFit) -> f64 {
        match *self {
            CameraProjection::Perspective {
                focal_length,
                sensor_width,
                sensor_height,
            } => {
                let sensor = match fit {
                    SensorFit::Vertical => sensor_height,
                    SensorFit::Auto | SensorFit::Horizontal => sensor_width,
                };
                sensor / focal_length
            }
            CameraProjection::Orthographic { scale } => scale,
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self, CameraProjection::Orthographic { .. })
    }
}

/// A camera placed in the world. The camera looks down its local -Z axis with
/// +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    world_from_camera: DAffine3,
    camera_from_world: DAffine3,
    pub projection: CameraProjection,
    pub sensor_fit: SensorFit,
    /// Horizontal lens shift in units of the fitted frame size
    pub shift_x: f64,
    /// Vertical lens shift in units of the fitted frame size
    pub shift_y: f64,
}

impl Camera {
    /// Create a camera from a world matrix. Scale and shear are dropped so
    /// only the rigid part (rotation + translation) positions the camera.
    pub fn new(world_matrix: DMat4, projection: CameraProjection) -> Self {
        let (_scale, rotation, translation) = world_matrix.to_scale_rotation_translation();
        Self::from_rotation_translation(rotation, translation, projection)
    }

    pub fn from_rotation_translation(
        rotation: DQuat,
        translation: DVec3,
        projection: CameraProjection,
    ) -> Self {
        let world_from_camera =
            DAffine3::from_rotation_translation(rotation.normalize(), translation);
        Self {
            world_from_camera,
            camera_from_world: world_from_camera.inverse(),
            projection,
            sensor_fit: SensorFit::Auto,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }

    /// Perspective camera from a focal length and a sensor width. The sensor
    /// height follows the default 36x24 ratio.
    pub fn perspective(world_matrix: DMat4, focal_length: f64, sensor_width: f64) -> Self {
        Self::new(
            world_matrix,
            CameraProjection::Perspective {
                focal_length,
                sensor_width,
                sensor_height: sensor_width * (24.0 / 36.0),
            },
        )
    }

    /// Perspective camera from a field of view (radians) measured along the
    /// fitted axis.
    pub fn perspective_fov(world_matrix: DMat4, fov: f64, fit: SensorFit) -> Self {
        let sensor = 2.0 * (fov * 0.5).tan();
        Self::new(
            world_matrix,
            CameraProjection::Perspective {
                focal_length: 1.0,
                sensor_width: sensor,
                sensor_height: sensor,
            },
        )
        .with_sensor_fit(fit)
    }

    /// Orthographic camera whose fitted frame axis spans `scale` world units.
    pub fn orthographic(world_matrix: DMat4, scale: f64) -> Self {
        Self::new(world_matrix, CameraProjection::Orthographic { scale })
    }

    /// Camera at `eye` looking at `target`.
    pub fn looking_at(eye: DVec3, target: DVec3, up: DVec3, projection: CameraProjection) -> Self {
        // look_at_rh builds the view matrix; its inverse places the camera
        let world_matrix = DMat4::look_at_rh(eye, target, up).inverse();
        Self::new(world_matrix, projection)
    }

    pub fn with_sensor_fit(mut self, fit: SensorFit) -> Self {
        self.sensor_fit = fit;
        self
    }

    pub fn with_shift(mut self, shift_x: f64, shift_y: f64) -> Self {
        self.shift_x = shift_x;
        self.shift_y = shift_y;
        self
    }

    /// World-space camera position
    pub fn position(&self) -> DVec3 {
        self.world_from_camera.translation
    }

    /// World-space viewing direction (local -Z), normalized
    pub fn forward(&self) -> DVec3 {
        self.world_from_camera
            .transform_vector3(DVec3::NEG_Z)
            .normalize_or_zero()
    }

    pub fn world_from_camera(&self) -> DAffine3 {
        self.world_from_camera
    }

    /// False when the projection cannot span a frame (zero focal length,
    /// zero sensor, zero scale, non-finite values).
    pub fn is_valid(&self) -> bool {
        let extent_ok = match self.projection {
            CameraProjection::Perspective {
                focal_length,
                sensor_width,
                sensor_height,
            } => {
                focal_length > 0.0
                    && sensor_width > 0.0
                    && sensor_height > 0.0
                    && focal_length.is_finite()
                    && sensor_width.is_finite()
                    && sensor_height.is_finite()
            }
            CameraProjection::Orthographic { scale } => scale > 0.0 && scale.is_finite(),
        };
        extent_ok && self.world_from_camera.is_finite()
    }

    /// Resolve `Auto` against the render size.
    fn effective_fit(&self, viewport: &Viewport) -> SensorFit {
        match self.sensor_fit {
            SensorFit::Auto => {
                let aspect_width = viewport.width_f64() * viewport.pixel_aspect_x;
                let aspect_height = viewport.height_f64() * viewport.pixel_aspect_y;
                if aspect_width >= aspect_height {
                    SensorFit::Horizontal
                } else {
                    SensorFit::Vertical
                }
            }
            fit => fit,
        }
    }

    /// Frame bounds at unit depth (perspective) or in camera units
    /// (orthographic).
    pub fn view_plane(&self, viewport: &Viewport) -> ViewPlane {
        let width = viewport.width_f64();
        let height = viewport.height_f64();
        let ycor = viewport.pixel_aspect_y / viewport.pixel_aspect_x;

        let view_fac = match self.effective_fit(viewport) {
            SensorFit::Vertical => ycor * height,
            SensorFit::Auto | SensorFit::Horizontal => width,
        };
        // sensor_fit (not the resolved fit) picks the sensor dimension
        let pixel_size = self.projection.frame_extent(self.sensor_fit) / view_fac;

        let dx = self.shift_x * view_fac;
        let dy = self.shift_y * view_fac;

        ViewPlane {
            min: DVec2::new(
                (-0.5 * width + dx) * pixel_size,
                (-0.5 * ycor * height + dy) * pixel_size,
            ),
            max: DVec2::new(
                (0.5 * width + dx) * pixel_size,
                (0.5 * ycor * height + dy) * pixel_size,
            ),
        }
    }

    /// Build a projector for repeated projection into `viewport`.
    pub fn projector(&self, viewport: &Viewport) -> Projector {
        Projector {
            camera_from_world: self.camera_from_world,
            orthographic: self.projection.is_orthographic(),
            plane: self.view_plane(viewport),
            viewport: *viewport,
        }
    }

    /// `(nx, ny, depth)` for a world point. See [`Projector::world_to_view`].
    pub fn world_to_view(&self, point: DVec3, viewport: &Viewport) -> DVec3 {
        self.projector(viewport).world_to_view(point)
    }
}

/// Frame rectangle on the camera's view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub min: DVec2,
    pub max: DVec2,
}

impl ViewPlane {
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Camera state resolved against one viewport.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    camera_from_world: DAffine3,
    orthographic: bool,
    plane: ViewPlane,
    viewport: Viewport,
}

impl Projector {
    /// Normalized view coordinates of a world point.
    ///
    /// `x` and `y` are 0..1 across the frame (origin bottom-left), `z` is
    /// the distance in front of the camera along its view axis. A perspective
    /// point exactly on the camera plane maps to the frame centre with depth 0.
    pub fn world_to_view(&self, point: DVec3) -> DVec3 {
        let local = self.camera_from_world.transform_point3(point);
        let depth = -local.z;

        let projected = if self.orthographic {
            DVec2::new(local.x, local.y)
        } else {
            if depth == 0.0 {
                return DVec3::new(0.5, 0.5, 0.0);
            }
            DVec2::new(local.x / depth, local.y / depth)
        };

        let size = self.plane.size();
        let normalized = (projected - self.plane.min) / size;
        normalized.extend(depth)
    }

    /// Pixel position and depth of a world point.
    pub fn world_to_screen(&self, point: DVec3) -> (DVec2, f64) {
        let view = self.world_to_view(point);
        (self.viewport.to_pixels(view.truncate()), view.z)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
