//! Render camera the texel density estimate is made from
//!
//! The render camera is a scene object (separate from the user viewport) that
//! defines the final render resolution and lens. The density estimate asks
//! how large a texture must be for the target to stay sharp through this
//! camera, not through whatever view the user is orbiting in.

use bevy::prelude::*;
use texel_density::{Camera as DensityCamera, CameraProjection, SensorFit, Viewport};

use crate::extract::world_matrix;

/// Component marking a camera as the render camera for density calculations.
#[derive(Component, Clone, Debug)]
pub struct RenderCamera {
    /// Render resolution (default 1920×1080)
    pub resolution: UVec2,
    /// Pixel aspect (x, y), 1:1 for square pixels
    pub pixel_aspect: Vec2,
    /// Lens or orthographic scale
    pub projection: CameraProjection,
    /// Which sensor axis is matched to the frame
    pub sensor_fit: SensorFit,
    /// Lens shift in units of the fitted frame size
    pub shift: Vec2,
}

impl Default for RenderCamera {
    fn default() -> Self {
        Self {
            resolution: UVec2::new(1920, 1080),
            pixel_aspect: Vec2::ONE,
            // 50mm lens on a 36×24 sensor
            projection: CameraProjection::Perspective {
                focal_length: 50.0,
                sensor_width: 36.0,
                sensor_height: 24.0,
            },
            sensor_fit: SensorFit::Auto,
            shift: Vec2::ZERO,
        }
    }
}

impl RenderCamera {
    /// Create a render camera with custom resolution
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            resolution: UVec2::new(width, height),
            ..Default::default()
        }
    }

    /// Use a field of view (radians) along the fitted axis instead of a lens
    pub fn with_fov(mut self, fov: f32) -> Self {
        let sensor = 2.0 * (fov as f64 * 0.5).tan();
        self.projection = CameraProjection::Perspective {
            focal_length: 1.0,
            sensor_width: sensor,
            sensor_height: sensor,
        };
        self
    }

    /// Switch to an orthographic projection spanning `scale` world units
    pub fn with_orthographic_scale(mut self, scale: f32) -> Self {
        self.projection = CameraProjection::Orthographic {
            scale: scale as f64,
        };
        self
    }

    /// Get the aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.resolution.x as f32 / self.resolution.y as f32
    }

    /// Viewport the estimate clips against
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.resolution.x,
            height: self.resolution.y,
            pixel_aspect_x: self.pixel_aspect.x as f64,
            pixel_aspect_y: self.pixel_aspect.y as f64,
        }
    }

    /// Density camera placed at `transform`. Scale on the transform is ignored.
    pub fn to_density_camera(&self, transform: &GlobalTransform) -> DensityCamera {
        DensityCamera::new(world_matrix(transform), self.projection)
            .with_sensor_fit(self.sensor_fit)
            .with_shift(self.shift.x as f64, self.shift.y as f64)
    }
}

/// Resource tracking the active render camera for density calculations
#[derive(Resource, Default)]
pub struct ActiveRenderCamera {
    /// The entity of the active render camera. When unset, the only render
    /// camera in the scene is used.
    pub entity: Option<Entity>,
}
