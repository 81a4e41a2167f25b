use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use texelscope_config::RenderConfig;

/// One corner of a face: world-space position plus its UV coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceVertex {
    pub position: DVec3,
    pub uv: DVec2,
}

impl FaceVertex {
    pub fn new(position: DVec3, uv: DVec2) -> Self {
        Self { position, uv }
    }
}

/// A face loop in world space, vertices in winding order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
}

impl Face {
    pub fn new(vertices: Vec<FaceVertex>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }
}

impl FromIterator<FaceVertex> for Face {
    fn from_iter<T: IntoIterator<Item = FaceVertex>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Render target the camera projects into.
///
/// The clip rectangle is `[0, width] x [0, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Horizontal pixel aspect
    pub pixel_aspect_x: f64,
    /// Vertical pixel aspect
    pub pixel_aspect_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with square pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
        }
    }

    /// Viewports need a non-empty area and finite, positive pixel aspects.
    pub fn is_valid(&self) -> bool {
        let aspect_ok = |aspect: f64| aspect > 0.0 && aspect.is_finite();
        self.width > 0
            && self.height > 0
            && aspect_ok(self.pixel_aspect_x)
            && aspect_ok(self.pixel_aspect_y)
    }

    #[inline]
    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    #[inline]
    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }

    /// Scale normalized view coordinates (0-1 across the frame) to pixels.
    #[inline]
    pub fn to_pixels(&self, normalized: DVec2) -> DVec2 {
        DVec2::new(normalized.x * self.width_f64(), normalized.y * self.height_f64())
    }

    /// Total number of pixels in the render target
    pub fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<&RenderConfig> for Viewport {
    fn from(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            pixel_aspect_x: config.pixel_aspect_x,
            pixel_aspect_y: config.pixel_aspect_y,
        }
    }
}

/// A 2D polygon vertex carrying `N` attributes that are interpolated
/// alongside the position when the polygon is clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex<const N: usize> {
    pub position: DVec2,
    pub attributes: [f64; N],
}

impl<const N: usize> ClipVertex<N> {
    pub fn new(position: DVec2, attributes: [f64; N]) -> Self {
        Self {
            position,
            attributes,
        }
    }

    /// Linear interpolation of position and every attribute by the same `t`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut attributes = self.attributes;
        for (a, b) in attributes.iter_mut().zip(other.attributes.iter()) {
            *a += t * (b - *a);
        }
        Self {
            position: self.position + t * (other.position - self.position),
            attributes,
        }
    }
}

/// Screen-space vertex (pixels) carrying its UV coordinate.
pub type ScreenUvVertex = ClipVertex<2>;

/// Projected face: empty when culled or clipped away, otherwise 3+ vertices.
pub type ScreenUvPolygon = Vec<ScreenUvVertex>;

impl ScreenUvVertex {
    pub fn from_screen_uv(screen: DVec2, uv: DVec2) -> Self {
        Self::new(screen, [uv.x, uv.y])
    }

    #[inline]
    pub fn uv(&self) -> DVec2 {
        DVec2::new(self.attributes[0], self.attributes[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_from_render_config() {
        let viewport = Viewport::from(&RenderConfig::new(1280, 720));
        assert_eq!(viewport.width, 1280);
        assert_eq!(viewport.height, 720);
        assert_eq!(viewport.total_pixels(), 921_600);
        assert!(viewport.is_valid());
        assert!(!Viewport::new(0, 720).is_valid());
    }

    #[test]
    fn test_non_finite_pixel_aspect_is_invalid() {
        let mut viewport = Viewport::new(1920, 1080);
        viewport.pixel_aspect_x = f64::INFINITY;
        assert!(!viewport.is_valid());

        viewport.pixel_aspect_x = 1.0;
        viewport.pixel_aspect_y = f64::NAN;
        assert!(!viewport.is_valid());
    }

    #[test]
    fn test_to_pixels() {
        let viewport = Viewport::new(1920, 1080);
        let px = viewport.to_pixels(DVec2::new(0.5, 0.25));
        assert!((px.x - 960.0).abs() < 1e-9);
        assert!((px.y - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_vertex_lerp_interpolates_attributes() {
        let a = ScreenUvVertex::from_screen_uv(DVec2::new(0.0, 0.0), DVec2::new(0.0, 1.0));
        let b = ScreenUvVertex::from_screen_uv(DVec2::new(10.0, 20.0), DVec2::new(1.0, 0.0));
        let mid = a.lerp(&b, 0.25);

        assert!((mid.position - DVec2::new(2.5, 5.0)).length() < 1e-12);
        assert!((mid.uv() - DVec2::new(0.25, 0.75)).length() < 1e-12);
    }
}
