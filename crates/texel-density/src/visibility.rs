//! Cheap per-face culling run before the clip and area work.
//!
//! Two tests, both silent exclusions rather than errors:
//!
//! - **Orientation**: the face normal is compared with the camera's single
//!   forward vector. Faces whose normal points the same way the camera looks
//!   are skipped. This is a coarse, view-independent approximation: it does
//!   not test the view ray to each vertex and knows nothing about occlusion.
//! - **Behind camera**: once projected, a face whose every vertex has
//!   non-positive depth is skipped.

use glam::DVec3;

use crate::types::Face;

/// Why a face was kept or excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityCheck {
    Visible,
    /// Face normal points along the camera's forward direction
    FacesAway,
    /// Every projected vertex has depth <= 0
    BehindCamera,
    /// Fewer than three vertices
    Degenerate,
}

impl VisibilityCheck {
    pub fn is_visible(self) -> bool {
        self == VisibilityCheck::Visible
    }
}

/// Unit normal of a face loop from its winding (counter-clockwise loops face
/// the viewer). Uses Newell's method so concave loops work too. Returns zero
/// for degenerate loops.
pub fn face_normal(face: &Face) -> DVec3 {
    let vertices = &face.vertices;
    let n = vertices.len();
    if n < 3 {
        return DVec3::ZERO;
    }

    let mut normal = DVec3::ZERO;
    for i in 0..n {
        let current = vertices[i].position;
        let next = vertices[(i + 1) % n].position;
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal.normalize_or_zero()
}

/// True when the face is oriented along `camera_forward` and should be skipped.
#[inline]
pub fn faces_away(normal: DVec3, camera_forward: DVec3) -> bool {
    normal.dot(camera_forward) > 0.0
}

/// True when every depth is non-positive. An empty face counts as behind.
pub fn is_behind_camera<I>(depths: I) -> bool
where
    I: IntoIterator<Item = f64>,
{
    depths.into_iter().all(|depth| depth <= 0.0)
}

/// Orientation test for one face, run before projection.
pub fn check_orientation(face: &Face, camera_forward: DVec3) -> VisibilityCheck {
    if face.len() < 3 {
        return VisibilityCheck::Degenerate;
    }
    if faces_away(face_normal(face), camera_forward) {
        return VisibilityCheck::FacesAway;
    }
    VisibilityCheck::Visible
}

/// Depth test for one projected face, run after projection.
pub fn check_depths<I>(depths: I) -> VisibilityCheck
where
    I: IntoIterator<Item = f64>,
{
    if is_behind_camera(depths) {
        VisibilityCheck::BehindCamera
    } else {
        VisibilityCheck::Visible
    }
}
