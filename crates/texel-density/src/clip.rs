//! Sutherland-Hodgman clipping of attributed polygons against a rectangle.
//!
//! The clipper works on [`ClipVertex`]es, so any number of per-vertex
//! attributes (UVs for the density estimate) are carried through the clip and
//! linearly interpolated at every vertex created on a rectangle edge.

use glam::DVec2;

use crate::constants::MIN_POLYGON_VERTICES;
use crate::types::{ClipVertex, Viewport};

/// Axis-aligned clip rectangle, edges included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub min: DVec2,
    pub max: DVec2,
}

impl ClipRect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// `[0, width] x [0, height]` in pixels
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(viewport.width_f64(), viewport.height_f64()),
        }
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// One bounding half-plane of the clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipEdge {
    /// x >= xmin
    Left,
    /// x <= xmax
    Right,
    /// y >= ymin
    Bottom,
    /// y <= ymax
    Top,
}

impl ClipEdge {
    /// Passes run in this order, each consuming the previous output.
    const ORDER: [ClipEdge; 4] = [ClipEdge::Left, ClipEdge::Right, ClipEdge::Bottom, ClipEdge::Top];

    #[inline]
    fn coordinate(self, point: DVec2) -> f64 {
        match self {
            ClipEdge::Left | ClipEdge::Right => point.x,
            ClipEdge::Bottom | ClipEdge::Top => point.y,
        }
    }

    #[inline]
    fn boundary(self, rect: &ClipRect) -> f64 {
        match self {
            ClipEdge::Left => rect.min.x,
            ClipEdge::Right => rect.max.x,
            ClipEdge::Bottom => rect.min.y,
            ClipEdge::Top => rect.max.y,
        }
    }

    #[inline]
    fn is_inside(self, point: DVec2, rect: &ClipRect) -> bool {
        let c = self.coordinate(point);
        match self {
            ClipEdge::Left | ClipEdge::Bottom => c >= self.boundary(rect),
            ClipEdge::Right | ClipEdge::Top => c <= self.boundary(rect),
        }
    }

    /// Where the edge `a -> b` crosses this boundary.
    ///
    /// `t` is solved on the clipped screen axis only; position and every
    /// attribute are interpolated with it. Returns `None` when both endpoints
    /// share the clipped coordinate.
    fn intersect<const N: usize>(
        self,
        a: &ClipVertex<N>,
        b: &ClipVertex<N>,
        rect: &ClipRect,
    ) -> Option<ClipVertex<N>> {
        let ca = self.coordinate(a.position);
        let cb = self.coordinate(b.position);
        let denom = cb - ca;
        if denom == 0.0 {
            return None;
        }
        let t = (self.boundary(rect) - ca) / denom;
        Some(a.lerp(b, t))
    }
}

/// Clip one half-plane. Output keeps the input's starting vertex when it is
/// inside, so a polygon that is entirely inside comes back unchanged.
fn clip_against_edge<const N: usize>(
    input: &[ClipVertex<N>],
    edge: ClipEdge,
    rect: &ClipRect,
) -> Vec<ClipVertex<N>> {
    let Some(&last) = input.last() else {
        return Vec::new();
    };

    let mut output = Vec::with_capacity(input.len() + 2);
    let mut prev = last;
    let mut prev_inside = edge.is_inside(prev.position, rect);

    for &curr in input {
        let curr_inside = edge.is_inside(curr.position, rect);

        match (prev_inside, curr_inside) {
            (true, true) => output.push(curr),
            (true, false) => output.extend(edge.intersect(&prev, &curr, rect)),
            (false, true) => {
                output.extend(edge.intersect(&prev, &curr, rect));
                output.push(curr);
            }
            (false, false) => {}
        }

        prev = curr;
        prev_inside = curr_inside;
    }

    output
}

/// Clip a simple polygon to `rect`, interpolating attributes at new vertices.
///
/// Returns an empty polygon when less than a triangle survives.
pub fn clip_polygon<const N: usize>(
    polygon: &[ClipVertex<N>],
    rect: &ClipRect,
) -> Vec<ClipVertex<N>> {
    let mut clipped = polygon.to_vec();

    for edge in ClipEdge::ORDER {
        clipped = clip_against_edge(&clipped, edge, rect);
        if clipped.is_empty() {
            break;
        }
    }

    if clipped.len() < MIN_POLYGON_VERTICES {
        clipped.clear();
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{screen_area, uv_area};
    use crate::types::ScreenUvVertex;

    fn vertex(x: f64, y: f64, u: f64, v: f64) -> ScreenUvVertex {
        ScreenUvVertex::from_screen_uv(DVec2::new(x, y), DVec2::new(u, v))
    }

    fn rect() -> ClipRect {
        ClipRect::new(DVec2::ZERO, DVec2::new(100.0, 50.0))
    }

    #[test]
    fn test_inside_polygon_is_unchanged() {
        let polygon = vec![
            vertex(10.0, 10.0, 0.0, 0.0),
            vertex(90.0, 10.0, 1.0, 0.0),
            vertex(90.0, 40.0, 1.0, 1.0),
            vertex(10.0, 40.0, 0.0, 1.0),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert_eq!(clipped, polygon);
    }

    #[test]
    fn test_polygon_on_boundary_is_unchanged() {
        let polygon = vec![
            vertex(0.0, 0.0, 0.0, 0.0),
            vertex(100.0, 0.0, 1.0, 0.0),
            vertex(100.0, 50.0, 1.0, 1.0),
            vertex(0.0, 50.0, 0.0, 1.0),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert_eq!(clipped, polygon);
    }

    #[test]
    fn test_outside_polygon_is_empty() {
        let right_of_rect = vec![
            vertex(150.0, 10.0, 0.0, 0.0),
            vertex(200.0, 10.0, 1.0, 0.0),
            vertex(175.0, 40.0, 0.5, 1.0),
        ];
        assert!(clip_polygon(&right_of_rect, &rect()).is_empty());

        let below_rect = vec![
            vertex(10.0, -30.0, 0.0, 0.0),
            vertex(90.0, -30.0, 1.0, 0.0),
            vertex(50.0, -5.0, 0.5, 1.0),
        ];
        assert!(clip_polygon(&below_rect, &rect()).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<ScreenUvVertex> = Vec::new();
        assert!(clip_polygon(&empty, &rect()).is_empty());
    }

    #[test]
    fn test_half_outside_interpolates_uv() {
        // Spans x in [-100, 100]; the left half falls outside
        let polygon = vec![
            vertex(-100.0, 0.0, 0.0, 0.0),
            vertex(100.0, 0.0, 1.0, 0.0),
            vertex(100.0, 50.0, 1.0, 1.0),
            vertex(-100.0, 50.0, 0.0, 1.0),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert_eq!(clipped.len(), 4);
        assert!((screen_area(&clipped) - 5000.0).abs() < 1e-9);
        assert!((uv_area(&clipped) - 0.5).abs() < 1e-12);

        // Every vertex on x = 0 must carry u = 0.5
        for v in clipped.iter().filter(|v| v.position.x.abs() < 1e-12) {
            assert!((v.uv().x - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_corner_overlap_clips_two_axes() {
        // Triangle poking out past the top-right corner
        let polygon = vec![
            vertex(50.0, 25.0, 0.0, 0.0),
            vertex(150.0, 25.0, 1.0, 0.0),
            vertex(50.0, 125.0, 0.0, 1.0),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert!(clipped.len() >= 3);
        for v in &clipped {
            assert!(rect().contains(v.position));
        }
        // Inside part is the 50 x 25 rectangle [50,100] x [25,50]
        assert!((screen_area(&clipped) - 1250.0).abs() < 1e-9);
        // Affine map: area scales by 1 / 10_000 (100 px per UV unit on both axes)
        assert!((uv_area(&clipped) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_edge_on_horizontal_pass_does_not_divide() {
        // Right-hand edge is vertical and entirely outside; no NaN may appear
        let polygon = vec![
            vertex(50.0, 10.0, 0.0, 0.0),
            vertex(120.0, 10.0, 1.0, 0.0),
            vertex(120.0, 40.0, 1.0, 1.0),
            vertex(50.0, 40.0, 0.0, 1.0),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert_eq!(clipped.len(), 4);
        for v in &clipped {
            assert!(v.position.is_finite());
            assert!(v.uv().is_finite());
        }
        assert!((screen_area(&clipped) - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_generic_attribute_arity() {
        // Three attributes per vertex, e.g. a colour
        let polygon: Vec<ClipVertex<3>> = vec![
            ClipVertex::new(DVec2::new(-50.0, 0.0), [0.0, 0.0, 10.0]),
            ClipVertex::new(DVec2::new(50.0, 0.0), [1.0, 0.0, 20.0]),
            ClipVertex::new(DVec2::new(50.0, 40.0), [1.0, 1.0, 30.0]),
        ];

        let clipped = clip_polygon(&polygon, &rect());
        assert!(clipped.len() >= 3);
        let on_left_edge: Vec<_> = clipped
            .iter()
            .filter(|v| v.position.x.abs() < 1e-12 && v.position.y.abs() < 1e-12)
            .collect();
        assert_eq!(on_left_edge.len(), 1);
        assert!((on_left_edge[0].attributes[2] - 15.0).abs() < 1e-12);
    }
}
