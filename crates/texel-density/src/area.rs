//! Shoelace polygon area, used on both pixel and UV coordinates.

use glam::DVec2;

use crate::constants::MIN_POLYGON_VERTICES;
use crate::types::ScreenUvVertex;

/// Unsigned area of a simple polygon given its vertices in order.
///
/// Returns 0 for fewer than three points.
pub fn polygon_area<I>(points: I) -> f64
where
    I: IntoIterator<Item = DVec2>,
{
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
        return 0.0;
    };

    let mut count = 1;
    let mut previous = first;
    let mut twice_area = 0.0;
    for point in points {
        twice_area += previous.perp_dot(point);
        previous = point;
        count += 1;
    }
    twice_area += previous.perp_dot(first);

    if count < MIN_POLYGON_VERTICES {
        return 0.0;
    }
    twice_area.abs() / 2.0
}

/// Area in square pixels of a projected polygon.
pub fn screen_area(polygon: &[ScreenUvVertex]) -> f64 {
    polygon_area(polygon.iter().map(|v| v.position))
}

/// Area in UV units of the UV polygon carried by a projected polygon.
pub fn uv_area(polygon: &[ScreenUvVertex]) -> f64 {
    polygon_area(polygon.iter().map(ScreenUvVertex::uv))
}
