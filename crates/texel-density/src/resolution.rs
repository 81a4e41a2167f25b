//! Turn the worst-case density into a texture resolution recommendation.

use serde::{Deserialize, Serialize};

use crate::constants::{NOT_AVAILABLE_LABEL, OFF_SCREEN_FAILURE_LABEL, UDIM_TILES_NOT_COMPUTED};
use crate::density::DensityResult;

/// Numbers derived from a successful density pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResolution {
    /// Worst screen-pixels-per-UV-area ratio
    pub max_density_ratio: f64,
    /// Square edge length for one texel per screen pixel
    pub required_resolution: f64,
    /// `required_resolution` scaled by the target pixel ratio (unrounded)
    pub effective_resolution: f64,
    /// Smallest power of two >= `effective_resolution` (0 when that is 0)
    pub recommended_resolution: f64,
    /// `recommended / effective * 100`; `None` when effective is 0
    pub coverage_percent: Option<f64>,
    /// UDIM tiles needed to hold `effective_resolution^2` pixels
    pub udim_tiles: u64,
}

/// Outcome of one estimate, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResolutionReport {
    Resolved(ResolvedResolution),
    /// No face produced a sample (e.g. the surface is entirely off-screen)
    Failed,
}

impl ResolutionReport {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolutionReport::Failed)
    }

    pub fn resolved(&self) -> Option<&ResolvedResolution> {
        match self {
            ResolutionReport::Resolved(resolved) => Some(resolved),
            ResolutionReport::Failed => None,
        }
    }

    /// Tile count, or -1 when nothing was computed
    pub fn udim_tile_count(&self) -> i64 {
        match self {
            ResolutionReport::Resolved(resolved) => {
                i64::try_from(resolved.udim_tiles).unwrap_or(i64::MAX)
            }
            ResolutionReport::Failed => UDIM_TILES_NOT_COMPUTED,
        }
    }

    /// Unrounded resolution, e.g. `1440 x 1440 px`, or `N/A`
    pub fn effective_label(&self) -> String {
        match self {
            ResolutionReport::Resolved(resolved) => {
                let res = resolved.effective_resolution;
                format!("{res:.0} x {res:.0} px")
            }
            ResolutionReport::Failed => NOT_AVAILABLE_LABEL.to_string(),
        }
    }

    /// Power-of-two resolution, e.g. `2048 x 2048 px`
    pub fn recommended_label(&self) -> String {
        match self {
            ResolutionReport::Resolved(resolved) => {
                let res = resolved.recommended_resolution;
                format!("{res} x {res} px")
            }
            ResolutionReport::Failed => OFF_SCREEN_FAILURE_LABEL.to_string(),
        }
    }

    /// Coverage with one decimal (`142.2`), or empty when not available
    pub fn coverage_label(&self) -> String {
        self.resolved()
            .and_then(|resolved| resolved.coverage_percent)
            .map(|coverage| format!("{coverage:.1}"))
            .unwrap_or_default()
    }

    /// `2 tiles required`, or `N/A`
    pub fn udim_label(&self) -> String {
        match self {
            ResolutionReport::Resolved(resolved) => {
                format!("{} tiles required", resolved.udim_tiles)
            }
            ResolutionReport::Failed => NOT_AVAILABLE_LABEL.to_string(),
        }
    }
}

/// Smallest power of two that is >= `value`, for `value > 0`; 0 otherwise.
///
/// Fractional targets give fractional powers (0.3 -> 0.5), so the bracket
/// `result / 2 < value <= result` holds for every positive input.
pub fn next_power_of_two_at_least(value: f64) -> f64 {
    if !(value > 0.0) || !value.is_finite() {
        return 0.0;
    }

    let mut result = value.log2().ceil().exp2();
    // log2 may land a hair off for values right at a power of two
    if result < value {
        result *= 2.0;
    } else if result / 2.0 >= value {
        result /= 2.0;
    }
    result
}

/// Resolve the recommendation for a density pass.
///
/// `target_pixel_ratio_percent` scales the one-texel-per-pixel ideal (100 =
/// ideal, 50 = half the edge length). `udim_tile_resolution` is the tile edge
/// in pixels.
pub fn resolve_resolution(
    density: &DensityResult,
    target_pixel_ratio_percent: f64,
    udim_tile_resolution: u32,
) -> ResolutionReport {
    let Some(max_ratio) = density.max_ratio() else {
        return ResolutionReport::Failed;
    };

    let required_resolution = max_ratio.sqrt();
    let effective_resolution = required_resolution * (target_pixel_ratio_percent / 100.0);

    let recommended_resolution = next_power_of_two_at_least(effective_resolution);
    let coverage_percent = (effective_resolution > 0.0)
        .then(|| recommended_resolution / effective_resolution * 100.0);

    let udim_tiles = if udim_tile_resolution > 0 {
        let tile_pixels = udim_tile_resolution as f64 * udim_tile_resolution as f64;
        let required_pixels = effective_resolution * effective_resolution;
        (required_pixels / tile_pixels).ceil().max(0.0) as u64
    } else {
        0
    };

    ResolutionReport::Resolved(ResolvedResolution {
        max_density_ratio: max_ratio,
        required_resolution,
        effective_resolution,
        recommended_resolution,
        coverage_percent,
        udim_tiles,
    })
}
