/// Projected faces at or below this many square pixels carry no sample.
pub const SCREEN_AREA_EPSILON: f64 = 1e-6;

/// Faces whose clipped UV polygon is at or below this area carry no sample.
pub const UV_AREA_EPSILON: f64 = 1e-9;

/// Fewest vertices a clipped polygon needs to enclose any area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Tile count reported when no resolution could be computed.
pub const UDIM_TILES_NOT_COMPUTED: i64 = -1;

/// Label shown in place of a resolution that is not available.
pub const NOT_AVAILABLE_LABEL: &str = "N/A";

/// Label shown when no face produced a usable sample.
pub const OFF_SCREEN_FAILURE_LABEL: &str = "Calculation failed (off-screen)";
