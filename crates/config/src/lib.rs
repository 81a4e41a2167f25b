//! Shared configuration for Texelscope
//!
//! This crate provides the single source of truth for the render resolution
//! defaults and the texel density settings shared by the estimator core and
//! the Bevy host adapter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default render width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default render height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Default pixel aspect (1.0 = square pixels)
pub const DEFAULT_PIXEL_ASPECT: f64 = 1.0;

/// Default share of the "1 texel per screen pixel" ideal, in percent
pub const DEFAULT_PIXEL_RATIO_PERCENT: u32 = 100;

/// Smallest accepted pixel ratio percentage
pub const MIN_PIXEL_RATIO_PERCENT: u32 = 10;

/// Largest accepted pixel ratio percentage. UI sliders usually stop at 100,
/// higher values are typed in.
pub const MAX_PIXEL_RATIO_PERCENT: u32 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "Pixel ratio {0}% is outside {min}..={max}%",
        min = MIN_PIXEL_RATIO_PERCENT,
        max = MAX_PIXEL_RATIO_PERCENT
    )]
    PixelRatioOutOfRange(u32),
    #[error("Unsupported UDIM tile resolution: {0} (expected 1024, 2048, 4096 or 8192)")]
    UnsupportedUdimResolution(u32),
    #[error("Invalid render size: {width}x{height}")]
    InvalidRenderSize { width: u32, height: u32 },
}

/// Square UDIM tile size used to count how many tiles a texture needs.
///
/// Serialized as the plain pixel size (`2048`), not the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum UdimTileResolution {
    Res1024,
    #[default]
    Res2048,
    Res4096,
    Res8192,
}

impl UdimTileResolution {
    /// All selectable tile sizes, smallest first
    pub const ALL: [UdimTileResolution; 4] = [
        UdimTileResolution::Res1024,
        UdimTileResolution::Res2048,
        UdimTileResolution::Res4096,
        UdimTileResolution::Res8192,
    ];

    /// Edge length of one tile in pixels
    pub fn pixels(self) -> u32 {
        match self {
            UdimTileResolution::Res1024 => 1024,
            UdimTileResolution::Res2048 => 2048,
            UdimTileResolution::Res4096 => 4096,
            UdimTileResolution::Res8192 => 8192,
        }
    }

    /// Human readable label, e.g. `2048x2048`
    pub fn label(self) -> String {
        let px = self.pixels();
        format!("{px}x{px}")
    }
}

impl TryFrom<u32> for UdimTileResolution {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        UdimTileResolution::ALL
            .into_iter()
            .find(|res| res.pixels() == value)
            .ok_or(ConfigError::UnsupportedUdimResolution(value))
    }
}

impl From<UdimTileResolution> for u32 {
    fn from(value: UdimTileResolution) -> Self {
        value.pixels()
    }
}

/// Settings that drive the resolution recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct TexelDensityConfig {
    /// How many texture pixels to assign per screen pixel, in percent
    pub target_pixel_ratio_percent: u32,
    /// Tile size used for the UDIM tile count
    pub udim_tile_resolution: UdimTileResolution,
}

impl Default for TexelDensityConfig {
    fn default() -> Self {
        Self {
            target_pixel_ratio_percent: DEFAULT_PIXEL_RATIO_PERCENT,
            udim_tile_resolution: UdimTileResolution::default(),
        }
    }
}

impl TexelDensityConfig {
    /// Create a config with the given ratio and tile size
    pub fn new(target_pixel_ratio_percent: u32, udim_tile_resolution: UdimTileResolution) -> Self {
        Self {
            target_pixel_ratio_percent,
            udim_tile_resolution,
        }
    }

    /// Check the ratio against the accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percent = self.target_pixel_ratio_percent;
        if !(MIN_PIXEL_RATIO_PERCENT..=MAX_PIXEL_RATIO_PERCENT).contains(&percent) {
            return Err(ConfigError::PixelRatioOutOfRange(percent));
        }
        Ok(())
    }

    /// Ratio as a fraction (100% = 1.0)
    pub fn pixel_ratio_fraction(&self) -> f64 {
        self.target_pixel_ratio_percent as f64 / 100.0
    }
}

/// Render target settings for the camera the estimate is made from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct RenderConfig {
    /// Render width in pixels
    pub width: u32,
    /// Render height in pixels
    pub height: u32,
    /// Horizontal pixel aspect
    pub pixel_aspect_x: f64,
    /// Vertical pixel aspect
    pub pixel_aspect_y: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_aspect_x: DEFAULT_PIXEL_ASPECT,
            pixel_aspect_y: DEFAULT_PIXEL_ASPECT,
        }
    }
}

impl RenderConfig {
    /// Create a render config with the given dimensions and square pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Reject empty render targets and pixel aspects that are not finite and positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let aspect_ok = |aspect: f64| aspect > 0.0 && aspect.is_finite();
        if self.width == 0
            || self.height == 0
            || !aspect_ok(self.pixel_aspect_x)
            || !aspect_ok(self.pixel_aspect_y)
        {
            return Err(ConfigError::InvalidRenderSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Get width as f64 for calculations
    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    /// Get height as f64 for calculations
    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TexelDensityConfig::default();
        assert_eq!(config.target_pixel_ratio_percent, 100);
        assert_eq!(config.udim_tile_resolution.pixels(), 2048);
        assert!(config.validate().is_ok());

        let render = RenderConfig::default();
        assert_eq!(render.width, DEFAULT_WIDTH);
        assert_eq!(render.height, DEFAULT_HEIGHT);
        assert!(render.validate().is_ok());
    }

    #[test]
    fn test_pixel_ratio_range() {
        assert!(TexelDensityConfig::new(10, UdimTileResolution::Res1024)
            .validate()
            .is_ok());
        assert!(TexelDensityConfig::new(400, UdimTileResolution::Res1024)
            .validate()
            .is_ok());
        assert_eq!(
            TexelDensityConfig::new(9, UdimTileResolution::Res1024).validate(),
            Err(ConfigError::PixelRatioOutOfRange(9))
        );
        assert_eq!(
            TexelDensityConfig::new(401, UdimTileResolution::Res1024).validate(),
            Err(ConfigError::PixelRatioOutOfRange(401))
        );
    }

    #[test]
    fn test_pixel_ratio_error_message() {
        let err = ConfigError::PixelRatioOutOfRange(5);
        assert_eq!(err.to_string(), "Pixel ratio 5% is outside 10..=400%");
    }

    #[test]
    fn test_pixel_ratio_fraction() {
        let config = TexelDensityConfig::new(50, UdimTileResolution::Res1024);
        assert!((config.pixel_ratio_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_udim_from_pixels() {
        for res in UdimTileResolution::ALL {
            assert_eq!(UdimTileResolution::try_from(res.pixels()), Ok(res));
        }
        assert_eq!(
            UdimTileResolution::try_from(512),
            Err(ConfigError::UnsupportedUdimResolution(512))
        );
        assert_eq!(UdimTileResolution::Res4096.label(), "4096x4096");
    }

    #[test]
    fn test_udim_serializes_as_pixels() {
        let config = TexelDensityConfig::new(75, UdimTileResolution::Res8192);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"target_pixel_ratio_percent":75,"udim_tile_resolution":8192}"#
        );

        let parsed: TexelDensityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let bad = serde_json::from_str::<TexelDensityConfig>(r#"{"udim_tile_resolution":300}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: TexelDensityConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, TexelDensityConfig::default());
    }

    #[test]
    fn test_invalid_render_size() {
        let render = RenderConfig::new(0, 1080);
        assert_eq!(
            render.validate(),
            Err(ConfigError::InvalidRenderSize {
                width: 0,
                height: 1080
            })
        );
    }

    #[test]
    fn test_non_finite_pixel_aspect() {
        let mut render = RenderConfig::default();
        render.pixel_aspect_x = f64::INFINITY;
        assert!(render.validate().is_err());

        render.pixel_aspect_x = 1.0;
        render.pixel_aspect_y = f64::NAN;
        assert!(render.validate().is_err());
    }
}
