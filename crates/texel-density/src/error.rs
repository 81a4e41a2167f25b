//! Error types for the density estimate.

use texelscope_config::ConfigError;
use thiserror::Error;

/// Preconditions that stop an estimate before any face is visited.
///
/// Degenerate or invisible faces are not errors; they are skipped. A pass in
/// which no face produced a sample is reported as
/// [`ResolutionReport::Failed`](crate::resolution::ResolutionReport::Failed).
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("No target surface selected")]
    NoTargetSurface,

    #[error("Target surface has no UV map")]
    NoUvChannel,

    #[error("No active camera in scene")]
    NoActiveCamera,

    #[error("Camera projection cannot span a frame")]
    InvalidCamera,

    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("UV layer '{layer}' has {found} corners, mesh has {expected}")]
    InvalidUvLayer {
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
