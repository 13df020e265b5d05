use crate::sim::Vec3;
use thiserror::Error;

/// Errors raised outside the per-tick hot path.
///
/// The tick itself never fails: missing geometry falls back to ground
/// physics and numeric trouble is clamped. These errors surface when
/// configuration or externally supplied data is rejected up front.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid track orientation: {reason}")]
    InvalidOrientation { reason: &'static str },

    #[error("invalid physics parameter {field}: {value}")]
    InvalidParams { field: &'static str, value: f64 },

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("train has no carts")]
    EmptyGroup,

    #[error("non-finite cart state (position {position:?}, velocity {velocity:?})")]
    NonFiniteState { position: Vec3, velocity: Vec3 },
}
