use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Tunable constants for rail physics.
///
/// Deserializes from partial JSON: any field left out keeps its default.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Per-tick gravity for derailed carts (blocks/tick²).
    pub gravity_multiplier: f64,
    /// Per-tick gravity on slopes and, when slowing down, vertical rails.
    pub gravity_multiplier_railed: f64,
    /// Downhill push applied every tick on a slope.
    pub slope_velocity_multiplier: f64,
    /// Speed gained or lost per block of elevation change on a slope.
    pub slope_gravity_factor: f64,
    /// Upper bound of the slope speed factor.
    pub max_slope_speed_factor: f64,
    pub derailed_friction: f64,
    pub flying_friction: f64,
    /// Speed limit applied by the tick driver (blocks/tick).
    pub max_speed: f64,
}

impl PhysicsParams {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let non_negative = [
            ("gravity_multiplier", self.gravity_multiplier),
            ("gravity_multiplier_railed", self.gravity_multiplier_railed),
            ("slope_velocity_multiplier", self.slope_velocity_multiplier),
            ("slope_gravity_factor", self.slope_gravity_factor),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidParams { field, value });
            }
        }

        let unit_range = [
            ("derailed_friction", self.derailed_friction),
            ("flying_friction", self.flying_friction),
        ];
        for (field, value) in unit_range {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidParams { field, value });
            }
        }

        if !self.max_slope_speed_factor.is_finite() || self.max_slope_speed_factor < 1.0 {
            return Err(EngineError::InvalidParams {
                field: "max_slope_speed_factor",
                value: self.max_slope_speed_factor,
            });
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(EngineError::InvalidParams {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        Ok(())
    }
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity_multiplier: 0.04,
            gravity_multiplier_railed: 0.015625,
            slope_velocity_multiplier: 0.0078125,
            slope_gravity_factor: 0.05,
            max_slope_speed_factor: 2.0,
            derailed_friction: 0.5,
            flying_friction: 0.95,
            max_speed: 0.4,
        }
    }
}
