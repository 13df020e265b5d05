//! Pure numeric primitives for rail physics.
//!
//! Vector math, per-tick constants and tunable parameters. Nothing here
//! knows about tracks or carts.

mod math;
mod physics_params;

pub mod physics;

pub use math::Vec3;
pub use physics::{
    normalize_factor, vector_yaw, wrap_degrees, yaw_difference, CURVE_T_MAX, CURVE_T_MIN,
    EPSILON, MIN_MOVE_SPEED, UPSIDE_DOWN_Y_OFFSET, YAW_TIE_EPSILON, Y_POS_OFFSET,
};
pub use physics_params::PhysicsParams;
