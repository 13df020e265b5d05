/// Height of a cart above the bottom of the rail cell it rides on.
pub const Y_POS_OFFSET: f64 = 0.0625;

/// Drop of a cart hanging below an upside-down slope.
pub const UPSIDE_DOWN_Y_OFFSET: f64 = 0.35;

/// Speed below which a velocity component counts as stationary.
pub const MIN_MOVE_SPEED: f64 = 0.001;

/// Tolerance for the perpendicular-velocity constraint after `pre_move`.
pub const EPSILON: f64 = 1e-9;

/// Two yaw differences closer than this are a tie.
pub const YAW_TIE_EPSILON: f64 = 1e-9;

/// Chord parameter bounds for curves; keeps a snapped cart inside its cell.
pub const CURVE_T_MIN: f64 = 0.001;
pub const CURVE_T_MAX: f64 = 0.999;

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(deg: f64) -> f64 {
    if deg > -180.0 && deg <= 180.0 {
        return deg;
    }
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Absolute angular distance between two yaws, in `[0, 180]`.
pub fn yaw_difference(a: f64, b: f64) -> f64 {
    wrap_degrees(a - b).abs()
}

/// Yaw in degrees of a horizontal motion, using the voxel-world convention
/// (south = 0, west = 90, north = 180, east = 270).
///
/// Returns `None` when the horizontal part is too small to have a heading.
pub fn vector_yaw(x: f64, z: f64) -> Option<f64> {
    if x.abs() < MIN_MOVE_SPEED * MIN_MOVE_SPEED && z.abs() < MIN_MOVE_SPEED * MIN_MOVE_SPEED {
        return None;
    }
    Some((-x).atan2(z).to_degrees().rem_euclid(360.0))
}

/// Ratio of the requested horizontal speed to the length of a rail step.
///
/// Multiplying the step by this factor yields a velocity with the requested
/// magnitude, collinear with the step. A degenerate step or request yields
/// zero rather than NaN.
pub fn normalize_factor(dx: f64, dz: f64, req_x: f64, req_z: f64) -> f64 {
    let step_sq = dx * dx + dz * dz;
    if step_sq < f64::EPSILON {
        return 0.0;
    }
    let factor = ((req_x * req_x + req_z * req_z) / step_sq).sqrt();
    if factor.is_finite() {
        factor
    } else {
        0.0
    }
}
