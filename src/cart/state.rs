use crate::error::EngineError;
use crate::sim::{Vec3, MIN_MOVE_SPEED};
use crate::track::{BlockPos, Direction};

/// Mutable per-cart motion data the engine reads and writes each tick.
///
/// Owned by the cart entity; the engine only borrows it for one
/// select / pre-move / post-move cycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CartMotionState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Position after the last `pre_move` snap, i.e. where this tick's motion started.
    pub last_position: Vec3,
    /// Cell of the rail the cart is riding on.
    pub rail_block: BlockPos,
    pub derailed: bool,
    pub flying: bool,
    /// Heading the cart had on the previous tick.
    pub direction_from: Direction,
}

impl CartMotionState {
    pub fn new(position: Vec3, velocity: Vec3, direction_from: Direction) -> Self {
        Self {
            position,
            velocity,
            last_position: position,
            rail_block: BlockPos::containing(position),
            derailed: false,
            flying: false,
            direction_from,
        }
    }

    /// Cart resting on the rail in `block`.
    pub fn on_rail(
        block: BlockPos,
        position: Vec3,
        velocity: Vec3,
        direction_from: Direction,
    ) -> Self {
        Self {
            rail_block: block,
            ..Self::new(position, velocity, direction_from)
        }
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving_horizontally() || self.is_moving_vertically()
    }

    pub fn is_moving_horizontally(&self) -> bool {
        self.velocity.horizontal_length() > MIN_MOVE_SPEED
    }

    pub fn is_moving_vertically(&self) -> bool {
        self.velocity.y.abs() > MIN_MOVE_SPEED
    }

    pub fn is_moving_vertical_only(&self) -> bool {
        self.is_moving_vertically() && !self.is_moving_horizontally()
    }

    /// Whether the horizontal velocity points towards `direction`.
    pub fn is_heading_to(&self, direction: Direction) -> bool {
        self.velocity
            .horizontal_dot(direction.mod_x() as f64, direction.mod_z() as f64)
            > 0.0
    }

    /// Scales the velocity down so its magnitude does not exceed `limit`.
    pub fn limit_speed(&mut self, limit: f64) {
        let limit = limit.max(0.0);
        let speed = self.velocity.length();
        if speed > limit {
            self.velocity = if speed > f64::EPSILON {
                self.velocity * (limit / speed)
            } else {
                Vec3::ZERO
            };
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.position.is_finite() && self.velocity.is_finite() {
            Ok(())
        } else {
            Err(EngineError::NonFiniteState {
                position: self.position,
                velocity: self.velocity,
            })
        }
    }
}
