use super::horizontal::HorizontalRail;
use super::sloped::{self, SlopeSurface};
use super::TickContext;
use crate::cart::CartMotionState;
use crate::sim::Vec3;
use crate::track::{BlockPos, Direction};
use tracing::debug;

/// Extra height and hand-off progress for a cart `remaining` blocks short
/// of the slope cell's middle.
///
/// Zero at the low edge (and beyond), one at the middle.
pub fn transition_factor(remaining: f64) -> f64 {
    (0.5 - remaining.clamp(0.0, 0.5)) * 2.0
}

/// Distance left along the rising direction until the cell middle.
pub(crate) fn remaining_distance(direction: Direction, position: Vec3, block: BlockPos) -> f64 {
    -sloped::stage(direction, position, block)
}

pub(crate) fn pre_move(direction: Direction, cart: &mut CartMotionState, ctx: &TickContext<'_>) {
    sloped::pre_move(direction, SlopeSurface::IntoVertical, cart, ctx);
}

pub(crate) fn post_move(direction: Direction, cart: &mut CartMotionState, ctx: &TickContext<'_>) {
    let block = cart.rail_block;
    sloped::post_move(direction, SlopeSurface::IntoVertical, cart, ctx);

    if transition_factor(remaining_distance(direction, cart.position, block)) >= 1.0 {
        let vertical = block.offset(Direction::Up);
        let climb = cart.velocity.horizontal_length();
        cart.rail_block = vertical;
        cart.position = vertical.center();
        cart.velocity = Vec3::new(0.0, climb, 0.0);
        debug!(from = ?block, to = ?vertical, climb, "cart handed off to vertical rail");
    }
}

pub(crate) fn movement_direction(
    direction: Direction,
    cart: &CartMotionState,
    movement: Vec3,
) -> Direction {
    if cart.is_moving_vertical_only() && cart.velocity.y > 0.0 {
        Direction::Up
    } else {
        HorizontalRail::get(direction).movement_direction(cart, movement, true)
    }
}
