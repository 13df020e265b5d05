use super::TickContext;
use crate::cart::CartMotionState;
use crate::track::Direction;

/// Compass direction nearest the raw velocity, or the previous heading when at rest.
pub(crate) fn movement_direction(cart: &CartMotionState) -> Direction {
    Direction::nearest(cart.velocity).unwrap_or(cart.direction_from)
}

pub(crate) fn ground_pre_move(cart: &mut CartMotionState, ctx: &TickContext<'_>) {
    cart.velocity = cart.velocity * ctx.params.derailed_friction;
}

pub(crate) fn air_pre_move(cart: &mut CartMotionState, ctx: &TickContext<'_>) {
    // A train rising or falling together is damped once, through its head.
    if !ctx.is_head && cart.is_moving_vertical_only() && ctx.group.head_moving_vertical_only() {
        return;
    }
    cart.velocity = cart.velocity * ctx.params.flying_friction;
}
