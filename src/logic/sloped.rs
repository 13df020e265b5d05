use super::horizontal::HorizontalRail;
use super::slope_vertical::{remaining_distance, transition_factor};
use super::TickContext;
use crate::cart::CartMotionState;
use crate::sim::{Vec3, UPSIDE_DOWN_Y_OFFSET};
use crate::track::{BlockPos, Direction, OrientationLookup};
use tracing::debug;

/// Signed offset from the cell middle along the rising direction.
///
/// `-0.5` is the low edge of the slope, `0.5` the high edge.
pub(crate) fn stage(direction: Direction, position: Vec3, block: BlockPos) -> f64 {
    (position.x - block.mid_x()) * direction.mod_x() as f64
        + (position.z - block.mid_z()) * direction.mod_z() as f64
}

/// Position snapped onto the slope surface of `block`.
///
/// Height is clamped to one cell, so a cart past either edge sits exactly
/// level with the rail it is handed off to.
pub(crate) fn fixed_position(direction: Direction, position: Vec3, block: BlockPos) -> Vec3 {
    let mut pos = HorizontalRail::get(direction).fixed_position(position, block);
    pos.y += (stage(direction, pos, block) + 0.5).clamp(0.0, 1.0);
    pos
}

/// Height profile of a slope cell on top of the plain incline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SlopeSurface {
    Regular,
    /// Hanging from the ceiling, cart riding below the rail.
    UpsideDown,
    /// Curling up into the vertical rail above.
    IntoVertical,
}

impl SlopeSurface {
    /// Snap used by both `pre_move` and `post_move`, so the two agree.
    pub(crate) fn fixed_position(
        self,
        direction: Direction,
        position: Vec3,
        block: BlockPos,
    ) -> Vec3 {
        let mut pos = fixed_position(direction, position, block);
        match self {
            SlopeSurface::Regular => {}
            SlopeSurface::UpsideDown => pos.y -= UPSIDE_DOWN_Y_OFFSET,
            SlopeSurface::IntoVertical => {
                pos.y += transition_factor(remaining_distance(direction, pos, block));
            }
        }
        pos
    }
}

/// Clear distance to a solid cell in the cart's way, if one exists.
fn blocked_distance(
    direction: Direction,
    cart: &CartMotionState,
    world: &dyn OrientationLookup,
) -> Option<f64> {
    let block = cart.rail_block;
    let along = stage(direction, cart.position, block);
    if !cart.is_moving() || cart.is_heading_to(direction.opposite()) {
        let low = block.offset(direction.opposite());
        if world.is_solid(low) {
            return Some((along + 0.5).max(0.0));
        }
    } else if cart.is_heading_to(direction) {
        let above = block.offset(Direction::Up);
        if world.is_solid(above) {
            return Some((-along).max(0.0));
        }
    }
    None
}

pub(crate) fn pre_move(
    direction: Direction,
    surface: SlopeSurface,
    cart: &mut CartMotionState,
    ctx: &TickContext<'_>,
) {
    let mod_x = direction.mod_x() as f64;
    let mod_z = direction.mod_z() as f64;

    // Vertical motion becomes motion along the incline
    cart.velocity.x += cart.velocity.y * mod_x;
    cart.velocity.z += cart.velocity.y * mod_z;
    cart.velocity.y = 0.0;

    if ctx.group.slowing_down && !ctx.group.movement_controlled {
        cart.velocity.x -= mod_x * ctx.params.slope_velocity_multiplier;
        cart.velocity.z -= mod_z * ctx.params.slope_velocity_multiplier;
    }

    // The cell above a transition holds the vertical rail
    if surface != SlopeSurface::IntoVertical {
        if let Some(blocked) = blocked_distance(direction, cart, ctx.world) {
            if cart.velocity.horizontal_length() > blocked {
                debug!(
                    blocked,
                    block = ?cart.rail_block,
                    "slope blocked, clamping group forward force"
                );
                ctx.group.clamp_forward_force(blocked);
            }
        }
    }

    HorizontalRail::get(direction).snap_velocity(cart);
    cart.position = surface.fixed_position(direction, cart.position, cart.rail_block);
}

pub(crate) fn post_move(
    direction: Direction,
    surface: SlopeSurface,
    cart: &mut CartMotionState,
    ctx: &TickContext<'_>,
) {
    let block = cart.rail_block;
    let start_y = surface.fixed_position(direction, cart.last_position, block).y;
    let end_stage = stage(direction, cart.position, block);

    let pos = surface.fixed_position(direction, cart.position, block);
    cart.position = pos;

    if ctx.group.slowing_down {
        let speed = cart.velocity.horizontal_length();
        if speed > 0.0 {
            let factor = ((start_y - pos.y) * ctx.params.slope_gravity_factor / speed + 1.0)
                .clamp(0.0, ctx.params.max_slope_speed_factor);
            cart.velocity.x *= factor;
            cart.velocity.z *= factor;
        }
    }

    if end_stage > 0.5 {
        cart.rail_block = block.offset(direction).offset(Direction::Up);
        debug!(from = ?block, to = ?cart.rail_block, "cart left slope through top edge");
    } else if end_stage < -0.5 {
        cart.rail_block = block.offset(direction.opposite());
        debug!(from = ?block, to = ?cart.rail_block, "cart left slope through bottom edge");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartGroup;
    use crate::sim::{PhysicsParams, Y_POS_OFFSET};
    use crate::track::{TestWorld, TrackOrientation};
    use approx::assert_relative_eq;

    const TOLERANCE: f64 = 1e-9;
    const SLOPE: BlockPos = BlockPos::new(0, 0, 0);

    fn world() -> TestWorld {
        TestWorld::new().with_track(TrackOrientation::slope(SLOPE, Direction::East))
    }

    fn cart(x: f64, velocity: Vec3) -> CartMotionState {
        let position = fixed_position(Direction::East, Vec3::new(x, 0.0, 0.5), SLOPE);
        CartMotionState::on_rail(SLOPE, position, velocity, Direction::East)
    }

    #[test]
    fn height_follows_incline() {
        let low = fixed_position(Direction::East, Vec3::new(0.0, 3.0, 0.5), SLOPE);
        let mid = fixed_position(Direction::East, Vec3::new(0.5, 3.0, 0.5), SLOPE);
        let high = fixed_position(Direction::East, Vec3::new(1.0, 3.0, 0.5), SLOPE);
        assert_relative_eq!(low.y, Y_POS_OFFSET, epsilon = TOLERANCE);
        assert_relative_eq!(mid.y, Y_POS_OFFSET + 0.5, epsilon = TOLERANCE);
        assert_relative_eq!(high.y, Y_POS_OFFSET + 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn height_clamped_to_one_cell() {
        let past_top = fixed_position(Direction::East, Vec3::new(1.3, 0.0, 0.5), SLOPE);
        let past_bottom = fixed_position(Direction::East, Vec3::new(-0.4, 0.0, 0.5), SLOPE);
        assert_relative_eq!(past_top.y, Y_POS_OFFSET + 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(past_bottom.y, Y_POS_OFFSET, epsilon = TOLERANCE);
    }

    #[test]
    fn upside_down_slope_hangs_below_incline() {
        let surface = SlopeSurface::UpsideDown;
        let mid = surface.fixed_position(Direction::East, Vec3::new(0.5, 3.0, 0.5), SLOPE);
        let high = surface.fixed_position(Direction::East, Vec3::new(1.0, 3.0, 0.5), SLOPE);
        assert_relative_eq!(mid.y, Y_POS_OFFSET + 0.5 - UPSIDE_DOWN_Y_OFFSET, epsilon = TOLERANCE);
        assert_relative_eq!(high.y, Y_POS_OFFSET + 1.0 - UPSIDE_DOWN_Y_OFFSET, epsilon = TOLERANCE);
        assert_relative_eq!(mid.z, 0.5, epsilon = TOLERANCE);
    }

    #[test]
    fn upside_down_snaps_agree_before_and_after_move() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(true);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.7, Vec3::new(-0.2, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::UpsideDown, &mut c, &ctx);
        let hanging = Y_POS_OFFSET + 0.7 - UPSIDE_DOWN_Y_OFFSET;
        assert_relative_eq!(c.position.y, hanging, epsilon = TOLERANCE);

        c.last_position = c.position;
        c.position.x = 0.5;
        let speed = c.velocity.x;
        post_move(Direction::East, SlopeSurface::UpsideDown, &mut c, &ctx);
        assert_relative_eq!(c.position.y, hanging - 0.2, epsilon = TOLERANCE);
        // Same drop as a regular slope: factor = 0.2 * 0.05 / |v| + 1
        let factor = 0.2 * params.slope_gravity_factor / speed.abs() + 1.0;
        assert_relative_eq!(c.velocity.x, speed * factor, epsilon = TOLERANCE);
    }

    #[test]
    fn stage_is_signed_by_rising_direction() {
        let pos = Vec3::new(0.5, 0.0, 0.2);
        assert_relative_eq!(stage(Direction::North, pos, SLOPE), 0.3, epsilon = TOLERANCE);
        assert_relative_eq!(stage(Direction::South, pos, SLOPE), -0.3, epsilon = TOLERANCE);
    }

    #[test]
    fn pre_move_folds_vertical_velocity_downhill() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.5, Vec3::new(0.0, -0.1, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(c.velocity.x, -0.1, epsilon = TOLERANCE);
        assert_eq!(c.velocity.y, 0.0);
        assert_eq!(c.velocity.z, 0.0);
    }

    #[test]
    fn pre_move_applies_incline_deceleration() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(true);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.5, Vec3::new(0.2, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(
            c.velocity.x,
            0.2 - params.slope_velocity_multiplier,
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn controlled_movement_skips_deceleration() {
        let world = world();
        let params = PhysicsParams::default();
        let mut group = CartGroup::new(true);
        group.movement_controlled = true;
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.5, Vec3::new(0.2, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(c.velocity.x, 0.2, epsilon = TOLERANCE);
    }

    #[test]
    fn downhill_block_clamps_group_force() {
        let world = world().with_solid(BlockPos::new(-1, 0, 0));
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: false,
        };
        // 0.3 from the low edge, heading downhill faster than that
        let mut c = cart(0.3, Vec3::new(-0.5, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(group.forward_force().unwrap(), 0.3, epsilon = TOLERANCE);
    }

    #[test]
    fn slow_cart_is_not_clamped() {
        let world = world().with_solid(BlockPos::new(-1, 0, 0));
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.3, Vec3::new(-0.1, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_eq!(group.forward_force(), None);
    }

    #[test]
    fn uphill_block_above_clamps_group_force() {
        let world = world().with_solid(BlockPos::new(0, 1, 0));
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.2, Vec3::new(0.4, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(group.forward_force().unwrap(), 0.3, epsilon = TOLERANCE);
    }

    #[test]
    fn transition_surface_skips_collision_check() {
        let world = world().with_solid(BlockPos::new(-1, 0, 0));
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.3, Vec3::new(-0.5, 0.0, 0.0));
        pre_move(Direction::East, SlopeSurface::IntoVertical, &mut c, &ctx);
        assert_eq!(group.forward_force(), None);
    }

    #[test]
    fn post_move_snaps_height_and_speeds_up_downhill() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(true);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.7, Vec3::new(-0.2, -0.05, 0.0));
        c.last_position = c.position;
        c.position = Vec3::new(0.5, 0.2, 0.5);
        post_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(c.position.y, Y_POS_OFFSET + 0.5, epsilon = TOLERANCE);
        // Dropped 0.2 blocks: factor = 0.2 * 0.05 / 0.2 + 1
        assert_relative_eq!(c.velocity.x, -0.2 * 1.05, epsilon = TOLERANCE);
    }

    #[test]
    fn post_move_without_slowdown_keeps_speed() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.7, Vec3::new(-0.2, 0.0, 0.0));
        c.last_position = c.position;
        c.position = Vec3::new(0.5, 0.2, 0.5);
        post_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_relative_eq!(c.velocity.x, -0.2, epsilon = TOLERANCE);
    }

    #[test]
    fn post_move_hands_off_at_top_edge() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.9, Vec3::new(0.3, 0.0, 0.0));
        c.last_position = c.position;
        c.position = Vec3::new(1.2, 1.0, 0.5);
        post_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_eq!(c.rail_block, BlockPos::new(1, 1, 0));
        assert_relative_eq!(c.position.y, 1.0 + Y_POS_OFFSET, epsilon = TOLERANCE);
    }

    #[test]
    fn post_move_hands_off_at_bottom_edge() {
        let world = world();
        let params = PhysicsParams::default();
        let group = CartGroup::new(false);
        let ctx = TickContext {
            world: &world,
            params: &params,
            group: &group,
            is_head: true,
        };
        let mut c = cart(0.1, Vec3::new(-0.3, 0.0, 0.0));
        c.last_position = c.position;
        c.position = Vec3::new(-0.2, 0.0, 0.5);
        post_move(Direction::East, SlopeSurface::Regular, &mut c, &ctx);
        assert_eq!(c.rail_block, BlockPos::new(-1, 0, 0));
        assert_relative_eq!(c.position.y, Y_POS_OFFSET, epsilon = TOLERANCE);
    }
}
