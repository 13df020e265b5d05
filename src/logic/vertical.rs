use crate::cart::CartMotionState;
use crate::sim::{Vec3, MIN_MOVE_SPEED};
use crate::track::Direction;

/// Converts any horizontal speed into vertical speed along the previous
/// heading and pins the cart to the cell's vertical axis.
pub(crate) fn pre_move(cart: &mut CartMotionState) {
    let speed = cart.velocity.horizontal_length();
    cart.velocity = Vec3::new(
        0.0,
        cart.velocity.y + speed * cart.direction_from.mod_y() as f64,
        0.0,
    );
    center(cart);
}

pub(crate) fn post_move(cart: &mut CartMotionState) {
    center(cart);
}

fn center(cart: &mut CartMotionState) {
    cart.position.x = cart.rail_block.mid_x();
    cart.position.z = cart.rail_block.mid_z();
}

pub(crate) fn movement_direction(cart: &CartMotionState, movement: Vec3) -> Direction {
    if movement.y > MIN_MOVE_SPEED {
        Direction::Up
    } else if movement.y < -MIN_MOVE_SPEED {
        Direction::Down
    } else if cart.direction_from.is_along_y() {
        cart.direction_from
    } else if cart.velocity.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::BlockPos;
    use approx::assert_relative_eq;

    const TOLERANCE: f64 = 1e-12;

    fn cart(velocity: Vec3, from: Direction) -> CartMotionState {
        CartMotionState::on_rail(BlockPos::new(2, 5, -3), Vec3::new(2.3, 5.4, -2.9), velocity, from)
    }

    #[test]
    fn horizontal_speed_becomes_climb() {
        let mut c = cart(Vec3::new(0.3, 0.0, 0.4), Direction::Up);
        pre_move(&mut c);
        assert_eq!(c.velocity.x, 0.0);
        assert_eq!(c.velocity.z, 0.0);
        assert_relative_eq!(c.velocity.y, 0.5, epsilon = TOLERANCE);
    }

    #[test]
    fn horizontal_speed_becomes_descent() {
        let mut c = cart(Vec3::new(0.3, -0.1, 0.0), Direction::Down);
        pre_move(&mut c);
        assert_relative_eq!(c.velocity.y, -0.4, epsilon = TOLERANCE);
    }

    #[test]
    fn horizontal_heading_drops_sideways_speed() {
        let mut c = cart(Vec3::new(0.3, 0.2, 0.0), Direction::East);
        pre_move(&mut c);
        assert_relative_eq!(c.velocity.y, 0.2, epsilon = TOLERANCE);
        assert_eq!(c.velocity.horizontal_length(), 0.0);
    }

    #[test]
    fn cart_is_centered_on_cell_axis() {
        let mut c = cart(Vec3::new(0.0, 0.1, 0.0), Direction::Up);
        pre_move(&mut c);
        assert_relative_eq!(c.position.x, 2.5, epsilon = TOLERANCE);
        assert_relative_eq!(c.position.z, -2.5, epsilon = TOLERANCE);
        assert_relative_eq!(c.position.y, 5.4, epsilon = TOLERANCE);

        c.position.x += 0.2;
        post_move(&mut c);
        assert_relative_eq!(c.position.x, 2.5, epsilon = TOLERANCE);
    }

    #[test]
    fn movement_direction_follows_vertical_sign() {
        let c = cart(Vec3::ZERO, Direction::Up);
        assert_eq!(movement_direction(&c, Vec3::new(0.0, 0.2, 0.0)), Direction::Up);
        assert_eq!(movement_direction(&c, Vec3::new(0.0, -0.2, 0.0)), Direction::Down);
    }

    #[test]
    fn resting_cart_keeps_vertical_heading() {
        let c = cart(Vec3::ZERO, Direction::Down);
        assert_eq!(movement_direction(&c, Vec3::ZERO), Direction::Down);
        let c = cart(Vec3::new(0.0, 0.0005, 0.0), Direction::North);
        assert_eq!(movement_direction(&c, Vec3::ZERO), Direction::Up);
    }
}
