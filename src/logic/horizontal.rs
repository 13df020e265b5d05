use crate::cart::CartMotionState;
use crate::sim::{
    normalize_factor, vector_yaw, yaw_difference, Vec3, CURVE_T_MAX, CURVE_T_MIN,
    MIN_MOVE_SPEED, YAW_TIE_EPSILON, Y_POS_OFFSET,
};
use crate::track::{BlockPos, Direction};
use std::sync::LazyLock;

/// Geometry of a flat rail, straight or curved, for one direction.
///
/// Straight rails move along their own axis. A curve keyed by diagonal `d`
/// joins the two faces that compose `d`; carts follow the chord between
/// the midpoints of those two cell edges.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HorizontalRail {
    /// Travel heading along `(dx, dz)`.
    pub heading: Direction,
    pub curved: bool,
    along_x: bool,
    along_z: bool,
    pub dx: f64,
    pub dz: f64,
    start_x: f64,
    start_z: f64,
    /// Faces the rail connects.
    pub faces: [Direction; 2],
}

static HORIZONTAL_RAILS: LazyLock<[HorizontalRail; 8]> = LazyLock::new(|| {
    std::array::from_fn(|notch| HorizontalRail::new(Direction::from_notch(notch)))
});

impl HorizontalRail {
    fn new(direction: Direction) -> Self {
        match direction.components() {
            Some((x_face, z_face)) => {
                // Chord runs from the Z-face edge midpoint to the X-face edge midpoint.
                let dx = 0.5 * direction.mod_x() as f64;
                let dz = -0.5 * direction.mod_z() as f64;
                let heading = Direction::from_xz(direction.mod_x(), -direction.mod_z())
                    .unwrap_or(direction);
                Self {
                    heading,
                    curved: true,
                    along_x: false,
                    along_z: false,
                    dx,
                    dz,
                    start_x: 0.0,
                    start_z: 0.5 * z_face.mod_z() as f64,
                    faces: [z_face, x_face],
                }
            }
            None => Self {
                heading: direction,
                curved: false,
                along_x: direction.is_along_x(),
                along_z: direction.is_along_z(),
                dx: direction.mod_x() as f64,
                dz: direction.mod_z() as f64,
                start_x: 0.0,
                start_z: 0.0,
                faces: [direction, direction.opposite()],
            },
        }
    }

    /// Pre-built rail geometry for a horizontal direction.
    pub fn get(direction: Direction) -> &'static HorizontalRail {
        let notch = direction.notch_index().unwrap_or(0);
        &HORIZONTAL_RAILS[notch]
    }

    /// Position snapped onto the rail centerline of `block`, at flat-rail height.
    pub fn fixed_position(&self, position: Vec3, block: BlockPos) -> Vec3 {
        let mut x = block.mid_x() + self.start_x;
        let mut z = block.mid_z() + self.start_z;
        if self.along_z {
            z = position.z;
        } else if self.along_x {
            x = position.x;
        } else {
            let t = 2.0 * (self.dx * (position.x - x) + self.dz * (position.z - z));
            let t = t.clamp(CURVE_T_MIN, CURVE_T_MAX);
            x += t * self.dx;
            z += t * self.dz;
        }
        Vec3::new(x, block.y as f64 + Y_POS_OFFSET, z)
    }

    /// Whether the cart travels against the step vector this tick.
    pub fn is_inverted(&self, cart: &CartMotionState) -> bool {
        let velocity_against = cart.velocity.horizontal_dot(self.dx, self.dz) < 0.0;
        if !self.curved {
            return velocity_against;
        }
        // On curves the previous heading decides: exiting through either
        // face behind the step means moving against it.
        let from = cart.direction_from;
        let from_dot = from.mod_x() as f64 * self.dx + from.mod_z() as f64 * self.dz;
        if from_dot != 0.0 {
            from_dot < 0.0
        } else {
            velocity_against
        }
    }

    /// Replaces the horizontal velocity with one exactly along the rail,
    /// keeping its magnitude. Vertical velocity is dropped.
    pub fn snap_velocity(&self, cart: &mut CartMotionState) {
        let invert = self.is_inverted(cart);
        let mut factor = normalize_factor(self.dx, self.dz, cart.velocity.x, cart.velocity.z);
        if invert {
            factor = -factor;
        }
        cart.velocity = Vec3::new(factor * self.dx, 0.0, factor * self.dz);
    }

    /// Speed component off the rail axis, vertical included.
    pub fn off_axis_speed(&self, velocity: Vec3) -> f64 {
        let len = (self.dx * self.dx + self.dz * self.dz).sqrt();
        ((velocity.x * self.dz - velocity.z * self.dx) / len).abs() + velocity.y.abs()
    }

    pub fn pre_move(&self, cart: &mut CartMotionState) {
        self.snap_velocity(cart);
        cart.position = self.fixed_position(cart.position, cart.rail_block);
    }

    pub fn post_move(&self, cart: &mut CartMotionState) {
        cart.position.y = self.fixed_position(cart.position, cart.rail_block).y;
    }

    /// Which of the two headings along this rail the cart is moving in.
    pub fn movement_direction(
        &self,
        cart: &CartMotionState,
        movement: Vec3,
        sloped: bool,
    ) -> Direction {
        let forward = self.heading;
        let backward = forward.opposite();

        if sloped
            && movement.horizontal_length() < MIN_MOVE_SPEED
            && movement.y.abs() >= MIN_MOVE_SPEED
        {
            return if movement.y > 0.0 { forward } else { backward };
        }

        let axis_aligned = movement.x.abs() < MIN_MOVE_SPEED || movement.z.abs() < MIN_MOVE_SPEED;
        let reference = if axis_aligned || self.faces.contains(&cart.direction_from) {
            movement
        } else {
            cart.velocity
        };
        pick_heading(forward, backward, vector_yaw(reference.x, reference.z), cart.direction_from)
    }
}

/// Picks `forward` or `backward` by yaw distance to `yaw`.
///
/// Ties, and motion without a heading, are settled by the previous heading
/// so that carts do not flip back and forth at symmetric junctions.
pub(crate) fn pick_heading(
    forward: Direction,
    backward: Direction,
    yaw: Option<f64>,
    direction_from: Direction,
) -> Direction {
    if let (Some(yaw), Some(fwd), Some(bwd)) = (yaw, forward.yaw(), backward.yaw()) {
        let to_forward = yaw_difference(yaw, fwd);
        let to_backward = yaw_difference(yaw, bwd);
        if (to_forward - to_backward).abs() > YAW_TIE_EPSILON {
            return if to_forward < to_backward { forward } else { backward };
        }
    }
    match (direction_from.yaw(), forward.yaw(), backward.yaw()) {
        (Some(from), Some(fwd), Some(bwd))
            if yaw_difference(from, bwd) < yaw_difference(from, fwd) =>
        {
            backward
        }
        _ => forward,
    }
}
