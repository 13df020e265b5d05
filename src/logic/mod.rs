//! Rail logic: the per-tick state machine moving carts along track.
//!
//! A cart's geometry is classified into a [`RailLogicKind`] by [`select`],
//! then the kind's `pre_move` snaps velocity and position onto the rail,
//! the driver integrates, and `post_move` re-snaps and detects hand-offs
//! between cells and variants.

mod derailed;
mod horizontal;
mod selector;
mod slope_vertical;
mod sloped;
mod vertical;

pub use selector::{classify, select};
pub use slope_vertical::transition_factor;

use crate::cart::{CartGroup, CartMotionState};
use crate::sim::{PhysicsParams, Vec3, EPSILON};
use crate::track::{Direction, OrientationLookup};
use horizontal::HorizontalRail;
use sloped::SlopeSurface;
use std::fmt;
use tracing::error;

/// Motion rules for one class of track geometry.
///
/// Kinds are plain values: `Copy`, immutable and shared by every cart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RailLogicKind {
    /// Derailed and airborne.
    Air,
    /// Derailed, resting on or sliding along a solid surface.
    Ground,
    /// Flat straight or curved rail.
    Horizontal(Direction),
    /// Slope rising towards the payload direction.
    Sloped(Direction),
    /// Slope hanging from a ceiling, the cart riding beneath it.
    UpsideDownSloped(Direction),
    /// Vertical rail with the given facing.
    Vertical(Direction),
    /// Slope rising into a vertical rail; only governs the hand-off tick.
    SlopeToVertical(Direction),
}

/// Everything a rail logic reads besides the cart itself.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub world: &'a dyn OrientationLookup,
    pub params: &'a PhysicsParams,
    pub group: &'a CartGroup,
    /// The cart being moved leads its group.
    pub is_head: bool,
}

impl RailLogicKind {
    /// Every distinct kind: derailed states, 8 flat rails and 4 of each
    /// axis-aligned variant.
    pub const ALL: [RailLogicKind; 26] = {
        use Direction::*;
        use RailLogicKind::*;
        [
            Air,
            Ground,
            Horizontal(North),
            Horizontal(NorthEast),
            Horizontal(East),
            Horizontal(SouthEast),
            Horizontal(South),
            Horizontal(SouthWest),
            Horizontal(West),
            Horizontal(NorthWest),
            Sloped(North),
            Sloped(East),
            Sloped(South),
            Sloped(West),
            UpsideDownSloped(North),
            UpsideDownSloped(East),
            UpsideDownSloped(South),
            UpsideDownSloped(West),
            Vertical(North),
            Vertical(East),
            Vertical(South),
            Vertical(West),
            SlopeToVertical(North),
            SlopeToVertical(East),
            SlopeToVertical(South),
            SlopeToVertical(West),
        ]
    };

    pub fn direction(self) -> Option<Direction> {
        match self {
            RailLogicKind::Air | RailLogicKind::Ground => None,
            RailLogicKind::Horizontal(d)
            | RailLogicKind::Sloped(d)
            | RailLogicKind::UpsideDownSloped(d)
            | RailLogicKind::Vertical(d)
            | RailLogicKind::SlopeToVertical(d) => Some(d),
        }
    }

    pub fn is_derailed(self) -> bool {
        matches!(self, RailLogicKind::Air | RailLogicKind::Ground)
    }

    pub fn is_sloped(self) -> bool {
        matches!(
            self,
            RailLogicKind::Sloped(_)
                | RailLogicKind::UpsideDownSloped(_)
                | RailLogicKind::SlopeToVertical(_)
        )
    }

    /// Whether the cart hangs below its rail.
    pub fn is_upside_down(self) -> bool {
        matches!(self, RailLogicKind::UpsideDownSloped(_))
    }

    /// Downward acceleration the driver applies while this kind is active.
    pub fn gravity_multiplier(self, params: &PhysicsParams, group: &CartGroup) -> f64 {
        match self {
            RailLogicKind::Air | RailLogicKind::Ground => params.gravity_multiplier,
            RailLogicKind::Horizontal(_) => 0.0,
            RailLogicKind::Sloped(_)
            | RailLogicKind::UpsideDownSloped(_)
            | RailLogicKind::SlopeToVertical(_) => params.gravity_multiplier_railed,
            RailLogicKind::Vertical(_) => {
                if group.slowing_down {
                    params.gravity_multiplier_railed
                } else {
                    0.0
                }
            }
        }
    }

    /// Snaps velocity and position onto the track before integration.
    ///
    /// Afterwards the velocity lies on the kind's permitted axis and the
    /// speed respects the group's forward-force limit.
    pub fn pre_move(self, cart: &mut CartMotionState, ctx: &TickContext<'_>) {
        match self {
            RailLogicKind::Air => derailed::air_pre_move(cart, ctx),
            RailLogicKind::Ground => derailed::ground_pre_move(cart, ctx),
            RailLogicKind::Horizontal(d) => HorizontalRail::get(d).pre_move(cart),
            RailLogicKind::Sloped(d) => sloped::pre_move(d, SlopeSurface::Regular, cart, ctx),
            RailLogicKind::UpsideDownSloped(d) => {
                sloped::pre_move(d, SlopeSurface::UpsideDown, cart, ctx)
            }
            RailLogicKind::Vertical(_) => vertical::pre_move(cart),
            RailLogicKind::SlopeToVertical(d) => slope_vertical::pre_move(d, cart, ctx),
        }
        self.constrain_velocity(cart);
        if let Some(limit) = ctx.group.forward_force() {
            cart.limit_speed(limit);
        }
        cart.last_position = cart.position;
    }

    /// Re-snaps after integration and moves the cart between cells.
    pub fn post_move(self, cart: &mut CartMotionState, ctx: &TickContext<'_>) {
        match self {
            RailLogicKind::Air | RailLogicKind::Ground => {}
            RailLogicKind::Horizontal(d) => HorizontalRail::get(d).post_move(cart),
            RailLogicKind::Sloped(d) => sloped::post_move(d, SlopeSurface::Regular, cart, ctx),
            RailLogicKind::UpsideDownSloped(d) => {
                sloped::post_move(d, SlopeSurface::UpsideDown, cart, ctx)
            }
            RailLogicKind::Vertical(_) => vertical::post_move(cart),
            RailLogicKind::SlopeToVertical(d) => slope_vertical::post_move(d, cart, ctx),
        }
    }

    /// Heading of the cart given this tick's displacement.
    pub fn movement_direction(self, cart: &CartMotionState, movement: Vec3) -> Direction {
        match self {
            RailLogicKind::Air | RailLogicKind::Ground => derailed::movement_direction(cart),
            RailLogicKind::Horizontal(d) => {
                HorizontalRail::get(d).movement_direction(cart, movement, false)
            }
            RailLogicKind::Sloped(d) | RailLogicKind::UpsideDownSloped(d) => {
                HorizontalRail::get(d).movement_direction(cart, movement, true)
            }
            RailLogicKind::Vertical(_) => vertical::movement_direction(cart, movement),
            RailLogicKind::SlopeToVertical(d) => {
                slope_vertical::movement_direction(d, cart, movement)
            }
        }
    }

    /// Signed speed along the cart's heading.
    pub fn forward_velocity(self, cart: &CartMotionState) -> f64 {
        if let RailLogicKind::Vertical(_) = self {
            return cart.velocity.y * vertical_sign(cart.direction_from);
        }
        let heading = cart.direction_from.to_vector();
        cart.velocity.dot(heading) / heading.length()
    }

    /// Replaces the velocity with `force` along the cart's heading.
    pub fn set_forward_velocity(self, cart: &mut CartMotionState, force: f64) {
        let heading = cart.direction_from;
        cart.velocity = match self {
            RailLogicKind::Vertical(_) => Vec3::new(0.0, force * vertical_sign(heading), 0.0),
            _ if heading.is_along_y() => Vec3::new(0.0, force * heading.mod_y() as f64, 0.0),
            _ => {
                let step = heading.to_vector();
                step * (force / step.horizontal_length())
            }
        };
    }

    /// Projects velocity back onto the permitted axis if a variant left it off.
    fn constrain_velocity(self, cart: &mut CartMotionState) {
        let off_axis = match self {
            RailLogicKind::Air | RailLogicKind::Ground => return,
            RailLogicKind::Vertical(_) => cart.velocity.horizontal_length(),
            RailLogicKind::Horizontal(d)
            | RailLogicKind::Sloped(d)
            | RailLogicKind::UpsideDownSloped(d)
            | RailLogicKind::SlopeToVertical(d) => {
                HorizontalRail::get(d).off_axis_speed(cart.velocity)
            }
        };
        if off_axis <= EPSILON {
            return;
        }
        error!(kind = %self, off_axis, "velocity left rail axis after pre_move");
        debug_assert!(off_axis <= EPSILON, "{self} left velocity {off_axis} off its axis");
        match self.direction() {
            Some(d) if !matches!(self, RailLogicKind::Vertical(_)) => {
                HorizontalRail::get(d).snap_velocity(cart)
            }
            _ => {
                cart.velocity.x = 0.0;
                cart.velocity.z = 0.0;
            }
        }
    }
}

fn vertical_sign(heading: Direction) -> f64 {
    if heading == Direction::Down {
        -1.0
    } else {
        1.0
    }
}

impl fmt::Display for RailLogicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailLogicKind::Air => write!(f, "Air"),
            RailLogicKind::Ground => write!(f, "Ground"),
            RailLogicKind::Horizontal(d) => write!(f, "Horizontal@{d}"),
            RailLogicKind::Sloped(d) => write!(f, "Sloped@{d}"),
            RailLogicKind::UpsideDownSloped(d) => write!(f, "UpsideDownSloped@{d}"),
            RailLogicKind::Vertical(d) => write!(f, "Vertical@{d}"),
            RailLogicKind::SlopeToVertical(d) => write!(f, "SlopeToVertical@{d}"),
        }
    }
}
