use super::state::CartMotionState;
use std::cell::Cell;

/// Train-level aggregate shared by all carts of one group.
///
/// The forward-force limit is the only cross-cart mutable state during a
/// tick. It lives in a `Cell` so carts can write it through the shared
/// borrow they get in their tick context.
#[derive(Debug)]
pub struct CartGroup {
    /// Gravity slow-down mode: slopes decelerate and vertical rails honor gravity.
    pub slowing_down: bool,
    /// Movement is driven externally (launchers, stations).
    pub movement_controlled: bool,
    forward_force: Cell<Option<f64>>,
    head_vertical_only: Cell<bool>,
}

impl CartGroup {
    pub fn new(slowing_down: bool) -> Self {
        Self {
            slowing_down,
            movement_controlled: false,
            forward_force: Cell::new(None),
            head_vertical_only: Cell::new(false),
        }
    }

    /// Clears the per-tick state and records the head cart's motion.
    pub fn begin_tick(&self, head: Option<&CartMotionState>) {
        self.forward_force.set(None);
        self.head_vertical_only
            .set(head.is_some_and(CartMotionState::is_moving_vertical_only));
    }

    /// Limits the speed of every cart in the group for this tick.
    ///
    /// Several writers keep the tightest limit.
    pub fn clamp_forward_force(&self, force: f64) {
        let force = force.max(0.0);
        let next = match self.forward_force.get() {
            Some(current) => current.min(force),
            None => force,
        };
        self.forward_force.set(Some(next));
    }

    pub fn forward_force(&self) -> Option<f64> {
        self.forward_force.get()
    }

    pub fn head_moving_vertical_only(&self) -> bool {
        self.head_vertical_only.get()
    }
}

impl Default for CartGroup {
    fn default() -> Self {
        Self::new(true)
    }
}
