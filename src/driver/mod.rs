//! Reference tick driver.
//!
//! Runs one fixed step for a train of carts: rail state detection,
//! selection, `pre_move`, the shared force limit, generic integration,
//! `post_move` and the heading update. Hosts with their own entity loop
//! can follow the same order.

use crate::cart::{CartGroup, CartMotionState};
use crate::error::EngineError;
use crate::logic::{classify, select, RailLogicKind, TickContext};
use crate::sim::{PhysicsParams, Vec3};
use crate::track::{BlockPos, Direction, OrientationLookup};
use tracing::{debug, error, trace};

/// Outcome of one tick, indexed like the train's carts.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub kinds: Vec<RailLogicKind>,
    /// Speed limit the group ran under, if a cart was blocked.
    pub forward_force: Option<f64>,
}

/// Carts moving as one group. `carts[0]` is the head.
#[derive(Debug)]
pub struct Train {
    pub group: CartGroup,
    carts: Vec<CartMotionState>,
    params: PhysicsParams,
}

impl Train {
    pub fn new(carts: Vec<CartMotionState>, params: PhysicsParams) -> Result<Self, EngineError> {
        params.validate()?;
        if carts.is_empty() {
            return Err(EngineError::EmptyGroup);
        }
        for cart in &carts {
            cart.validate()?;
        }
        Ok(Self {
            group: CartGroup::default(),
            carts,
            params,
        })
    }

    pub fn with_group(mut self, group: CartGroup) -> Self {
        self.group = group;
        self
    }

    pub fn carts(&self) -> &[CartMotionState] {
        &self.carts
    }

    pub fn carts_mut(&mut self) -> &mut [CartMotionState] {
        &mut self.carts
    }

    pub fn head(&self) -> &CartMotionState {
        &self.carts[0]
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Sets every cart's speed along its heading, as a launcher would.
    pub fn set_forward_velocity(&mut self, world: &dyn OrientationLookup, force: f64) {
        for cart in &mut self.carts {
            select(cart, world).set_forward_velocity(cart, force);
        }
    }

    /// Advances every cart by one step.
    pub fn tick(&mut self, world: &dyn OrientationLookup) -> TickReport {
        self.group.begin_tick(self.carts.first());
        let mut kinds = vec![RailLogicKind::Ground; self.carts.len()];

        // Tail first, so a blocked cart anywhere limits the carts after it
        for index in (0..self.carts.len()).rev() {
            let cart = &mut self.carts[index];
            let orientation = world.orientation_at(cart.position);
            match orientation {
                Some(track) => {
                    if cart.derailed {
                        debug!(cart = index, block = ?track.block, "cart re-railed");
                    }
                    cart.derailed = false;
                    cart.flying = false;
                    cart.rail_block = track.block;
                }
                None => {
                    if !cart.derailed {
                        debug!(cart = index, position = ?cart.position, "cart derailed");
                    }
                    let below = BlockPos::containing(cart.position).offset(Direction::Down);
                    cart.derailed = true;
                    cart.flying = !world.is_solid(below);
                }
            }

            let kind = classify(cart, orientation.as_ref());
            trace!(cart = index, %kind, "selected rail logic");
            let ctx = TickContext {
                world,
                params: &self.params,
                group: &self.group,
                is_head: index == 0,
            };
            kind.pre_move(cart, &ctx);
            kinds[index] = kind;
        }

        // Carts moved before the blocker was found
        if let Some(limit) = self.group.forward_force() {
            for cart in &mut self.carts {
                cart.limit_speed(limit);
            }
        }

        for (index, (cart, kind)) in self.carts.iter_mut().zip(&kinds).enumerate() {
            cart.velocity.y -= kind.gravity_multiplier(&self.params, &self.group);
            if *kind == RailLogicKind::Ground && cart.velocity.y < 0.0 {
                cart.velocity.y = 0.0;
            }
            cart.limit_speed(self.params.max_speed);
            cart.position += cart.velocity;

            let ctx = TickContext {
                world,
                params: &self.params,
                group: &self.group,
                is_head: index == 0,
            };
            kind.post_move(cart, &ctx);
            let movement = cart.position - cart.last_position;
            cart.direction_from = kind.movement_direction(cart, movement);

            if let Err(err) = cart.validate() {
                error!(cart = index, %err, "resetting cart with non-finite state");
                cart.velocity = Vec3::ZERO;
                cart.position = if cart.last_position.is_finite() {
                    cart.last_position
                } else {
                    cart.rail_block.center()
                };
            }
        }

        TickReport {
            kinds,
            forward_force: self.group.forward_force(),
        }
    }
}
