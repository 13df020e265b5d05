//! Track geometry as seen by the physics engine.
//!
//! The world collaborator resolves a cart position into a
//! [`TrackOrientation`]; everything here is plain data plus the
//! [`OrientationLookup`] seam.

mod block;
mod direction;
mod orientation;

#[cfg(test)]
mod test_world;

pub use block::BlockPos;
pub use direction::Direction;
pub use orientation::{OrientationLookup, TrackOrientation};

#[cfg(test)]
pub(crate) use test_world::TestWorld;
