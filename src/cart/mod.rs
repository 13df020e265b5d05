//! Cart motion state and the train group aggregate.

mod group;
mod state;

pub use group::CartGroup;
pub use state::CartMotionState;
