//! RailEngine - rail-following physics for carts moving along a voxel track network.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Numeric primitives (Vec3, physics constants, PhysicsParams)
//! - **track**: Compass directions, block cells, track orientation lookup
//! - **cart**: Per-cart motion state and the shared train group aggregate
//! - **logic**: Rail logic selection and the per-variant pre/post move physics
//! - **driver**: Reference tick driver for a train of carts
//! - **ffi**: C FFI bindings
//!
//! # Usage
//!
//! ```ignore
//! use railengine::{logic::select, CartMotionState, OrientationLookup};
//!
//! let kind = select(&cart, &world);
//! kind.pre_move(&mut cart, &ctx);
//! // integrate gravity and velocity
//! kind.post_move(&mut cart, &ctx);
//! ```
//!
//! Native hosts build with the `ffi` feature, link the cdylib and call the
//! `rail_*` functions.

pub mod cart;
pub mod driver;
pub mod error;
pub mod logic;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use cart::{CartGroup, CartMotionState};
pub use driver::{TickReport, Train};
pub use error::EngineError;
pub use logic::{RailLogicKind, TickContext};
pub use sim::{PhysicsParams, Vec3};
pub use track::{BlockPos, Direction, OrientationLookup, TrackOrientation};
