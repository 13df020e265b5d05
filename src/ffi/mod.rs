//! Single-call FFI for railengine.
//!
//! Functions:
//! - `rail_select` - rail logic a cart would use over one track cell
//! - `rail_step` - one full tick of a single cart over one track cell
//!
//! Directions are passed as codes: `0..=7` the compass notches starting at
//! north and turning clockwise, `8` up, `9` down, `255` none.
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Invalid direction code
//! - `-3`: Invalid parameters or non-finite cart state
//! - `-5`: Invalid track orientation

use crate::cart::{CartGroup, CartMotionState};
use crate::driver::Train;
use crate::logic::{classify, RailLogicKind};
use crate::sim::{PhysicsParams, Vec3};
use crate::track::{BlockPos, Direction, OrientationLookup, TrackOrientation};

pub const RAIL_KIND_AIR: u8 = 0;
pub const RAIL_KIND_GROUND: u8 = 1;
pub const RAIL_KIND_HORIZONTAL: u8 = 2;
pub const RAIL_KIND_SLOPED: u8 = 3;
pub const RAIL_KIND_VERTICAL: u8 = 4;
pub const RAIL_KIND_SLOPE_TO_VERTICAL: u8 = 5;
pub const RAIL_KIND_UPSIDE_DOWN_SLOPED: u8 = 6;

pub const RAIL_DIRECTION_NONE: u8 = 255;

/// Cart motion state as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RailCart {
    pub position: Vec3,
    pub velocity: Vec3,
    pub last_position: Vec3,
    pub rail_block: BlockPos,
    pub derailed: u8,
    pub flying: u8,
    pub direction_from: u8,
}

/// Track in a single cell.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RailTrack {
    pub block: BlockPos,
    pub direction: u8,
    pub curved: u8,
    pub sloped: u8,
    pub vertical: u8,
    /// Facing of a vertical rail above a slope, or `RAIL_DIRECTION_NONE`.
    pub vertical_above_facing: u8,
    pub upside_down: u8,
}

/// Lookup over a single optional track cell.
struct SingleCell(Option<TrackOrientation>);

impl OrientationLookup for SingleCell {
    fn orientation_at(&self, position: Vec3) -> Option<TrackOrientation> {
        let track = self.0?;
        let cell = BlockPos::containing(position);
        let above_slope = track.sloped && cell == track.block.offset(Direction::Up);
        (cell == track.block || above_slope).then_some(track)
    }
}

/// Select the rail logic for a cart.
///
/// `track` may be null (no track). Writes the kind code to `out_kind` and the
/// kind's direction code to `out_direction`.
///
/// # Safety
///
/// - `cart` must point to a valid `RailCart`
/// - `track` must be null or point to a valid `RailTrack`
/// - `out_kind` and `out_direction` must be valid for writes
#[no_mangle]
pub unsafe extern "C" fn rail_select(
    cart: *const RailCart,
    track: *const RailTrack,
    out_kind: *mut u8,
    out_direction: *mut u8,
) -> i32 {
    if cart.is_null() || out_kind.is_null() || out_direction.is_null() {
        return -1;
    }
    let state = match read_cart(&*cart) {
        Some(state) => state,
        None => return -2,
    };
    let orientation = match read_track(track.as_ref()) {
        Ok(orientation) => orientation,
        Err(code) => return code,
    };

    let kind = classify(&state, orientation.as_ref());
    let (kind_code, direction) = kind_codes(kind);
    *out_kind = kind_code;
    *out_direction = direction;
    0
}

/// Advance a single cart by one tick.
///
/// `track` may be null (no track); `params` may be null (defaults).
/// `out_kind` may be null; when set it receives the kind code used.
///
/// # Safety
///
/// - `cart` must point to a valid, writable `RailCart`
/// - `track` must be null or point to a valid `RailTrack`
/// - `params` must be null or point to a valid `PhysicsParams`
/// - `out_kind` must be null or valid for writes
#[no_mangle]
pub unsafe extern "C" fn rail_step(
    cart: *mut RailCart,
    track: *const RailTrack,
    params: *const PhysicsParams,
    slowing_down: u8,
    out_kind: *mut u8,
) -> i32 {
    if cart.is_null() {
        return -1;
    }
    let cart = &mut *cart;
    let state = match read_cart(cart) {
        Some(state) => state,
        None => return -2,
    };
    let orientation = match read_track(track.as_ref()) {
        Ok(orientation) => orientation,
        Err(code) => return code,
    };
    let params = params.as_ref().copied().unwrap_or_default();

    let mut train = match Train::new(vec![state], params) {
        Ok(train) => train.with_group(CartGroup::new(slowing_down != 0)),
        Err(_) => return -3,
    };
    let report = train.tick(&SingleCell(orientation));

    write_cart(cart, train.head());
    if !out_kind.is_null() {
        if let Some(kind) = report.kinds.first() {
            *out_kind = kind_codes(*kind).0;
        }
    }
    0
}

// --- Helpers ---

fn direction_from_code(code: u8) -> Option<Direction> {
    match code {
        0..=7 => Some(Direction::from_notch(code as usize)),
        8 => Some(Direction::Up),
        9 => Some(Direction::Down),
        _ => None,
    }
}

fn direction_code(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 8,
        Direction::Down => 9,
        other => other.notch_index().map_or(RAIL_DIRECTION_NONE, |notch| notch as u8),
    }
}

fn kind_codes(kind: RailLogicKind) -> (u8, u8) {
    let code = match kind {
        RailLogicKind::Air => RAIL_KIND_AIR,
        RailLogicKind::Ground => RAIL_KIND_GROUND,
        RailLogicKind::Horizontal(_) => RAIL_KIND_HORIZONTAL,
        RailLogicKind::Sloped(_) => RAIL_KIND_SLOPED,
        RailLogicKind::UpsideDownSloped(_) => RAIL_KIND_UPSIDE_DOWN_SLOPED,
        RailLogicKind::Vertical(_) => RAIL_KIND_VERTICAL,
        RailLogicKind::SlopeToVertical(_) => RAIL_KIND_SLOPE_TO_VERTICAL,
    };
    let direction = kind.direction().map_or(RAIL_DIRECTION_NONE, direction_code);
    (code, direction)
}

fn read_cart(cart: &RailCart) -> Option<CartMotionState> {
    Some(CartMotionState {
        position: cart.position,
        velocity: cart.velocity,
        last_position: cart.last_position,
        rail_block: cart.rail_block,
        derailed: cart.derailed != 0,
        flying: cart.flying != 0,
        direction_from: direction_from_code(cart.direction_from)?,
    })
}

fn write_cart(out: &mut RailCart, state: &CartMotionState) {
    out.position = state.position;
    out.velocity = state.velocity;
    out.last_position = state.last_position;
    out.rail_block = state.rail_block;
    out.derailed = state.derailed as u8;
    out.flying = state.flying as u8;
    out.direction_from = direction_code(state.direction_from);
}

fn read_track(track: Option<&RailTrack>) -> Result<Option<TrackOrientation>, i32> {
    let Some(track) = track else {
        return Ok(None);
    };
    let horizontal = direction_from_code(track.direction).ok_or(-2)?;
    let vertical_above_facing = match track.vertical_above_facing {
        RAIL_DIRECTION_NONE => None,
        code => Some(direction_from_code(code).ok_or(-2)?),
    };
    let orientation = TrackOrientation {
        block: track.block,
        horizontal,
        curved: track.curved != 0,
        sloped: track.sloped != 0,
        vertical: track.vertical != 0,
        vertical_above_slope: vertical_above_facing.is_some(),
        vertical_above_facing,
        upside_down: track.upside_down != 0,
    };
    orientation.validate().map_err(|_| -5)?;
    Ok(Some(orientation))
}
