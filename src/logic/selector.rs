use super::RailLogicKind;
use crate::cart::CartMotionState;
use crate::track::{OrientationLookup, TrackOrientation};
use tracing::warn;

/// Chooses the rail logic governing `cart` this tick.
pub fn select(cart: &CartMotionState, lookup: &dyn OrientationLookup) -> RailLogicKind {
    if cart.derailed {
        return derailed_kind(cart);
    }
    let orientation = lookup.orientation_at(cart.position);
    classify(cart, orientation.as_ref())
}

/// Selection against an already resolved orientation.
///
/// Missing or malformed geometry under a railed cart falls back to `Ground`.
pub fn classify(cart: &CartMotionState, orientation: Option<&TrackOrientation>) -> RailLogicKind {
    if cart.derailed {
        return derailed_kind(cart);
    }
    let Some(orientation) = orientation else {
        warn!(position = ?cart.position, "railed cart has no track beneath it");
        return RailLogicKind::Ground;
    };
    if let Err(err) = orientation.validate() {
        warn!(block = ?orientation.block, %err, "ignoring invalid track orientation");
        return RailLogicKind::Ground;
    }

    let direction = orientation.horizontal;
    if orientation.leads_into_vertical() {
        RailLogicKind::SlopeToVertical(direction)
    } else if orientation.vertical {
        RailLogicKind::Vertical(direction)
    } else if cart.velocity.y > 0.0 {
        // Launched upwards off the rail
        RailLogicKind::Air
    } else if orientation.sloped && orientation.upside_down {
        RailLogicKind::UpsideDownSloped(direction)
    } else if orientation.sloped {
        RailLogicKind::Sloped(direction)
    } else {
        RailLogicKind::Horizontal(direction)
    }
}

fn derailed_kind(cart: &CartMotionState) -> RailLogicKind {
    if cart.flying {
        RailLogicKind::Air
    } else {
        RailLogicKind::Ground
    }
}
