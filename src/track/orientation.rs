use super::block::BlockPos;
use super::direction::Direction;
use crate::error::EngineError;
use crate::sim::Vec3;
use serde::{Deserialize, Serialize};

/// Read-only description of the track in one cell.
///
/// For straight, sloped and vertical track `horizontal` is the axis
/// direction (for slopes: the rising direction, for vertical rails: the
/// facing). For curves it is the diagonal naming the two faces the curve
/// connects, e.g. `NorthEast` joins the north and east edges.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackOrientation {
    pub block: BlockPos,
    pub horizontal: Direction,
    pub curved: bool,
    pub sloped: bool,
    pub vertical: bool,
    /// A vertical rail continues directly above this slope.
    pub vertical_above_slope: bool,
    /// Facing of that vertical rail, when present.
    pub vertical_above_facing: Option<Direction>,
    /// Slope hangs from the ceiling of its cell.
    #[serde(default)]
    pub upside_down: bool,
}

impl TrackOrientation {
    const fn base(block: BlockPos, horizontal: Direction) -> Self {
        Self {
            block,
            horizontal,
            curved: false,
            sloped: false,
            vertical: false,
            vertical_above_slope: false,
            vertical_above_facing: None,
            upside_down: false,
        }
    }

    pub const fn straight(block: BlockPos, direction: Direction) -> Self {
        Self::base(block, direction)
    }

    pub const fn curve(block: BlockPos, faces: Direction) -> Self {
        let mut o = Self::base(block, faces);
        o.curved = true;
        o
    }

    pub const fn slope(block: BlockPos, rising: Direction) -> Self {
        let mut o = Self::base(block, rising);
        o.sloped = true;
        o
    }

    pub const fn vertical(block: BlockPos, facing: Direction) -> Self {
        let mut o = Self::base(block, facing);
        o.vertical = true;
        o
    }

    /// Slope mounted under a ceiling, carts riding below it.
    pub const fn upside_down_slope(block: BlockPos, rising: Direction) -> Self {
        let mut o = Self::slope(block, rising);
        o.upside_down = true;
        o
    }

    /// Marks a vertical rail with the given facing directly above this slope.
    pub const fn with_vertical_above(mut self, facing: Direction) -> Self {
        self.vertical_above_slope = true;
        self.vertical_above_facing = Some(facing);
        self
    }

    /// Whether a vertical rail above continues the slope's rise.
    pub fn leads_into_vertical(&self) -> bool {
        self.sloped
            && self.vertical_above_slope
            && self.vertical_above_facing == Some(self.horizontal)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.horizontal.is_horizontal() {
            return Err(EngineError::InvalidOrientation {
                reason: "track direction must be horizontal",
            });
        }
        if self.sloped && self.vertical {
            return Err(EngineError::InvalidOrientation {
                reason: "track cannot be both sloped and vertical",
            });
        }
        if self.curved != self.horizontal.is_diagonal() {
            return Err(EngineError::InvalidOrientation {
                reason: "curved track must use a diagonal direction",
            });
        }
        if self.curved && (self.sloped || self.vertical) {
            return Err(EngineError::InvalidOrientation {
                reason: "curves cannot be sloped or vertical",
            });
        }
        if self.vertical_above_slope && !self.sloped {
            return Err(EngineError::InvalidOrientation {
                reason: "vertical-above flag requires a slope",
            });
        }
        if self.upside_down && !self.sloped {
            return Err(EngineError::InvalidOrientation {
                reason: "only slopes can be upside-down",
            });
        }
        Ok(())
    }
}

/// World collaborator resolving track geometry and solid cells.
pub trait OrientationLookup {
    /// Track the cart at `position` rides on, if any.
    fn orientation_at(&self, position: Vec3) -> Option<TrackOrientation>;

    /// Whether a cell blocks cart movement.
    fn is_solid(&self, _block: BlockPos) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: BlockPos = BlockPos::new(0, 0, 0);

    #[test]
    fn constructors_are_valid() {
        for dir in Direction::AXIS_ALIGNED {
            assert!(TrackOrientation::straight(ORIGIN, dir).validate().is_ok());
            assert!(TrackOrientation::slope(ORIGIN, dir).validate().is_ok());
            assert!(TrackOrientation::upside_down_slope(ORIGIN, dir).validate().is_ok());
            assert!(TrackOrientation::vertical(ORIGIN, dir).validate().is_ok());
        }
        assert!(TrackOrientation::curve(ORIGIN, Direction::NorthEast)
            .validate()
            .is_ok());
    }

    #[test]
    fn sloped_and_vertical_are_exclusive() {
        let mut o = TrackOrientation::slope(ORIGIN, Direction::East);
        o.vertical = true;
        assert!(o.validate().is_err());
    }

    #[test]
    fn slope_on_diagonal_rejected() {
        let o = TrackOrientation::slope(ORIGIN, Direction::NorthEast);
        assert!(o.validate().is_err());
    }

    #[test]
    fn curve_on_axis_rejected() {
        let o = TrackOrientation::curve(ORIGIN, Direction::North);
        assert!(o.validate().is_err());
    }

    #[test]
    fn up_is_not_a_track_direction() {
        let o = TrackOrientation::straight(ORIGIN, Direction::Up);
        assert!(o.validate().is_err());
    }

    #[test]
    fn leads_into_vertical_requires_matching_facing() {
        let matching =
            TrackOrientation::slope(ORIGIN, Direction::East).with_vertical_above(Direction::East);
        let other =
            TrackOrientation::slope(ORIGIN, Direction::East).with_vertical_above(Direction::North);
        assert!(matching.leads_into_vertical());
        assert!(!other.leads_into_vertical());
        assert!(!TrackOrientation::slope(ORIGIN, Direction::East).leads_into_vertical());
    }

    #[test]
    fn upside_down_requires_slope() {
        let mut o = TrackOrientation::straight(ORIGIN, Direction::East);
        o.upside_down = true;
        assert!(o.validate().is_err());
    }

    #[test]
    fn upside_down_defaults_off_when_absent() {
        let json = r#"{
            "block": { "x": 1, "y": 2, "z": 3 },
            "horizontal": "East",
            "curved": false,
            "sloped": true,
            "vertical": false,
            "vertical_above_slope": false,
            "vertical_above_facing": null
        }"#;
        let o: TrackOrientation = serde_json::from_str(json).unwrap();
        assert!(!o.upside_down);
        assert_eq!(o, TrackOrientation::slope(BlockPos::new(1, 2, 3), Direction::East));
    }

    #[test]
    fn vertical_above_requires_slope() {
        let o = TrackOrientation::straight(ORIGIN, Direction::East)
            .with_vertical_above(Direction::East);
        assert!(o.validate().is_err());
    }
}
