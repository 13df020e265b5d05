use crate::sim::{vector_yaw, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eight-point horizontal compass plus vertical up/down.
///
/// North is -Z, east is +X, south is +Z, west is -X.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
    Up,
    Down,
}

/// Horizontal directions in notch order (clockwise seen from above).
const NOTCHES: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    pub const HORIZONTAL: [Direction; 8] = NOTCHES;
    pub const AXIS_ALIGNED: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn mod_x(self) -> i32 {
        match self {
            Direction::East | Direction::NorthEast | Direction::SouthEast => 1,
            Direction::West | Direction::NorthWest | Direction::SouthWest => -1,
            _ => 0,
        }
    }

    pub const fn mod_y(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            _ => 0,
        }
    }

    pub const fn mod_z(self) -> i32 {
        match self {
            Direction::South | Direction::SouthEast | Direction::SouthWest => 1,
            Direction::North | Direction::NorthEast | Direction::NorthWest => -1,
            _ => 0,
        }
    }

    pub const fn is_along_x(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    pub const fn is_along_z(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    pub const fn is_along_y(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::SouthEast | Direction::SouthWest | Direction::NorthWest
        )
    }

    pub const fn is_horizontal(self) -> bool {
        !self.is_along_y()
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// 45° notch index 0..7 (north = 0, clockwise), `None` for up/down.
    pub const fn notch_index(self) -> Option<usize> {
        match self {
            Direction::North => Some(0),
            Direction::NorthEast => Some(1),
            Direction::East => Some(2),
            Direction::SouthEast => Some(3),
            Direction::South => Some(4),
            Direction::SouthWest => Some(5),
            Direction::West => Some(6),
            Direction::NorthWest => Some(7),
            Direction::Up | Direction::Down => None,
        }
    }

    /// Inverse of [`notch_index`](Self::notch_index); wraps around.
    pub const fn from_notch(notch: usize) -> Self {
        NOTCHES[notch & 7]
    }

    /// Direction with the given signs of its X and Z modifiers.
    pub fn from_xz(x: i32, z: i32) -> Option<Self> {
        match (x.signum(), z.signum()) {
            (0, -1) => Some(Direction::North),
            (1, -1) => Some(Direction::NorthEast),
            (1, 0) => Some(Direction::East),
            (1, 1) => Some(Direction::SouthEast),
            (0, 1) => Some(Direction::South),
            (-1, 1) => Some(Direction::SouthWest),
            (-1, 0) => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// Splits a diagonal into its X face and Z face.
    pub fn components(self) -> Option<(Direction, Direction)> {
        if !self.is_diagonal() {
            return None;
        }
        let x_face = Self::from_xz(self.mod_x(), 0)?;
        let z_face = Self::from_xz(0, self.mod_z())?;
        Some((x_face, z_face))
    }

    /// Yaw in degrees (south = 0, west = 90, north = 180, east = 270).
    pub fn yaw(self) -> Option<f64> {
        self.notch_index()
            .map(|notch| ((notch as f64) * 45.0 + 180.0).rem_euclid(360.0))
    }

    pub fn to_vector(self) -> Vec3 {
        Vec3::new(self.mod_x() as f64, self.mod_y() as f64, self.mod_z() as f64)
    }

    /// Compass direction closest to a motion vector.
    ///
    /// Up/down win when the vertical part outweighs the horizontal length;
    /// a vector with no heading at all yields `None`.
    pub fn nearest(motion: Vec3) -> Option<Self> {
        let horizontal = motion.horizontal_length();
        if motion.y.abs() > horizontal {
            return Some(if motion.y > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            });
        }
        let yaw = vector_yaw(motion.x, motion.z)?;
        let notch = ((yaw - 180.0) / 45.0).round().rem_euclid(8.0) as usize;
        Some(Self::from_notch(notch))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
            Direction::NorthEast => "NorthEast",
            Direction::SouthEast => "SouthEast",
            Direction::SouthWest => "SouthWest",
            Direction::NorthWest => "NorthWest",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        f.write_str(name)
    }
}
