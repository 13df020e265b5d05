use super::direction::Direction;
use crate::sim::Vec3;
use serde::{Deserialize, Serialize};

/// Integer coordinates of a voxel cell.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a world position.
    pub fn containing(position: Vec3) -> Self {
        Self::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        )
    }

    pub fn mid_x(self) -> f64 {
        self.x as f64 + 0.5
    }

    pub fn mid_y(self) -> f64 {
        self.y as f64 + 0.5
    }

    pub fn mid_z(self) -> f64 {
        self.z as f64 + 0.5
    }

    pub fn center(self) -> Vec3 {
        Vec3::new(self.mid_x(), self.mid_y(), self.mid_z())
    }

    pub fn offset(self, direction: Direction) -> Self {
        Self::new(
            self.x + direction.mod_x(),
            self.y + direction.mod_y(),
            self.z + direction.mod_z(),
        )
    }
}
