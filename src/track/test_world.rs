use super::{BlockPos, OrientationLookup, TrackOrientation};
use crate::sim::Vec3;
use std::collections::{HashMap, HashSet};

/// In-memory voxel world for unit tests.
#[derive(Default)]
pub(crate) struct TestWorld {
    tracks: HashMap<BlockPos, TrackOrientation>,
    solid: HashSet<BlockPos>,
}

impl TestWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_track(mut self, track: TrackOrientation) -> Self {
        self.tracks.insert(track.block, track);
        self
    }

    pub(crate) fn with_solid(mut self, block: BlockPos) -> Self {
        self.solid.insert(block);
        self
    }
}

impl OrientationLookup for TestWorld {
    fn orientation_at(&self, position: Vec3) -> Option<TrackOrientation> {
        let block = BlockPos::containing(position);
        if let Some(track) = self.tracks.get(&block) {
            return Some(*track);
        }
        // Carts ride above the top half of a slope cell.
        self.tracks
            .get(&BlockPos::new(block.x, block.y - 1, block.z))
            .filter(|track| track.sloped)
            .copied()
    }

    fn is_solid(&self, block: BlockPos) -> bool {
        self.solid.contains(&block)
    }
}
