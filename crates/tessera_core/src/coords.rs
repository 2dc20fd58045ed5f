//! # Tile Coordinates
//!
//! The host's collision map is a grid of fixed-size tiles. A tile coordinate
//! identifies one cell; world positions map onto tiles by floor division so
//! that negative positions land in the expected cell.

use serde::{Deserialize, Serialize};

use crate::math::WorldVec2;

/// Tile edge length in world units.
pub const TILE_SIZE: i32 = 32;

/// Tile edge length as a float, for world-space math.
pub const TILE_SIZE_F: f32 = TILE_SIZE as f32;

/// Tile coordinate (identifies a cell in the host's collision grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column (in tiles, not world units).
    pub x: i32,
    /// Row (in tiles, Y grows down).
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world position to the tile containing it.
    ///
    /// Uses euclidean floor division: `(-1.0, -1.0)` is tile `(-1, -1)`,
    /// not `(0, 0)`.
    #[inline]
    #[must_use]
    pub fn from_world_pos(pos: WorldVec2) -> Self {
        Self {
            x: (pos.x.floor() as i32).div_euclid(TILE_SIZE),
            y: (pos.y.floor() as i32).div_euclid(TILE_SIZE),
        }
    }

    /// Returns the world X coordinate of the tile's origin (top-left corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * TILE_SIZE
    }

    /// Returns the world Y coordinate of the tile's origin.
    #[inline]
    #[must_use]
    pub const fn world_y(self) -> i32 {
        self.y * TILE_SIZE
    }

    /// The tile directly above (Y - 1; up is negative in tile space).
    #[inline]
    #[must_use]
    pub const fn above(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    /// The tile directly below (Y + 1).
    #[inline]
    #[must_use]
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// The tile to the left (X - 1).
    #[inline]
    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    /// The tile to the right (X + 1).
    #[inline]
    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }
}
