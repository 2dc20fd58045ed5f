//! # Coordinate Mapper
//!
//! Pure conversions between host world space and engine space.
//!
//! The two spaces disagree about the vertical axis: the host's Y grows down,
//! the engine's Y grows up. Conversions negate Y and apply the scale factor:
//!
//! ```text
//!   world -> engine: divide by scale, negate Y
//!   engine -> world: multiply by scale, negate Y
//! ```
//!
//! The engine's Z axis has no counterpart in the 2-D host; it is always zero
//! for positions and spans the surface quads' depth.

use crate::coords::{TileCoord, TILE_SIZE_F};
use crate::math::{EngineVec3, WorldVec2};
use crate::scale::Scale;

/// Converts a host world position to engine space.
#[inline]
#[must_use]
pub fn world_to_engine(pos: WorldVec2, scale: Scale) -> EngineVec3 {
    debug_assert!(pos.is_finite(), "world position must be finite");
    let s = scale.factor();
    EngineVec3::new(pos.x / s, -pos.y / s, 0.0)
}

/// Converts an engine-space position back to host world space.
///
/// The Z component is dropped; the host world is 2-D.
#[inline]
#[must_use]
pub fn engine_to_world(pos: EngineVec3, scale: Scale) -> WorldVec2 {
    debug_assert!(pos.is_finite(), "engine position must be finite");
    let s = scale.factor();
    WorldVec2::new(pos.x * s, -pos.y * s)
}

/// Converts an engine-space position to the tile containing it.
#[inline]
#[must_use]
pub fn engine_to_tile(pos: EngineVec3, scale: Scale) -> TileCoord {
    TileCoord::from_world_pos(engine_to_world(pos, scale))
}

/// Engine-space origin for the surface object registered for a tile.
///
/// The origin sits at the tile's left edge, vertically centered on the tile
/// row (half a tile below the top edge in engine space), so the face quads
/// emitted relative to it span the row symmetrically.
#[inline]
#[must_use]
pub fn tile_origin_engine(tile: TileCoord, scale: Scale) -> EngineVec3 {
    let s = scale.factor();
    EngineVec3::new(
        tile.world_x() as f32 / s,
        (-(tile.world_y() as f32) - TILE_SIZE_F / 2.0) / s,
        0.0,
    )
}
