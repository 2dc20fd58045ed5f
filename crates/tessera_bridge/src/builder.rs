//! # Surface Window Builder
//!
//! Enumerates the tiles near a character and carves them into surface
//! descriptors. The scan produces a sparse shell, not a filled volume:
//!
//! 1. Columns left to right across a horizontal half-window.
//! 2. Per column: the first solid tile at or below the center row (the
//!    "floor"), then every solid tile in a fixed band above the center row,
//!    top-down.
//! 3. Per accepted tile: exposed-face culling against the four orthogonal
//!    neighbors. Fully buried tiles emit nothing and consume no slot.
//!
//! Scan order is part of the contract - it decides which tiles are dropped
//! when the window overflows its slot capacity, and that must be
//! reproducible across runs and deployments.

use serde::{Deserialize, Serialize};

use tessera_core::{Scale, TileCoord};

use crate::error::{BridgeError, BridgeResult};
use crate::surface::{face_pair, FaceDir, SurfaceDescriptor, TerrainTag};
use crate::traits::TileMap;
use crate::window::MAX_SURFACES;

/// Minimum supported horizontal half-window radius, in tiles.
pub const MIN_RADIUS: i32 = 3;

/// Maximum supported horizontal half-window radius, in tiles.
pub const MAX_RADIUS: i32 = 7;

/// Window geometry parameters.
///
/// One parameterized implementation serves every deployment; client and
/// server differ only in these numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Horizontal half-window radius in tiles (columns scanned:
    /// `2 * radius + 1`).
    pub radius: i32,
    /// Vertical band height in tiles scanned above the center row.
    pub band: i32,
    /// Slot capacity: maximum tiles registered per window, at most
    /// [`MAX_SURFACES`].
    pub capacity: usize,
}

impl WindowConfig {
    /// Client deployment: widest window, full capacity.
    pub const CLIENT: Self = Self {
        radius: 7,
        band: 6,
        capacity: MAX_SURFACES,
    };

    /// Server deployment: narrower window, same capacity; the server runs
    /// one window per connected character and pays for every column.
    pub const SERVER: Self = Self {
        radius: 4,
        band: 6,
        capacity: MAX_SURFACES,
    };

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if any parameter is out of
    /// range.
    pub fn validate(&self) -> BridgeResult<()> {
        if !(MIN_RADIUS..=MAX_RADIUS).contains(&self.radius) {
            return Err(BridgeError::InvalidConfig(format!(
                "window radius {} outside supported range {MIN_RADIUS}..={MAX_RADIUS}",
                self.radius
            )));
        }
        if !(1..=15).contains(&self.band) {
            return Err(BridgeError::InvalidConfig(format!(
                "window band {} outside supported range 1..=15",
                self.band
            )));
        }
        if self.capacity == 0 || self.capacity > MAX_SURFACES {
            return Err(BridgeError::InvalidConfig(format!(
                "window capacity {} outside supported range 1..={MAX_SURFACES}",
                self.capacity
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::CLIENT
    }
}

/// What a window build did. Truncation is silent degradation, not an error;
/// the caller is expected to log and count it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Tiles that emitted at least one face and will occupy a slot.
    pub tiles_accepted: usize,
    /// Solid candidate tiles skipped because the window was full.
    pub tiles_truncated: usize,
    /// Total triangles emitted.
    pub faces_emitted: usize,
}

/// Builds the surface window around a center tile into `out`.
///
/// `out` is cleared first; descriptors are appended in scan order. An empty
/// result is valid (character in open air).
pub fn build_window<M: TileMap>(
    map: &M,
    center: TileCoord,
    scale: Scale,
    config: &WindowConfig,
    out: &mut Vec<SurfaceDescriptor>,
) -> BuildReport {
    out.clear();
    let mut report = BuildReport::default();

    for dx in -config.radius..=config.radius {
        let col = center.x + dx;

        // Floor: the first solid tile at or below the center row.
        let floor_row = find_floor(map, col, center.y);
        if let Some(row) = floor_row {
            accept_tile(map, TileCoord::new(col, row), scale, config, out, &mut report);
        }

        // Band above the center row, top-down. The center row itself is part
        // of the band; skip it when the floor search already took it.
        for dy in (0..=config.band).rev() {
            let row = center.y - dy;
            if floor_row == Some(row) {
                continue;
            }
            let tile = TileCoord::new(col, row);
            if map.is_solid(tile) {
                accept_tile(map, tile, scale, config, out, &mut report);
            }
        }
    }

    report
}

/// Scans downward from `from_row` for the first solid tile in a column.
fn find_floor<M: TileMap>(map: &M, col: i32, from_row: i32) -> Option<i32> {
    let mut row = from_row;
    while row < map.height() {
        if map.is_solid(TileCoord::new(col, row)) {
            return Some(row);
        }
        row += 1;
    }
    None
}

/// Emits the exposed faces of one solid tile, respecting slot capacity.
fn accept_tile<M: TileMap>(
    map: &M,
    tile: TileCoord,
    scale: Scale,
    config: &WindowConfig,
    out: &mut Vec<SurfaceDescriptor>,
    report: &mut BuildReport,
) {
    if report.tiles_accepted >= config.capacity {
        report.tiles_truncated += 1;
        return;
    }

    let mut emitted = 0usize;
    for dir in FaceDir::ALL {
        if map.is_solid(dir.neighbor(tile)) {
            continue;
        }
        for face in face_pair(dir, scale, TerrainTag::Stone) {
            out.push(SurfaceDescriptor { tile, face });
        }
        emitted += 2;
    }

    // A fully buried tile emits nothing and must not consume a slot.
    if emitted > 0 {
        report.tiles_accepted += 1;
        report.faces_emitted += emitted;
    }
}
