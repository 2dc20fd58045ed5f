//! # TESSERA Core
//!
//! Coordinate spaces and pure math for the tile-to-surface bridge:
//! - Tile space: the host's 2-D collision grid, integer tiles, Y grows down
//! - World space: the host's floating-point 2-D space (one tile = 32 units)
//! - Engine space: the external character simulation's 3-D space, Y grows up
//!
//! ## Architecture Rules
//!
//! 1. **No state** - every conversion is a pure function
//! 2. **Scale is validated once** - conversions are infallible given a `Scale`
//! 3. **No engine types** - this crate knows nothing about handles or meshes
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{Scale, WorldVec2, world_to_engine};
//!
//! let scale = Scale::from_percent(100).unwrap();
//! let engine = world_to_engine(WorldVec2::new(64.0, 96.0), scale);
//! assert_eq!(engine.y, -96.0); // vertical axis is inverted
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod coords;
pub mod mapper;
pub mod math;
pub mod scale;

pub use coords::{TileCoord, TILE_SIZE, TILE_SIZE_F};
pub use mapper::{engine_to_tile, engine_to_world, tile_origin_engine, world_to_engine};
pub use math::{lerp, EngineVec3, WorldVec2};
pub use scale::{Scale, ScaleError};
