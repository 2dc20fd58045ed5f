//! # TESSERA Bridge
//!
//! Streams a 2-D tile collision map into a black-box 3-D character engine as
//! a bounded window of triangle surfaces, and drives that engine at its
//! native 30 Hz regardless of the host's render rate:
//!
//! - **Window builder**: carves nearby tiles into exposed-face surface
//!   descriptors, in a fixed, reproducible scan order
//! - **Lifecycle manager**: a slot table that deletes every old handle before
//!   creating any new one - handles are never leaked, never double-freed
//! - **Fixed-timestep driver**: a per-character tick accumulator, window
//!   rebuilds on tile crossings, depth-2 snapshot interpolation for rendering
//!
//! ## Architecture Rules
//!
//! 1. **The engine is a black box** - consumed through [`SimEngine`], never
//!    reimplemented
//! 2. **Zero allocations per step** - all buffers pre-allocated at spawn
//! 3. **Synchronous ownership** - despawn releases everything, immediately
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_bridge::{BridgeConfig, SurfaceBridge};
//! use tessera_core::{Scale, WorldVec2};
//!
//! let mut bridge = SurfaceBridge::new(engine, map, BridgeConfig::client())?;
//! let id = bridge.spawn_character(WorldVec2::new(512.0, 64.0), Scale::ONE)?;
//! loop {
//!     bridge.update(id, &inputs, frame_time)?;
//!     let pose = bridge.pose(id).unwrap();
//!     // render pose.mesh_positions at pose.position ...
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod builder;
pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod snapshot;
pub mod surface;
pub mod traits;
pub mod window;

#[cfg(feature = "simulation")]
pub mod sim;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{build_window, BuildReport, WindowConfig};
pub use config::BridgeConfig;
pub use driver::{CharacterSim, UpdateReport, FIXED_STEP, SIM_TICK_RATE};
pub use error::{BridgeError, BridgeResult};
pub use host::{BridgeStats, CharacterId, Pose, SurfaceBridge};
pub use snapshot::{InterpolationBuffer, SimSnapshot};
pub use surface::{FaceDir, SurfaceDescriptor, SurfaceFace, SurfaceKind, TerrainTag};
pub use traits::{
    CharacterHandle, CharacterInputs, CharacterState, EngineMesh, SimEngine, SurfaceHandle,
    SurfaceObject, TileMap, GEO_MAX_TRIANGLES,
};
pub use window::{SlotState, SurfaceTable, MAX_SURFACES};
