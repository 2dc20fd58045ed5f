//! # Fixed-Timestep Simulation Driver
//!
//! One `CharacterSim` per simulated character. Each render/server frame the
//! host feeds it elapsed time; the driver drains a tick accumulator in fixed
//! 30 Hz steps, keeps the streaming surface window centered on the character,
//! and blends the last two snapshots into the presented pose.
//!
//! ## Step order (per fixed step)
//!
//! ```text
//! 1. Rebuild the surface window if the character left the window's tile
//! 2. reset_vertical      (counters the engine's depth-axis drift)
//! 3. tick_character      (the one blocking engine call)
//! 4. Rotate snapshot ring, convert position + mesh to world space
//! ```
//!
//! The vertical reset MUST precede the tick; the engine re-applies its drift
//! correction during the tick and the two cancel only in that order.

use tessera_core::{engine_to_world, world_to_engine, Scale, TileCoord, WorldVec2};

use crate::builder::{build_window, WindowConfig};
use crate::error::{BridgeError, BridgeResult};
use crate::snapshot::InterpolationBuffer;
use crate::surface::{SurfaceDescriptor, MAX_FACES_PER_TILE};
use crate::traits::{
    CharacterHandle, CharacterInputs, CharacterState, EngineMesh, SimEngine, TileMap,
    GEO_MAX_TRIANGLES,
};
use crate::window::SurfaceTable;

/// The engine's native simulation rate in Hz.
pub const SIM_TICK_RATE: u32 = 30;

/// Duration of one fixed simulation step in seconds.
pub const FIXED_STEP: f32 = 1.0 / SIM_TICK_RATE as f32;

/// What one update call did, for the host's statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Fixed steps executed.
    pub steps: u32,
    /// Surface-window rebuilds triggered by tile crossings.
    pub rebuilds: u32,
    /// Solid candidate tiles dropped by capacity truncation during rebuilds.
    pub tiles_truncated: u64,
}

/// Driver state for one spawned character.
///
/// The life cycle is `spawn -> update* -> destroy`; destruction is terminal
/// and idempotent. A refused spawn never yields a `CharacterSim` - the
/// constructor releases everything it created and returns the error.
pub struct CharacterSim {
    /// Engine handle; `None` once destroyed.
    handle: Option<CharacterHandle>,
    scale: Scale,
    window_config: WindowConfig,
    /// Tick accumulator, in `[0, FIXED_STEP)` between updates.
    accumulator: f32,
    /// The slot table of registered surfaces.
    window: SurfaceTable,
    /// The tile the current window was built around.
    window_tile: TileCoord,
    ring: InterpolationBuffer,
    /// Latest engine state, passthrough for the host.
    state: CharacterState,
    /// Engine geometry scratch, engine-space.
    mesh: EngineMesh,
    /// Rebuild scratch, reused across rebuilds.
    descriptors: Vec<SurfaceDescriptor>,
    /// Presented (interpolated) pose.
    presented_position: WorldVec2,
    presented_mesh: Vec<f32>,
    presented_triangles: usize,
}

impl CharacterSim {
    /// Spawns a character: builds the initial surface window around the spawn
    /// tile, then asks the engine for a character.
    ///
    /// # Errors
    ///
    /// [`BridgeError::SpawnPositionNotFinite`] for a NaN/infinite position;
    /// [`BridgeError::SpawnRefused`] if the engine declines. On refusal every
    /// surface created for the initial window is deleted before returning.
    pub fn spawn<E: SimEngine, M: TileMap>(
        engine: &mut E,
        map: &M,
        config: &WindowConfig,
        spawn_pos: WorldVec2,
        scale: Scale,
    ) -> BridgeResult<Self> {
        if !spawn_pos.is_finite() {
            return Err(BridgeError::SpawnPositionNotFinite { x: spawn_pos.x, y: spawn_pos.y });
        }

        let spawn_tile = TileCoord::from_world_pos(spawn_pos);
        let mut window = SurfaceTable::new(config.capacity);
        let mut descriptors = Vec::with_capacity(config.capacity * MAX_FACES_PER_TILE);

        let report = build_window(map, spawn_tile, scale, config, &mut descriptors);
        if report.tiles_truncated > 0 {
            tracing::warn!(
                truncated = report.tiles_truncated,
                "spawn window over capacity, tiles dropped in scan order"
            );
        }
        window.install(engine, &descriptors, scale);

        let Some(handle) = engine.create_character(world_to_engine(spawn_pos, scale), 0.0) else {
            // Failed-spawn path releases everything it acquired.
            window.clear(engine);
            tracing::error!(x = spawn_pos.x, y = spawn_pos.y, "engine refused character spawn");
            return Err(BridgeError::SpawnRefused { x: spawn_pos.x, y: spawn_pos.y });
        };

        tracing::info!(
            handle = handle.raw(),
            x = spawn_pos.x,
            y = spawn_pos.y,
            surfaces = window.occupied(),
            "character spawned"
        );

        let mut ring = InterpolationBuffer::new();
        // Seed both ring entries with the spawn pose so the first rendered
        // frame does not blend from the zero position.
        ring.begin_step().position = spawn_pos;
        ring.begin_step().position = spawn_pos;

        Ok(Self {
            handle: Some(handle),
            scale,
            window_config: *config,
            accumulator: 0.0,
            window,
            window_tile: spawn_tile,
            ring,
            state: CharacterState::default(),
            mesh: EngineMesh::with_max_capacity(),
            descriptors,
            presented_position: spawn_pos,
            presented_mesh: vec![0.0; GEO_MAX_TRIANGLES * 9],
            presented_triangles: 0,
        })
    }

    /// Advances the character by `dt` seconds of render time.
    ///
    /// Drains the accumulator in fixed steps, then refreshes the presented
    /// pose from the snapshot ring. A destroyed character ignores updates.
    pub fn update<E: SimEngine, M: TileMap>(
        &mut self,
        engine: &mut E,
        map: &M,
        inputs: &CharacterInputs,
        dt: f32,
    ) -> UpdateReport {
        let mut report = UpdateReport::default();
        let Some(handle) = self.handle else {
            return report;
        };
        debug_assert!(dt.is_finite() && dt >= 0.0, "elapsed time must be finite and non-negative");

        self.accumulator += dt;
        while self.accumulator >= FIXED_STEP {
            self.accumulator -= FIXED_STEP;

            // The window follows the character tile by tile, on both axes.
            let tile = TileCoord::from_world_pos(self.ring.current().position);
            if tile != self.window_tile {
                report.tiles_truncated += self.rebuild_window(engine, map, tile);
                report.rebuilds += 1;
            }

            engine.reset_vertical(handle);
            engine.tick_character(handle, inputs, &mut self.state, &mut self.mesh);
            self.capture_snapshot();
            report.steps += 1;
        }

        // Leftover fraction of a step decides the render blend.
        let fraction = self.accumulator / FIXED_STEP;
        self.presented_position = self.ring.sample_position(fraction);
        self.presented_triangles = self.ring.sample_mesh_into(fraction, &mut self.presented_mesh);

        report
    }

    /// Rotates the snapshot ring and stores the tick result in world space.
    fn capture_snapshot(&mut self) {
        let world_pos = engine_to_world(self.state.position, self.scale);
        let s = self.scale.factor();

        let snap = self.ring.begin_step();
        snap.position = world_pos;
        snap.triangles_used = self.mesh.triangles_used.min(GEO_MAX_TRIANGLES);
        for vertex in 0..snap.triangles_used * 3 {
            let i = vertex * 3;
            snap.mesh_positions[i] = self.mesh.positions[i] * s;
            snap.mesh_positions[i + 1] = self.mesh.positions[i + 1] * -s;
            snap.mesh_positions[i + 2] = self.mesh.positions[i + 2] * s;
        }
    }

    /// Rebuilds the surface window around a new center tile. Returns the
    /// truncated-tile count.
    fn rebuild_window<E: SimEngine, M: TileMap>(
        &mut self,
        engine: &mut E,
        map: &M,
        tile: TileCoord,
    ) -> u64 {
        let report =
            build_window(map, tile, self.scale, &self.window_config, &mut self.descriptors);
        if report.tiles_truncated > 0 {
            tracing::warn!(
                truncated = report.tiles_truncated,
                tile_x = tile.x,
                tile_y = tile.y,
                "surface window over capacity, tiles dropped in scan order"
            );
        }
        let created = self.window.install(engine, &self.descriptors, self.scale);
        self.window_tile = tile;
        tracing::debug!(tile_x = tile.x, tile_y = tile.y, surfaces = created, "surface window rebuilt");
        report.tiles_truncated as u64
    }

    /// Destroys the character: engine handle, every surface slot, and all
    /// mesh buffers. Safe to call any number of times.
    pub fn destroy<E: SimEngine>(&mut self, engine: &mut E) {
        if let Some(handle) = self.handle.take() {
            engine.delete_character(handle);
            self.window.clear(engine);
            self.ring.release();
            self.mesh.release();
            self.descriptors = Vec::new();
            self.presented_mesh = Vec::new();
            self.presented_triangles = 0;
            tracing::info!(handle = handle.raw(), "character destroyed");
        }
    }

    /// True until [`CharacterSim::destroy`] runs.
    #[must_use]
    pub fn is_spawned(&self) -> bool {
        self.handle.is_some()
    }

    /// The presented (interpolated) world-space position.
    #[must_use]
    pub fn position(&self) -> WorldVec2 {
        self.presented_position
    }

    /// The presented mesh: interpolated vertex positions of the active
    /// triangles, 9 floats per triangle.
    #[must_use]
    pub fn mesh_positions(&self) -> &[f32] {
        &self.presented_mesh[..self.presented_triangles * 9]
    }

    /// Active triangle count of the presented mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.presented_triangles
    }

    /// Latest raw engine state (engine-space), passthrough for the host.
    #[must_use]
    pub fn engine_state(&self) -> &CharacterState {
        &self.state
    }

    /// Latest raw geometry buffers; the non-position channels are verbatim
    /// engine output for the host's renderer.
    #[must_use]
    pub fn engine_mesh(&self) -> &EngineMesh {
        &self.mesh
    }

    /// Occupied surface slots, for diagnostics.
    #[must_use]
    pub fn window_occupied(&self) -> usize {
        self.window.occupied()
    }

    /// Current accumulator value, for diagnostics. In `[0, FIXED_STEP)`
    /// between updates.
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}
