//! # Host Registry
//!
//! The one façade the host talks to. Owns the engine, the tile map, and every
//! spawned character; the exclusive `&mut` it holds on the engine is what
//! serializes all engine calls across characters (the engine's registry is
//! process-wide and its tick is non-reentrant).
//!
//! One logical update call per character per frame; nothing here suspends or
//! defers. A host that loses ownership of a character must despawn it in the
//! same frame - there is no background cleanup.

use std::collections::HashMap;

use tessera_core::{Scale, WorldVec2};

use crate::config::BridgeConfig;
use crate::driver::CharacterSim;
use crate::error::{BridgeError, BridgeResult};
use crate::traits::{CharacterInputs, CharacterState, SimEngine, TileMap};

/// Host-facing character identifier, minted by the bridge.
///
/// Unrelated to engine handles; the engine's identifiers never cross the
/// bridge boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharacterId(u32);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bridge statistics, aggregated across all characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct BridgeStats {
    /// Fixed simulation steps executed.
    pub steps_processed: u64,
    /// Surface-window rebuilds.
    pub windows_rebuilt: u64,
    /// Solid candidate tiles dropped by capacity truncation.
    pub tiles_truncated: u64,
    /// Spawns the engine refused.
    pub spawns_failed: u64,
}

/// The interpolated pose handed to the renderer.
///
/// `mesh_positions` is interpolated; the remaining channels are the current
/// step's engine output, verbatim.
#[derive(Clone, Copy, Debug)]
pub struct Pose<'a> {
    /// Interpolated world-space position.
    pub position: WorldVec2,
    /// Interpolated vertex positions, 9 floats per triangle.
    pub mesh_positions: &'a [f32],
    /// Active triangle count (snaps to the latest step).
    pub triangle_count: usize,
    /// Vertex normals, verbatim engine output.
    pub normals: &'a [f32],
    /// Vertex colors, verbatim engine output.
    pub colors: &'a [f32],
    /// Vertex texture coordinates, verbatim engine output.
    pub uvs: &'a [f32],
    /// Latest raw engine state (engine-space).
    pub engine_state: CharacterState,
}

/// The bridge between a 2-D tile map and the 3-D character engine.
pub struct SurfaceBridge<E: SimEngine, M: TileMap> {
    engine: E,
    map: M,
    config: BridgeConfig,
    characters: HashMap<CharacterId, CharacterSim>,
    next_id: u32,
    stats: BridgeStats,
}

impl<E: SimEngine, M: TileMap> SurfaceBridge<E, M> {
    /// Creates a bridge over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn new(engine: E, map: M, config: BridgeConfig) -> BridgeResult<Self> {
        config.validate()?;
        Ok(Self {
            engine,
            map,
            config,
            characters: HashMap::new(),
            next_id: 0,
            stats: BridgeStats::default(),
        })
    }

    /// Spawns a character at a world position.
    ///
    /// # Errors
    ///
    /// Propagates the spawn failures of [`CharacterSim::spawn`]; a refused
    /// spawn leaves no engine resources behind.
    pub fn spawn_character(&mut self, pos: WorldVec2, scale: Scale) -> BridgeResult<CharacterId> {
        match CharacterSim::spawn(&mut self.engine, &self.map, &self.config.window, pos, scale) {
            Ok(sim) => {
                let id = CharacterId(self.next_id);
                self.next_id += 1;
                self.characters.insert(id, sim);
                Ok(id)
            }
            Err(err) => {
                self.stats.spawns_failed += 1;
                Err(err)
            }
        }
    }

    /// Despawns a character, releasing its engine handle, surface slots, and
    /// buffers synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCharacter`] for an id that was never
    /// spawned or is already despawned.
    pub fn despawn_character(&mut self, id: CharacterId) -> BridgeResult<()> {
        let mut sim = self
            .characters
            .remove(&id)
            .ok_or(BridgeError::UnknownCharacter(id))?;
        sim.destroy(&mut self.engine);
        Ok(())
    }

    /// Advances one character by `dt` seconds of render time.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCharacter`] for an unknown id.
    pub fn update(
        &mut self,
        id: CharacterId,
        inputs: &CharacterInputs,
        dt: f32,
    ) -> BridgeResult<()> {
        let sim = self
            .characters
            .get_mut(&id)
            .ok_or(BridgeError::UnknownCharacter(id))?;
        let report = sim.update(&mut self.engine, &self.map, inputs, dt);
        self.stats.steps_processed += u64::from(report.steps);
        self.stats.windows_rebuilt += u64::from(report.rebuilds);
        self.stats.tiles_truncated += report.tiles_truncated;
        Ok(())
    }

    /// The interpolated pose of a character, or `None` for an unknown id.
    #[must_use]
    pub fn pose(&self, id: CharacterId) -> Option<Pose<'_>> {
        let sim = self.characters.get(&id)?;
        let mesh = sim.engine_mesh();
        let floats = sim.triangle_count() * 9;
        Some(Pose {
            position: sim.position(),
            mesh_positions: sim.mesh_positions(),
            triangle_count: sim.triangle_count(),
            normals: &mesh.normals[..floats.min(mesh.normals.len())],
            colors: &mesh.colors[..floats.min(mesh.colors.len())],
            uvs: &mesh.uvs[..(sim.triangle_count() * 6).min(mesh.uvs.len())],
            engine_state: *sim.engine_state(),
        })
    }

    /// Occupied surface slots of a character's window, for diagnostics.
    #[must_use]
    pub fn window_occupied(&self, id: CharacterId) -> Option<usize> {
        self.characters.get(&id).map(CharacterSim::window_occupied)
    }

    /// Number of live characters.
    #[must_use]
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Aggregated statistics.
    #[must_use]
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// Read access to the engine collaborator.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl<E: SimEngine, M: TileMap> Drop for SurfaceBridge<E, M> {
    /// Last-resort cleanup: any character the host failed to despawn is
    /// destroyed here so its engine-side resources are not leaked.
    fn drop(&mut self) {
        for sim in self.characters.values_mut() {
            sim.destroy(&mut self.engine);
        }
    }
}
