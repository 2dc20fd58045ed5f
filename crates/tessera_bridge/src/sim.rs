//! # Simulation Harness
//!
//! In-memory stand-ins for both collaborators, for soak tests and benchmarks
//! (feature `simulation`). The engine stand-in applies crude kinematics - just
//! enough motion for the bridge's window streaming to be exercised - and keeps
//! its handle registry behind a shared audit lock, mirroring the real engine's
//! process-wide registry, so harnesses can verify create/delete pairing from
//! outside while the bridge owns the engine value.
//!
//! Nothing here approximates the real engine's physics. That is the point:
//! the bridge must not care.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tessera_core::{EngineVec3, TileCoord};

use crate::traits::{
    CharacterHandle, CharacterInputs, CharacterState, EngineMesh, SimEngine, SurfaceHandle,
    SurfaceObject, TileMap,
};

/// Solid/air tile map with mutable cells.
pub struct TerrainMap {
    width: i32,
    height: i32,
    solid: Vec<bool>,
}

impl TerrainMap {
    /// Builds a map from ASCII rows of `#` (solid) and `.` (air).
    ///
    /// # Panics
    ///
    /// Panics on ragged rows.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        let height = rows.len() as i32;
        let mut solid = Vec::with_capacity((width * height) as usize);
        for row in rows {
            assert_eq!(row.len() as i32, width, "ragged map rows");
            solid.extend(row.bytes().map(|b| b == b'#'));
        }
        Self { width, height, solid }
    }

    /// Generates rolling terrain: a floor line random-walking up and down,
    /// filled solid below. Deterministic per seed.
    #[must_use]
    pub fn rolling_hills(width: i32, height: i32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solid = vec![false; (width * height) as usize];
        let mut floor = height * 3 / 4;
        for x in 0..width {
            floor = (floor + rng.gen_range(-1..=1)).clamp(4, height - 1);
            for y in floor..height {
                solid[(y * width + x) as usize] = true;
            }
        }
        Self { width, height, solid }
    }

    /// Sets one cell.
    pub fn set_solid(&mut self, x: i32, y: i32, value: bool) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            self.solid[(y * self.width + x) as usize] = value;
        }
    }

    /// World Y of the first solid tile at or below `row` in a column, if any.
    #[must_use]
    pub fn floor_below(&self, col: i32, row: i32) -> Option<i32> {
        (row.max(0)..self.height).find(|y| self.is_solid(TileCoord::new(col, *y)))
    }
}

impl TileMap for TerrainMap {
    fn is_solid(&self, tile: TileCoord) -> bool {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return false;
        }
        self.solid[(tile.y * self.width + tile.x) as usize]
    }
    fn width(&self) -> i32 {
        self.width
    }
    fn height(&self) -> i32 {
        self.height
    }
}

/// The engine stand-in's handle registry, shared for outside auditing.
#[derive(Debug, Default)]
pub struct RegistryAudit {
    /// Live character handles.
    pub live_characters: HashSet<u32>,
    /// Live surface handles.
    pub live_surfaces: HashSet<u32>,
    /// Character create calls.
    pub character_creates: u64,
    /// Character delete calls.
    pub character_deletes: u64,
    /// Surface create calls.
    pub surface_creates: u64,
    /// Surface delete calls.
    pub surface_deletes: u64,
    /// High-water mark of simultaneously live surfaces.
    pub max_live_surfaces: usize,
}

impl RegistryAudit {
    /// True when every create has been paired with exactly one delete.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.live_characters.is_empty()
            && self.live_surfaces.is_empty()
            && self.character_creates == self.character_deletes
            && self.surface_creates == self.surface_deletes
    }
}

/// Per-tick horizontal speed at full stick deflection, engine units.
const WALK_SPEED: f32 = 12.0;

/// Upward velocity while the jump button is held, engine units per tick.
const JUMP_SPEED: f32 = 16.0;

/// Downward acceleration per tick, engine units.
const GRAVITY: f32 = 3.0;

/// Kinematic engine stand-in with a shared-registry audit.
pub struct SimulatedEngine {
    registry: Arc<Mutex<RegistryAudit>>,
    next_character: u32,
    next_surface: u32,
    positions: HashMap<u32, EngineVec3>,
    velocities: HashMap<u32, EngineVec3>,
}

impl SimulatedEngine {
    /// Creates an engine with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(RegistryAudit::default())),
            next_character: 0,
            next_surface: 0,
            positions: HashMap::new(),
            velocities: HashMap::new(),
        }
    }

    /// A handle to the shared registry audit.
    #[must_use]
    pub fn registry(&self) -> Arc<Mutex<RegistryAudit>> {
        Arc::clone(&self.registry)
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimEngine for SimulatedEngine {
    fn create_character(&mut self, position: EngineVec3, _rotation: f32) -> Option<CharacterHandle> {
        if !position.is_finite() {
            return None;
        }
        let raw = self.next_character;
        self.next_character += 1;
        self.positions.insert(raw, position);
        self.velocities.insert(raw, EngineVec3::ZERO);

        let mut registry = self.registry.lock();
        registry.character_creates += 1;
        registry.live_characters.insert(raw);
        Some(CharacterHandle::new(raw))
    }

    fn delete_character(&mut self, handle: CharacterHandle) {
        self.positions.remove(&handle.raw());
        self.velocities.remove(&handle.raw());

        let mut registry = self.registry.lock();
        assert!(
            registry.live_characters.remove(&handle.raw()),
            "delete of dead character handle {}",
            handle.raw()
        );
        registry.character_deletes += 1;
    }

    fn reset_vertical(&mut self, handle: CharacterHandle) {
        if let Some(pos) = self.positions.get_mut(&handle.raw()) {
            pos.z = 0.0;
        }
    }

    fn tick_character(
        &mut self,
        handle: CharacterHandle,
        inputs: &CharacterInputs,
        state: &mut CharacterState,
        mesh: &mut EngineMesh,
    ) {
        let raw = handle.raw();
        let vel = self.velocities.get_mut(&raw).expect("tick on dead handle");
        let pos = self.positions.get_mut(&raw).expect("tick on dead handle");

        vel.x = inputs.stick_x.clamp(-1.0, 1.0) * WALK_SPEED;
        vel.y = if inputs.button_a { JUMP_SPEED } else { (vel.y - GRAVITY).max(-JUMP_SPEED) };
        *pos = *pos + *vel;

        state.position = *pos;
        state.velocity = *vel;
        state.face_angle = if vel.x < 0.0 { std::f32::consts::PI } else { 0.0 };

        // A diamond of two triangles around the character, so interpolation
        // and pose plumbing have geometry to chew on.
        mesh.triangles_used = 2;
        let quad = [
            [pos.x - 8.0, pos.y, 0.0],
            [pos.x, pos.y + 16.0, 0.0],
            [pos.x + 8.0, pos.y, 0.0],
            [pos.x + 8.0, pos.y, 0.0],
            [pos.x, pos.y - 16.0, 0.0],
            [pos.x - 8.0, pos.y, 0.0],
        ];
        for (v, vert) in quad.iter().enumerate() {
            mesh.positions[v * 3..v * 3 + 3].copy_from_slice(vert);
        }
    }

    fn create_surface_object(&mut self, object: &SurfaceObject<'_>) -> Option<SurfaceHandle> {
        if object.faces.is_empty() {
            return None;
        }
        let raw = self.next_surface;
        self.next_surface += 1;

        let mut registry = self.registry.lock();
        registry.surface_creates += 1;
        registry.live_surfaces.insert(raw);
        registry.max_live_surfaces = registry.max_live_surfaces.max(registry.live_surfaces.len());
        Some(SurfaceHandle::new(raw))
    }

    fn delete_surface_object(&mut self, handle: SurfaceHandle) {
        let mut registry = self.registry.lock();
        assert!(
            registry.live_surfaces.remove(&handle.raw()),
            "delete of dead surface handle {}",
            handle.raw()
        );
        registry.surface_deletes += 1;
    }
}
