//! Shared fixtures for the crate's unit tests: an ASCII-art tile map and an
//! auditing engine that panics on any handle misuse.

use std::collections::{BTreeMap, BTreeSet};

use tessera_core::{EngineVec3, TileCoord};

use crate::traits::{
    CharacterHandle, CharacterInputs, CharacterState, EngineMesh, SimEngine, SurfaceHandle,
    SurfaceObject,
};

/// Tile map built from rows of `#` (solid) and `.` (air).
pub struct GridMap {
    width: i32,
    height: i32,
    solid: Vec<bool>,
}

impl GridMap {
    /// Builds a map from ASCII rows. All rows must share one length.
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
}

impl crate::traits::TileMap for GridMap {
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

/// Everything the auditing engine observed, in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A character was created with this raw handle.
    CreateCharacter(u32),
    /// A character was deleted.
    DeleteCharacter(u32),
    /// A vertical reset was requested.
    ResetVertical(u32),
    /// A character was ticked.
    Tick(u32),
    /// A surface object was created with this raw handle.
    CreateSurface(u32),
    /// A surface object was deleted.
    DeleteSurface(u32),
}

/// Engine stand-in that counts calls, records ordering, and panics on
/// double-delete or stale-handle use.
#[derive(Default)]
pub struct CountingEngine {
    pub(crate) next_character: u32,
    pub(crate) next_surface: u32,
    /// Live character handles.
    pub live_characters: BTreeSet<u32>,
    /// Live surface handles.
    pub live_surfaces: BTreeSet<u32>,
    /// Character positions, advanced by `motion` each tick.
    pub positions: BTreeMap<u32, EngineVec3>,
    /// Create-call counters.
    pub character_creates: u32,
    /// Delete-call counters.
    pub character_deletes: u32,
    /// Create-call counters.
    pub surface_creates: u32,
    /// Delete-call counters.
    pub surface_deletes: u32,
    /// Vertical resets observed.
    pub vertical_resets: u32,
    /// Ticks observed.
    pub ticks: u32,
    /// Every call, in order.
    pub events: Vec<EngineEvent>,
    /// When set, character creation is refused.
    pub refuse_characters: bool,
    /// When set, surface creation is refused.
    pub refuse_surfaces: bool,
    /// Engine-space displacement applied per tick.
    pub motion: EngineVec3,
    /// Triangles written into the mesh per tick.
    pub mesh_triangles: usize,
}

impl SimEngine for CountingEngine {
    fn create_character(&mut self, position: EngineVec3, _rotation: f32) -> Option<CharacterHandle> {
        if self.refuse_characters {
            return None;
        }
        let raw = self.next_character;
        self.next_character += 1;
        self.character_creates += 1;
        self.live_characters.insert(raw);
        self.positions.insert(raw, position);
        self.events.push(EngineEvent::CreateCharacter(raw));
        Some(CharacterHandle::new(raw))
    }

    fn delete_character(&mut self, handle: CharacterHandle) {
        assert!(
            self.live_characters.remove(&handle.raw()),
            "delete of dead character handle {}",
            handle.raw()
        );
        self.character_deletes += 1;
        self.events.push(EngineEvent::DeleteCharacter(handle.raw()));
    }

    fn reset_vertical(&mut self, handle: CharacterHandle) {
        assert!(self.live_characters.contains(&handle.raw()), "vertical reset on dead handle");
        self.vertical_resets += 1;
        self.events.push(EngineEvent::ResetVertical(handle.raw()));
    }

    fn tick_character(
        &mut self,
        handle: CharacterHandle,
        _inputs: &CharacterInputs,
        state: &mut CharacterState,
        mesh: &mut EngineMesh,
    ) {
        assert!(self.live_characters.contains(&handle.raw()), "tick on dead handle");
        self.ticks += 1;
        let pos = self.positions.get_mut(&handle.raw()).expect("no position for handle");
        *pos = *pos + self.motion;
        state.position = *pos;

        mesh.triangles_used = self.mesh_triangles;
        for i in 0..self.mesh_triangles * 9 {
            // A deterministic, position-dependent pattern so interpolation is
            // observable per float.
            mesh.positions[i] = pos.x + i as f32;
        }
        self.events.push(EngineEvent::Tick(handle.raw()));
    }

    fn create_surface_object(&mut self, object: &SurfaceObject<'_>) -> Option<SurfaceHandle> {
        assert!(!object.faces.is_empty(), "surface object with no faces");
        if self.refuse_surfaces {
            return None;
        }
        let raw = self.next_surface;
        self.next_surface += 1;
        self.surface_creates += 1;
        self.live_surfaces.insert(raw);
        self.events.push(EngineEvent::CreateSurface(raw));
        Some(SurfaceHandle::new(raw))
    }

    fn delete_surface_object(&mut self, handle: SurfaceHandle) {
        assert!(
            self.live_surfaces.remove(&handle.raw()),
            "delete of dead surface handle {}",
            handle.raw()
        );
        self.surface_deletes += 1;
        self.events.push(EngineEvent::DeleteSurface(handle.raw()));
    }
}
