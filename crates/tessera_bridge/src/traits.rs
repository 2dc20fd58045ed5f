//! # Collaborator Traits
//!
//! The bridge consumes two external collaborators and implements neither.
//!
//! ## Architecture (Glass Walls Policy)
//!
//! The bridge DOES NOT reach into the host's map or the engine's internals.
//! Instead, it defines traits here that the collaborators implement:
//!
//! ```text
//! bridge defines:       host/engine implements:
//! ┌──────────────┐      ┌──────────────────────┐
//! │ trait TileMap│ ←──  │ collision map binding │
//! │ trait SimEngine│ ←─ │ character engine FFI  │
//! └──────────────┘      └──────────────────────┘
//! ```
//!
//! The engine's tick is blocking, synchronous, and non-reentrant; it owns a
//! process-wide registry of characters and surfaces. Exclusive `&mut` access
//! through these traits is what serializes every call to it.

use tessera_core::EngineVec3;

use crate::surface::SurfaceFace;

/// Maximum triangles the engine writes into a geometry buffer per tick.
pub const GEO_MAX_TRIANGLES: usize = 1024;

/// Read access to the host's 2-D collision map.
pub trait TileMap {
    /// Returns true if the tile at the given coordinate is solid.
    ///
    /// Coordinates outside the map must report `false` (open air).
    fn is_solid(&self, tile: tessera_core::TileCoord) -> bool;

    /// Map width in tiles.
    fn width(&self) -> i32;

    /// Map height in tiles.
    fn height(&self) -> i32;
}

/// Opaque identifier for a simulated character, minted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharacterHandle(u32);

impl CharacterHandle {
    /// Wraps a raw engine identifier. For engine bindings only.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw engine identifier.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque identifier for a registered surface object, minted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u32);

impl SurfaceHandle {
    /// Wraps a raw engine identifier. For engine bindings only.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw engine identifier.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Controller state forwarded to the engine each fixed step.
///
/// The bridge never interprets these; they pass through verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterInputs {
    /// Horizontal stick deflection in `[-1, 1]`.
    pub stick_x: f32,
    /// Vertical stick deflection in `[-1, 1]`.
    pub stick_y: f32,
    /// Jump button.
    pub button_a: bool,
    /// Action button.
    pub button_b: bool,
    /// Grab/crouch button.
    pub button_z: bool,
}

/// Character state reported by the engine after a tick.
///
/// The bridge consumes `position`; the rest is passthrough for the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterState {
    /// Engine-space position.
    pub position: EngineVec3,
    /// Engine-space velocity.
    pub velocity: EngineVec3,
    /// Facing angle in radians.
    pub face_angle: f32,
}

/// Geometry buffers the engine fills on every tick.
///
/// Buffers are allocated once at full capacity and written in place; only the
/// first `triangles_used` triangles are meaningful. Positions are the only
/// channel the bridge reads; normals, colors, and UVs are opaque payload the
/// host may forward to a renderer.
#[derive(Clone, Debug)]
pub struct EngineMesh {
    /// Vertex positions, 9 floats per triangle.
    pub positions: Vec<f32>,
    /// Vertex normals, 9 floats per triangle. Opaque to the bridge.
    pub normals: Vec<f32>,
    /// Vertex colors, 9 floats per triangle. Opaque to the bridge.
    pub colors: Vec<f32>,
    /// Vertex texture coordinates, 6 floats per triangle. Opaque to the bridge.
    pub uvs: Vec<f32>,
    /// Number of triangles the engine wrote this tick.
    pub triangles_used: usize,
}

impl EngineMesh {
    /// Allocates zeroed buffers sized for [`GEO_MAX_TRIANGLES`].
    #[must_use]
    pub fn with_max_capacity() -> Self {
        Self {
            positions: vec![0.0; GEO_MAX_TRIANGLES * 9],
            normals: vec![0.0; GEO_MAX_TRIANGLES * 9],
            colors: vec![0.0; GEO_MAX_TRIANGLES * 9],
            uvs: vec![0.0; GEO_MAX_TRIANGLES * 6],
            triangles_used: 0,
        }
    }

    /// Releases the buffers. Used on the destruction path; the value must not
    /// be ticked into afterwards.
    pub fn release(&mut self) {
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.colors = Vec::new();
        self.uvs = Vec::new();
        self.triangles_used = 0;
    }
}

/// A group of faces registered with the engine as one surface object.
///
/// Faces are engine-space, local to `origin`.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceObject<'a> {
    /// Engine-space origin the face vertices are relative to.
    pub origin: EngineVec3,
    /// The faces, at most eight (four face-pairs) per tile.
    pub faces: &'a [SurfaceFace],
}

/// The external character-simulation engine.
///
/// All calls are blocking and synchronous. Create calls may refuse by
/// returning `None`; delete calls are infallible. A handle passed to a delete
/// call must have come from the matching create call and must not be used
/// again afterwards.
pub trait SimEngine {
    /// Creates a character at an engine-space position. `None` means the
    /// engine refused (e.g. no floor below the spawn point).
    fn create_character(&mut self, position: EngineVec3, rotation: f32) -> Option<CharacterHandle>;

    /// Deletes a character. The handle is dead afterwards.
    fn delete_character(&mut self, handle: CharacterHandle);

    /// Counters the engine's internal depth-axis drift correction.
    ///
    /// Must be called once per fixed step, immediately before
    /// [`SimEngine::tick_character`].
    fn reset_vertical(&mut self, handle: CharacterHandle);

    /// Advances the character one fixed step, writing the resulting state and
    /// geometry into the supplied buffers.
    fn tick_character(
        &mut self,
        handle: CharacterHandle,
        inputs: &CharacterInputs,
        state: &mut CharacterState,
        mesh: &mut EngineMesh,
    );

    /// Registers a static surface object. `None` means the engine refused;
    /// the caller must not retry and must not record a handle.
    fn create_surface_object(&mut self, object: &SurfaceObject<'_>) -> Option<SurfaceHandle>;

    /// Deletes a surface object. The handle is dead afterwards.
    fn delete_surface_object(&mut self, handle: SurfaceHandle);
}
