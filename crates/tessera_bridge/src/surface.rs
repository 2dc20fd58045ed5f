//! # Surface Geometry
//!
//! One solid tile exposes up to four orthogonal faces; each exposed face
//! becomes a pair of triangles (a quad) registered with the engine. Vertices
//! are engine-space, local to the tile's surface-object origin, and span the
//! full tile in X/Y with a deep quad (±2 tiles) along the artificial Z axis
//! so the character cannot slip off the world plane.
//!
//! Winding is engine-facing: the engine classifies floors, walls, and
//! ceilings from the triangle normals, so the vertex order of each face is
//! part of the contract and must not be "simplified".

use tessera_core::{lerp, EngineVec3, Scale, TileCoord, TILE_SIZE};

/// Terrain class forwarded to the engine with every face.
///
/// The engine maps this to footstep sounds and particle effects; the bridge
/// treats it as an opaque tag. Tile maps without material data use `Stone`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerrainTag {
    /// Rock and masonry. The default for untagged tiles.
    #[default]
    Stone,
    /// Soil and grass.
    Grass,
    /// Sand and gravel.
    Sand,
    /// Snow and ice.
    Snow,
}

/// Surface behavior class forwarded to the engine with every face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Ordinary walkable surface.
    #[default]
    Default,
    /// Reduced-friction surface.
    Slippery,
}

/// The four orthogonal faces a tile can expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceDir {
    /// Upward face (the ground the character stands on).
    Top,
    /// Face on the tile's left edge.
    Left,
    /// Face on the tile's right edge.
    Right,
    /// Downward face (a ceiling from below).
    Bottom,
}

impl FaceDir {
    /// Emission order. Part of the contract: it fixes the descriptor order
    /// within a tile and therefore which faces survive capacity truncation.
    pub const ALL: [Self; 4] = [Self::Top, Self::Left, Self::Right, Self::Bottom];

    /// The neighboring tile whose solidity decides whether this face is
    /// exposed.
    #[inline]
    #[must_use]
    pub const fn neighbor(self, tile: TileCoord) -> TileCoord {
        match self {
            Self::Top => tile.above(),
            Self::Left => tile.left(),
            Self::Right => tile.right(),
            Self::Bottom => tile.below(),
        }
    }
}

/// One engine-space triangle, local to its tile's surface-object origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFace {
    /// Triangle vertices in engine winding order.
    pub vertices: [EngineVec3; 3],
    /// Surface behavior class.
    pub kind: SurfaceKind,
    /// Terrain class.
    pub terrain: TerrainTag,
}

/// One triangle of the streaming window, tagged with the tile that owns it.
///
/// Produced by the window builder, consumed immediately by the lifecycle
/// manager; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDescriptor {
    /// The solid tile this triangle belongs to.
    pub tile: TileCoord,
    /// The triangle itself.
    pub face: SurfaceFace,
}

/// Upper bound of faces a single tile can emit (four face-pairs).
pub const MAX_FACES_PER_TILE: usize = 8;

/// Depth half-extent of every face quad along the Z axis, in world units.
const QUAD_DEPTH: i32 = TILE_SIZE * 2;

/// Local vertex tables per face, in world units before scaling.
///
/// Two triangles per face; winding taken from the engine's surface
/// conventions (Y up). X/Y span the tile edge, Z spans `±QUAD_DEPTH`.
const fn face_table(dir: FaceDir) -> [[[i32; 3]; 3]; 2] {
    const T: i32 = TILE_SIZE;
    const D: i32 = QUAD_DEPTH;
    match dir {
        FaceDir::Top => [
            [[T, T, D], [0, T, -D], [0, T, D]],
            [[0, T, -D], [T, T, D], [T, T, -D]],
        ],
        FaceDir::Left => [
            [[0, 0, -D], [0, T, D], [0, T, -D]],
            [[0, T, D], [0, 0, -D], [0, 0, D]],
        ],
        FaceDir::Right => [
            [[T, 0, D], [T, T, -D], [T, T, D]],
            [[T, T, -D], [T, 0, D], [T, 0, -D]],
        ],
        FaceDir::Bottom => [
            [[0, 0, D], [0, 0, -D], [T, 0, D]],
            [[T, 0, -D], [T, 0, D], [0, 0, -D]],
        ],
    }
}

/// Builds the two scaled triangles for one exposed face.
#[must_use]
pub fn face_pair(dir: FaceDir, scale: Scale, terrain: TerrainTag) -> [SurfaceFace; 2] {
    let s = scale.factor();
    let table = face_table(dir);
    let mut out = [SurfaceFace {
        vertices: [EngineVec3::ZERO; 3],
        kind: SurfaceKind::Default,
        terrain,
    }; 2];
    for (tri, face) in table.iter().zip(out.iter_mut()) {
        for (src, dst) in tri.iter().zip(face.vertices.iter_mut()) {
            *dst = EngineVec3::new(src[0] as f32 / s, src[1] as f32 / s, src[2] as f32 / s);
        }
    }
    out
}

/// Componentwise linear interpolation of two flat vertex-position buffers.
///
/// Interpolates the first `3 * triangles * 3` floats; the buffers may be
/// longer (pre-allocated at capacity).
pub fn lerp_positions(last: &[f32], current: &[f32], fraction: f32, triangles: usize, out: &mut [f32]) {
    let floats = triangles * 9;
    debug_assert!(last.len() >= floats && current.len() >= floats && out.len() >= floats);
    for i in 0..floats {
        out[i] = lerp(last[i], current[i], fraction);
    }
}
