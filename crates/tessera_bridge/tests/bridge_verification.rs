//! # Bridge Verification Tests
//!
//! End-to-end verification of the bridge's contract through the public API:
//!
//! 1. **Exposed-face culling**: buried tiles emit nothing
//! 2. **Replace-atomicity**: old window fully deleted before the new one exists
//! 3. **Capacity bound**: overflow truncates, never crashes
//! 4. **Interpolation bounds**: samples stay between the two snapshots
//! 5. **Accumulator conservation**: k steps of time yield exactly k ticks
//! 6. **Idempotent destroy**: one delete per create, always
//!
//! Run with: cargo test --test bridge_verification -- --nocapture

use std::collections::BTreeSet;

use tessera_bridge::{
    build_window, BridgeConfig, BridgeError, CharacterHandle, CharacterInputs, CharacterSim,
    CharacterState, EngineMesh, SimEngine, SurfaceBridge, SurfaceHandle, SurfaceObject, TileMap,
    WindowConfig, FIXED_STEP,
};
use tessera_core::{EngineVec3, Scale, TileCoord, WorldVec2};

// ============================================================================
// FIXTURES
// ============================================================================

/// Tile map from ASCII rows: `#` solid, `.` air.
struct AsciiMap {
    width: i32,
    height: i32,
    solid: Vec<bool>,
}

impl AsciiMap {
    fn new(rows: &[&str]) -> Self {
        let width = rows[0].len() as i32;
        let height = rows.len() as i32;
        let mut solid = Vec::new();
        for row in rows {
            assert_eq!(row.len() as i32, width);
            solid.extend(row.bytes().map(|b| b == b'#'));
        }
        Self { width, height, solid }
    }

    /// An empty map with a 3x3 solid block centered at `center`.
    fn with_block(width: i32, height: i32, center: TileCoord) -> Self {
        let mut map = Self { width, height, solid: vec![false; (width * height) as usize] };
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (x, y) = (center.x + dx, center.y + dy);
                map.solid[(y * width + x) as usize] = true;
            }
        }
        map
    }
}

impl TileMap for AsciiMap {
    fn is_solid(&self, tile: TileCoord) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && tile.x < self.width
            && tile.y < self.height
            && self.solid[(tile.y * self.width + tile.x) as usize]
    }
    fn width(&self) -> i32 {
        self.width
    }
    fn height(&self) -> i32 {
        self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    CreateSurface(u32),
    DeleteSurface(u32),
}

/// Engine stand-in that records call order and panics on handle misuse.
#[derive(Default)]
struct RecordingEngine {
    next_character: u32,
    next_surface: u32,
    live_characters: BTreeSet<u32>,
    live_surfaces: BTreeSet<u32>,
    character_creates: u32,
    character_deletes: u32,
    surface_creates: u32,
    surface_deletes: u32,
    ticks: u32,
    calls: Vec<Call>,
    refuse_characters: bool,
    /// Engine-space displacement per tick.
    motion: EngineVec3,
    position: EngineVec3,
}

impl SimEngine for RecordingEngine {
    fn create_character(&mut self, position: EngineVec3, _rotation: f32) -> Option<CharacterHandle> {
        if self.refuse_characters {
            return None;
        }
        let raw = self.next_character;
        self.next_character += 1;
        self.character_creates += 1;
        self.live_characters.insert(raw);
        self.position = position;
        Some(CharacterHandle::new(raw))
    }

    fn delete_character(&mut self, handle: CharacterHandle) {
        assert!(self.live_characters.remove(&handle.raw()), "double character delete");
        self.character_deletes += 1;
    }

    fn reset_vertical(&mut self, _handle: CharacterHandle) {}

    fn tick_character(
        &mut self,
        handle: CharacterHandle,
        _inputs: &CharacterInputs,
        state: &mut CharacterState,
        mesh: &mut EngineMesh,
    ) {
        assert!(self.live_characters.contains(&handle.raw()), "tick on dead handle");
        self.ticks += 1;
        self.position = self.position + self.motion;
        state.position = self.position;
        mesh.triangles_used = 1;
        for i in 0..9 {
            mesh.positions[i] = self.position.x + i as f32;
        }
    }

    fn create_surface_object(&mut self, object: &SurfaceObject<'_>) -> Option<SurfaceHandle> {
        assert!(!object.faces.is_empty());
        let raw = self.next_surface;
        self.next_surface += 1;
        self.surface_creates += 1;
        self.live_surfaces.insert(raw);
        self.calls.push(Call::CreateSurface(raw));
        Some(SurfaceHandle::new(raw))
    }

    fn delete_surface_object(&mut self, handle: SurfaceHandle) {
        assert!(self.live_surfaces.remove(&handle.raw()), "double surface delete");
        self.surface_deletes += 1;
        self.calls.push(Call::DeleteSurface(handle.raw()));
    }
}

fn classify_tiles(descriptors: &[tessera_bridge::SurfaceDescriptor]) -> Vec<(TileCoord, usize)> {
    let mut tiles: Vec<(TileCoord, usize)> = Vec::new();
    for d in descriptors {
        match tiles.last_mut() {
            Some((tile, count)) if *tile == d.tile => *count += 1,
            _ => tiles.push((d.tile, 1)),
        }
    }
    tiles
}

// ============================================================================
// MISSION 1: EXPOSED-FACE CULLING
// ============================================================================

#[test]
fn verify_block_scenario_emits_only_exposed_faces() {
    // A 3x3 solid block centered two tiles below the character.
    let map = AsciiMap::with_block(24, 20, TileCoord::new(10, 12));
    let mut out = Vec::new();
    let report = build_window(&map, TileCoord::new(10, 10), Scale::ONE, &WindowConfig::CLIENT, &mut out);

    let tiles = classify_tiles(&out);

    // Only the block's top row is reachable by the floor scan.
    assert_eq!(
        tiles.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        vec![TileCoord::new(9, 11), TileCoord::new(10, 11), TileCoord::new(11, 11)]
    );

    // Corner tiles: top + one side (2 face-pairs). Middle tile: top only.
    assert_eq!(tiles[0].1, 4);
    assert_eq!(tiles[1].1, 2);
    assert_eq!(tiles[2].1, 4);

    // The buried center of the block emits nothing at all.
    assert!(out.iter().all(|d| d.tile != TileCoord::new(10, 12)));
    assert_eq!(report.tiles_accepted, 3);
    assert_eq!(report.faces_emitted, 10);

    println!("[culling] 3 tiles, 10 faces, buried center silent");
}

// ============================================================================
// MISSION 2: WINDOW REPLACE-ATOMICITY
// ============================================================================

#[test]
fn verify_window_replacement_is_atomic() {
    // Flat floor; the character walks right one tile per tick.
    let rows = vec!["................................"; 7]
        .into_iter()
        .chain(["################################"])
        .collect::<Vec<_>>();
    let map = AsciiMap::new(&rows);

    let engine = RecordingEngine {
        motion: EngineVec3::new(32.0, 0.0, 0.0),
        ..RecordingEngine::default()
    };
    let mut bridge = SurfaceBridge::new(engine, map, BridgeConfig::client()).unwrap();
    let id = bridge.spawn_character(WorldVec2::new(8.0 * 32.0, 6.0 * 32.0), Scale::ONE).unwrap();

    let first_window: BTreeSet<u32> = bridge.engine().live_surfaces.clone();
    let creates_before = bridge.engine().calls.len();

    // Walk until a rebuild happens.
    for _ in 0..4 {
        bridge.update(id, &CharacterInputs::default(), FIXED_STEP).unwrap();
    }
    assert!(bridge.stats().windows_rebuilt >= 1);

    // Nothing from the first window survived the first rebuild.
    let live_now = &bridge.engine().live_surfaces;
    assert!(live_now.is_disjoint(&first_window));

    // In the recorded call stream, every delete of the old window precedes
    // every create of the new one.
    let calls = &bridge.engine().calls[creates_before..];
    let last_old_delete = calls
        .iter()
        .rposition(|c| matches!(c, Call::DeleteSurface(h) if first_window.contains(h)));
    let first_new_create = calls.iter().position(|c| matches!(c, Call::CreateSurface(_)));
    if let (Some(delete), Some(create)) = (last_old_delete, first_new_create) {
        assert!(delete < create, "a create overlapped the teardown of the old window");
    }

    println!("[atomicity] {} rebuilds, no overlap", bridge.stats().windows_rebuilt);
}

// ============================================================================
// MISSION 3: CAPACITY BOUND
// ============================================================================

#[test]
fn verify_capacity_truncates_without_crashing() {
    // Dense terrain everywhere below row 6, tiny capacity.
    let rows: Vec<String> = (0..24)
        .map(|y| if y < 6 { ".".repeat(48) } else { "#".repeat(48) })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let map = AsciiMap::new(&rows);

    let config = BridgeConfig {
        window: WindowConfig { radius: 3, band: 6, capacity: 4 },
        ..BridgeConfig::client()
    };

    let engine = RecordingEngine {
        motion: EngineVec3::new(32.0, 0.0, 0.0),
        ..RecordingEngine::default()
    };
    let mut bridge = SurfaceBridge::new(engine, map, config).unwrap();
    let id = bridge.spawn_character(WorldVec2::new(20.0 * 32.0, 4.0 * 32.0), Scale::ONE).unwrap();

    assert!(bridge.window_occupied(id).unwrap() <= 4);

    // Walking forces rebuilds; occupancy must never exceed capacity and the
    // dropped tiles must be counted.
    for _ in 0..8 {
        bridge.update(id, &CharacterInputs::default(), FIXED_STEP).unwrap();
        assert!(bridge.window_occupied(id).unwrap() <= 4);
    }
    assert!(bridge.stats().tiles_truncated > 0);

    println!(
        "[capacity] occupied <= 4 throughout, {} tiles truncated",
        bridge.stats().tiles_truncated
    );
}

// ============================================================================
// MISSION 4 + 5: DRIVER TIMING AND INTERPOLATION
// ============================================================================

#[test]
fn verify_accumulator_conservation_through_host() {
    let map = AsciiMap::new(&[
        "................................",
        "................................",
        "################################",
    ]);
    let engine = RecordingEngine::default();
    let mut bridge = SurfaceBridge::new(engine, map, BridgeConfig::server()).unwrap();
    let id = bridge.spawn_character(WorldVec2::new(512.0, 32.0), Scale::ONE).unwrap();

    // 24 updates of exactly one fixed step: exactly 24 engine ticks.
    for _ in 0..24 {
        bridge.update(id, &CharacterInputs::default(), FIXED_STEP).unwrap();
    }
    assert_eq!(bridge.engine().ticks, 24);
    assert_eq!(bridge.stats().steps_processed, 24);

    println!("[accumulator] 24 steps in, 24 ticks out");
}

#[test]
fn verify_interpolated_pose_stays_bounded() {
    let map = AsciiMap::new(&[
        "................................",
        "................................",
        "################################",
    ]);
    let engine = RecordingEngine {
        motion: EngineVec3::new(8.0, 0.0, 0.0),
        ..RecordingEngine::default()
    };
    let mut bridge = SurfaceBridge::new(engine, map, BridgeConfig::client()).unwrap();
    let id = bridge.spawn_character(WorldVec2::new(512.0, 32.0), Scale::ONE).unwrap();

    // Advance by quarter steps; the presented X must advance monotonically
    // and stay within the engine's stepped range.
    let mut previous = bridge.pose(id).unwrap().position.x;
    for _ in 0..32 {
        bridge.update(id, &CharacterInputs::default(), FIXED_STEP / 4.0).unwrap();
        let pose = bridge.pose(id).unwrap();
        let engine_x = bridge.engine().position.x;
        assert!(pose.position.x >= previous - 1e-3, "presented pose went backwards");
        assert!(pose.position.x <= engine_x + 1e-3, "presented pose overtook the simulation");
        previous = pose.position.x;
    }

    println!("[interpolation] pose monotone and bounded over 32 quarter-steps");
}

// ============================================================================
// MISSION 6: RESOURCE PAIRING
// ============================================================================

#[test]
fn verify_destroy_pairs_every_handle() {
    let map = AsciiMap::new(&[
        "................................",
        "................................",
        "################################",
    ]);
    let mut engine = RecordingEngine::default();
    let mut sim = CharacterSim::spawn(
        &mut engine,
        &map,
        &WindowConfig::CLIENT,
        WorldVec2::new(512.0, 32.0),
        Scale::ONE,
    )
    .unwrap();

    sim.update(&mut engine, &map, &CharacterInputs::default(), 3.0 * FIXED_STEP);

    // Destroy twice; the engine panics on any double delete.
    sim.destroy(&mut engine);
    sim.destroy(&mut engine);

    assert_eq!(engine.character_creates, 1);
    assert_eq!(engine.character_deletes, 1);
    assert_eq!(engine.surface_creates, engine.surface_deletes);
    assert!(engine.live_surfaces.is_empty());

    println!(
        "[pairing] {} surface creates, {} deletes, 0 live",
        engine.surface_creates, engine.surface_deletes
    );
}

#[test]
fn verify_refused_spawn_leaves_no_residue() {
    let map = AsciiMap::new(&[
        "................................",
        "................................",
        "################################",
    ]);
    let engine = RecordingEngine { refuse_characters: true, ..RecordingEngine::default() };
    let mut bridge = SurfaceBridge::new(engine, map, BridgeConfig::client()).unwrap();

    let result = bridge.spawn_character(WorldVec2::new(512.0, 32.0), Scale::ONE);
    assert!(matches!(result, Err(BridgeError::SpawnRefused { .. })));
    assert!(bridge.engine().live_surfaces.is_empty());
    assert_eq!(bridge.engine().surface_creates, bridge.engine().surface_deletes);
    assert_eq!(bridge.stats().spawns_failed, 1);
}
