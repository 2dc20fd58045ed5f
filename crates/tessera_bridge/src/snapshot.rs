//! # Snapshot Ring & Interpolation
//!
//! The engine is only valid at its native 30 Hz cadence; the render rate is
//! whatever the host's frame timer says. The driver therefore keeps the last
//! two fixed-step snapshots and presents a blend of them, so motion stays
//! smooth without re-deriving any physics state.
//!
//! The ring has depth 2: `last` and `current`. Rotating the ring swaps the
//! buffers instead of copying them - both snapshots are pre-allocated at full
//! mesh capacity and rewritten in place, so a step allocates nothing.

use tessera_core::{lerp, WorldVec2};

use crate::surface::lerp_positions;
use crate::traits::GEO_MAX_TRIANGLES;

/// One fixed-step capture: world-space position plus the world-space mesh.
#[derive(Clone, Debug)]
pub struct SimSnapshot {
    /// Character position in host world space.
    pub position: WorldVec2,
    /// World-space vertex positions, 9 floats per triangle, allocated at
    /// [`GEO_MAX_TRIANGLES`] capacity.
    pub mesh_positions: Vec<f32>,
    /// Triangles the engine reported for this step.
    pub triangles_used: usize,
}

impl SimSnapshot {
    /// A zeroed snapshot with full-capacity buffers.
    #[must_use]
    pub fn at_capacity() -> Self {
        Self {
            position: WorldVec2::ZERO,
            mesh_positions: vec![0.0; GEO_MAX_TRIANGLES * 9],
            triangles_used: 0,
        }
    }

    /// Releases the mesh buffer. Destruction path only.
    fn release(&mut self) {
        self.position = WorldVec2::ZERO;
        self.mesh_positions = Vec::new();
        self.triangles_used = 0;
    }
}

/// Depth-2 snapshot ring with render-time sampling.
pub struct InterpolationBuffer {
    last: SimSnapshot,
    current: SimSnapshot,
    primed: bool,
}

impl InterpolationBuffer {
    /// Creates an unprimed ring with pre-allocated snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: SimSnapshot::at_capacity(),
            current: SimSnapshot::at_capacity(),
            primed: false,
        }
    }

    /// Rotates the ring (current becomes last) and hands out the new current
    /// snapshot for the step to fill. This is the "push".
    pub fn begin_step(&mut self) -> &mut SimSnapshot {
        std::mem::swap(&mut self.last, &mut self.current);
        self.primed = true;
        &mut self.current
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn current(&self) -> &SimSnapshot {
        &self.current
    }

    /// True once at least one step has been pushed.
    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Interpolated position for a render fraction in `[0, 1)`.
    ///
    /// Sampling an unprimed ring is a programming error: flagged by a debug
    /// assertion, zero position in release.
    #[must_use]
    pub fn sample_position(&self, fraction: f32) -> WorldVec2 {
        debug_assert!(self.primed, "sampled interpolation ring before first step");
        if !self.primed {
            return WorldVec2::ZERO;
        }
        WorldVec2::new(
            lerp(self.last.position.x, self.current.position.x, fraction),
            lerp(self.last.position.y, self.current.position.y, fraction),
        )
    }

    /// Interpolates the active mesh vertices into `out` and returns the
    /// triangle count.
    ///
    /// The triangle count is not interpolated - it snaps to the current
    /// step's count, and only that many triangles are written.
    pub fn sample_mesh_into(&self, fraction: f32, out: &mut [f32]) -> usize {
        debug_assert!(self.primed, "sampled interpolation ring before first step");
        if !self.primed {
            return 0;
        }
        let triangles = self.current.triangles_used;
        lerp_positions(
            &self.last.mesh_positions,
            &self.current.mesh_positions,
            fraction,
            triangles,
            out,
        );
        triangles
    }

    /// Releases both snapshots. Destruction path only; the ring must not be
    /// stepped again.
    pub fn release(&mut self) {
        self.last.release();
        self.current.release();
        self.primed = false;
    }
}

impl Default for InterpolationBuffer {
    fn default() -> Self {
        Self::new()
    }
}
