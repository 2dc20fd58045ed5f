//! # Surface Lifecycle Manager
//!
//! Owns the slot table of engine-side surface handles. The engine keeps a
//! process-wide registry; this table is the bridge's ledger of what it has
//! registered there, and the ONLY path through which those handles are
//! created or deleted.
//!
//! ## Invariants
//!
//! - A handle, once stored, is deleted exactly once - never twice, never
//!   leaked.
//! - A window replacement deletes every previous handle before creating any
//!   new one, so the same physical tile can never be registered twice.
//! - Occupied slots never exceed the configured capacity.

use tessera_core::{tile_origin_engine, Scale};

use crate::surface::{SurfaceDescriptor, MAX_FACES_PER_TILE};
use crate::traits::{SimEngine, SurfaceHandle, SurfaceObject};

/// Hard upper bound of surface slots per window.
pub const MAX_SURFACES: usize = 128;

/// One slot of the window: empty, or holding a live engine handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotState {
    /// No handle stored.
    #[default]
    Empty,
    /// A live handle returned by exactly one engine create call.
    Occupied(SurfaceHandle),
}

/// The slot table for one character's streaming window.
pub struct SurfaceTable {
    /// Fixed slot storage; only the first `capacity` slots are ever used.
    slots: [SlotState; MAX_SURFACES],
    /// Configured in-use bound, at most [`MAX_SURFACES`].
    capacity: usize,
}

impl SurfaceTable {
    /// Creates an empty table with the given slot capacity.
    ///
    /// Capacity is validated by the window configuration; values outside
    /// `1..=MAX_SURFACES` are clamped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1 && capacity <= MAX_SURFACES);
        Self {
            slots: [SlotState::Empty; MAX_SURFACES],
            capacity: capacity.clamp(1, MAX_SURFACES),
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, SlotState::Occupied(_)))
            .count()
    }

    /// Iterates the live handles, in slot order.
    pub fn handles(&self) -> impl Iterator<Item = SurfaceHandle> + '_ {
        self.slots.iter().filter_map(|s| match s {
            SlotState::Occupied(h) => Some(*h),
            SlotState::Empty => None,
        })
    }

    /// Deletes every occupied slot. Idempotent.
    pub fn clear<E: SimEngine>(&mut self, engine: &mut E) {
        for slot in &mut self.slots {
            if let SlotState::Occupied(handle) = std::mem::take(slot) {
                engine.delete_surface_object(handle);
            }
        }
    }

    /// Replaces the window with the given descriptors.
    ///
    /// Every previous handle is deleted before any new object is created, so
    /// from the caller's point of view the replacement is atomic. Consecutive
    /// descriptors for the same tile are grouped into one engine object.
    /// Returns the number of objects created.
    pub fn install<E: SimEngine>(
        &mut self,
        engine: &mut E,
        descriptors: &[SurfaceDescriptor],
        scale: Scale,
    ) -> usize {
        self.clear(engine);

        let mut next_slot = 0usize;
        let mut i = 0usize;
        while i < descriptors.len() {
            let tile = descriptors[i].tile;

            // Collect this tile's run of faces.
            let mut faces = [descriptors[i].face; MAX_FACES_PER_TILE];
            let mut count = 0usize;
            while i < descriptors.len() && descriptors[i].tile == tile && count < MAX_FACES_PER_TILE
            {
                faces[count] = descriptors[i].face;
                count += 1;
                i += 1;
            }

            if next_slot >= self.capacity {
                // The builder bounds its output by the same capacity; landing
                // here means the caller handed us someone else's descriptors.
                tracing::warn!(
                    tile_x = tile.x,
                    tile_y = tile.y,
                    "surface window slots exhausted mid-install, dropping remainder"
                );
                break;
            }

            let object = SurfaceObject {
                origin: tile_origin_engine(tile, scale),
                faces: &faces[..count],
            };
            match engine.create_surface_object(&object) {
                Some(handle) => {
                    self.slots[next_slot] = SlotState::Occupied(handle);
                    next_slot += 1;
                }
                None => {
                    // Defensive: never store a poisoned handle.
                    tracing::warn!(
                        tile_x = tile.x,
                        tile_y = tile.y,
                        "engine refused surface object, slot left empty"
                    );
                }
            }
        }

        next_slot
    }
}
