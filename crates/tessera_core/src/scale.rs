//! # Scale
//!
//! The host configures how large the simulated character appears relative to
//! the tile map as a percentage. Every world/engine conversion divides or
//! multiplies by the resulting factor, so a zero or non-finite factor would
//! poison every coordinate downstream. `Scale` validates once at the boundary;
//! conversions are infallible afterwards.

use thiserror::Error;

/// Errors from constructing a [`Scale`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleError {
    /// The factor was NaN or infinite.
    #[error("scale factor is not finite")]
    NotFinite,

    /// The factor was zero or negative.
    #[error("scale factor must be strictly positive")]
    NotPositive,
}

/// A validated, strictly positive, finite scale factor.
///
/// World -> engine conversions divide by the factor; engine -> world
/// conversions multiply by it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale(f32);

impl Scale {
    /// The identity scale (100%).
    pub const ONE: Self = Self(1.0);

    /// Validates a raw factor.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError`] if the factor is non-finite, zero, or negative.
    pub fn new(factor: f32) -> Result<Self, ScaleError> {
        if !factor.is_finite() {
            return Err(ScaleError::NotFinite);
        }
        if factor <= 0.0 {
            return Err(ScaleError::NotPositive);
        }
        Ok(Self(factor))
    }

    /// Builds a scale from a host-facing percentage (100 = identity).
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::NotPositive`] for a zero percentage.
    pub fn from_percent(percent: u32) -> Result<Self, ScaleError> {
        Self::new(percent as f32 / 100.0)
    }

    /// The raw factor.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> f32 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}
