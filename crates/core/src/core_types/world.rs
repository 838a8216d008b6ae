//! Shared world-extent parameters threaded through every update.

use serde::{Deserialize, Serialize};

/// World dimensions and gravity, fixed for the lifetime of a level.
///
/// The world wraps horizontally at `width`; altitude is measured down
/// from `height` (screen y is down-positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    /// Downward acceleration per tick at 60 Hz.
    pub gravity: f32,
}

impl WorldBounds {
    /// Wrap an x coordinate into `[0, width)`.
    #[inline]
    pub fn wrap_x(&self, x: f32) -> f32 {
        x.rem_euclid(self.width)
    }
}
