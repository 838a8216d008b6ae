//! Frame-time normalization for the fixed-rate-equivalent step.
//!
//! The external presentation loop hands the simulation a raw frame delta.
//! Physics tuning assumes 60 Hz, so every per-tick delta in the simulation
//! is scaled by `dt * 60`; a 30 Hz frame simply applies twice the delta.
//! A paused or backgrounded host can produce a multi-second delta, which
//! would blow up the explicit Euler integration, so oversized or invalid
//! deltas fall back to the nominal step.

use serde::{Deserialize, Serialize};

/// Reference update rate the physics constants are tuned against (Hz).
pub const NOMINAL_RATE: f32 = 60.0;

/// Nominal frame delta at the reference rate (seconds).
pub const NOMINAL_DT: f32 = 1.0 / NOMINAL_RATE;

/// Largest frame delta accepted as-is (seconds). Anything above this is
/// treated as a stall and replaced by [`NOMINAL_DT`].
pub const MAX_DT: f32 = 0.1;

/// One normalized simulation step.
///
/// `dt` is the wall-clock duration in seconds (used by the second-based
/// state machines: geysers, lightning, bubbles). `scale` is the
/// 60 Hz-equivalent multiplier `dt * 60` applied to every per-tick
/// physics delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Clamped frame delta in seconds.
    pub dt: f32,
    /// Fixed-rate-equivalent scalar (`dt * 60`).
    pub scale: f32,
}

/// Normalizes raw frame deltas into [`Step`] values and tracks elapsed
/// simulation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationClock {
    elapsed: f32,
    ticks: u64,
}

impl SimulationClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        SimulationClock::default()
    }

    /// Normalize a raw frame delta into a step.
    ///
    /// Non-finite, non-positive, or stalled (`> MAX_DT`) deltas fall back
    /// to the nominal 1/60 s step so a single bad frame can never produce
    /// an explosive integration step.
    pub fn tick(&mut self, raw_dt: f32) -> Step {
        let dt = if raw_dt.is_finite() && raw_dt > 0.0 && raw_dt <= MAX_DT {
            raw_dt
        } else {
            NOMINAL_DT
        };

        self.elapsed += dt;
        self.ticks += 1;

        Step {
            dt,
            scale: dt * NOMINAL_RATE,
        }
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of steps taken.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
