//! Ground geysers: eruption state machine and bubble column physics.
//!
//! A geyser cycles `recharging -> erupting -> recharging` for the lifetime
//! of the level, with per-instance randomized durations so a level full of
//! geysers never pulses in lockstep. While erupting it emits a column of
//! upward-biased bubbles; a bubble close to the vehicle applies a damped
//! upward impulse plus minor lateral turbulence.

use crate::clock::Step;
use crate::config::GeyserConfig;
use crate::core_types::Vec2;
use crate::vehicle::FlightBody;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Seconds a fully drained bubble lives.
const BUBBLE_LIFE: f32 = 2.5;

/// Extra proximity margin for bubble/vehicle interaction in pixels.
const BUBBLE_CONTACT_MARGIN: f32 = 10.0;

/// Damping applied to the raw eruption strength. A full-strength impulse
/// trivially out-lifts gravity and launches the vehicle off-screen.
const IMPULSE_DAMPING: f32 = 0.2;

/// Lateral turbulence fraction of the damped impulse.
const TURBULENCE_DAMPING: f32 = 0.1;

/// Recharge interval used when the configured frequency is zero.
const FALLBACK_INTERVAL: f32 = 10.0;

/// Eruption phase of a geyser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeyserState {
    /// Waiting out the recharge interval.
    Recharging,
    /// Actively emitting bubbles.
    Erupting,
}

/// One bubble in the eruption column.
///
/// Velocities are in pixels per second (bubbles integrate on wall-clock
/// `dt`, not on the 60 Hz step scalar).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub life: f32,
}

impl Bubble {
    /// Render opacity, fading with remaining life.
    pub fn alpha(&self) -> f32 {
        (self.life / BUBBLE_LIFE * 0.5).clamp(0.0, 0.6)
    }
}

/// A geyser bound to one ground point for the lifetime of the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geyser {
    x: f32,
    y: f32,
    strength: f32,
    state: GeyserState,
    timer: f32,
    eruption_duration: f32,
    recharge_interval: f32,
    bubbles: Vec<Bubble>,
}

impl Geyser {
    /// Bind a geyser to a terrain anchor point.
    ///
    /// Durations are randomized per instance at construction; the initial
    /// timer is offset so geysers created together stay out of phase.
    pub fn new(anchor: Vec2, config: &GeyserConfig, rng: &mut StdRng) -> Self {
        let base_interval = if config.frequency > 0.0 {
            1.0 / config.frequency
        } else {
            FALLBACK_INTERVAL
        };

        Geyser {
            x: anchor.x,
            y: anchor.y,
            strength: config.strength,
            state: GeyserState::Recharging,
            timer: rng.random::<f32>() * base_interval,
            eruption_duration: 2.5 + rng.random::<f32>(),
            recharge_interval: base_interval + rng.random::<f32>() * 3.0,
            bubbles: Vec::new(),
        }
    }

    /// Advance the eruption cycle and the bubble column by one step.
    pub fn update(&mut self, step: Step, body: &mut FlightBody, rng: &mut StdRng) {
        self.timer += step.dt;

        match self.state {
            GeyserState::Erupting => {
                if rng.random::<f32>() < 0.5 {
                    self.spawn_bubble(rng);
                }
                if self.timer > self.eruption_duration {
                    self.state = GeyserState::Recharging;
                    self.timer = 0.0;
                }
            }
            GeyserState::Recharging => {
                if self.timer > self.recharge_interval {
                    self.state = GeyserState::Erupting;
                    self.timer = 0.0;
                }
            }
        }

        let contact_radius = body.size() + BUBBLE_CONTACT_MARGIN;
        for bubble in &mut self.bubbles {
            bubble.x += bubble.vx * step.dt;
            bubble.y += bubble.vy * step.dt;
            bubble.life -= step.dt;

            if body.is_flying() {
                let dx = body.x() - bubble.x;
                let dy = body.y() - bubble.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < contact_radius + bubble.size {
                    body.apply_impulse(
                        (rng.random::<f32>() - 0.5) * self.strength * step.dt * TURBULENCE_DAMPING,
                        -self.strength * step.dt * IMPULSE_DAMPING,
                    );
                }
            }
        }
        self.bubbles.retain(|b| b.life > 0.0);
    }

    fn spawn_bubble(&mut self, rng: &mut StdRng) {
        self.bubbles.push(Bubble {
            x: self.x + (rng.random::<f32>() - 0.5) * 10.0,
            y: self.y,
            vx: (rng.random::<f32>() - 0.5) * 10.0,
            vy: -100.0 - rng.random::<f32>() * 100.0,
            size: 3.0 + rng.random::<f32>() * 8.0,
            life: BUBBLE_LIFE,
        });
    }

    /// Vent position x.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vent position y (ground height at the anchor).
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Current phase of the eruption cycle.
    pub fn state(&self) -> GeyserState {
        self.state
    }

    /// Live bubbles in the column, for the renderer.
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimulationClock;
    use crate::vehicle::{FlightBody, VehicleTuning};
    use rand::SeedableRng;

    fn test_geyser(rng: &mut StdRng) -> Geyser {
        let config = GeyserConfig {
            min: 1,
            max: 1,
            strength: 120.0,
            frequency: 0.5,
        };
        Geyser::new(Vec2::new(400.0, 1600.0), &config, rng)
    }

    fn distant_body() -> FlightBody {
        FlightBody::new(10_000.0, 100.0, None, None, VehicleTuning::default())
    }

    #[test]
    fn test_cycle_reaches_eruption_and_recharges() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut geyser = test_geyser(&mut rng);
        let mut body = distant_body();
        let mut clock = SimulationClock::new();
        assert_eq!(geyser.state(), GeyserState::Recharging);

        let mut saw_eruption = false;
        let mut saw_recharge_after = false;
        for _ in 0..(20.0 * 60.0) as usize {
            let step = clock.tick(1.0 / 60.0);
            geyser.update(step, &mut body, &mut rng);
            match geyser.state() {
                GeyserState::Erupting => saw_eruption = true,
                GeyserState::Recharging => {
                    if saw_eruption {
                        saw_recharge_after = true;
                    }
                }
            }
        }
        assert!(saw_eruption, "geyser never erupted in 20 s");
        assert!(saw_recharge_after, "geyser never recharged after erupting");
    }

    #[test]
    fn test_eruption_emits_rising_bubbles() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut geyser = test_geyser(&mut rng);
        let mut body = distant_body();
        let mut clock = SimulationClock::new();

        for _ in 0..(10.0 * 60.0) as usize {
            let step = clock.tick(1.0 / 60.0);
            geyser.update(step, &mut body, &mut rng);
            if !geyser.bubbles().is_empty() {
                break;
            }
        }
        assert!(!geyser.bubbles().is_empty());
        for bubble in geyser.bubbles() {
            assert!(bubble.vy < 0.0, "bubbles must rise");
        }
    }

    #[test]
    fn test_bubble_contact_pushes_vehicle_up_damped() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GeyserConfig {
            min: 1,
            max: 1,
            strength: 120.0,
            frequency: 0.5,
        };
        let mut geyser = Geyser::new(Vec2::new(400.0, 1600.0), &config, &mut rng);
        // Park a bubble directly on the vehicle.
        geyser.bubbles.push(Bubble {
            x: 400.0,
            y: 1500.0,
            vx: 0.0,
            vy: 0.0,
            size: 6.0,
            life: BUBBLE_LIFE,
        });
        let mut body = FlightBody::new(400.0, 1500.0, None, None, VehicleTuning::default());
        let mut clock = SimulationClock::new();
        let step = clock.tick(1.0 / 60.0);

        geyser.update(step, &mut body, &mut rng);

        let lift = -body.velocity().y;
        assert!(lift > 0.0, "bubble contact must push the vehicle up");
        // Damped impulse: far below the raw strength integral.
        assert!(lift < 120.0 * step.dt, "impulse must be damped, got {lift}");
    }

    #[test]
    fn test_zero_frequency_still_cycles() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = GeyserConfig {
            min: 1,
            max: 1,
            strength: 50.0,
            frequency: 0.0,
        };
        let mut geyser = Geyser::new(Vec2::new(100.0, 900.0), &config, &mut rng);
        let mut body = distant_body();
        let mut clock = SimulationClock::new();

        let mut erupted = false;
        for _ in 0..(30.0 * 60.0) as usize {
            let step = clock.tick(1.0 / 60.0);
            geyser.update(step, &mut body, &mut rng);
            erupted |= geyser.state() == GeyserState::Erupting;
        }
        assert!(erupted, "zero frequency falls back to a finite interval");
    }
}
