//! Vehicle flight dynamics and the landing/crash state machine.
//!
//! The body integrates thrust, gravity, and atmosphere coupling with
//! explicit Euler under the normalized step scalar, then classifies any
//! terrain contact. `Landed` and `Exploded` are terminal: integration
//! stops and the owning simulation handles end-of-level effects.

use crate::atmosphere::AtmosphereModel;
use crate::clock::Step;
use crate::core_types::{ControlInput, Vec2, WorldBounds};
use crate::terrain::TerrainField;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use tracing::info;

/// Heading that points straight up (screen y is down-positive).
pub const UPRIGHT_ANGLE: f32 = -FRAC_PI_2;

/// Maximum |vx| at ground contact that still counts as a safe landing.
pub const SAFE_LANDING_VX: f32 = 2.0;

/// Maximum descent rate at ground contact that still counts as safe.
pub const SAFE_LANDING_VY: f32 = 3.0;

/// Maximum deviation from upright at ground contact, in radians.
pub const SAFE_LANDING_TILT: f32 = 0.35;

/// Heat added per unit of wind-relative speed per unit viscosity per tick.
const HEAT_FACTOR: f32 = 10.0;

/// Heat shed per tick regardless of atmosphere.
const COOLING_RATE: f32 = 0.1;

/// Fraction of |vx| lost per tick while resting on the launch pad.
const GROUND_FRICTION_LOSS: f32 = 0.1;

/// Wrap an angle difference into `[-pi, pi]`.
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Terminal-state machine of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    /// Integrating normally.
    Flying,
    /// Safely down on a registered pad (or docked); terminal.
    Landed,
    /// Destroyed by impact, hazard, or overheating; terminal.
    Exploded,
}

/// Gameplay tuning for the vehicle.
///
/// Kept separate from level configuration: these are properties of the
/// craft, not of the world it flies in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleTuning {
    /// Velocity added per tick at full thrust.
    pub thrust_power: f32,
    /// Radians turned per tick per rotate intent.
    pub rotation_speed: f32,
    /// Fuel units burned per tick of thrust.
    pub fuel_consumption: f32,
    /// Heat level at which the hull fails.
    pub max_heat: f32,
    /// Visual/collision size in pixels.
    pub size: f32,
    /// Fuel at level start.
    pub initial_fuel: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        VehicleTuning {
            thrust_power: 0.1,
            rotation_speed: 0.08,
            fuel_consumption: 0.1,
            max_heat: 100.0,
            size: 20.0,
            initial_fuel: 100.0,
        }
    }
}

/// The player vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightBody {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) angle: f32,
    pub(crate) fuel: f32,
    pub(crate) heat: f32,
    state: FlightState,
    is_thrusting: bool,
    tuning: VehicleTuning,
}

impl FlightBody {
    /// Spawn a vehicle at a position; `angle` defaults to upright and
    /// `vx` to zero when absent from the level data.
    pub fn new(x: f32, y: f32, angle: Option<f32>, vx: Option<f32>, tuning: VehicleTuning) -> Self {
        FlightBody {
            x,
            y,
            vx: vx.unwrap_or(0.0),
            vy: 0.0,
            angle: angle.unwrap_or(UPRIGHT_ANGLE),
            fuel: tuning.initial_fuel,
            heat: 0.0,
            state: FlightState::Flying,
            is_thrusting: false,
            tuning,
        }
    }

    /// Integrate one step of flight.
    ///
    /// No-op once the state machine has left `Flying`.
    pub fn update(
        &mut self,
        input: ControlInput,
        step: Step,
        world: WorldBounds,
        atmosphere: &AtmosphereModel,
        terrain: &TerrainField,
    ) {
        if self.state != FlightState::Flying {
            self.is_thrusting = false;
            return;
        }

        // 1. Rotation.
        if input.rotate_left {
            self.angle -= self.tuning.rotation_speed * step.scale;
        }
        if input.rotate_right {
            self.angle += self.tuning.rotation_speed * step.scale;
        }

        // 2. Thrust.
        self.is_thrusting = input.thrust && self.fuel > 0.0;
        if self.is_thrusting {
            self.fuel = (self.fuel - self.tuning.fuel_consumption * step.scale).max(0.0);
            self.vx += self.angle.cos() * self.tuning.thrust_power * step.scale;
            self.vy += self.angle.sin() * self.tuning.thrust_power * step.scale;
        }

        // 3. Gravity.
        self.vy += world.gravity * step.scale;

        // 4. Atmosphere coupling. Viscosity acts as a multiplicative decay
        // of wind-relative velocity; an additive drag term goes unstable
        // once `viscosity * scale` crosses 1 on a slow frame.
        let layer = atmosphere.layer_at(self.y);
        if layer.viscosity > 0.0 || layer.wind != 0.0 {
            let decay = (1.0 - layer.viscosity * step.scale).max(0.0);
            let rel_vx = self.vx - layer.wind;
            let rel_vy = self.vy;
            self.vx = layer.wind + rel_vx * decay;
            self.vy = rel_vy * decay;

            let rel_speed = (rel_vx * rel_vx + rel_vy * rel_vy).sqrt();
            self.heat += rel_speed * layer.viscosity * HEAT_FACTOR * step.scale;
        }
        self.heat = (self.heat - COOLING_RATE * step.scale).max(0.0);

        // 5. Integrate position; the world wraps horizontally.
        self.x = world.wrap_x(self.x + self.vx * step.scale);
        self.y += self.vy * step.scale;

        // 6. Terrain contact.
        let half = self.tuning.size / 2.0;
        let ground = terrain.height_at(self.x);
        if self.y + half >= ground.y {
            let impact_vy = self.vy;
            self.y = ground.y - half;
            self.vy = 0.0;

            let tilt = wrap_angle(self.angle - UPRIGHT_ANGLE);
            let safe = self.vx.abs() <= SAFE_LANDING_VX
                && impact_vy <= SAFE_LANDING_VY
                && tilt.abs() <= SAFE_LANDING_TILT;

            if safe && ground.is_pad {
                self.state = FlightState::Landed;
                info!(x = self.x, fuel = self.fuel, "vehicle landed");
                return;
            } else if safe && ground.is_launch_pad {
                // Resting on the launch platform is not a win condition;
                // bleed off residual slide.
                self.vx *= (1.0 - GROUND_FRICTION_LOSS * step.scale).max(0.0);
            } else {
                self.state = FlightState::Exploded;
                info!(
                    x = self.x,
                    vx = self.vx,
                    vy = impact_vy,
                    tilt,
                    on_pad = ground.is_pad,
                    "vehicle crashed"
                );
                return;
            }
        }

        // 7. Overheat.
        if self.heat >= self.tuning.max_heat {
            self.state = FlightState::Exploded;
            info!(heat = self.heat, "vehicle overheated");
        }
    }

    /// External destruction (meteorite, debris, lightning).
    pub(crate) fn destroy(&mut self) {
        if self.state == FlightState::Flying {
            self.state = FlightState::Exploded;
        }
    }

    /// Successful station docking counts as a landing.
    pub(crate) fn dock(&mut self) {
        if self.state == FlightState::Flying {
            self.state = FlightState::Landed;
            info!(x = self.x, y = self.y, "vehicle docked");
        }
    }

    /// Velocity kick from an external effect (geyser bubbles).
    pub(crate) fn apply_impulse(&mut self, dvx: f32, dvy: f32) {
        if self.state == FlightState::Flying {
            self.vx += dvx;
            self.vy += dvy;
        }
    }

    /// Height of the lower edge above the ground directly below.
    pub fn altitude_above(&self, terrain: &TerrainField) -> f32 {
        (terrain.height_at(self.x).y - self.y - self.tuning.size / 2.0).max(0.0)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }

    /// Heading in radians; [`UPRIGHT_ANGLE`] points up.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn heat(&self) -> f32 {
        self.heat
    }

    /// Engine firing this step (for flame rendering).
    pub fn is_thrusting(&self) -> bool {
        self.is_thrusting
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_flying(&self) -> bool {
        self.state == FlightState::Flying
    }

    /// Visual/collision size in pixels.
    pub fn size(&self) -> f32 {
        self.tuning.size
    }
}
