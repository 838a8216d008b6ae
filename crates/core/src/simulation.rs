//! The simulation facade: owns every mutable piece of level state and
//! drives one update pass per rendered frame.
//!
//! Single-threaded by design: the body, terrain, atmosphere, and hazards
//! are densely cross-dependent within a step, and the external driver
//! calls [`Simulation::step`] exactly once per frame. `step` never blocks,
//! never panics, and never returns an error; a level is abandoned by
//! dropping the simulation and constructing a new one.

use crate::atmosphere::AtmosphereModel;
use crate::clock::{SimulationClock, Step};
use crate::config::{ConfigError, LevelConfig};
use crate::core_types::{ControlInput, WorldBounds};
use crate::hazard::{Geyser, HazardField};
use crate::terrain::TerrainField;
use crate::vehicle::{FlightBody, FlightState, VehicleTuning};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Vehicle friction spark chance per unit of heating per tick.
const FRICTION_SPARK_CHANCE: f32 = 4.0;

/// Fragment count of the vehicle destruction burst.
const DESTRUCTION_BURST: u32 = 40;

/// One running level.
pub struct Simulation {
    name: String,
    world: WorldBounds,
    clock: SimulationClock,
    terrain: TerrainField,
    atmosphere: AtmosphereModel,
    body: FlightBody,
    hazards: HazardField,
    rng: StdRng,
    explosion_spawned: bool,
}

impl Simulation {
    /// Build a level from validated configuration.
    ///
    /// The seed drives every random decision (terrain walk, pad and geyser
    /// placement, hazard spawns, bolt geometry), so identical config and
    /// seed reproduce an identical level.
    pub fn new(config: &LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let world = WorldBounds {
            width: config.width,
            height: config.height,
            gravity: config.gravity,
        };

        // Levels that start on the ground need the launch platform.
        let terrain = TerrainField::generate(
            &config.terrain,
            world.width,
            world.height,
            config.start_on_ground,
            &mut rng,
        );
        let atmosphere = AtmosphereModel::new(&config.atmosphere, world.height);

        let mut hazards = HazardField::new();
        atmosphere.init_features(&mut hazards, world.width, &mut rng);
        if let Some(geyser_config) = &config.terrain.geysers {
            for anchor in terrain.geyser_anchors() {
                hazards.add_geyser(Geyser::new(*anchor, geyser_config, &mut rng));
            }
        }
        for station in &config.space_stations {
            let x = station
                .x
                .unwrap_or_else(|| rng.random::<f32>() * world.width);
            let y = world.height - station.altitude;
            hazards.spawn_station(x, y, station.speed, station.size, station.dual_pad, &mut rng);
        }

        let tuning = VehicleTuning::default();
        let body = match (config.start_on_ground, terrain.launch_pad_position()) {
            (true, Some(launch)) => {
                FlightBody::new(launch.x, launch.y - tuning.size / 2.0, None, None, tuning)
            }
            _ => FlightBody::new(
                config.ship_start.x,
                config.ship_start.y,
                config.ship_start.angle,
                config.ship_start.vx,
                tuning,
            ),
        };

        info!(name = %config.name, seed, "level initialized");
        Ok(Simulation {
            name: config.name.clone(),
            world,
            clock: SimulationClock::new(),
            terrain,
            atmosphere,
            body,
            hazards,
            rng,
            explosion_spawned: false,
        })
    }

    /// Advance the whole level by one frame.
    ///
    /// `dt` is the raw frame delta in seconds; it is clamped before use.
    /// Order: clock, vehicle, vehicle friction sparks, atmosphere spawns,
    /// hazard pass, then the one-shot destruction burst if the vehicle
    /// died this step.
    pub fn step(&mut self, dt: f32, input: ControlInput) {
        let step = self.clock.tick(dt);

        self.body
            .update(input, step, self.world, &self.atmosphere, &self.terrain);
        self.vehicle_friction_sparks(step);

        self.atmosphere
            .update(step, &mut self.hazards, self.world.width, &mut self.rng);
        self.hazards.update(
            step,
            self.world,
            &self.atmosphere,
            &self.terrain,
            &mut self.body,
            &mut self.rng,
        );

        if self.body.state() == FlightState::Exploded && !self.explosion_spawned {
            self.explosion_spawned = true;
            let velocity = self.body.velocity();
            self.hazards.spawn_explosion(
                self.body.x(),
                self.body.y(),
                velocity.x,
                velocity.y,
                DESTRUCTION_BURST,
                &mut self.rng,
            );
        }
    }

    /// Sparks trailing the vehicle while it heats up in a viscous layer.
    fn vehicle_friction_sparks(&mut self, step: Step) {
        if !self.body.is_flying() {
            return;
        }
        let layer = self.atmosphere.layer_at(self.body.y());
        let (viscosity, wind) = (layer.viscosity, layer.wind);
        if viscosity <= 0.0 {
            return;
        }

        let rel_vx = self.body.velocity().x - wind;
        let rel_vy = self.body.velocity().y;
        let speed = (rel_vx * rel_vx + rel_vy * rel_vy).sqrt();
        let chance = (speed * viscosity * FRICTION_SPARK_CHANCE * step.scale).min(1.0);
        if self.rng.random::<f32>() < chance {
            // Sparks trail behind the wind-relative motion.
            self.hazards.spawn_friction_spark(
                self.body.x(),
                self.body.y(),
                -rel_vx * 0.2 + wind,
                -rel_vy * 0.2,
                &mut self.rng,
            );
        }
    }

    /// Level display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World extents and gravity.
    pub fn world(&self) -> WorldBounds {
        self.world
    }

    /// The vehicle, read-only.
    pub fn vehicle(&self) -> &FlightBody {
        &self.body
    }

    /// The ground profile, read-only.
    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    /// The layered atmosphere, read-only.
    pub fn atmosphere(&self) -> &AtmosphereModel {
        &self.atmosphere
    }

    /// Live hazards, geysers, and lightning, read-only.
    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    /// Total simulated seconds.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}
