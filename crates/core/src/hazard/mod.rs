//! Transient entity engine: sparks, clouds, debris, meteorites, stations,
//! wind streaks, explosion fragments, plus the persistent geysers and
//! lightning strikes.
//!
//! Every hazard kind is a closed variant with its own integration and
//! collision rule, dispatched by exhaustive matching. The per-pass order
//! is fixed: type-specific acceleration, position integration, horizontal
//! wrap, collision/expiry checks, then one compaction. Entities spawned
//! during a pass (impact bursts, friction sparks) are buffered and
//! appended after compaction so they are never revisited in the pass that
//! created them.

pub mod geyser;
pub mod lightning;

pub use geyser::{Bubble, Geyser, GeyserState};
pub use lightning::{BoltSegment, LightningBolt, LightningState};

use crate::atmosphere::AtmosphereModel;
use crate::clock::Step;
use crate::core_types::WorldBounds;
use crate::terrain::TerrainField;
use crate::vehicle::{self, FlightBody};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Fraction of full gravity felt by sparks.
const SPARK_GRAVITY_FACTOR: f32 = 0.1;

/// Meteorite heat coefficient for friction spark emission.
const METEORITE_HEAT_FACTOR: f32 = 20.0;

/// Minimum heating before a meteorite sheds sparks at all.
const METEORITE_SPARK_FLOOR: f32 = 0.5;

/// Pixels past the world floor after which a meteorite is culled.
const CULL_MARGIN: f32 = 3000.0;

/// Station box height as a fraction of its half-width basis.
const STATION_PROFILE: f32 = 0.35;

/// Maximum wind-relative contact speed that still docks.
const DOCK_MAX_SPEED: f32 = 2.0;

/// Maximum attitude deviation from the pad normal that still docks.
const DOCK_MAX_TILT: f32 = 0.4;

/// Closed set of transient entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Friction or impact spark; drifts on reduced gravity, fades linearly.
    Spark,
    /// Explosion fragment; full-gravity ballistic, fades linearly.
    Fragment,
    /// Horizontal streak visualizing layer wind; no gravity.
    WindStreak,
    /// Decorative drifting rectangle; immortal, never collides.
    Cloud { height: f32 },
    /// Tumbling orbital junk; box collision in its rotated frame.
    Debris { rotation: f32, spin: f32, height: f32 },
    /// Orbital station; box collision plus docking pads on the local
    /// normal (upper face, or both faces when `dual_pad`).
    Station { rotation: f32, spin: f32, dual_pad: bool },
    /// Ballistic meteorite; sheds sparks in viscous layers, bursts on
    /// terrain, lethal to the vehicle by proximity.
    Meteorite,
}

/// One transient entity.
///
/// `life`/`max_life` are in 60 Hz-equivalent ticks; immortal kinds carry
/// `f32::INFINITY`. Velocities are per-tick deltas scaled by the step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: HazardKind,
}

impl Hazard {
    /// Render opacity: linear decay with remaining life for finite kinds,
    /// opaque for immortal kinds.
    pub fn alpha(&self) -> f32 {
        if self.max_life.is_finite() {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Consumed and ready for compaction.
    pub fn expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Owner of every transient entity and the persistent level hazards.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HazardField {
    hazards: Vec<Hazard>,
    /// Spawn buffer for entities created mid-pass.
    pending: Vec<Hazard>,
    geysers: Vec<Geyser>,
    lightning: Vec<LightningBolt>,
}

impl HazardField {
    pub fn new() -> Self {
        HazardField::default()
    }

    /// Advance every live hazard by one step.
    ///
    /// Order per entity: type-specific acceleration, integration, wrap,
    /// collision/expiry. The collection is compacted exactly once at the
    /// end of the particle pass; mid-pass spawns land in `pending` and
    /// join the live set only after compaction.
    pub fn update(
        &mut self,
        step: Step,
        world: WorldBounds,
        atmosphere: &AtmosphereModel,
        terrain: &TerrainField,
        body: &mut FlightBody,
        rng: &mut StdRng,
    ) {
        let mut hazards = std::mem::take(&mut self.hazards);
        for hazard in &mut hazards {
            self.advance_hazard(hazard, step, world, atmosphere, terrain, body, rng);
        }
        hazards.retain(|h| !h.expired());
        hazards.append(&mut self.pending);
        self.hazards = hazards;

        for geyser in &mut self.geysers {
            geyser.update(step, body, rng);
        }

        for bolt in &mut self.lightning {
            bolt.update(step, rng);
            if body.is_flying() && bolt.hits(body.x(), body.y(), body.size() / 2.0) {
                body.destroy();
            }
        }
        self.lightning.retain(|bolt| !bolt.is_done());
    }

    #[allow(clippy::too_many_arguments)]
    fn advance_hazard(
        &mut self,
        hazard: &mut Hazard,
        step: Step,
        world: WorldBounds,
        atmosphere: &AtmosphereModel,
        terrain: &TerrainField,
        body: &mut FlightBody,
        rng: &mut StdRng,
    ) {
        // 1. Type-specific acceleration and aging.
        match hazard.kind {
            HazardKind::Spark => {
                hazard.vy += world.gravity * SPARK_GRAVITY_FACTOR * step.scale;
                hazard.life -= step.scale;
            }
            HazardKind::Fragment | HazardKind::Meteorite => {
                hazard.vy += world.gravity * step.scale;
                if hazard.max_life.is_finite() {
                    hazard.life -= step.scale;
                }
            }
            HazardKind::WindStreak => hazard.life -= step.scale,
            HazardKind::Cloud { .. } => {}
            HazardKind::Debris { .. } | HazardKind::Station { .. } => {
                if let HazardKind::Debris { rotation, spin, .. }
                | HazardKind::Station { rotation, spin, .. } = &mut hazard.kind
                {
                    *rotation += *spin * step.scale;
                }
            }
        }

        // 2. Integrate and wrap.
        hazard.x = world.wrap_x(hazard.x + hazard.vx * step.scale);
        hazard.y += hazard.vy * step.scale;

        // 3. Type-specific collision and expiry.
        match hazard.kind {
            HazardKind::Spark
            | HazardKind::Fragment
            | HazardKind::WindStreak
            | HazardKind::Cloud { .. } => {}
            HazardKind::Debris {
                rotation, height, ..
            } => {
                if body.is_flying()
                    && box_contains(hazard, rotation, hazard.size / 2.0, height / 2.0, body)
                {
                    push_explosion(
                        &mut self.pending,
                        hazard.x,
                        hazard.y,
                        hazard.vx,
                        hazard.vy,
                        "debris impact",
                        30,
                        rng,
                    );
                    body.destroy();
                    hazard.life = 0.0;
                }
            }
            HazardKind::Station {
                rotation, dual_pad, ..
            } => {
                self.collide_station(hazard, rotation, dual_pad, body, rng);
            }
            HazardKind::Meteorite => {
                self.advance_meteorite(hazard, step, world, atmosphere, terrain, body, rng);
            }
        }
    }

    /// Station contact: dock on an aligned, gentle pad approach; anything
    /// else inside the hull box is destructive. The station itself
    /// survives both outcomes.
    fn collide_station(
        &mut self,
        hazard: &Hazard,
        rotation: f32,
        dual_pad: bool,
        body: &mut FlightBody,
        rng: &mut StdRng,
    ) {
        if !body.is_flying() {
            return;
        }
        let half_w = hazard.size;
        let half_h = hazard.size * STATION_PROFILE;
        if !box_contains(hazard, rotation, half_w, half_h, body) {
            return;
        }

        // Local-frame y tells which face was contacted (screen y is
        // down-positive, so the upper pad is the negative side).
        let (sin, cos) = rotation.sin_cos();
        let dx = body.x() - hazard.x;
        let dy = body.y() - hazard.y;
        let local_y = -dx * sin + dy * cos;
        let pad_side = local_y < 0.0 || dual_pad;

        let rel_vx = body.velocity().x - hazard.vx;
        let rel_vy = body.velocity().y - hazard.vy;
        let rel_speed = (rel_vx * rel_vx + rel_vy * rel_vy).sqrt();
        let tilt = vehicle::wrap_angle(body.angle() - rotation - vehicle::UPRIGHT_ANGLE);

        if pad_side && rel_speed <= DOCK_MAX_SPEED && tilt.abs() <= DOCK_MAX_TILT {
            body.dock();
        } else {
            push_explosion(
                &mut self.pending,
                body.x(),
                body.y(),
                body.velocity().x,
                body.velocity().y,
                "station impact",
                30,
                rng,
            );
            body.destroy();
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn advance_meteorite(
        &mut self,
        hazard: &mut Hazard,
        step: Step,
        world: WorldBounds,
        atmosphere: &AtmosphereModel,
        terrain: &TerrainField,
        body: &mut FlightBody,
        rng: &mut StdRng,
    ) {
        // Lost far below the world: cull outright, no burst.
        if hazard.y > world.height + CULL_MARGIN {
            hazard.life = 0.0;
            return;
        }

        // Atmospheric friction sheds sparks while traversing a viscous layer.
        let layer = atmosphere.layer_at(hazard.y);
        if layer.viscosity > 0.0 {
            let speed = (hazard.vx * hazard.vx + hazard.vy * hazard.vy).sqrt();
            let heating = speed * layer.viscosity * METEORITE_HEAT_FACTOR;
            if heating > METEORITE_SPARK_FLOOR
                && rng.random::<f32>() < (heating * step.scale).min(1.0)
            {
                push_friction_spark(
                    &mut self.pending,
                    hazard.x,
                    hazard.y,
                    layer.wind + (rng.random::<f32>() - 0.5),
                    -hazard.vy * 0.5,
                    rng,
                );
            }
        }

        // Ground impact: two-tier burst (hot core, dust skirt), then gone.
        let ground = terrain.height_at(hazard.x);
        if hazard.y + hazard.size >= ground.y {
            push_explosion(
                &mut self.pending,
                hazard.x,
                hazard.y,
                hazard.vx * 0.3,
                -hazard.vy * 0.3,
                "meteorite ground impact",
                20,
                rng,
            );
            push_explosion(
                &mut self.pending,
                hazard.x,
                hazard.y,
                hazard.vx * 0.2,
                -hazard.vy * 0.2,
                "meteorite dust",
                15,
                rng,
            );
            hazard.life = 0.0;
            return;
        }

        // Vehicle proximity: circle-circle at entity size + vehicle half-size.
        if body.is_flying() {
            let dx = hazard.x - body.x();
            let dy = hazard.y - body.y();
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < hazard.size + body.size() / 2.0 {
                push_explosion(
                    &mut self.pending,
                    hazard.x,
                    hazard.y,
                    hazard.vx,
                    hazard.vy,
                    "meteorite strike",
                    40,
                    rng,
                );
                body.destroy();
                hazard.life = 0.0;
            }
        }
    }

    // ── Spawners ─────────────────────────────────────────────────────────

    /// Friction spark trailing behind a body moving through atmosphere.
    pub fn spawn_friction_spark(&mut self, x: f32, y: f32, vx: f32, vy: f32, rng: &mut StdRng) {
        push_friction_spark(&mut self.hazards, x, y, vx, vy, rng);
    }

    /// One-shot fragment burst (vehicle destruction, impact effects).
    pub fn spawn_explosion(
        &mut self,
        x: f32,
        y: f32,
        base_vx: f32,
        base_vy: f32,
        count: u32,
        rng: &mut StdRng,
    ) {
        push_explosion(&mut self.hazards, x, y, base_vx, base_vy, "explosion", count, rng);
    }

    /// Horizontal streak visualizing layer wind.
    pub fn spawn_wind_streak(&mut self, x: f32, y: f32, vx: f32, rng: &mut StdRng) {
        let life = 60.0 + rng.random::<f32>() * 40.0;
        self.hazards.push(Hazard {
            x,
            y,
            vx,
            vy: 0.0,
            life,
            max_life: life,
            size: 4.0,
            kind: HazardKind::WindStreak,
        });
    }

    /// Immortal decorative cloud drifting at a fraction of layer wind.
    pub fn spawn_cloud(&mut self, x: f32, y: f32, vx: f32, width: f32, height: f32) {
        self.hazards.push(Hazard {
            x,
            y,
            vx,
            vy: 0.0,
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            size: width,
            kind: HazardKind::Cloud { height },
        });
    }

    /// Tumbling orbital junk.
    pub fn spawn_debris(&mut self, x: f32, y: f32, vx: f32, size: f32, rng: &mut StdRng) {
        self.hazards.push(Hazard {
            x,
            y,
            vx,
            vy: 0.0,
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            size,
            kind: HazardKind::Debris {
                rotation: rng.random::<f32>() * TAU,
                spin: (rng.random::<f32>() - 0.5) * 0.04,
                height: size * 0.6,
            },
        });
    }

    /// Orbital station with docking pads.
    pub fn spawn_station(
        &mut self,
        x: f32,
        y: f32,
        vx: f32,
        size: f32,
        dual_pad: bool,
        rng: &mut StdRng,
    ) {
        self.hazards.push(Hazard {
            x,
            y,
            vx,
            vy: 0.0,
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            size,
            kind: HazardKind::Station {
                rotation: 0.0,
                spin: (rng.random::<f32>() - 0.5) * 0.004,
                dual_pad,
            },
        });
    }

    /// Ballistic meteorite entering from above the world.
    pub fn spawn_meteorite(&mut self, x: f32, y: f32, vx: f32, vy: f32, size: f32) {
        self.hazards.push(Hazard {
            x,
            y,
            vx,
            vy,
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            size,
            kind: HazardKind::Meteorite,
        });
    }

    /// Stage a lightning strike.
    pub fn spawn_lightning(&mut self, x: f32, y: f32, max_radius: f32) {
        self.lightning.push(LightningBolt::new(x, y, max_radius));
    }

    /// Bind a geyser for the lifetime of the level.
    pub fn add_geyser(&mut self, geyser: Geyser) {
        self.geysers.push(geyser);
    }

    // ── Read-only state ──────────────────────────────────────────────────

    /// Live transient entities, for the renderer and radar.
    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// Level geysers.
    pub fn geysers(&self) -> &[Geyser] {
        &self.geysers
    }

    /// Active lightning strikes.
    pub fn lightning(&self) -> &[LightningBolt] {
        &self.lightning
    }

    /// Number of live transient entities of one kind, for diagnostics.
    pub fn count_kind(&self, matches: impl Fn(&HazardKind) -> bool) -> usize {
        self.hazards.iter().filter(|h| matches(&h.kind)).count()
    }
}

/// Rotated-frame box test: the vehicle's relative position is rotated
/// into the entity's local frame and checked against half extents grown
/// by the vehicle's half-size.
fn box_contains(hazard: &Hazard, rotation: f32, half_w: f32, half_h: f32, body: &FlightBody) -> bool {
    let dx = body.x() - hazard.x;
    let dy = body.y() - hazard.y;
    let (sin, cos) = rotation.sin_cos();
    let local_x = dx * cos + dy * sin;
    let local_y = -dx * sin + dy * cos;
    let margin = body.size() / 2.0;
    local_x.abs() <= half_w + margin && local_y.abs() <= half_h + margin
}

fn push_friction_spark(list: &mut Vec<Hazard>, x: f32, y: f32, vx: f32, vy: f32, rng: &mut StdRng) {
    let life = 10.0 + rng.random::<f32>() * 15.0;
    list.push(Hazard {
        x: x + (rng.random::<f32>() - 0.5) * 20.0,
        y: y + (rng.random::<f32>() - 0.5) * 20.0,
        vx,
        vy,
        life,
        max_life: life,
        size: 6.0,
        kind: HazardKind::Spark,
    });
}

#[allow(clippy::too_many_arguments)]
fn push_explosion(
    list: &mut Vec<Hazard>,
    x: f32,
    y: f32,
    base_vx: f32,
    base_vy: f32,
    reason: &str,
    count: u32,
    rng: &mut StdRng,
) {
    tracing::debug!(reason, count, "spawning fragment burst");
    for _ in 0..count {
        let angle = rng.random::<f32>() * TAU;
        let speed = rng.random::<f32>() * 5.0;
        let life = 40.0 + rng.random::<f32>() * 40.0;
        list.push(Hazard {
            x,
            y,
            vx: base_vx * 0.5 + angle.cos() * speed,
            vy: base_vy * 0.5 + angle.sin() * speed,
            life,
            max_life: life,
            size: 2.0 + rng.random::<f32>() * 3.0,
            kind: HazardKind::Fragment,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::AtmosphereModel;
    use crate::clock::SimulationClock;
    use crate::config::LayerConfig;
    use crate::terrain::TerrainField;
    use crate::vehicle::{FlightState, VehicleTuning};
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    const WORLD: WorldBounds = WorldBounds {
        width: 3000.0,
        height: 2000.0,
        gravity: 0.03,
    };

    fn vacuum() -> AtmosphereModel {
        AtmosphereModel::new(
            &[LayerConfig {
                name: "Thin".to_string(),
                height: 100.0,
                viscosity: 0.0,
                wind: 0.0,
                color: String::new(),
                features: None,
                lightning: None,
            }],
            WORLD.height,
        )
    }

    fn flying_body(x: f32, y: f32) -> FlightBody {
        FlightBody::new(x, y, None, None, VehicleTuning::default())
    }

    fn step() -> Step {
        SimulationClock::new().tick(1.0 / 60.0)
    }

    #[test]
    fn test_spark_fades_and_compacts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = HazardField::new();
        field.spawn_friction_spark(100.0, 100.0, 1.0, -1.0, &mut rng);
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();
        let mut body = flying_body(2000.0, 100.0);

        // Max spark life is 25 ticks; it must be gone within 30.
        for _ in 0..30 {
            field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);
        }
        assert_eq!(field.hazards().len(), 0);
    }

    #[test]
    fn test_cloud_is_immortal_and_harmless() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = HazardField::new();
        field.spawn_cloud(500.0, 300.0, 0.4, 120.0, 40.0);
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();
        // Park the vehicle inside the cloud; nothing should happen.
        let mut body = flying_body(500.0, 300.0);

        for _ in 0..600 {
            field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);
        }
        assert_eq!(field.hazards().len(), 1);
        assert_eq!(body.state(), FlightState::Flying);
        assert_eq!(field.hazards()[0].alpha(), 1.0);
    }

    #[test]
    fn test_hazards_wrap_horizontally() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = HazardField::new();
        field.spawn_cloud(WORLD.width - 1.0, 300.0, 5.0, 80.0, 30.0);
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();
        let mut body = flying_body(1000.0, 100.0);

        field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);
        let x = field.hazards()[0].x;
        assert!((0.0..WORLD.width).contains(&x), "x not wrapped: {x}");
    }

    #[test]
    fn test_meteorite_kills_vehicle_in_same_step() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = HazardField::new();
        field.spawn_meteorite(500.0, 295.0, 0.0, 1.0, 8.0);
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();
        let mut body = flying_body(500.0, 300.0);

        field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);

        assert_eq!(body.state(), FlightState::Exploded);
        // The meteorite is gone in the same step; only the burst remains.
        assert_eq!(field.count_kind(|k| matches!(k, HazardKind::Meteorite)), 0);
        assert!(field.count_kind(|k| matches!(k, HazardKind::Fragment)) > 0);
    }

    #[test]
    fn test_meteorite_bursts_on_terrain() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = HazardField::new();
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1000.0);
        field.spawn_meteorite(700.0, 990.0, 0.0, 5.0, 6.0);
        let atmosphere = vacuum();
        let mut body = flying_body(2500.0, 100.0);

        field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);

        assert_eq!(field.count_kind(|k| matches!(k, HazardKind::Meteorite)), 0);
        // Two-tier burst: 20 + 15 fragments.
        assert_eq!(field.count_kind(|k| matches!(k, HazardKind::Fragment)), 35);
        assert_eq!(body.state(), FlightState::Flying);
    }

    #[test]
    fn test_mid_pass_spawns_not_revisited() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut field = HazardField::new();
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1000.0);
        field.spawn_meteorite(700.0, 995.0, 0.0, 10.0, 6.0);
        let atmosphere = vacuum();
        let mut body = flying_body(2500.0, 100.0);

        field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);

        // Fragments spawned by the impact must still carry full life:
        // they were appended after the pass, not aged inside it.
        for hazard in field.hazards() {
            assert_eq!(hazard.life, hazard.max_life);
        }
    }

    #[test]
    fn test_meteorite_culled_below_world() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = HazardField::new();
        // Spawn below the terrain query floor but above the cull line,
        // over a pit-free flat world so it never contacts ground.
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        field.spawn_meteorite(700.0, WORLD.height + CULL_MARGIN + 10.0, 0.0, 5.0, 6.0);
        let atmosphere = vacuum();
        let mut body = flying_body(2500.0, 100.0);

        field.update(step(), WORLD, &atmosphere, &terrain, &mut body, &mut rng);
        assert_eq!(field.hazards().len(), 0);
    }

    #[test]
    fn test_debris_box_collision_rotated_frame() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = HazardField::new();
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();

        // Debris rotated 90 degrees: its long axis is vertical, so a
        // vehicle offset horizontally by more than the (rotated) narrow
        // extent + margin is safe, while one inside it is not.
        field.hazards.push(Hazard {
            x: 500.0,
            y: 300.0,
            vx: 0.0,
            vy: 0.0,
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            size: 60.0,
            kind: HazardKind::Debris {
                rotation: FRAC_PI_2,
                spin: 0.0,
                height: 20.0,
            },
        });

        // Offset 25 px horizontally: outside rotated half-height (10) +
        // vehicle margin (10).
        let mut safe_body = flying_body(500.0 + 25.0, 300.0);
        field.update(step(), WORLD, &atmosphere, &terrain, &mut safe_body, &mut rng);
        assert_eq!(safe_body.state(), FlightState::Flying);

        // Offset 25 px vertically: well inside rotated half-width (30).
        let mut hit_body = flying_body(500.0, 300.0 + 25.0);
        field.update(step(), WORLD, &atmosphere, &terrain, &mut hit_body, &mut rng);
        assert_eq!(hit_body.state(), FlightState::Exploded);
    }

    #[test]
    fn test_station_docking_and_destruction() {
        let terrain = TerrainField::flat(WORLD.width, WORLD.height, 1900.0);
        let atmosphere = vacuum();

        // Gentle, upright contact on the upper face: docks.
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = HazardField::new();
        field.spawn_station(800.0, 400.0, 0.0, 50.0, false, &mut rng);
        // Zero the spin so the pad normal stays put for the test.
        if let HazardKind::Station { spin, .. } = &mut field.hazards[0].kind {
            *spin = 0.0;
        }
        let mut docking = FlightBody::new(800.0, 400.0 - 20.0, None, None, VehicleTuning::default());
        field.update(step(), WORLD, &atmosphere, &terrain, &mut docking, &mut rng);
        assert_eq!(docking.state(), FlightState::Landed);

        // Fast contact: destroyed.
        let mut field = HazardField::new();
        field.spawn_station(800.0, 400.0, 0.0, 50.0, false, &mut rng);
        let mut crashing = FlightBody::new(800.0, 400.0 - 20.0, None, Some(9.0), VehicleTuning::default());
        field.update(step(), WORLD, &atmosphere, &terrain, &mut crashing, &mut rng);
        assert_eq!(crashing.state(), FlightState::Exploded);

        // Underside contact without a dual pad: destroyed even if gentle.
        let mut field = HazardField::new();
        field.spawn_station(800.0, 400.0, 0.0, 50.0, false, &mut rng);
        if let HazardKind::Station { spin, .. } = &mut field.hazards[0].kind {
            *spin = 0.0;
        }
        let mut under = FlightBody::new(800.0, 400.0 + 20.0, None, None, VehicleTuning::default());
        field.update(step(), WORLD, &atmosphere, &terrain, &mut under, &mut rng);
        assert_eq!(under.state(), FlightState::Exploded);

        // Underside contact with a dual pad: docks.
        let mut field = HazardField::new();
        field.spawn_station(800.0, 400.0, 0.0, 50.0, true, &mut rng);
        if let HazardKind::Station { spin, .. } = &mut field.hazards[0].kind {
            *spin = 0.0;
        }
        let mut under_dual = FlightBody::new(800.0, 400.0 + 20.0, None, None, VehicleTuning::default());
        field.update(step(), WORLD, &atmosphere, &terrain, &mut under_dual, &mut rng);
        assert_eq!(under_dual.state(), FlightState::Landed);
    }
}
