//! End-to-end level behavior: full descents from spawn to terminal state,
//! with hazards live.

use lander_sim_core::config::{
    FeatureConfig, LayerConfig, LightningConfig, MeteoriteConfig, ShipStart, TerrainConfig,
};
use lander_sim_core::{ControlInput, FlightState, HazardKind, LevelConfig, Simulation};

const SEED: u64 = 17;

fn base_level() -> LevelConfig {
    LevelConfig {
        name: "Descent World".to_string(),
        width: 3000.0,
        height: 2000.0,
        gravity: 0.03,
        color: "#ffffff".to_string(),
        terrain: TerrainConfig {
            roughness: 0.0,
            flat_spots: 1,
            geysers: None,
        },
        atmosphere: vec![LayerConfig {
            name: "Thin Air".to_string(),
            height: 300.0,
            viscosity: 0.0,
            wind: 0.0,
            color: "transparent".to_string(),
            features: None,
            lightning: None,
        }],
        ship_start: ShipStart {
            x: 500.0,
            y: 100.0,
            angle: None,
            vx: None,
        },
        start_on_ground: false,
        space_stations: Vec::new(),
    }
}

/// Run until the vehicle leaves `Flying`, with a step cap.
fn run_to_terminal(sim: &mut Simulation, max_steps: usize) -> FlightState {
    for _ in 0..max_steps {
        sim.step(1.0 / 60.0, ControlInput::NONE);
        if !sim.vehicle().is_flying() {
            break;
        }
    }
    sim.vehicle().state()
}

/// Generate the level once to locate its pad, then rebuild with the ship
/// positioned a given distance above the pad center. Terrain generation
/// draws from the seeded stream before anything else, so the same seed
/// reproduces the same pad.
fn level_with_drop(drop_height: f32) -> LevelConfig {
    let probe = Simulation::new(&base_level(), SEED).unwrap();
    assert_eq!(probe.terrain().pads().len(), 1);
    let pad = probe.terrain().pads()[0];

    let mut config = base_level();
    config.ship_start = ShipStart {
        x: pad.x,
        y: pad.y - drop_height,
        angle: None,
        vx: None,
    };
    config
}

#[test]
fn test_gentle_pad_descent_lands() {
    // From 100 px up, gravity 0.03 builds roughly 2.3 px/tick of descent
    // at contact: under every threshold.
    let config = level_with_drop(100.0);
    let mut sim = Simulation::new(&config, SEED).unwrap();

    let state = run_to_terminal(&mut sim, 2000);

    assert_eq!(state, FlightState::Landed);
    assert!(sim.terrain().height_at(sim.vehicle().x()).is_pad);
}

#[test]
fn test_fast_pad_descent_explodes() {
    // From 1700 px up the same spot is hit at roughly 10 px/tick.
    let config = level_with_drop(1700.0);
    let mut sim = Simulation::new(&config, SEED).unwrap();

    let state = run_to_terminal(&mut sim, 4000);

    assert_eq!(state, FlightState::Exploded);
    // The one-shot destruction burst fired.
    assert!(
        sim.hazards()
            .count_kind(|k| matches!(k, HazardKind::Fragment))
            > 0
    );
}

#[test]
fn test_freefall_onto_open_terrain_crashes() {
    let mut config = base_level();
    config.terrain.roughness = 40.0;
    config.terrain.flat_spots = 0;
    let mut sim = Simulation::new(&config, SEED).unwrap();

    let state = run_to_terminal(&mut sim, 4000);
    assert_eq!(state, FlightState::Exploded);
}

#[test]
fn test_meteorite_weather_populates_and_bursts() {
    let mut config = base_level();
    config.atmosphere.push(LayerConfig {
        name: "Exosphere".to_string(),
        height: 900.0,
        viscosity: 0.0,
        wind: 0.0,
        color: "transparent".to_string(),
        features: Some(FeatureConfig {
            clouds: None,
            meteorites: Some(MeteoriteConfig {
                rate: 0.5,
                vel_x: [-1.0, 1.0],
                vel_y: [3.0, 6.0],
                max_size: 8.0,
            }),
            space_debris: None,
        }),
        lightning: None,
    });
    // Keep the ship parked out of the way so the weather runs its course.
    config.gravity = 0.0;
    let mut sim = Simulation::new(&config, SEED).unwrap();

    let mut saw_meteorite = false;
    let mut saw_ground_burst = false;
    for _ in 0..1200 {
        sim.step(1.0 / 60.0, ControlInput::NONE);
        saw_meteorite |= sim
            .hazards()
            .count_kind(|k| matches!(k, HazardKind::Meteorite))
            > 0;
        saw_ground_burst |= sim
            .hazards()
            .count_kind(|k| matches!(k, HazardKind::Fragment))
            > 0;
    }

    assert!(saw_meteorite, "rate 0.5 never spawned a meteorite in 20 s");
    assert!(saw_ground_burst, "no meteorite reached the ground in 20 s");
}

#[test]
fn test_lightning_layer_cycles_through_strikes() {
    let mut config = base_level();
    config.atmosphere = vec![LayerConfig {
        name: "Stormband".to_string(),
        height: 800.0,
        viscosity: 0.0,
        wind: 0.0,
        color: "transparent".to_string(),
        features: None,
        lightning: Some(LightningConfig {
            frequency: 0.05,
            radius: 150.0,
        }),
    }];
    config.gravity = 0.0;
    let mut sim = Simulation::new(&config, SEED).unwrap();

    let mut saw_charging = false;
    let mut saw_striking = false;
    for _ in 0..1200 {
        sim.step(1.0 / 60.0, ControlInput::NONE);
        for bolt in sim.hazards().lightning() {
            match bolt.state() {
                lander_sim_core::hazard::LightningState::Charging => saw_charging = true,
                lander_sim_core::hazard::LightningState::Striking => {
                    saw_striking = true;
                    assert!(!bolt.segments().is_empty());
                }
                lander_sim_core::hazard::LightningState::Done => {}
            }
        }
    }

    assert!(saw_charging);
    assert!(saw_striking, "no strike completed its charge in 20 s");
}
