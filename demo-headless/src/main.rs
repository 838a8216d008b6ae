use clap::Parser;
use lander_sim_core::config::{
    FeatureConfig, GeyserConfig, LayerConfig, LightningConfig, MeteoriteConfig, ShipStart,
    StationConfig, TerrainConfig,
};
use lander_sim_core::{ControlInput, FlightState, LevelConfig, Simulation};

/// Headless landing simulation demo with a scripted autopilot
#[derive(Parser, Debug)]
#[command(name = "lander-sim-demo")]
#[command(about = "Vehicle landing simulation demo", long_about = None)]
struct Args {
    /// Built-in level (moon, stormworld)
    #[arg(short, long, default_value = "moon")]
    level: String,

    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 120.0)]
    duration: f32,

    /// World generation seed
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 2.0)]
    report_interval: f32,

    /// Disable the autopilot (pure freefall)
    #[arg(long)]
    no_autopilot: bool,
}

fn moon_level() -> LevelConfig {
    LevelConfig {
        name: "Mare Tranquillitatis".to_string(),
        width: 3000.0,
        height: 2000.0,
        gravity: 0.03,
        color: "#cccccc".to_string(),
        terrain: TerrainConfig {
            roughness: 40.0,
            flat_spots: 3,
            geysers: None,
        },
        atmosphere: vec![LayerConfig {
            name: "Exosphere".to_string(),
            height: 400.0,
            viscosity: 0.0,
            wind: 0.0,
            color: "transparent".to_string(),
            features: None,
            lightning: None,
        }],
        ship_start: ShipStart {
            x: 500.0,
            y: 200.0,
            angle: None,
            vx: Some(0.5),
        },
        start_on_ground: false,
        space_stations: Vec::new(),
    }
}

fn stormworld_level() -> LevelConfig {
    LevelConfig {
        name: "Kholdan Stormworld".to_string(),
        width: 4000.0,
        height: 2400.0,
        gravity: 0.05,
        color: "#c08040".to_string(),
        terrain: TerrainConfig {
            roughness: 60.0,
            flat_spots: 2,
            geysers: Some(GeyserConfig {
                min: 2,
                max: 4,
                strength: 120.0,
                frequency: 0.2,
            }),
        },
        atmosphere: vec![
            LayerConfig {
                name: "Lowlands".to_string(),
                height: 500.0,
                viscosity: 0.02,
                wind: 1.0,
                color: "#44332211".to_string(),
                features: None,
                lightning: None,
            },
            LayerConfig {
                name: "Stormband".to_string(),
                height: 600.0,
                viscosity: 0.04,
                wind: -2.5,
                color: "#55443322".to_string(),
                features: Some(FeatureConfig {
                    clouds: Some(lander_sim_core::config::CloudConfig {
                        count: 12,
                        min_width: 80.0,
                        max_width: 200.0,
                        min_height: 24.0,
                        max_height: 60.0,
                        opacity: 0.35,
                    }),
                    meteorites: None,
                    space_debris: None,
                }),
                lightning: Some(LightningConfig {
                    frequency: 0.01,
                    radius: 160.0,
                }),
            },
            LayerConfig {
                name: "Exosphere".to_string(),
                height: 700.0,
                viscosity: 0.001,
                wind: 0.0,
                color: "transparent".to_string(),
                features: Some(FeatureConfig {
                    clouds: None,
                    meteorites: Some(MeteoriteConfig {
                        rate: 0.02,
                        vel_x: [-2.0, 2.0],
                        vel_y: [3.0, 7.0],
                        max_size: 10.0,
                    }),
                    space_debris: None,
                }),
                lightning: None,
            },
        ],
        ship_start: ShipStart {
            x: 600.0,
            y: 150.0,
            angle: None,
            vx: Some(1.0),
        },
        start_on_ground: false,
        space_stations: vec![StationConfig {
            altitude: 2000.0,
            x: None,
            speed: 0.6,
            size: 60.0,
            dual_pad: false,
        }],
    }
}

/// Retro-burn autopilot: thrust whenever the descent rate crosses a
/// floor that shrinks with altitude. Crude, but it lands on calm levels
/// and makes for a livelier demo than freefall.
fn autopilot(sim: &Simulation) -> ControlInput {
    let vehicle = sim.vehicle();
    let altitude = vehicle.altitude_above(sim.terrain());
    let max_descent = if altitude > 400.0 { 2.5 } else { 1.2 };
    ControlInput {
        thrust: vehicle.velocity().y > max_descent,
        rotate_left: false,
        rotate_right: false,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match args.level.to_lowercase().as_str() {
        "stormworld" => stormworld_level(),
        "moon" => moon_level(),
        other => {
            println!("Unknown level '{other}', using moon");
            moon_level()
        }
    };

    println!("=== Lander Simulation Demo ===\n");
    println!(
        "Level: {} ({:.0}x{:.0}, gravity {:.3})",
        config.name, config.width, config.height, config.gravity
    );

    let mut sim = match Simulation::new(&config, args.seed) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Level rejected: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "Terrain: {} points, {} pads, {} geysers",
        sim.terrain().points().len(),
        sim.terrain().pads().len(),
        sim.hazards().geysers().len()
    );
    println!("Atmosphere: {} layers\n", sim.atmosphere().layers().len());

    let dt = 1.0 / 60.0;
    let total_steps = (args.duration / dt) as usize;
    let report_every = (args.report_interval / dt).max(1.0) as usize;

    for step_index in 0..total_steps {
        let input = if args.no_autopilot {
            ControlInput::NONE
        } else {
            autopilot(&sim)
        };
        sim.step(dt, input);

        if step_index % report_every == 0 {
            let vehicle = sim.vehicle();
            let layer = sim.atmosphere().layer_at(vehicle.y());
            println!(
                "t={:6.1}s  alt={:7.1}  v=({:+5.2}, {:+5.2})  fuel={:5.1}  heat={:5.1}  layer={:<12}  hazards={}",
                sim.elapsed(),
                vehicle.altitude_above(sim.terrain()),
                vehicle.velocity().x,
                vehicle.velocity().y,
                vehicle.fuel(),
                vehicle.heat(),
                layer.name,
                sim.hazards().hazards().len(),
            );
        }

        if !sim.vehicle().is_flying() {
            break;
        }
    }

    println!();
    match sim.vehicle().state() {
        FlightState::Landed => println!(
            "SUCCESSFUL LANDING at x={:.0} after {:.1}s with {:.1} fuel left",
            sim.vehicle().x(),
            sim.elapsed(),
            sim.vehicle().fuel()
        ),
        FlightState::Exploded => println!(
            "VEHICLE DESTROYED at x={:.0} after {:.1}s",
            sim.vehicle().x(),
            sim.elapsed()
        ),
        FlightState::Flying => println!("Still flying after {:.1}s", sim.elapsed()),
    }
}
