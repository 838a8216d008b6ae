//! Lander Simulation Core Library
//!
//! A real-time 2D vehicle-landing simulation: a craft descends through a
//! layered atmosphere over procedurally generated terrain toward a safe
//! landing zone, dodging meteorites, lightning, geysers, and orbital
//! debris along the way.
//!
//! ## Scope
//!
//! This crate is the physics-and-world core only. Rendering, HUD/radar
//! presentation, input capture, level file loading, and menus are
//! external collaborators: they hand pre-parsed level data and per-step
//! control intents in, and read the simulation state back out.
//!
//! ## Stepping model
//!
//! The external presentation loop calls [`Simulation::step`] once per
//! frame with the raw frame delta. The delta is normalized to a 60
//! Hz-equivalent step scalar, so physics tuned at 60 Hz behaves
//! consistently at any frame rate. Everything inside a step is bounded,
//! synchronous, and single-threaded.

// Core types and utilities
pub mod core_types;

// World model
pub mod atmosphere;
pub mod config;
pub mod terrain;

// Dynamics
pub mod clock;
pub mod hazard;
pub mod vehicle;

// Top-level driver
pub mod simulation;

// Re-export core types
pub use core_types::{ControlInput, Vec2, WorldBounds};

// Re-export world model types
pub use atmosphere::{AtmosphereLayer, AtmosphereModel};
pub use config::{ConfigError, LevelConfig};
pub use terrain::{Pad, SurfaceSample, TerrainField, TerrainPoint};

// Re-export dynamics types
pub use clock::{SimulationClock, Step};
pub use hazard::{Geyser, GeyserState, Hazard, HazardField, HazardKind, LightningBolt};
pub use vehicle::{FlightBody, FlightState, VehicleTuning};

// Re-export the driver
pub use simulation::Simulation;
