//! Core types and utilities

pub mod input;
pub mod vec2;
pub mod world;

pub use input::ControlInput;
pub use vec2::Vec2;
pub use world::WorldBounds;
