//! Level configuration model and validation.
//!
//! Level data arrives pre-parsed (the crate defines no file format); this
//! module gives it a typed shape and validates it once at load time.
//! Every optional knob resolves to an explicit named default here, so the
//! per-step code never re-derives a fallback.

use serde::{Deserialize, Serialize};

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_layer_color() -> String {
    "transparent".to_string()
}

/// Full description of one playable level.
///
/// The simulation consumes this read-only; a validated copy is held for
/// the lifetime of the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display name, carried through for the HUD.
    #[serde(default)]
    pub name: String,
    /// World width in pixels. The world wraps horizontally at this width.
    pub width: f32,
    /// World height in pixels. Altitude is measured down from this value.
    pub height: f32,
    /// Downward acceleration per tick at 60 Hz.
    pub gravity: f32,
    /// Terrain surface color, carried through for the renderer.
    #[serde(default = "default_color")]
    pub color: String,
    /// Ground generation parameters.
    pub terrain: TerrainConfig,
    /// Atmosphere layers, ordered bottom-to-top from the surface.
    pub atmosphere: Vec<LayerConfig>,
    /// Vehicle spawn state.
    pub ship_start: ShipStart,
    /// Spawn resting on the launch pad instead of at `ship_start`.
    #[serde(default)]
    pub start_on_ground: bool,
    /// Orbital stations placed at level start.
    #[serde(default)]
    pub space_stations: Vec<StationConfig>,
}

/// Ground profile generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Per-segment height variation amplitude in pixels.
    pub roughness: f32,
    /// Number of flattened landing pads to attempt to place.
    pub flat_spots: u32,
    /// Optional geyser population for this level.
    #[serde(default)]
    pub geysers: Option<GeyserConfig>,
}

/// Geyser placement and eruption parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeyserConfig {
    /// Minimum number of geysers to place.
    pub min: u32,
    /// Maximum number of geysers to place.
    pub max: u32,
    /// Upward impulse strength of the eruption column.
    pub strength: f32,
    /// Eruptions per second while recharged (0 disables on a 10 s fallback).
    pub frequency: f32,
}

/// One atmosphere band, stacked bottom-to-top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer name shown on the HUD ("Troposphere", "Exosphere", ...).
    pub name: String,
    /// Band thickness in pixels of altitude.
    pub height: f32,
    /// Drag coefficient applied to wind-relative velocity per tick.
    pub viscosity: f32,
    /// Horizontal wind velocity inside the band (signed, px per tick).
    pub wind: f32,
    /// Band tint, carried through for the renderer.
    #[serde(default = "default_layer_color")]
    pub color: String,
    /// Ambient entity populations for the band.
    #[serde(default)]
    pub features: Option<FeatureConfig>,
    /// Lightning activity inside the band.
    #[serde(default)]
    pub lightning: Option<LightningConfig>,
}

/// Decorative and hazardous entity populations of one layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub clouds: Option<CloudConfig>,
    #[serde(default)]
    pub meteorites: Option<MeteoriteConfig>,
    #[serde(default)]
    pub space_debris: Option<DebrisConfig>,
}

/// Bulk-placed drifting clouds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloudConfig {
    pub count: u32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Render opacity, carried through untouched.
    pub opacity: f32,
}

/// Stochastic meteorite entry from above the world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeteoriteConfig {
    /// Spawn probability per 60 Hz tick.
    pub rate: f32,
    /// Entry horizontal velocity range `[lo, hi]`.
    pub vel_x: [f32; 2],
    /// Entry vertical velocity range `[lo, hi]` (positive is downward).
    pub vel_y: [f32; 2],
    /// Upper bound on meteorite radius; 5 px is always added as a floor.
    pub max_size: f32,
}

/// Bulk-placed orbital debris.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DebrisConfig {
    pub count: u32,
    pub min_altitude: f32,
    pub max_altitude: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Base drift speed; individual pieces vary by ±20%.
    pub speed: f32,
}

/// Lightning activity for one layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightningConfig {
    /// Strike spawn probability per 60 Hz tick.
    pub frequency: f32,
    /// Maximum bolt reach from the strike origin in pixels.
    pub radius: f32,
}

/// Vehicle spawn position and optional initial attitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipStart {
    pub x: f32,
    pub y: f32,
    /// Initial heading in radians; defaults to pointing up.
    #[serde(default)]
    pub angle: Option<f32>,
    /// Initial horizontal velocity; defaults to 0.
    #[serde(default)]
    pub vx: Option<f32>,
}

/// One orbital station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Altitude above the world floor at which the station orbits.
    pub altitude: f32,
    /// Starting x, randomized when absent.
    #[serde(default)]
    pub x: Option<f32>,
    /// Horizontal drift speed (signed, px per tick).
    pub speed: f32,
    /// Station half-width basis in pixels.
    pub size: f32,
    /// Docking pads on both faces instead of only the upper one.
    #[serde(default)]
    pub dual_pad: bool,
}

/// Validation failure for a level description.
///
/// Raised once at load time; a level that validates can never drive the
/// per-step code into an invariant-violating state.
#[derive(Debug)]
pub enum ConfigError {
    /// World width or height is zero, negative, or non-finite.
    InvalidWorldSize(f32, f32),
    /// Gravity is negative or non-finite.
    InvalidGravity(f32),
    /// Terrain roughness is negative or non-finite.
    NegativeRoughness(f32),
    /// The atmosphere layer list is empty.
    EmptyAtmosphere,
    /// A layer carries an out-of-range field.
    InvalidLayer { name: String, reason: String },
    /// Summed layer thickness exceeds the world height.
    AtmosphereTooTall { total: f32, world_height: f32 },
    /// Geyser count range is inverted (`min > max`).
    InvalidGeyserRange { min: u32, max: u32 },
    /// Geyser strength or frequency is negative or non-finite.
    InvalidGeyser { reason: String },
    /// A station has a non-positive size or negative altitude.
    InvalidStation { index: usize, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidWorldSize(w, h) => {
                write!(f, "world dimensions must be positive, got {w}x{h}")
            }
            ConfigError::InvalidGravity(g) => {
                write!(f, "gravity must be finite and non-negative, got {g}")
            }
            ConfigError::NegativeRoughness(r) => {
                write!(f, "terrain roughness must be finite and non-negative, got {r}")
            }
            ConfigError::EmptyAtmosphere => {
                write!(f, "atmosphere layer list is empty; at least one layer is required")
            }
            ConfigError::InvalidLayer { name, reason } => {
                write!(f, "atmosphere layer '{name}': {reason}")
            }
            ConfigError::AtmosphereTooTall {
                total,
                world_height,
            } => {
                write!(
                    f,
                    "atmosphere layers total {total} px of altitude but the world is only {world_height} px tall"
                )
            }
            ConfigError::InvalidGeyserRange { min, max } => {
                write!(f, "geyser count range is inverted: min {min} > max {max}")
            }
            ConfigError::InvalidGeyser { reason } => {
                write!(f, "geyser config: {reason}")
            }
            ConfigError::InvalidStation { index, reason } => {
                write!(f, "space station #{index}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl LevelConfig {
    /// Validate every field the per-step code relies on.
    ///
    /// Fails fast with the first violation; nothing is silently defaulted
    /// into an invariant-violating state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidWorldSize(self.width, self.height));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        if !self.terrain.roughness.is_finite() || self.terrain.roughness < 0.0 {
            return Err(ConfigError::NegativeRoughness(self.terrain.roughness));
        }
        if self.atmosphere.is_empty() {
            return Err(ConfigError::EmptyAtmosphere);
        }

        let mut total_thickness = 0.0;
        for layer in &self.atmosphere {
            if !layer.height.is_finite() || layer.height <= 0.0 {
                return Err(ConfigError::InvalidLayer {
                    name: layer.name.clone(),
                    reason: format!("thickness must be positive, got {}", layer.height),
                });
            }
            if !layer.viscosity.is_finite() || !(0.0..=1.0).contains(&layer.viscosity) {
                return Err(ConfigError::InvalidLayer {
                    name: layer.name.clone(),
                    reason: format!("viscosity must be within [0, 1], got {}", layer.viscosity),
                });
            }
            if !layer.wind.is_finite() {
                return Err(ConfigError::InvalidLayer {
                    name: layer.name.clone(),
                    reason: "wind must be finite".to_string(),
                });
            }
            if let Some(lightning) = &layer.lightning {
                if !(lightning.frequency.is_finite() && lightning.frequency >= 0.0)
                    || !(lightning.radius.is_finite() && lightning.radius > 0.0)
                {
                    return Err(ConfigError::InvalidLayer {
                        name: layer.name.clone(),
                        reason: "lightning frequency must be >= 0 and radius > 0".to_string(),
                    });
                }
            }
            if let Some(features) = &layer.features {
                validate_features(features, &layer.name)?;
            }
            total_thickness += layer.height;
        }
        if total_thickness > self.height {
            return Err(ConfigError::AtmosphereTooTall {
                total: total_thickness,
                world_height: self.height,
            });
        }

        if let Some(geysers) = &self.terrain.geysers {
            if geysers.min > geysers.max {
                return Err(ConfigError::InvalidGeyserRange {
                    min: geysers.min,
                    max: geysers.max,
                });
            }
            if !(geysers.strength.is_finite() && geysers.strength >= 0.0) {
                return Err(ConfigError::InvalidGeyser {
                    reason: format!("strength must be non-negative, got {}", geysers.strength),
                });
            }
            if !(geysers.frequency.is_finite() && geysers.frequency >= 0.0) {
                return Err(ConfigError::InvalidGeyser {
                    reason: format!("frequency must be non-negative, got {}", geysers.frequency),
                });
            }
        }

        for (index, station) in self.space_stations.iter().enumerate() {
            if !(station.size.is_finite() && station.size > 0.0) {
                return Err(ConfigError::InvalidStation {
                    index,
                    reason: format!("size must be positive, got {}", station.size),
                });
            }
            if !(station.altitude.is_finite() && station.altitude >= 0.0) {
                return Err(ConfigError::InvalidStation {
                    index,
                    reason: format!("altitude must be non-negative, got {}", station.altitude),
                });
            }
            if !station.speed.is_finite() {
                return Err(ConfigError::InvalidStation {
                    index,
                    reason: "speed must be finite".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_features(features: &FeatureConfig, layer_name: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidLayer {
        name: layer_name.to_string(),
        reason,
    };

    if let Some(clouds) = &features.clouds {
        if clouds.min_width > clouds.max_width || clouds.min_height > clouds.max_height {
            return Err(invalid("cloud size ranges are inverted".to_string()));
        }
    }
    if let Some(meteorites) = &features.meteorites {
        if !(meteorites.rate.is_finite() && meteorites.rate >= 0.0) {
            return Err(invalid(format!(
                "meteorite rate must be non-negative, got {}",
                meteorites.rate
            )));
        }
        if meteorites.vel_x[0] > meteorites.vel_x[1] || meteorites.vel_y[0] > meteorites.vel_y[1] {
            return Err(invalid("meteorite velocity ranges are inverted".to_string()));
        }
    }
    if let Some(debris) = &features.space_debris {
        if debris.min_altitude > debris.max_altitude || debris.min_size > debris.max_size {
            return Err(invalid("space debris ranges are inverted".to_string()));
        }
    }
    Ok(())
}
