//! Layered atmosphere: altitude bands with wind, drag, and heat friction,
//! plus the stochastic spawners for ambient entities.
//!
//! Layers stack bottom-to-top from the world floor. Everything above the
//! configured stack is the synthetic zero-effect "Space" layer, so
//! altitude queries always resolve to a layer and the flight model never
//! special-cases vacuum.

use crate::clock::Step;
use crate::config::{FeatureConfig, LayerConfig, LightningConfig};
use crate::hazard::HazardField;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Wind streak spawn probability per unit |wind| per tick.
const WIND_STREAK_CHANCE: f32 = 0.02;

/// Screen y at which meteorites enter, above the world top.
const METEORITE_ENTRY_Y: f32 = -50.0;

/// One resolved altitude band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereLayer {
    /// Layer name shown on the HUD.
    pub name: String,
    /// Band thickness in pixels of altitude.
    pub thickness: f32,
    /// Drag coefficient applied to wind-relative velocity per tick.
    pub viscosity: f32,
    /// Horizontal wind inside the band (signed, px per tick).
    pub wind: f32,
    /// Band tint, carried through for the renderer.
    pub color: String,
    pub(crate) features: Option<FeatureConfig>,
    pub(crate) lightning: Option<LightningConfig>,
}

impl AtmosphereLayer {
    /// The synthetic zero-effect layer above every configured band.
    fn space() -> Self {
        AtmosphereLayer {
            name: "Space".to_string(),
            thickness: f32::INFINITY,
            viscosity: 0.0,
            wind: 0.0,
            color: "transparent".to_string(),
            features: None,
            lightning: None,
        }
    }
}

/// The layered atmosphere of one level, immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereModel {
    layers: Vec<AtmosphereLayer>,
    space: AtmosphereLayer,
    world_height: f32,
}

impl AtmosphereModel {
    /// Resolve the ordered layer configs into a queryable stack.
    pub fn new(configs: &[LayerConfig], world_height: f32) -> Self {
        let layers = configs
            .iter()
            .map(|config| AtmosphereLayer {
                name: config.name.clone(),
                thickness: config.height,
                viscosity: config.viscosity,
                wind: config.wind,
                color: config.color.clone(),
                features: config.features,
                lightning: config.lightning,
            })
            .collect::<Vec<_>>();

        info!(layers = layers.len(), "atmosphere resolved");
        AtmosphereModel {
            layers,
            space: AtmosphereLayer::space(),
            world_height,
        }
    }

    /// The layer containing a screen y.
    ///
    /// Altitude is `world_height - y`; each band covers `[base, base +
    /// thickness)`, so a query at an exact boundary altitude consistently
    /// resolves to the layer **above** it. Anything past the topmost band
    /// (including below-floor queries, which have negative altitude) is
    /// the zero-effect Space layer.
    pub fn layer_at(&self, y: f32) -> &AtmosphereLayer {
        let altitude = self.world_height - y;
        let mut base = 0.0;
        for layer in &self.layers {
            if altitude >= base && altitude < base + layer.thickness {
                return layer;
            }
            base += layer.thickness;
        }
        &self.space
    }

    /// One-time bulk placement of decorative entities at level start,
    /// independent of the per-step stochastic spawner.
    pub fn init_features(&self, hazards: &mut HazardField, world_width: f32, rng: &mut StdRng) {
        let mut base = 0.0;
        for layer in &self.layers {
            let band_top = self.world_height - base - layer.thickness;

            if let Some(features) = &layer.features {
                if let Some(clouds) = &features.clouds {
                    for _ in 0..clouds.count {
                        let x = rng.random::<f32>() * world_width;
                        let y = band_top + rng.random::<f32>() * layer.thickness;
                        let width = clouds.min_width
                            + rng.random::<f32>() * (clouds.max_width - clouds.min_width);
                        let height = clouds.min_height
                            + rng.random::<f32>() * (clouds.max_height - clouds.min_height);
                        let speed = layer.wind * 0.5 + (rng.random::<f32>() - 0.5);
                        hazards.spawn_cloud(x, y, speed, width, height);
                    }
                }
                if let Some(debris) = &features.space_debris {
                    for _ in 0..debris.count {
                        let x = rng.random::<f32>() * world_width;
                        let altitude = debris.min_altitude
                            + rng.random::<f32>() * (debris.max_altitude - debris.min_altitude);
                        let y = self.world_height - altitude;
                        let size = debris.min_size
                            + rng.random::<f32>() * (debris.max_size - debris.min_size);
                        // Base speed with ±20% per-piece variance.
                        let variance = debris.speed.abs() * 0.2;
                        let speed = debris.speed + (rng.random::<f32>() - 0.5) * 2.0 * variance;
                        hazards.spawn_debris(x, y, speed, size, rng);
                    }
                }
            }
            base += layer.thickness;
        }
    }

    /// Stochastic per-step ambient spawns.
    ///
    /// Wind streaks appear with probability proportional to |wind| and
    /// the step; lightning and meteorites at their configured per-tick
    /// rates scaled by the step. Clouds and debris are population-based
    /// (immortal, bulk-placed in [`Self::init_features`]) and are not
    /// re-spawned here.
    pub fn update(
        &self,
        step: Step,
        hazards: &mut HazardField,
        world_width: f32,
        rng: &mut StdRng,
    ) {
        let mut base = 0.0;
        for layer in &self.layers {
            let band_top = self.world_height - base - layer.thickness;

            if layer.wind != 0.0 {
                let chance = (layer.wind.abs() * WIND_STREAK_CHANCE * step.scale).min(1.0);
                if rng.random::<f32>() < chance {
                    let x = rng.random::<f32>() * world_width;
                    let y = band_top + rng.random::<f32>() * layer.thickness;
                    let vx = layer.wind * (1.5 + rng.random::<f32>() * 0.5);
                    hazards.spawn_wind_streak(x, y, vx, rng);
                }
            }

            if let Some(lightning) = &layer.lightning {
                if lightning.frequency > 0.0 {
                    let chance = (lightning.frequency * step.scale).min(1.0);
                    if rng.random::<f32>() < chance {
                        let x = rng.random::<f32>() * world_width;
                        // Keep strikes off the exact band edges.
                        let y = band_top
                            + (0.1 + rng.random::<f32>() * 0.8) * layer.thickness;
                        hazards.spawn_lightning(x, y, lightning.radius);
                    }
                }
            }

            if let Some(meteorites) = layer.features.as_ref().and_then(|f| f.meteorites.as_ref()) {
                if meteorites.rate > 0.0 {
                    let chance = (meteorites.rate * step.scale).min(1.0);
                    if rng.random::<f32>() < chance {
                        let x = rng.random::<f32>() * world_width;
                        let vx = meteorites.vel_x[0]
                            + rng.random::<f32>() * (meteorites.vel_x[1] - meteorites.vel_x[0]);
                        let vy = meteorites.vel_y[0]
                            + rng.random::<f32>() * (meteorites.vel_y[1] - meteorites.vel_y[0]);
                        let size = 5.0 + rng.random::<f32>() * meteorites.max_size;
                        hazards.spawn_meteorite(x, METEORITE_ENTRY_Y, vx, vy, size);
                    }
                }
            }

            base += layer.thickness;
        }
    }

    /// The resolved layer stack, bottom-to-top, for the renderer.
    pub fn layers(&self) -> &[AtmosphereLayer] {
        &self.layers
    }

    /// The synthetic layer above the stack.
    pub fn space_layer(&self) -> &AtmosphereLayer {
        &self.space
    }
}
