//! Procedural ground profile with landing pad and geyser placement.
//!
//! The terrain is a single height polyline at fixed horizontal spacing,
//! generated once per level by a bounded random walk and queried every
//! step through [`TerrainField::height_at`]. Worlds wrap horizontally, so
//! a smoothing pass redistributes the start/end height delta across the
//! whole profile until the seam is continuous.

use crate::config::TerrainConfig;
use crate::core_types::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Horizontal spacing between adjacent terrain points in pixels.
pub const SEGMENT_WIDTH: f32 = 20.0;

/// Number of segments a landing pad spans.
pub const PAD_SEGMENTS: usize = 6;

/// Launch pad half-width in segments (total width 2R + 1 points).
const LAUNCH_PAD_RADIUS: usize = 4;

/// Segments kept clear between a new pad and any existing pad.
const PAD_CLEARANCE: usize = 2;

/// Segments kept clear between a pad and the launch zone.
const LAUNCH_CLEARANCE: usize = 10;

/// Segments around a geyser vent that must be free of pad flags.
const GEYSER_CLEARANCE: usize = 2;

const MAX_PAD_ATTEMPTS: u32 = 40;
const MAX_GEYSER_ATTEMPTS: u32 = 30;

/// One sample of the ground polyline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub x: f32,
    pub y: f32,
    /// Part of a flattened landing pad.
    pub is_pad: bool,
    /// Part of the fixed launch platform.
    pub is_launch_pad: bool,
}

/// A registered landing pad, exposed for the radar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pad {
    /// Center of the flattened run.
    pub x: f32,
    /// Surface height of the run.
    pub y: f32,
}

/// Interpolated surface query result.
///
/// The pad flags are true only when **both** bracketing points carry the
/// flag; a half-pad edge is never landable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Interpolated ground height (screen y, down-positive).
    pub y: f32,
    pub is_pad: bool,
    pub is_launch_pad: bool,
}

/// Generated ground profile with its pad registry.
///
/// Immutable after generation; the simulation only queries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainField {
    width: f32,
    height: f32,
    points: Vec<TerrainPoint>,
    pads: Vec<Pad>,
    launch_pad_position: Option<Vec2>,
    geyser_anchors: Vec<Vec2>,
}

impl TerrainField {
    /// Generate a terrain profile from level parameters.
    ///
    /// The walk starts at 80% of the world height, adds uniform variation
    /// scaled by `roughness` per segment, and is clamped to the band
    /// `[0.5 * height, height - 20]`. The seam delta is then linearly
    /// redistributed so the first and last heights match, the launch pad
    /// window (when requested) is forced flat, and pads and geyser vents
    /// are placed by bounded rejection sampling. Producing fewer pads or
    /// geysers than requested is tolerated, not an error.
    pub fn generate(
        config: &TerrainConfig,
        width: f32,
        height: f32,
        has_launch_pad: bool,
        rng: &mut StdRng,
    ) -> Self {
        let num_points = (width / SEGMENT_WIDTH).ceil() as usize + 1;
        let floor_y = height - 20.0;
        let ceiling_y = height * 0.5;

        let mut points = Vec::with_capacity(num_points);
        let mut current_y = height * 0.8;
        for i in 0..num_points {
            let variation = (rng.random::<f32>() - 0.5) * config.roughness;
            current_y = (current_y + variation).clamp(ceiling_y, floor_y);
            points.push(TerrainPoint {
                x: i as f32 * SEGMENT_WIDTH,
                y: current_y,
                is_pad: false,
                is_launch_pad: false,
            });
        }

        let mut terrain = TerrainField {
            width,
            height,
            points,
            pads: Vec::new(),
            launch_pad_position: None,
            geyser_anchors: Vec::new(),
        };

        terrain.close_seam(ceiling_y, floor_y);
        if has_launch_pad {
            terrain.force_launch_pad(height - 100.0);
        }
        terrain.place_pads(config.flat_spots, rng);
        if let Some(geysers) = &config.geysers {
            let requested = rng.random_range(geysers.min..=geysers.max);
            terrain.place_geyser_anchors(requested, rng);
        }

        info!(
            points = terrain.points.len(),
            pads = terrain.pads.len(),
            geysers = terrain.geyser_anchors.len(),
            "terrain generated"
        );
        terrain
    }

    /// Flat terrain at a constant surface height, with no pads.
    pub fn flat(width: f32, height: f32, ground_y: f32) -> Self {
        let num_points = (width / SEGMENT_WIDTH).ceil() as usize + 1;
        let points = (0..num_points)
            .map(|i| TerrainPoint {
                x: i as f32 * SEGMENT_WIDTH,
                y: ground_y,
                is_pad: false,
                is_launch_pad: false,
            })
            .collect();

        TerrainField {
            width,
            height,
            points,
            pads: Vec::new(),
            launch_pad_position: None,
            geyser_anchors: Vec::new(),
        }
    }

    /// Redistribute the start/end height delta linearly across the profile
    /// so the wrap seam is continuous, then re-clamp to the height band
    /// (the shift can push interior points past the walk clamp).
    fn close_seam(&mut self, ceiling_y: f32, floor_y: f32) {
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let delta = self.points[0].y - self.points[n - 1].y;
        let span = (n - 1) as f32;
        for (i, point) in self.points.iter_mut().enumerate() {
            point.y = (point.y + delta * (i as f32 / span)).clamp(ceiling_y, floor_y);
        }
        // Kill the residual rounding error at the seam outright.
        self.points[n - 1].y = self.points[0].y;
    }

    /// Force the centered launch window to a constant elevation and record
    /// its centroid as the canonical launch position.
    fn force_launch_pad(&mut self, pad_y: f32) {
        let n = self.points.len();
        if n < 2 * LAUNCH_PAD_RADIUS + 2 {
            return;
        }
        let center = n / 2;
        for point in &mut self.points[center - LAUNCH_PAD_RADIUS..=center + LAUNCH_PAD_RADIUS] {
            point.y = pad_y;
            point.is_launch_pad = true;
        }
        self.launch_pad_position = Some(Vec2::new(self.points[center].x, pad_y));
    }

    /// Place up to `count` landing pads by rejection sampling.
    fn place_pads(&mut self, count: u32, rng: &mut StdRng) {
        let n = self.points.len();
        if n < PAD_SEGMENTS + 3 {
            return;
        }
        let max_start = n - PAD_SEGMENTS - 1;

        for _ in 0..count {
            let mut placed = false;
            for _ in 0..MAX_PAD_ATTEMPTS {
                let start = rng.random_range(1..max_start);
                if self.window_conflicts(start) {
                    continue;
                }
                self.flatten_pad(start);
                placed = true;
                break;
            }
            if !placed {
                warn!(
                    requested = count,
                    placed = self.pads.len(),
                    "pad rejection sampling exhausted; continuing with fewer pads"
                );
                break;
            }
        }
    }

    /// Check a candidate pad window against existing pads and the launch zone.
    fn window_conflicts(&self, start: usize) -> bool {
        let n = self.points.len();
        let end = start + PAD_SEGMENTS;

        let pad_lo = start.saturating_sub(PAD_CLEARANCE);
        let pad_hi = (end + PAD_CLEARANCE).min(n - 1);
        if self.points[pad_lo..=pad_hi].iter().any(|p| p.is_pad) {
            return true;
        }

        let launch_lo = start.saturating_sub(LAUNCH_CLEARANCE);
        let launch_hi = (end + LAUNCH_CLEARANCE).min(n - 1);
        self.points[launch_lo..=launch_hi]
            .iter()
            .any(|p| p.is_launch_pad)
    }

    /// Average a window flat, flag it, and register it for the radar.
    pub(crate) fn flatten_pad(&mut self, start: usize) {
        let end = (start + PAD_SEGMENTS).min(self.points.len() - 1);
        let window = &self.points[start..=end];
        let avg = window.iter().map(|p| p.y).sum::<f32>() / window.len() as f32;

        for point in &mut self.points[start..=end] {
            point.y = avg;
            point.is_pad = true;
        }
        self.pads.push(Pad {
            x: self.points[start].x + (end - start) as f32 * SEGMENT_WIDTH / 2.0,
            y: avg,
        });
    }

    /// Sample geyser vent positions whose neighborhood is free of pads.
    fn place_geyser_anchors(&mut self, count: u32, rng: &mut StdRng) {
        let n = self.points.len();
        if n < 2 * GEYSER_CLEARANCE + 2 {
            return;
        }
        for _ in 0..count {
            let mut placed = false;
            for _ in 0..MAX_GEYSER_ATTEMPTS {
                let index = rng.random_range(GEYSER_CLEARANCE..n - GEYSER_CLEARANCE);
                let lo = index - GEYSER_CLEARANCE;
                let hi = index + GEYSER_CLEARANCE;
                if self.points[lo..=hi]
                    .iter()
                    .any(|p| p.is_pad || p.is_launch_pad)
                {
                    continue;
                }
                let point = self.points[index];
                self.geyser_anchors.push(Vec2::new(point.x, point.y));
                placed = true;
                break;
            }
            if !placed {
                warn!(
                    requested = count,
                    placed = self.geyser_anchors.len(),
                    "geyser rejection sampling exhausted; continuing with fewer geysers"
                );
                break;
            }
        }
    }

    /// Query the interpolated surface at a world x.
    ///
    /// Out-of-range x wraps modulo the world width (the world is periodic;
    /// a query just past the right edge lands on the left edge profile).
    /// At a segment boundary this returns exactly the stored point height.
    pub fn height_at(&self, x: f32) -> SurfaceSample {
        let wrapped = x.rem_euclid(self.width);
        let index = ((wrapped / SEGMENT_WIDTH) as usize).min(self.points.len() - 2);
        let p1 = self.points[index];
        let p2 = self.points[index + 1];

        let ratio = ((wrapped - p1.x) / SEGMENT_WIDTH).clamp(0.0, 1.0);
        SurfaceSample {
            y: p1.y + (p2.y - p1.y) * ratio,
            is_pad: p1.is_pad && p2.is_pad,
            is_launch_pad: p1.is_launch_pad && p2.is_launch_pad,
        }
    }

    /// Registered landing pads, for the radar.
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Centroid of the launch platform, when the level has one.
    pub fn launch_pad_position(&self) -> Option<Vec2> {
        self.launch_pad_position
    }

    /// Ground points where geysers were anchored during generation.
    pub fn geyser_anchors(&self) -> &[Vec2] {
        &self.geyser_anchors
    }

    /// The raw surface polyline, for the renderer.
    pub fn points(&self) -> &[TerrainPoint] {
        &self.points
    }

    /// World width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// World height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }
}
