//! Lightning strikes: charge/strike lifecycle and fractal bolt geometry.
//!
//! A strike telegraphs itself for a charge interval, then materializes a
//! branching bolt and stays lethal for the strike interval. Geometry is
//! produced by randomized branching with an explicit work stack and a
//! hard generation cap, so a pathological roll can never recurse without
//! bound. Collision is tested precisely: point-to-segment distance
//! against every generated segment (chosen over a coarse proximity
//! circle; bolts are sparse enough that the exact test stays cheap).

use crate::clock::Step;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Seconds of pre-strike glow.
const CHARGE_DURATION: f32 = 1.5;

/// Seconds the bolt stays materialized and lethal.
const STRIKE_DURATION: f32 = 0.5;

/// Branch generations per main bolt. Bounds both recursion depth and the
/// total segment count.
const MAX_GENERATION: u32 = 4;

/// Probability a segment forks into two children instead of one.
const BRANCH_CHANCE: f32 = 0.4;

/// Collision margin added on top of the target radius and bolt width.
const HIT_MARGIN: f32 = 2.0;

/// Lifecycle of a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightningState {
    /// Telegraphing; harmless.
    Charging,
    /// Bolt materialized; lethal.
    Striking,
    /// Spent; removed at the end of the pass.
    Done,
}

/// One generated line segment of the bolt geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoltSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Stroke width, thicker near the origin.
    pub width: f32,
}

/// A single lightning strike cycling `charging -> striking -> done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningBolt {
    x: f32,
    y: f32,
    max_radius: f32,
    state: LightningState,
    timer: f32,
    segments: Vec<BoltSegment>,
}

impl LightningBolt {
    /// Stage a strike at an origin with a maximum reach.
    pub fn new(x: f32, y: f32, max_radius: f32) -> Self {
        LightningBolt {
            x,
            y,
            max_radius,
            state: LightningState::Charging,
            timer: 0.0,
            segments: Vec::new(),
        }
    }

    /// Advance the lifecycle; generates geometry on entering `Striking`.
    pub fn update(&mut self, step: Step, rng: &mut StdRng) {
        self.timer += step.dt;
        match self.state {
            LightningState::Charging => {
                if self.timer >= CHARGE_DURATION {
                    self.state = LightningState::Striking;
                    self.timer = 0.0;
                    self.generate_geometry(rng);
                }
            }
            LightningState::Striking => {
                if self.timer >= STRIKE_DURATION {
                    self.state = LightningState::Done;
                }
            }
            LightningState::Done => {}
        }
    }

    /// Grow the fractal bolt geometry from the origin.
    ///
    /// Iterative with a work stack: each frame pops a branch, jitters its
    /// heading, emits one segment attenuated in length per generation, and
    /// pushes 1-2 children until the generation counter runs out.
    fn generate_geometry(&mut self, rng: &mut StdRng) {
        self.segments.clear();
        let main_bolts = 4 + rng.random_range(0..3);
        let mut stack: Vec<(f32, f32, f32, f32, u32)> = Vec::new();

        for i in 0..main_bolts {
            let angle = TAU * i as f32 / main_bolts as f32 + (rng.random::<f32>() - 0.5);
            stack.push((self.x, self.y, angle, self.max_radius, MAX_GENERATION));
        }

        while let Some((x, y, angle, length, generation)) = stack.pop() {
            if generation == 0 {
                continue;
            }

            let jittered = angle + (rng.random::<f32>() - 0.5) * 2.5;
            let segment_len = length * (0.5 + rng.random::<f32>() * 0.3);
            let x2 = x + jittered.cos() * segment_len;
            let y2 = y + jittered.sin() * segment_len;

            let width = match generation {
                4 => 3.0,
                3 => 2.0,
                _ => 1.0,
            };
            self.segments.push(BoltSegment {
                x1: x,
                y1: y,
                x2,
                y2,
                width,
            });

            let branches = if rng.random::<f32>() < BRANCH_CHANCE { 2 } else { 1 };
            for branch in 0..branches {
                let spread = if branch == 0 {
                    0.0
                } else {
                    rng.random::<f32>() - 0.5
                };
                stack.push((x2, y2, angle + spread, length * 0.6, generation - 1));
            }
        }
    }

    /// Test a circle against every bolt segment. Only lethal while
    /// `Striking`.
    pub fn hits(&self, x: f32, y: f32, radius: f32) -> bool {
        if self.state != LightningState::Striking {
            return false;
        }
        self.segments
            .iter()
            .any(|segment| point_segment_distance(x, y, segment) < radius + segment.width + HIT_MARGIN)
    }

    /// Strike origin x.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Strike origin y.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Maximum configured reach.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Charge progress in `[0, 1]`, for the renderer's pre-strike glow.
    pub fn charge_progress(&self) -> f32 {
        match self.state {
            LightningState::Charging => (self.timer / CHARGE_DURATION).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> LightningState {
        self.state
    }

    /// Generated bolt geometry (empty until the strike begins).
    pub fn segments(&self) -> &[BoltSegment] {
        &self.segments
    }

    /// Spent and ready for removal.
    pub fn is_done(&self) -> bool {
        self.state == LightningState::Done
    }
}

/// Distance from a point to a line segment, with a zero-length guard
/// (degenerate segments collapse to point distance).
fn point_segment_distance(px: f32, py: f32, segment: &BoltSegment) -> f32 {
    let ax = px - segment.x1;
    let ay = py - segment.y1;
    let dx = segment.x2 - segment.x1;
    let dy = segment.y2 - segment.y1;

    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        ((ax * dx + ay * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let cx = px - (segment.x1 + t * dx);
    let cy = py - (segment.y1 + t * dy);
    (cx * cx + cy * cy).sqrt()
}
