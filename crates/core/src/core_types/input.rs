//! Control intent record consumed by the flight model.

use serde::{Deserialize, Serialize};

/// Per-step control intents for the vehicle.
///
/// Physical key or touch mapping is an external concern; the simulation
/// only sees the resolved booleans for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Main engine firing this step.
    pub thrust: bool,
    /// Rotate counter-clockwise this step.
    pub rotate_left: bool,
    /// Rotate clockwise this step.
    pub rotate_right: bool,
}

impl ControlInput {
    /// No input at all (coasting).
    pub const NONE: ControlInput = ControlInput {
        thrust: false,
        rotate_left: false,
        rotate_right: false,
    };

    /// Thrust only, no rotation.
    pub const THRUST: ControlInput = ControlInput {
        thrust: true,
        rotate_left: false,
        rotate_right: false,
    };
}
