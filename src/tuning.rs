//! Data-driven physics balance
//!
//! Everything that shapes how the ball moves lives here, separate from the
//! structural board constants in `consts`. All values are per simulation
//! step at 60 Hz.

use serde::{Deserialize, Serialize};

/// Physics balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward velocity added each step
    pub gravity: f32,
    /// Bounciness of peg contacts
    pub peg_restitution: f32,
    /// Bounciness of side walls and separators (duller than pegs)
    pub wall_restitution: f32,
    /// Uniform velocity damping applied to both axes each step
    pub friction: f32,
    /// Steering bias added to vx once per peg row, signed by the planned
    /// deflection. Tunable: it must be large enough to override worst-case
    /// bounce noise for the extreme buckets.
    pub guidance_force: f32,
    /// Bounciness of the bucket floor
    pub floor_restitution: f32,
    /// Horizontal damping on floor contact
    pub floor_friction: f32,
    /// Component speed clamps; keep below the separator capture width so a
    /// single step cannot tunnel a wall
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
    /// Both velocity components must drop below this on the floor to settle
    pub settle_threshold: f32,
    /// Multiplicative render-scale decay per step after settling
    pub shrink_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.28,
            peg_restitution: 0.55,
            wall_restitution: 0.3,
            friction: 0.99,
            guidance_force: 1.6,
            floor_restitution: 0.3,
            floor_friction: 0.8,
            max_horizontal_speed: 10.0,
            max_vertical_speed: 16.0,
            settle_threshold: 0.5,
            shrink_rate: 0.9,
        }
    }
}

impl Tuning {
    /// Parse a tuning override from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
