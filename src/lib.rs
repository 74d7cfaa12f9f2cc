//! Plinko Drop - steered drop simulation and outcome engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, outcome, path, physics, session)
//! - `tuning`: Data-driven physics balance
//!
//! The engine decides the round's bucket and multiplier up front, plans a
//! left/right deflection sequence consistent with it, then runs a real
//! collision simulation that biases the ball toward the committed bucket
//! at peg contacts. The host drives everything through
//! [`sim::DropSession`].

pub mod sim;
pub mod tuning;

pub use sim::{DropSession, Outcome, RiskLevel, SessionError, SessionPhase};
pub use tuning::Tuning;

/// Board configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Supported peg row counts
    pub const MIN_ROWS: usize = 8;
    pub const MAX_ROWS: usize = 12;

    /// Board paddings reserved above the first peg row and below the buckets
    pub const PADDING_TOP: f32 = 40.0;
    pub const PADDING_BOTTOM: f32 = 80.0;

    /// Collision radii
    pub const PEG_RADIUS: f32 = 3.0;
    pub const BALL_RADIUS: f32 = 5.5;

    /// Bucket band dimensions
    pub const BUCKET_HEIGHT: f32 = 40.0;
    /// Gap between the last peg row and the bucket top
    pub const BUCKET_DROP_GAP: f32 = 10.0;
    /// Depth of the bucket interior down to the floor
    pub const FLOOR_DEPTH: f32 = 30.0;
    /// Separator wall width
    pub const SEPARATOR_WIDTH: f32 = 2.0;
    /// Separators extend this far above the bucket top to intercept the ball
    pub const SEPARATOR_LIP: f32 = 10.0;

    /// Ball spawn height
    pub const SPAWN_Y: f32 = 20.0;
    /// Spawn jitter applied to vx, uniform in +-half of this
    pub const SPAWN_JITTER: f32 = 1.0;

    /// Maximum number of trail points to store
    pub const TRAIL_LENGTH: usize = 15;
    /// Render scale below which a settled ball is removed
    pub const INACTIVE_SCALE: f32 = 0.1;

    /// Bet bounds enforced by the external controls layer
    pub const MIN_BET: f32 = 10.0;
    pub const MAX_BET: f32 = 10_000.0;
}

/// Clamp a bet amount into the supported range
#[inline]
pub fn clamp_bet(amount: f32) -> f32 {
    amount.clamp(consts::MIN_BET, consts::MAX_BET)
}
