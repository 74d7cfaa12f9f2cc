//! Deterministic simulation module
//!
//! All round logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the session
//! - No rendering or platform dependencies
//!
//! Data flows one direction per round: outcome selection, then path
//! planning, then the physics drop. The session is the only surface
//! external callers touch.

pub mod collision;
pub mod layout;
pub mod outcome;
pub mod path;
pub mod session;
pub mod state;
pub mod tick;

pub use layout::{Bucket, Geometry, Peg, Separator, compute_layout};
pub use outcome::{Outcome, RiskLevel, multiplier_table, select_outcome};
pub use path::{Deflection, DropPath, plan_path};
pub use session::{DropSession, RoundRecord, SessionError, SessionPhase};
pub use state::{Ball, BallPhase, BallSnapshot};
pub use tick::{DropSim, SimEvent, tick};
