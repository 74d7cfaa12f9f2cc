//! Round orchestration
//!
//! The session is the single integration point for external collaborators:
//! it gates round starts, drives the fixed-step simulation from wall-clock
//! frames, and reports settlement exactly once per round. Bet/balance
//! checks live outside; the session assumes the bet is already committed
//! when a round starts.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::layout::{Geometry, compute_layout};
use super::outcome::{Outcome, RiskLevel, select_outcome};
use super::path::{DropPath, plan_path};
use super::state::{Ball, BallSnapshot};
use super::tick::{DropSim, SimEvent, tick};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::tuning::Tuning;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// No ball in flight, controls editable
    Idle,
    /// Simulation running, controls locked
    Dropping,
    /// Settlement signaled; a new round may start
    Completed,
}

/// Rejected operations. Violations are surfaced, never silently dropped;
/// a swallowed one would desynchronize the committed bet from the round
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid state transition: {op} while {phase:?}")]
    InvalidTransition {
        phase: SessionPhase,
        op: &'static str,
    },
    #[error("board geometry is degenerate; supply a valid viewport first")]
    DegenerateGeometry,
}

/// Settlement summary for the external history collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundRecord {
    pub bet: f32,
    pub multiplier: f32,
    pub payout: f32,
    pub rows: usize,
    pub risk: RiskLevel,
}

type SettledCallback = Box<dyn FnMut(&Outcome)>;

/// One board's round state machine. Lives for the app's lifetime with
/// per-round phase resets; at most one ball is ever in flight.
pub struct DropSession {
    rows: usize,
    risk: RiskLevel,
    viewport: (f32, f32),
    geometry: Geometry,
    tuning: Tuning,
    /// Master RNG; outcome draw, path shuffle and spawn jitter all flow
    /// from it, so a seed reproduces a session exactly
    rng: Pcg32,
    phase: SessionPhase,
    sim: Option<DropSim>,
    /// The committed result awaiting settlement, owned here rather than in
    /// any ambient slot
    pending: Option<Outcome>,
    settled_fired: bool,
    accumulator: f32,
    on_settled: Option<SettledCallback>,
}

impl DropSession {
    pub fn new(rows: usize, risk: RiskLevel, viewport: (f32, f32), seed: u64) -> Self {
        Self::with_tuning(rows, risk, viewport, seed, Tuning::default())
    }

    pub fn with_tuning(
        rows: usize,
        risk: RiskLevel,
        viewport: (f32, f32),
        seed: u64,
        tuning: Tuning,
    ) -> Self {
        Self {
            rows,
            risk,
            viewport,
            geometry: compute_layout(rows, risk, viewport),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            sim: None,
            pending: None,
            settled_fired: false,
            accumulator: 0.0,
            on_settled: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The committed outcome of the current or latest round
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.pending
    }

    /// Register the settlement listener. Fired exactly once per round; the
    /// session performs no I/O itself.
    pub fn set_on_settled(&mut self, callback: impl FnMut(&Outcome) + 'static) {
        self.on_settled = Some(Box::new(callback));
    }

    /// Commit a new round: select the outcome, plan the path, spawn the
    /// ball. Legal from Idle or Completed only. Both selection and
    /// planning finish before the first simulation step, and the path is
    /// never touched again afterwards.
    pub fn start_round(
        &mut self,
        rows: usize,
        risk: RiskLevel,
    ) -> Result<(Outcome, DropPath), SessionError> {
        if self.phase == SessionPhase::Dropping {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                op: "start_round",
            });
        }
        if rows != self.rows || risk != self.risk {
            self.rows = rows;
            self.risk = risk;
            self.geometry = compute_layout(rows, risk, self.viewport);
        }
        if self.geometry.is_degenerate() {
            return Err(SessionError::DegenerateGeometry);
        }

        let outcome = select_outcome(rows, risk, &mut self.rng);
        let path = plan_path(rows, outcome.bucket_index, &mut self.rng);
        let ball = Ball::spawn(&self.geometry, &mut self.rng);

        log::info!(
            "round start: rows={rows} risk={} -> bucket {} at {}x",
            risk.as_str(),
            outcome.bucket_index,
            outcome.multiplier
        );

        self.pending = Some(outcome);
        self.sim = Some(DropSim::new(ball, path.clone(), outcome));
        self.settled_fired = false;
        self.accumulator = 0.0;
        self.phase = SessionPhase::Dropping;
        Ok((outcome, path))
    }

    /// Advance the simulation by a wall-clock frame. Legal while a round
    /// is dropping or its settle animation is still running.
    pub fn tick(&mut self, dt: f32) -> Result<BallSnapshot, SessionError> {
        let phase = self.phase;
        let Some(sim) = self.sim.as_mut().filter(|_| phase != SessionPhase::Idle) else {
            return Err(SessionError::InvalidTransition { phase, op: "tick" });
        };

        // Fixed-step accumulator with a substep cap so a long frame stall
        // cannot spiral
        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        let mut settled = false;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            match tick(sim, &self.geometry, &self.tuning) {
                Some(SimEvent::Settled { bucket_index }) => {
                    log::debug!("settlement signal from bucket {bucket_index}");
                    settled = true;
                }
                Some(SimEvent::Deactivated) => {
                    log::debug!("ball deactivated");
                }
                None => {}
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        let snapshot = sim.ball.snapshot();
        if settled {
            self.notify_settled();
        }

        Ok(snapshot)
    }

    /// Rebuild geometry for new controls or viewport. Rejected mid-round:
    /// moving a peg out from under an in-flight ball is undefined by
    /// contract.
    pub fn recompute_layout(
        &mut self,
        rows: usize,
        risk: RiskLevel,
        viewport: (f32, f32),
    ) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Dropping {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                op: "recompute_layout",
            });
        }
        self.rows = rows;
        self.risk = risk;
        self.viewport = viewport;
        self.geometry = compute_layout(rows, risk, viewport);
        Ok(())
    }

    /// Settlement summary of the completed round for history/payout
    pub fn round_record(&self, bet: f32) -> Option<RoundRecord> {
        if self.phase != SessionPhase::Completed {
            return None;
        }
        let outcome = self.pending?;
        Some(RoundRecord {
            bet,
            multiplier: outcome.multiplier,
            payout: outcome.payout(bet),
            rows: self.rows,
            risk: self.risk,
        })
    }

    /// Handle the simulator's settlement signal. Idempotent: a duplicate
    /// signal for the same round is ignored, so downstream payout effects
    /// run once.
    fn notify_settled(&mut self) {
        if self.settled_fired {
            log::warn!("duplicate settlement signal ignored");
            return;
        }
        self.settled_fired = true;
        self.phase = SessionPhase::Completed;
        if let Some(outcome) = self.pending {
            log::info!(
                "round settled: bucket {} at {}x",
                outcome.bucket_index,
                outcome.multiplier
            );
            if let Some(callback) = self.on_settled.as_mut() {
                callback(&outcome);
            }
        }
    }
}
