//! Ball state
//!
//! One ball exists per round. The drop simulator is its only writer; it is
//! reset on round start and marked inactive after the settle animation.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::Geometry;
use crate::consts::*;

/// Phase of the ball within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    /// Gravity plus peg collisions, path-guided nudges active
    Falling,
    /// Inside the bucket band; pegs disabled, walls and floor remain
    Landing,
    /// Velocity below threshold; outcome is final, shrink animation runs
    Settled,
    /// Shrink finished; removed from rendering
    Inactive,
}

/// The ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: BallPhase,
    /// Render scale, decays multiplicatively after settling
    pub scale: f32,
    /// Next peg row whose planned deflection is still unconsumed
    pub decision_cursor: usize,
    /// Recent positions for the motion trail, oldest evicted. Rendering
    /// only, never consulted by physics.
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// Spawn at the top center with a slight horizontal jitter
    pub fn spawn<R: Rng>(geometry: &Geometry, rng: &mut R) -> Self {
        let jitter = (rng.random::<f32>() - 0.5) * SPAWN_JITTER;
        Self {
            pos: Vec2::new(geometry.width / 2.0, SPAWN_Y),
            vel: Vec2::new(jitter, 0.0),
            phase: BallPhase::Falling,
            scale: 1.0,
            decision_cursor: 0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record current position to the trail (call each pre-settle step)
    pub fn record_trail(&mut self) {
        if self.trail.len() == TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.trail.push_back(self.pos);
    }

    /// Render view of the current state
    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            pos: self.pos,
            vel: self.vel,
            phase: self.phase,
            scale: self.scale,
            trail: self.trail.iter().copied().collect(),
        }
    }
}

/// Per-frame view handed to the host for rendering
#[derive(Debug, Clone, Serialize)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: BallPhase,
    pub scale: f32,
    pub trail: Vec<Vec2>,
}
