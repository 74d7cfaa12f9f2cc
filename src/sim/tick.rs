//! Fixed timestep drop simulation
//!
//! Advances one ball through the peg field one step at a time. Steering is
//! additive bias only: each peg row contributes exactly one signed nudge
//! to vx, taken from the planned path, so the ball converges on the
//! committed bucket through real collision dynamics instead of a scripted
//! trajectory.

use super::collision::{collide_floor, collide_peg, collide_separator, collide_walls};
use super::layout::Geometry;
use super::outcome::Outcome;
use super::path::DropPath;
use super::state::{Ball, BallPhase};
use crate::consts::*;
use crate::tuning::Tuning;

/// Terminal notifications from the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Velocity dropped below threshold on the floor; the round is final.
    /// Emitted at most once per round.
    Settled { bucket_index: usize },
    /// Post-settle shrink finished; the ball can be dropped from rendering
    Deactivated,
}

/// One round's simulation: the ball, its planned path and the committed
/// outcome. The path is immutable from the first step onward.
pub struct DropSim {
    pub ball: Ball,
    path: DropPath,
    outcome: Outcome,
    resting_bucket: Option<usize>,
    settled_emitted: bool,
}

impl DropSim {
    pub fn new(ball: Ball, path: DropPath, outcome: Outcome) -> Self {
        Self {
            ball,
            path,
            outcome,
            resting_bucket: None,
            settled_emitted: false,
        }
    }

    pub fn path(&self) -> &DropPath {
        &self.path
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Bucket column the ball physically came to rest in
    pub fn resting_bucket(&self) -> Option<usize> {
        self.resting_bucket
    }
}

/// Consume every planned decision up to and including `row`, adding the
/// guidance bias for each. The cursor only moves forward, so a row is
/// never applied twice even when several pegs of that row are touched.
fn consume_cues(ball: &mut Ball, path: &DropPath, row: usize, force: f32) {
    while ball.decision_cursor <= row {
        if let Some(decision) = path.get(ball.decision_cursor) {
            ball.vel.x += decision.sign() * force;
            log::trace!(
                "row {} cue {:?} -> vx {:.2}",
                ball.decision_cursor,
                decision,
                ball.vel.x
            );
        }
        ball.decision_cursor += 1;
    }
}

/// Advance the simulation by one fixed step.
///
/// No-ops on degenerate geometry rather than dividing by zero; the session
/// additionally refuses to start a round against one.
pub fn tick(sim: &mut DropSim, geo: &Geometry, tuning: &Tuning) -> Option<SimEvent> {
    if geo.is_degenerate() {
        return None;
    }

    let ball = &mut sim.ball;
    match ball.phase {
        BallPhase::Inactive => return None,
        BallPhase::Settled => {
            ball.scale *= tuning.shrink_rate;
            if ball.scale < INACTIVE_SCALE {
                ball.phase = BallPhase::Inactive;
                return Some(SimEvent::Deactivated);
            }
            return None;
        }
        BallPhase::Falling | BallPhase::Landing => {}
    }

    // Integrate, with component clamps so one step can never tunnel a
    // separator or the floor band
    ball.vel.y += tuning.gravity;
    ball.vel *= tuning.friction;
    ball.vel.x = ball
        .vel
        .x
        .clamp(-tuning.max_horizontal_speed, tuning.max_horizontal_speed);
    ball.vel.y = ball
        .vel
        .y
        .clamp(-tuning.max_vertical_speed, tuning.max_vertical_speed);
    ball.pos += ball.vel;

    collide_walls(ball, geo.width, tuning.wall_restitution);

    if ball.phase == BallPhase::Falling {
        for peg in &geo.pegs {
            if collide_peg(ball, peg.pos, PEG_RADIUS, tuning.peg_restitution) {
                consume_cues(ball, &sim.path, peg.row, tuning.guidance_force);
            }
        }
        // A row fallen through without touching a peg still spends its
        // planned decision once the ball is clearly below the row plane
        while ball.decision_cursor < sim.path.len()
            && ball.pos.y > geo.row_y(ball.decision_cursor) + PEG_RADIUS + BALL_RADIUS
        {
            consume_cues(
                ball,
                &sim.path,
                ball.decision_cursor,
                tuning.guidance_force,
            );
        }
    }

    for sep in &geo.separators {
        collide_separator(ball, sep, tuning.wall_restitution);
    }

    // Crossing into the bucket band ends the peg phase; the ball is now
    // committed to whatever column the separators fence it into
    if ball.phase == BallPhase::Falling && ball.pos.y > geo.bucket_top {
        ball.phase = BallPhase::Landing;
    }

    if collide_floor(
        ball,
        geo.floor_y,
        tuning.floor_restitution,
        tuning.floor_friction,
    ) && ball.vel.x.abs() < tuning.settle_threshold
        && ball.vel.y.abs() < tuning.settle_threshold
    {
        ball.phase = BallPhase::Settled;
        let bucket_index = geo.bucket_index_nearest(ball.pos.x);
        sim.resting_bucket = Some(bucket_index);
        if !sim.settled_emitted {
            sim.settled_emitted = true;
            log::debug!(
                "settled in bucket {bucket_index} (committed {})",
                sim.outcome.bucket_index
            );
            return Some(SimEvent::Settled { bucket_index });
        }
        return None;
    }

    ball.record_trail();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::compute_layout;
    use crate::sim::outcome::{RiskLevel, multiplier_table};
    use crate::sim::path::plan_path;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEWPORT: (f32, f32) = (800.0, 600.0);
    const TICK_CEILING: usize = 5000;

    fn build_sim(
        rows: usize,
        risk: RiskLevel,
        target: usize,
        seed: u64,
    ) -> (DropSim, Geometry, Tuning) {
        let geo = compute_layout(rows, risk, VIEWPORT);
        let mut rng = Pcg32::seed_from_u64(seed);
        let path = plan_path(rows, target, &mut rng);
        let outcome = Outcome {
            bucket_index: target,
            multiplier: multiplier_table(rows, risk)[target],
        };
        let ball = Ball::spawn(&geo, &mut rng);
        (DropSim::new(ball, path, outcome), geo, Tuning::default())
    }

    /// Run until the Settled event, returning the tick it fired on
    fn run_until_settled(sim: &mut DropSim, geo: &Geometry, tuning: &Tuning) -> Option<usize> {
        for i in 0..TICK_CEILING {
            if let Some(SimEvent::Settled { .. }) = tick(sim, geo, tuning) {
                return Some(i);
            }
        }
        None
    }

    #[test]
    fn test_settles_within_ceiling_for_all_configs() {
        for rows in MIN_ROWS..=MAX_ROWS {
            for risk in RiskLevel::ALL {
                let target = (rows + 1) / 2;
                let (mut sim, geo, tuning) = build_sim(rows, risk, target, 0xBEEF);
                assert!(
                    run_until_settled(&mut sim, &geo, &tuning).is_some(),
                    "no settlement for rows={rows} risk={risk:?}"
                );
            }
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (mut a, geo, tuning) = build_sim(10, RiskLevel::Medium, 5, 1234);
        let (mut b, _, _) = build_sim(10, RiskLevel::Medium, 5, 1234);
        let ticks_a = run_until_settled(&mut a, &geo, &tuning);
        let ticks_b = run_until_settled(&mut b, &geo, &tuning);
        assert_eq!(ticks_a, ticks_b);
        assert!(ticks_a.is_some());
        assert_eq!(a.resting_bucket(), b.resting_bucket());
        assert_eq!(a.ball.pos, b.ball.pos);
    }

    #[test]
    fn test_steering_reaches_extreme_buckets() {
        // All-left and all-right paths are monotone: every cue pushes the
        // same way, so the ball must end up in the outer column
        for (rows, seed) in [(8, 7u64), (10, 21), (12, 3)] {
            let (mut sim, geo, tuning) = build_sim(rows, RiskLevel::High, 0, seed);
            run_until_settled(&mut sim, &geo, &tuning).expect("left extreme settles");
            assert_eq!(sim.resting_bucket(), Some(0), "rows={rows}");

            let (mut sim, geo, tuning) = build_sim(rows, RiskLevel::High, rows, seed);
            run_until_settled(&mut sim, &geo, &tuning).expect("right extreme settles");
            assert_eq!(sim.resting_bucket(), Some(rows), "rows={rows}");
        }
    }

    #[test]
    fn test_center_low_risk_round_pays_half() {
        // 8 rows, Low risk, center bucket: committed multiplier is 0.5
        let (mut sim, geo, tuning) = build_sim(8, RiskLevel::Low, 4, 42);
        assert_eq!(sim.path().right_count(), 4);
        assert_eq!(sim.outcome().multiplier, 0.5);
        run_until_settled(&mut sim, &geo, &tuning).expect("center round settles");
        assert_eq!(sim.outcome().payout(100.0), 50.0);
    }

    #[test]
    fn test_extreme_high_risk_round_pays_max() {
        // 12 rows, High risk, bucket 0: all-zero path, multiplier 170
        let (mut sim, geo, tuning) = build_sim(12, RiskLevel::High, 0, 11);
        assert_eq!(sim.path().right_count(), 0);
        assert_eq!(sim.outcome().multiplier, 170.0);
        run_until_settled(&mut sim, &geo, &tuning).expect("extreme round settles");
        assert_eq!(sim.resting_bucket(), Some(0));
    }

    #[test]
    fn test_every_cue_is_consumed_exactly_once() {
        let (mut sim, geo, tuning) = build_sim(10, RiskLevel::Medium, 5, 77);
        run_until_settled(&mut sim, &geo, &tuning).expect("settles");
        // Cursor ran through the whole path during the fall
        assert_eq!(sim.ball.decision_cursor, sim.path().len());
    }

    #[test]
    fn test_landing_phase_begins_below_bucket_top() {
        let (mut sim, geo, tuning) = build_sim(8, RiskLevel::Low, 4, 9);
        for _ in 0..TICK_CEILING {
            tick(&mut sim, &geo, &tuning);
            if sim.ball.phase == BallPhase::Landing {
                break;
            }
        }
        assert_eq!(sim.ball.phase, BallPhase::Landing);
        assert!(sim.ball.pos.y > geo.bucket_top);
    }

    #[test]
    fn test_settled_event_fires_once_then_deactivates() {
        let (mut sim, geo, tuning) = build_sim(8, RiskLevel::Medium, 4, 2);
        run_until_settled(&mut sim, &geo, &tuning).expect("settles");
        let mut deactivated = 0;
        for _ in 0..200 {
            match tick(&mut sim, &geo, &tuning) {
                Some(SimEvent::Settled { .. }) => panic!("duplicate settlement event"),
                Some(SimEvent::Deactivated) => deactivated += 1,
                None => {}
            }
        }
        assert_eq!(deactivated, 1);
        assert_eq!(sim.ball.phase, BallPhase::Inactive);
        assert!(sim.ball.scale < INACTIVE_SCALE);
    }

    #[test]
    fn test_degenerate_geometry_is_a_noop() {
        let (mut sim, _, tuning) = build_sim(8, RiskLevel::Low, 4, 1);
        let empty = compute_layout(8, RiskLevel::Low, (0.0, 600.0));
        let before = sim.ball.pos;
        for _ in 0..100 {
            assert_eq!(tick(&mut sim, &empty, &tuning), None);
        }
        assert_eq!(sim.ball.pos, before);
    }

    #[test]
    fn test_ball_never_leaves_the_board() {
        for seed in 0..100u64 {
            let rows = MIN_ROWS + (seed as usize % 5);
            let target = seed as usize % (rows + 1);
            let (mut sim, geo, tuning) = build_sim(rows, RiskLevel::Medium, target, seed);
            for _ in 0..TICK_CEILING {
                let done = matches!(tick(&mut sim, &geo, &tuning), Some(SimEvent::Settled { .. }));
                assert!(sim.ball.pos.x >= 0.0 && sim.ball.pos.x <= geo.width);
                if done {
                    break;
                }
            }
        }
    }
}
