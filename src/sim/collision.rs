//! Collision detection and response
//!
//! Circle-vs-circle for pegs, circle-vs-thin-rectangle for separators,
//! axis clamps for the side walls and the bucket floor. Each routine
//! resolves the overlap positionally and applies the surface's
//! restitution; pegs are bouncier than walls.

use glam::Vec2;

use super::layout::Separator;
use super::state::Ball;
use crate::consts::BALL_RADIUS;

/// Clamp the ball inside the side walls, reflecting vx on contact.
/// Returns true if a wall was hit.
pub fn collide_walls(ball: &mut Ball, width: f32, wall_restitution: f32) -> bool {
    if ball.pos.x < BALL_RADIUS {
        ball.pos.x = BALL_RADIUS;
        ball.vel.x = ball.vel.x.abs() * wall_restitution;
        true
    } else if ball.pos.x > width - BALL_RADIUS {
        ball.pos.x = width - BALL_RADIUS;
        ball.vel.x = -ball.vel.x.abs() * wall_restitution;
        true
    } else {
        false
    }
}

/// Resolve a peg contact: push the ball out along the collision normal and
/// reflect the normal velocity component. Returns true on contact.
pub fn collide_peg(ball: &mut Ball, peg_pos: Vec2, peg_radius: f32, restitution: f32) -> bool {
    let delta = ball.pos - peg_pos;
    let min_dist = peg_radius + BALL_RADIUS;
    let dist_sq = delta.length_squared();
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        // Ball center exactly on the peg; eject straight up
        Vec2::new(0.0, -1.0)
    };
    ball.pos += normal * (min_dist - dist);

    let along = ball.vel.dot(normal);
    if along < 0.0 {
        ball.vel -= (1.0 + restitution) * along * normal;
    }
    true
}

/// Resolve contact with a thin vertical separator wall: push the ball to
/// the nearer side and reflect vx with wall restitution.
pub fn collide_separator(ball: &mut Ball, sep: &Separator, wall_restitution: f32) -> bool {
    let overlaps_x =
        ball.pos.x + BALL_RADIUS > sep.x && ball.pos.x - BALL_RADIUS < sep.x + sep.w;
    let overlaps_y =
        ball.pos.y + BALL_RADIUS > sep.y && ball.pos.y - BALL_RADIUS < sep.y + sep.h;
    if !(overlaps_x && overlaps_y) {
        return false;
    }

    if ball.pos.x < sep.x + sep.w / 2.0 {
        ball.pos.x = sep.x - BALL_RADIUS;
        ball.vel.x = -ball.vel.x.abs() * wall_restitution;
    } else {
        ball.pos.x = sep.x + sep.w + BALL_RADIUS;
        ball.vel.x = ball.vel.x.abs() * wall_restitution;
    }
    true
}

/// Clamp the ball onto the bucket floor, damping both axes heavily.
/// Returns true while the ball is in floor contact.
pub fn collide_floor(
    ball: &mut Ball,
    floor_y: f32,
    floor_restitution: f32,
    floor_friction: f32,
) -> bool {
    if ball.pos.y <= floor_y - BALL_RADIUS {
        return false;
    }
    ball.pos.y = floor_y - BALL_RADIUS;
    ball.vel.y *= -floor_restitution;
    ball.vel.x *= floor_friction;
    true
}
