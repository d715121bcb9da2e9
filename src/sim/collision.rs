//! Collision detection and response between the ball and pegs
//!
//! Pegs are resolved one at a time in board order. A later peg sees the
//! position already pushed out by an earlier one; there is no simultaneous
//! contact solver, and the small energy drift this causes is accepted.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Peg};
use crate::clamp_speed;
use crate::consts::CONTACT_EPSILON;

/// Overlap between the ball and one peg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Direction from peg center to ball center (scaled by 1/epsilon when
    /// the centers coincide)
    pub normal: Vec2,
    /// How far the ball must move to stop overlapping
    pub penetration: f32,
    /// Center distance was within epsilon; push-out goes along +x
    pub degenerate: bool,
}

/// Check whether a ball at `ball_pos` overlaps `peg`
pub fn ball_peg_contact(ball_pos: Vec2, ball_radius: f32, peg: &Peg) -> Option<Contact> {
    let delta = ball_pos - peg.pos;
    let combined = ball_radius + peg.radius;
    let distance_sq = delta.length_squared();
    if distance_sq >= combined * combined {
        return None;
    }

    let distance = distance_sq.sqrt();
    Some(Contact {
        normal: delta / distance.max(CONTACT_EPSILON),
        penetration: combined - distance,
        degenerate: distance <= CONTACT_EPSILON,
    })
}

/// Per-frame collision parameters, already resolved for the board size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    /// Base sideways kick per unit of off-center contact
    pub nudge: f32,
    /// Random addition to `nudge`, uniform in `[0, nudge_jitter)`
    pub nudge_jitter: f32,
    /// Speed ceiling applied after each bounce
    pub speed_cap: f32,
}

/// Bounce velocity off a surface, keeping `restitution` of the normal part.
///
/// Returns `None` when the ball is not moving into the surface.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Option<Vec2> {
    let normal_speed = velocity.dot(normal);
    if normal_speed >= 0.0 {
        return None;
    }
    let impulse = -(1.0 + restitution) * normal_speed;
    Some(velocity + normal * impulse)
}

/// Push the ball out of every peg it overlaps and bounce it.
///
/// Struck pegs get `last_hit = now`; their ids are returned in board order.
pub fn resolve_peg_collisions<R: Rng>(
    ball: &mut Ball,
    pegs: &mut [Peg],
    params: &CollisionParams,
    now: f64,
    rng: &mut R,
) -> Vec<u32> {
    let mut struck = Vec::new();

    for peg in pegs.iter_mut() {
        let Some(contact) = ball_peg_contact(ball.pos, ball.radius, peg) else {
            continue;
        };

        if contact.degenerate {
            ball.pos.x += contact.penetration;
        } else {
            ball.pos += contact.normal * contact.penetration;
        }

        let Some(bounced) = bounce_velocity(ball.vel, contact.normal, ball.restitution) else {
            continue;
        };

        // Off-center hits kick sideways so the ball never balances on a peg
        let influence = (ball.pos.x - peg.pos.x) / peg.radius;
        let nudge = params.nudge + rng.random::<f32>() * params.nudge_jitter;
        let kicked = bounced + Vec2::new(influence * nudge * ball.restitution, 0.0);

        ball.vel = clamp_speed(kicked, params.speed_cap);
        peg.last_hit = Some(now);
        struck.push(peg.id);
    }

    struck
}
