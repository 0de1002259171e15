//! Collision detection and response
//!
//! Three interactions: drone vs drone (impulse exchange with restitution),
//! drone vs field boundary (clamp and damped reflection), and drone vs goal
//! post (specular bounce off a static rectangle). The roster is small, so
//! the pairwise pass is a plain O(n²) loop with no spatial partitioning.

use glam::Vec2;

use super::state::{Agent, Goal, Post};
use crate::consts::{POST_DAMPING, RESTITUTION, WALL_DAMPING};

/// Margin added when pushing a drone off a post, so the same contact does
/// not re-trigger next tick
const POST_PUSH_MARGIN: f32 = 1.0;

/// True iff two circular agents overlap
#[inline]
pub fn circles_overlap(a: &Agent, b: &Agent) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Resolve one drone-drone collision with an elastic impulse
///
/// No-op when the pair is already separating, which keeps repeated
/// resolution from injecting energy. Interpenetration is corrected by
/// pushing both drones apart along the normal, half the overlap each.
pub fn resolve_circle_collision(a: &mut Agent, b: &mut Agent) {
    let normal = (a.pos - b.pos).normalize_or_zero();
    if normal == Vec2::ZERO {
        // Coincident centers, no usable normal
        return;
    }

    let relative_velocity = a.vel - b.vel;
    let velocity_along_normal = relative_velocity.dot(normal);

    // Separating already
    if velocity_along_normal > 0.0 {
        return;
    }

    let inv_mass_a = 1.0 / a.mass;
    let inv_mass_b = 1.0 / b.mass;
    let j = -(1.0 + RESTITUTION) * velocity_along_normal / (inv_mass_a + inv_mass_b);
    let impulse = normal * j;
    a.vel += impulse * inv_mass_a;
    b.vel -= impulse * inv_mass_b;

    let overlap = (a.radius + b.radius) - a.pos.distance(b.pos);
    if overlap > 0.0 {
        let correction = normal * (overlap * 0.5);
        a.pos += correction;
        b.pos -= correction;
    }
}

/// Keep a drone inside the field, reflecting with energy loss on contact
///
/// Each of the four sides clamps independently, so a corner hit reflects
/// both components in the same tick. The comparisons are strict: a drone
/// resting exactly on the limit is not re-clamped.
pub fn resolve_boundary_collision(agent: &mut Agent, field_width: f32, field_height: f32) {
    if agent.pos.x - agent.radius < 0.0 {
        agent.pos.x = agent.radius;
        agent.vel.x = -agent.vel.x * WALL_DAMPING;
    }
    if agent.pos.x + agent.radius > field_width {
        agent.pos.x = field_width - agent.radius;
        agent.vel.x = -agent.vel.x * WALL_DAMPING;
    }
    if agent.pos.y - agent.radius < 0.0 {
        agent.pos.y = agent.radius;
        agent.vel.y = -agent.vel.y * WALL_DAMPING;
    }
    if agent.pos.y + agent.radius > field_height {
        agent.pos.y = field_height - agent.radius;
        agent.vel.y = -agent.vel.y * WALL_DAMPING;
    }
}

/// Closest-point test between a circle and a rectangle
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, post: &Post) -> bool {
    let closest = post.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// First post of the goal the drone overlaps, if any
pub fn overlapping_post(agent: &Agent, goal: &Goal) -> Option<usize> {
    goal.posts
        .iter()
        .position(|post| circle_rect_overlap(agent.pos, agent.radius, post))
}

/// Bounce a drone off a static post
///
/// Pushes the drone fully outside along the separation vector and reflects
/// the velocity with damping. When the center sits inside the rectangle the
/// closest point is the center itself, so the push is measured from the
/// nearest face instead.
pub fn resolve_post_collision(agent: &mut Agent, post: &Post) {
    let closest = post.closest_point(agent.pos);
    let separation = agent.pos - closest;
    let (surface, normal) = if separation.length_squared() > f32::EPSILON {
        (closest, separation.normalize())
    } else {
        nearest_face(agent.pos, post)
    };

    agent.pos = surface + normal * (agent.radius + POST_PUSH_MARGIN);

    let along_normal = agent.vel.dot(normal);
    agent.vel = (agent.vel - 2.0 * along_normal * normal) * POST_DAMPING;
}

/// Surface point and outward normal of the rectangle face nearest to an
/// interior point
fn nearest_face(p: Vec2, post: &Post) -> (Vec2, Vec2) {
    let to_left = p.x - post.left();
    let to_right = post.right() - p.x;
    let to_top = p.y - post.top();
    let to_bottom = post.bottom() - p.y;
    let min = to_left.min(to_right).min(to_top).min(to_bottom);

    if min == to_left {
        (Vec2::new(post.left(), p.y), -Vec2::X)
    } else if min == to_right {
        (Vec2::new(post.right(), p.y), Vec2::X)
    } else if min == to_top {
        (Vec2::new(p.x, post.top()), -Vec2::Y)
    } else {
        (Vec2::new(p.x, post.bottom()), Vec2::Y)
    }
}
