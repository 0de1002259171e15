//! Goal judging: the per-striker scoring state machine
//!
//! A goal counts when the striker passes fully through the gate in the
//! attacking direction: leading edge in from the front, trailing edge out
//! through the back. Both observations latch in [`ScoringState`] across
//! ticks. A separate eligibility flag, armed only while the whole team is
//! home, gates the award.
//!
//! Both goals share one code path by projecting x onto the goal's signed
//! entry axis: coordinates increase in the attacking direction.

use super::state::{Agent, Goal};

/// Outcome of judging one striker against one goal for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    /// Nothing of note, or a partial sequence still in progress
    NoGoal,
    /// Full front-to-back crossing while eligible: award the goal
    Goal,
    /// Full crossing completed but the team was not ready; the sequence is
    /// discarded so it cannot score retroactively when readiness re-arms
    CrossingDisallowed,
}

/// Advance the striker's scoring state machine by one observation
///
/// Non-strikers must not be judged; the tick loop only calls this for the
/// striker of each team against the opposing goal.
pub fn judge_gate(striker: &mut Agent, goal: &Goal) -> GateVerdict {
    debug_assert!(striker.is_striker);
    debug_assert!(striker.team != goal.team);

    let sign = goal.entry_sign();
    let line = sign * goal.gate_line_x();
    // Signed axis: positive direction is into the goal
    let center = sign * striker.pos.x;
    let leading = center + striker.radius;
    let trailing = center - striker.radius;
    let toward_goal = sign * striker.vel.x > 0.0;

    let (y_min, y_max) = goal.gate_y_range();
    let in_gate_band = striker.pos.y >= y_min && striker.pos.y <= y_max;

    let crossing_gate = leading >= line && trailing <= line && in_gate_band;
    striker.scoring.crossed_goal_line = crossing_gate;

    // Front-edge transition: leading edge past the line, trailing edge not
    // yet through, moving inward
    if crossing_gate && toward_goal && trailing < line {
        striker.scoring.entered_from_front = true;
    }

    // Trailing-edge transition: only meaningful once entered from the front.
    // The edge must actually cross the line between two observations; being
    // past it is not enough, or a striker that reached the backfield around
    // a post would exit-latch the moment it drifted into the gate band.
    let trailing_crossed = trailing >= line
        && striker
            .scoring
            .last_trailing_edge
            .is_some_and(|prev| prev < line);
    if striker.scoring.entered_from_front && toward_goal && in_gate_band && trailing_crossed {
        striker.scoring.exited_through_back = true;
    }
    striker.scoring.last_trailing_edge = Some(trailing);

    if striker.scoring.entered_from_front
        && striker.scoring.exited_through_back
        && !striker.scoring.scored
    {
        if striker.scoring.ready_to_score_again {
            striker.scoring.scored = true;
            striker.scoring.ready_to_score_again = false;
            return GateVerdict::Goal;
        }
        // Completed crossing with teammates still forward: consume the
        // sequence without awarding
        striker.scoring.entered_from_front = false;
        striker.scoring.exited_through_back = false;
        return GateVerdict::CrossingDisallowed;
    }

    GateVerdict::NoGoal
}
