//! Per-tick match orchestration
//!
//! One call advances the match by `dt` seconds through a fixed stage order:
//! timer, control, physics (drag + integration + collisions), scoring,
//! return-home sweep. A fault inside a stage is logged at that stage's
//! granularity and the remaining stages still run; no error ever escapes
//! [`tick`], so the caller's frame loop cannot be taken down by the sim.

use log::{debug, error, info};
use thiserror::Error;

use super::collision;
use super::control::{self, AiContext};
use super::goal::{GateVerdict, judge_gate};
use super::state::{ControlSource, MatchOutcome, MatchPhase, MatchState, Team};
use crate::consts::AIR_DRAG;

/// Transient per-stage faults. These indicate state corrupted by an earlier
/// bug, not conditions the simulation is expected to reach.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("agent {id} is AI-controlled but has no AI state")]
    MissingAiState { id: u32 },
    #[error("agent {id} has a non-finite position or velocity")]
    NonFiniteAgent { id: u32 },
}

/// Things that happened during one tick, for the UI/rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// Emitted exactly once per awarded goal
    GoalScored {
        team: Team,
        striker_id: u32,
        scores: [u32; 2],
    },
    /// An agent flagged `must_return_home` re-entered its own half
    AgentReturnedHome { agent_id: u32, team: Team },
    /// Timer elapsed; emitted exactly once per match
    MatchFinished { outcome: MatchOutcome },
}

/// Advance the match by `dt` seconds
///
/// A stopped or finished match returns immediately with no events: pausing
/// is just a flag flip and the state stays readable for rendering.
pub fn tick(state: &mut MatchState, dt: f32) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    if state.phase != MatchPhase::Running {
        return events;
    }

    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        let outcome = MatchOutcome::from_scores(state.scores);
        state.outcome = Some(outcome);
        state.phase = MatchPhase::Finished;
        info!(
            "match finished {}-{}: {:?}",
            state.scores[0], state.scores[1], outcome
        );
        events.push(MatchEvent::MatchFinished { outcome });
        return events;
    }

    if let Err(e) = control_stage(state, dt) {
        error!("control stage fault, skipping rest of stage: {e}");
    }
    if let Err(e) = physics_stage(state, dt) {
        error!("physics stage fault, skipping rest of stage: {e}");
    }
    if let Err(e) = scoring_stage(state, &mut events) {
        error!("scoring stage fault, skipping rest of stage: {e}");
    }
    return_home_sweep(state, &mut events);

    events
}

/// Player and AI steering: set each agent's velocity via the inertia blend
fn control_stage(state: &mut MatchState, dt: f32) -> Result<(), SimError> {
    let striker_a_pos = state.agents[state.striker_index(Team::A)].pos;
    let striker_b_pos = state.agents[state.striker_index(Team::B)].pos;
    let opposing_goals = [
        *state.opposing_goal(Team::A),
        *state.opposing_goal(Team::B),
    ];

    let MatchState {
        agents,
        rng,
        config,
        player_direction,
        ..
    } = state;

    for agent in agents.iter_mut() {
        match agent.control {
            ControlSource::Player => {
                control::steer_player(agent, *player_direction, config, dt);
            }
            ControlSource::Ai => {
                let mut ai = agent.ai.ok_or(SimError::MissingAiState { id: agent.id })?;
                let (own, opposing) = match agent.team {
                    Team::A => (striker_a_pos, striker_b_pos),
                    Team::B => (striker_b_pos, striker_a_pos),
                };
                let ctx = AiContext {
                    own_striker_pos: own,
                    opposing_striker_pos: opposing,
                    opposing_goal: opposing_goals[agent.team.index()],
                };
                control::update_ai(agent, &mut ai, &ctx, config, rng, dt);
                agent.ai = Some(ai);
            }
        }
    }
    Ok(())
}

/// Drag, integration, then collisions in fixed order: agent pairs,
/// boundaries, goal posts
fn physics_stage(state: &mut MatchState, dt: f32) -> Result<(), SimError> {
    let MatchState {
        agents,
        config,
        goals,
        ..
    } = state;

    for agent in agents.iter_mut() {
        if !agent.pos.is_finite() || !agent.vel.is_finite() {
            return Err(SimError::NonFiniteAgent { id: agent.id });
        }
        agent.vel *= AIR_DRAG;
        agent.pos += agent.vel * dt;
    }

    // Every unordered pair, once per tick
    for i in 0..agents.len() {
        for j in (i + 1)..agents.len() {
            let (head, tail) = agents.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if collision::circles_overlap(a, b) {
                collision::resolve_circle_collision(a, b);
            }
        }
    }

    for agent in agents.iter_mut() {
        collision::resolve_boundary_collision(agent, config.field_width, config.field_height);
    }

    for agent in agents.iter_mut() {
        for goal in goals.iter() {
            if let Some(post_idx) = collision::overlapping_post(agent, goal) {
                collision::resolve_post_collision(agent, &goal.posts[post_idx]);
            }
        }
    }
    Ok(())
}

/// Team readiness, eligibility arming, and goal judging for both strikers
fn scoring_stage(state: &mut MatchState, events: &mut Vec<MatchEvent>) -> Result<(), SimError> {
    for team in [Team::A, Team::B] {
        let field_width = state.config.field_width;
        let ready = state
            .agents
            .iter()
            .filter(|a| a.team == team)
            .all(|a| a.in_own_half(field_width));
        state.team_ready[team.index()] = ready;

        let striker_idx = state.striker_index(team);
        let goal = *state.opposing_goal(team);
        let striker = &mut state.agents[striker_idx];
        if !striker.pos.is_finite() {
            return Err(SimError::NonFiniteAgent { id: striker.id });
        }

        // Eligibility re-arms only while the whole team is home
        if ready {
            striker.scoring.ready_to_score_again = true;
        }

        match judge_gate(striker, &goal) {
            GateVerdict::Goal => {
                let striker_id = striker.id;
                striker.scoring.reset_sequence();
                state.scores[team.index()] += 1;
                info!(
                    "team {:?} scored, now {}-{}",
                    team, state.scores[0], state.scores[1]
                );
                events.push(MatchEvent::GoalScored {
                    team,
                    striker_id,
                    scores: state.scores,
                });
                for agent in state.agents.iter_mut().filter(|a| a.team == team) {
                    agent.must_return_home = true;
                }
            }
            GateVerdict::CrossingDisallowed => {
                debug!("team {team:?} crossing disallowed, teammates not home");
            }
            GateVerdict::NoGoal => {}
        }
    }
    Ok(())
}

/// Clear `must_return_home` for any agent back in its own half
fn return_home_sweep(state: &mut MatchState, events: &mut Vec<MatchEvent>) {
    let field_width = state.config.field_width;
    for agent in state.agents.iter_mut() {
        if agent.must_return_home && agent.in_own_half(field_width) {
            agent.must_return_home = false;
            debug!("agent {} (team {:?}) returned home", agent.id, agent.team);
            events.push(MatchEvent::AgentReturnedHome {
                agent_id: agent.id,
                team: agent.team,
            });
        }
    }
}
