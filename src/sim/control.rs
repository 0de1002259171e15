//! Drone control: inertia-blended steering for the player and the AI policy
//!
//! Both control sources share the same first-order blend: each tick the
//! velocity moves a fixed fraction of the way toward `direction * max_speed`.
//! The AI re-decides its target on a randomized 1-2 s timer and flies at a
//! slightly lower speed and blend rate than the player.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::config::MatchConfig;
use super::state::{Agent, AiState, Goal, Team};

/// Lateral jitter applied to AI support and return-home targets (px)
const AI_TARGET_JITTER: f32 = 100.0;
/// Probability that a non-striker marks the opposing striker instead of
/// supporting its own
const DEFEND_PROBABILITY: f64 = 0.7;

/// Immutable surroundings an AI drone decides against
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub own_striker_pos: Vec2,
    pub opposing_striker_pos: Vec2,
    pub opposing_goal: Goal,
}

/// First-order inertia blend toward a target velocity
#[inline]
pub fn blend_velocity(vel: Vec2, target_vel: Vec2, rate: f32) -> Vec2 {
    vel + (target_vel - vel) * rate
}

/// Apply one tick of player control
///
/// `direction` components are already in [-1, 1]: a normalized keyboard sum
/// or raw joystick magnitudes, used as-is.
pub fn steer_player(agent: &mut Agent, direction: Vec2, config: &MatchConfig, dt: f32) {
    let target_vel = direction * config.player_max_speed;
    let rate = config.blend_rate(config.player_inertia, dt);
    agent.vel = blend_velocity(agent.vel, target_vel, rate);
}

/// Apply one tick of AI control: count down the decision timer, re-target
/// when it expires, then steer toward the current target
pub fn update_ai(
    agent: &mut Agent,
    ai: &mut AiState,
    ctx: &AiContext,
    config: &MatchConfig,
    rng: &mut Pcg32,
    dt: f32,
) {
    ai.decision_cooldown -= dt;
    if ai.decision_cooldown <= 0.0 {
        ai.target = Some(decide_target(agent, ctx, config, rng));
        ai.decision_cooldown = rng.random_range(1.0..2.0);
    }

    if let Some(target) = ai.target {
        let direction = (target - agent.pos).normalize_or_zero();
        let target_vel = direction * config.ai_max_speed;
        let rate = config.blend_rate(config.ai_inertia, dt);
        agent.vel = blend_velocity(agent.vel, target_vel, rate);
    }
}

/// Pick a target point for an AI drone based on its role and match situation
fn decide_target(agent: &Agent, ctx: &AiContext, config: &MatchConfig, rng: &mut Pcg32) -> Vec2 {
    if agent.is_striker {
        if agent.must_return_home || !agent.scoring.ready_to_score_again {
            // Regroup in our own half near the vertical center
            let home_x = match agent.team {
                Team::A => config.field_width * 0.25,
                Team::B => config.field_width * 0.75,
            };
            let y = config.field_height / 2.0
                + (rng.random::<f32>() - 0.5) * AI_TARGET_JITTER;
            log::debug!("team {:?} striker returning to own half", agent.team);
            Vec2::new(home_x, y)
        } else {
            // Attack the middle of the gate, on the goal line itself
            ctx.opposing_goal.gate_center()
        }
    } else if rng.random_bool(DEFEND_PROBABILITY) {
        // Mark the opposing striker
        ctx.opposing_striker_pos
    } else {
        // Shadow our striker with some spread
        let offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * AI_TARGET_JITTER,
            (rng.random::<f32>() - 0.5) * AI_TARGET_JITTER,
        );
        ctx.own_striker_pos + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ControlSource, MatchState, ScoringState};
    use rand::SeedableRng;

    fn test_agent(team: Team, is_striker: bool) -> Agent {
        Agent {
            id: 0,
            pos: Vec2::new(250.0, 250.0),
            vel: Vec2::ZERO,
            radius: 10.0,
            mass: 1.0,
            team,
            is_striker,
            control: ControlSource::Ai,
            ai: Some(AiState::default()),
            scoring: ScoringState::default(),
            must_return_home: false,
        }
    }

    fn test_ctx() -> AiContext {
        let state = MatchState::new(MatchConfig::default(), 1).unwrap();
        AiContext {
            own_striker_pos: Vec2::new(250.0, 200.0),
            opposing_striker_pos: Vec2::new(750.0, 200.0),
            opposing_goal: state.goals[1],
        }
    }

    #[test]
    fn player_velocity_converges_on_target_speed() {
        let config = MatchConfig::default();
        let mut agent = test_agent(Team::A, true);
        agent.control = ControlSource::Player;
        let direction = Vec2::new(1.0, 0.0);
        for _ in 0..600 {
            steer_player(&mut agent, direction, &config, crate::consts::SIM_DT);
        }
        assert!((agent.vel.x - config.player_max_speed).abs() < 1.0);
        assert!(agent.vel.y.abs() < 1e-3);
    }

    #[test]
    fn zero_direction_brakes_to_rest() {
        let config = MatchConfig::default();
        let mut agent = test_agent(Team::A, true);
        agent.vel = Vec2::new(150.0, -80.0);
        for _ in 0..600 {
            steer_player(&mut agent, Vec2::ZERO, &config, crate::consts::SIM_DT);
        }
        assert!(agent.vel.length() < 1.0);
    }

    #[test]
    fn attacking_striker_targets_the_gate_center() {
        let config = MatchConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let ctx = test_ctx();
        let agent = test_agent(Team::A, true);
        let target = decide_target(&agent, &ctx, &config, &mut rng);
        assert_eq!(target, ctx.opposing_goal.gate_center());
        // On the goal line, not the far side of the posts
        assert_eq!(target.x, ctx.opposing_goal.gate_line_x());
    }

    #[test]
    fn homebound_striker_targets_its_own_half() {
        let config = MatchConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let ctx = test_ctx();
        let mut agent = test_agent(Team::A, true);
        agent.must_return_home = true;
        for _ in 0..20 {
            let target = decide_target(&agent, &ctx, &config, &mut rng);
            assert!(Team::A.in_own_half(target.x, config.field_width));
            assert!((target.y - config.field_height / 2.0).abs() <= AI_TARGET_JITTER / 2.0);
        }
    }

    #[test]
    fn unarmed_striker_also_regroups() {
        let config = MatchConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let ctx = test_ctx();
        let mut agent = test_agent(Team::B, true);
        agent.scoring.ready_to_score_again = false;
        let target = decide_target(&agent, &ctx, &config, &mut rng);
        assert!(Team::B.in_own_half(target.x, config.field_width));
    }

    #[test]
    fn defenders_split_between_marking_and_support() {
        let config = MatchConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let ctx = test_ctx();
        let agent = test_agent(Team::A, false);

        let mut marked = 0;
        let mut supported = 0;
        for _ in 0..200 {
            let target = decide_target(&agent, &ctx, &config, &mut rng);
            if target == ctx.opposing_striker_pos {
                marked += 1;
            } else {
                supported += 1;
                assert!(target.distance(ctx.own_striker_pos) <= AI_TARGET_JITTER);
            }
        }
        // 70/30 split, with slack for the seed
        assert!(marked > 100, "marked only {marked} of 200");
        assert!(supported > 20, "supported only {supported} of 200");
    }

    #[test]
    fn decision_cooldown_stays_within_one_to_two_seconds() {
        let config = MatchConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let ctx = test_ctx();
        let mut agent = test_agent(Team::A, false);
        let mut ai = agent.ai.take().unwrap();
        for _ in 0..50 {
            ai.decision_cooldown = 0.0;
            update_ai(&mut agent, &mut ai, &ctx, &config, &mut rng, crate::consts::SIM_DT);
            assert!(ai.decision_cooldown >= 1.0 - crate::consts::SIM_DT);
            assert!(ai.decision_cooldown < 2.0);
            assert!(ai.target.is_some());
        }
    }
}
