//! Match state and core simulation types
//!
//! Everything a renderer or persistence layer needs to snapshot lives here.
//! The RNG handle is skipped during serialization and re-derived from the
//! stored seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{ConfigError, MatchConfig};

/// The two competing teams. Team A defends the left goal and attacks
/// rightward; Team B mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// Stable array index for per-team data
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Sign of this team's attacking direction along x
    #[inline]
    pub fn attack_sign(self) -> f32 {
        match self {
            Team::A => 1.0,
            Team::B => -1.0,
        }
    }

    /// Strictly inside this team's own half. A point exactly on the center
    /// line belongs to neither half.
    #[inline]
    pub fn in_own_half(self, x: f32, field_width: f32) -> bool {
        match self {
            Team::A => x < field_width / 2.0,
            Team::B => x > field_width / 2.0,
        }
    }
}

/// Who drives an agent's desired direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSource {
    Player,
    Ai,
}

/// Per-striker goal-sequence flags, owned by the goal judge
///
/// `entered_from_front` / `exited_through_back` latch within one scoring
/// sequence; `ready_to_score_again` spans sequences and is re-armed by the
/// team-readiness check in the tick loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringState {
    pub entered_from_front: bool,
    pub exited_through_back: bool,
    /// Latest gate-straddle observation, for display only
    pub crossed_goal_line: bool,
    pub scored: bool,
    pub ready_to_score_again: bool,
    /// Trailing edge on the goal's signed entry axis at the previous
    /// evaluation. The exit latch requires an actual crossing between two
    /// evaluations, not merely being past the line.
    pub last_trailing_edge: Option<f32>,
}

impl Default for ScoringState {
    fn default() -> Self {
        Self {
            entered_from_front: false,
            exited_through_back: false,
            crossed_goal_line: false,
            scored: false,
            // Armed at kickoff so the first goal counts
            ready_to_score_again: true,
            last_trailing_edge: None,
        }
    }
}

impl ScoringState {
    /// Clear the per-sequence latches. Does NOT touch `ready_to_score_again`,
    /// which only re-arms once the whole team is back in its own half.
    pub fn reset_sequence(&mut self) {
        self.entered_from_front = false;
        self.exited_through_back = false;
        self.crossed_goal_line = false;
        self.scored = false;
        self.last_trailing_edge = None;
    }
}

/// AI steering state (absent on the player's drone)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AiState {
    pub target: Option<Vec2>,
    /// Seconds until the next target re-decision
    pub decision_cooldown: f32,
}

/// One drone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub team: Team,
    pub is_striker: bool,
    pub control: ControlSource,
    pub ai: Option<AiState>,
    pub scoring: ScoringState,
    /// Set for the whole team when it scores; cleared per-agent once that
    /// agent is back in its own half
    pub must_return_home: bool,
}

impl Agent {
    #[inline]
    pub fn in_own_half(&self, field_width: f32) -> bool {
        self.team.in_own_half(self.pos.x, field_width)
    }
}

/// A static axis-aligned goal post
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Post {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Post {
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Closest point on this rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }
}

/// A goal: two posts framing a vertical gate, immutable after field setup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Goal {
    /// The team defending this goal
    pub team: Team,
    /// Top post, then bottom post
    pub posts: [Post; 2],
}

impl Goal {
    /// Sign of the attacking direction into this goal along x
    #[inline]
    pub fn entry_sign(&self) -> f32 {
        -self.team.attack_sign()
    }

    /// X-coordinate of the goal line: the attacking-side edge of the posts
    pub fn gate_line_x(&self) -> f32 {
        match self.team {
            // Left goal is entered moving -x, so the line is the posts'
            // right edge; mirrored for the right goal.
            Team::A => self.posts[0].right(),
            Team::B => self.posts[0].left(),
        }
    }

    /// Scoreable y-range between the inner post edges
    pub fn gate_y_range(&self) -> (f32, f32) {
        (self.posts[0].bottom(), self.posts[1].top())
    }

    /// Midpoint of the gate, on the goal line
    pub fn gate_center(&self) -> Vec2 {
        let (y_min, y_max) = self.gate_y_range();
        Vec2::new(self.gate_line_x(), (y_min + y_max) / 2.0)
    }
}

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Created or paused: ticks skip simulation but state stays readable
    Stopped,
    Running,
    /// Timer elapsed; scores are frozen until an external reset
    Finished,
}

/// Final result, computed exactly once when the timer elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    TeamAWins,
    TeamBWins,
    Draw,
}

impl MatchOutcome {
    pub fn from_scores(scores: [u32; 2]) -> Self {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => MatchOutcome::TeamAWins,
            std::cmp::Ordering::Less => MatchOutcome::TeamBWins,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete match state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    /// Seed for the AI decision RNG, kept for reproducibility
    pub seed: u64,
    #[serde(skip, default = "skipped_rng")]
    pub(crate) rng: Pcg32,
    pub phase: MatchPhase,
    pub outcome: Option<MatchOutcome>,
    /// Countdown in seconds
    pub time_remaining: f32,
    /// Goals per team, indexed by [`Team::index`]
    pub scores: [u32; 2],
    /// All drones, team A roster first; index 0 of each roster is the striker
    pub agents: Vec<Agent>,
    /// Left goal (team A's), then right goal (team B's)
    pub goals: [Goal; 2],
    /// True iff every agent of that team is currently in its own half
    pub team_ready: [bool; 2],
    /// Player input direction, components in [-1, 1]
    pub player_direction: Vec2,
}

impl MatchState {
    /// Create a match at kickoff. Fails fast on an invalid configuration.
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let goals = [build_goal(&config, Team::A), build_goal(&config, Team::B)];
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: MatchPhase::Stopped,
            outcome: None,
            time_remaining: config.duration_secs,
            scores: [0, 0],
            agents: Vec::with_capacity(config.team_size * 2),
            goals,
            team_ready: [true, true],
            player_direction: Vec2::ZERO,
            config,
        };
        state.spawn_teams();
        Ok(state)
    }

    /// Reinitialize to kickoff with a (possibly new) configuration.
    /// The existing seed is reused so a reset replays the same AI behavior.
    pub fn reset(&mut self, config: MatchConfig) -> Result<(), ConfigError> {
        *self = Self::new(config, self.seed)?;
        Ok(())
    }

    /// Begin or resume simulation
    pub fn start(&mut self) {
        if self.phase == MatchPhase::Stopped {
            self.phase = MatchPhase::Running;
        }
    }

    /// Pause without teardown: ticks become no-ops, state stays readable
    pub fn stop(&mut self) {
        if self.phase == MatchPhase::Running {
            self.phase = MatchPhase::Stopped;
        }
    }

    /// Store the player's desired direction for the next tick. Accepts
    /// normalized keyboard sums or raw joystick magnitudes; components are
    /// clamped to [-1, 1].
    pub fn set_player_direction(&mut self, direction: Vec2) {
        self.player_direction = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// The goal a team shoots at
    pub fn opposing_goal(&self, team: Team) -> &Goal {
        &self.goals[team.opponent().index()]
    }

    /// Roster index of a team's striker
    pub fn striker_index(&self, team: Team) -> usize {
        match team {
            Team::A => 0,
            Team::B => self.config.team_size,
        }
    }

    fn spawn_teams(&mut self) {
        let cfg = &self.config;
        let mut id = 0;
        for team in [Team::A, Team::B] {
            let start_x = match team {
                Team::A => cfg.field_width * 0.25,
                Team::B => cfg.field_width * 0.75,
            };
            for i in 0..cfg.team_size {
                let is_striker = i == 0;
                // Team A's striker is the player's drone
                let control = if team == Team::A && is_striker {
                    ControlSource::Player
                } else {
                    ControlSource::Ai
                };
                self.agents.push(Agent {
                    id,
                    pos: Vec2::new(
                        start_x,
                        cfg.field_height * (0.3 + (i % 5) as f32 * 0.1),
                    ),
                    vel: Vec2::ZERO,
                    radius: cfg.agent_radius,
                    mass: cfg.agent_mass,
                    team,
                    is_striker,
                    control,
                    ai: (control == ControlSource::Ai).then(AiState::default),
                    scoring: ScoringState::default(),
                    must_return_home: false,
                });
                id += 1;
            }
        }
    }
}

fn build_goal(config: &MatchConfig, team: Team) -> Goal {
    let post_x = match team {
        Team::A => config.goal_offset,
        Team::B => config.field_width - config.goal_offset - config.post_size,
    };
    let mid_y = config.field_height / 2.0;
    let top = Post {
        pos: Vec2::new(post_x, mid_y - config.gate_gap / 2.0 - config.post_size),
        width: config.post_size,
        height: config.post_size,
    };
    let bottom = Post {
        pos: Vec2::new(post_x, mid_y + config.gate_gap / 2.0),
        width: config.post_size,
        height: config.post_size,
    };
    Goal {
        team,
        posts: [top, bottom],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rosters_have_one_striker_each_and_one_player() {
        let state = MatchState::new(MatchConfig::default(), 7).unwrap();
        for team in [Team::A, Team::B] {
            let strikers = state
                .agents
                .iter()
                .filter(|a| a.team == team && a.is_striker)
                .count();
            assert_eq!(strikers, 1);
        }
        let players = state
            .agents
            .iter()
            .filter(|a| a.control == ControlSource::Player)
            .count();
        assert_eq!(players, 1);
        assert!(state.agents[state.striker_index(Team::A)].is_striker);
        assert!(state.agents[state.striker_index(Team::B)].is_striker);
    }

    #[test]
    fn agents_start_with_positive_radius_and_mass() {
        let state = MatchState::new(MatchConfig::default(), 7).unwrap();
        assert!(state.agents.iter().all(|a| a.radius > 0.0 && a.mass > 0.0));
    }

    #[test]
    fn goal_lines_face_the_attackers() {
        let state = MatchState::new(MatchConfig::default(), 7).unwrap();
        let left = &state.goals[0];
        let right = &state.goals[1];
        // Left goal line is the posts' right edge; attackers move -x into it
        assert_eq!(left.gate_line_x(), 100.0 + 10.0);
        assert_eq!(left.entry_sign(), -1.0);
        // Right goal line is the posts' left edge; attackers move +x into it
        assert_eq!(right.gate_line_x(), 1000.0 - 100.0 - 10.0);
        assert_eq!(right.entry_sign(), 1.0);

        let (y_min, y_max) = right.gate_y_range();
        assert_eq!(y_min, 250.0 - 20.0);
        assert_eq!(y_max, 250.0 + 20.0);
        assert_eq!(right.gate_center().y, 250.0);
    }

    #[test]
    fn own_half_is_strict_at_the_center_line() {
        assert!(Team::A.in_own_half(499.9, 1000.0));
        assert!(!Team::A.in_own_half(500.0, 1000.0));
        assert!(!Team::B.in_own_half(500.0, 1000.0));
        assert!(Team::B.in_own_half(500.1, 1000.0));
    }

    #[test]
    fn outcome_from_scores_preserves_ties() {
        assert_eq!(MatchOutcome::from_scores([2, 1]), MatchOutcome::TeamAWins);
        assert_eq!(MatchOutcome::from_scores([0, 3]), MatchOutcome::TeamBWins);
        assert_eq!(MatchOutcome::from_scores([2, 2]), MatchOutcome::Draw);
    }

    #[test]
    fn snapshot_survives_json() {
        let state = MatchState::new(MatchConfig::default(), 99).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, state.seed);
        assert_eq!(restored.scores, state.scores);
        assert_eq!(restored.agents.len(), state.agents.len());
        assert_eq!(restored.agents[0].pos, state.agents[0].pos);
    }

    #[test]
    fn reset_returns_to_kickoff() {
        let mut state = MatchState::new(MatchConfig::default(), 7).unwrap();
        state.start();
        state.scores = [3, 1];
        state.time_remaining = 12.0;
        state.reset(MatchConfig::default()).unwrap();
        assert_eq!(state.scores, [0, 0]);
        assert_eq!(state.time_remaining, MatchConfig::default().duration_secs);
        assert_eq!(state.phase, MatchPhase::Stopped);
        assert!(state.agents.iter().all(|a| a.vel == Vec2::ZERO));
    }
}
