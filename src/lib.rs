//! Drone Soccer - a 2D drone soccer match simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, goal judging, AI, match state)
//!
//! Rendering, UI and input wiring are external collaborators: they read the
//! [`sim::MatchState`] snapshot after each tick and feed a player direction
//! vector back in. The simulation itself has no platform dependencies.

pub mod sim;

pub use sim::{MatchConfig, MatchEvent, MatchState, Team, tick};

/// Default match constants
///
/// The field is 20 m x 10 m at 50 px per metre, per FAI drone soccer rules.
pub mod consts {
    /// Fixed simulation timestep used by the demo binary and tests (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Field dimensions (px)
    pub const FIELD_WIDTH: f32 = 1000.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Drone defaults (0.2 m radius)
    pub const DRONE_RADIUS: f32 = 10.0;
    pub const DRONE_MASS: f32 = 1.0;
    /// Drones per team
    pub const TEAM_SIZE: usize = 5;

    /// Goal geometry: square posts either side of a 0.8 m gate, posts set
    /// 2 m in from each end wall
    pub const GOAL_POST_SIZE: f32 = 10.0;
    pub const GOAL_POST_GAP: f32 = 40.0;
    pub const GOAL_OFFSET: f32 = 100.0;

    /// Match duration (3 minutes)
    pub const MATCH_DURATION: f32 = 180.0;

    /// Control feel: target speed (px/s) and per-tick inertia blend rate.
    /// AI drones are slightly slower so the human stays competitive.
    pub const PLAYER_MAX_SPEED: f32 = 150.0;
    pub const PLAYER_INERTIA: f32 = 0.12;
    pub const AI_MAX_SPEED: f32 = 130.0;
    pub const AI_INERTIA: f32 = 0.08;

    /// Drone-drone collision bounciness
    pub const RESTITUTION: f32 = 0.9;
    /// Energy kept after bouncing off a wall
    pub const WALL_DAMPING: f32 = 0.6;
    /// Energy kept after bouncing off a goal post
    pub const POST_DAMPING: f32 = 0.8;
    /// Universal per-tick air drag, distinct from control inertia
    pub const AIR_DRAG: f32 = 0.998;
}
