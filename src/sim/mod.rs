//! Deterministic simulation module
//!
//! All match logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (AI decision timers and target jitter)
//! - Stable iteration order (agents by roster index)
//! - No rendering or platform dependencies
//!
//! One call to [`tick`] advances the whole match by one frame: control,
//! integration, collisions, goal judging, return-home bookkeeping.

pub mod collision;
pub mod config;
pub mod control;
pub mod goal;
pub mod state;
pub mod tick;

pub use config::{ConfigError, MatchConfig};
pub use state::{
    Agent, AiState, ControlSource, Goal, MatchOutcome, MatchPhase, MatchState, Post, ScoringState,
    Team,
};
pub use tick::{MatchEvent, SimError, tick};
