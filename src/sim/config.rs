//! Match configuration and fail-fast validation
//!
//! Bad geometry or non-positive physical constants are rejected when the
//! match is (re)created; nothing mid-match ever re-validates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when a [`MatchConfig`] cannot describe a playable match
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("match duration must be positive, got {0}")]
    NonPositiveDuration(f32),
    #[error("field dimensions must be positive, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },
    #[error("agent radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("agent mass must be positive, got {0}")]
    NonPositiveMass(f32),
    #[error("team size must be at least 1")]
    EmptyTeam,
    #[error("goal gate (gap {gap}, posts {post}) does not fit field height {height}")]
    GateTooTall { gap: f32, post: f32, height: f32 },
    #[error("goal offset {offset} must leave room for posts inside half the field width {width}")]
    GoalOffsetOutOfField { offset: f32, width: f32 },
    #[error("max speed must be positive, got {0}")]
    NonPositiveSpeed(f32),
    #[error("inertia rate must be in (0, 1], got {0}")]
    InertiaOutOfRange(f32),
}

/// Everything needed to lay out a field and populate it with two teams
///
/// Defaults reproduce the standard FAI-scaled field in [`crate::consts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Match length in seconds
    pub duration_secs: f32,
    pub field_width: f32,
    pub field_height: f32,
    pub agent_radius: f32,
    pub agent_mass: f32,
    /// Drones per team; roster index 0 is the striker
    pub team_size: usize,
    /// Square goal post edge length
    pub post_size: f32,
    /// Scoreable opening between the inner post edges
    pub gate_gap: f32,
    /// Distance from the end wall to the goal posts
    pub goal_offset: f32,
    pub player_max_speed: f32,
    pub player_inertia: f32,
    pub ai_max_speed: f32,
    pub ai_inertia: f32,
    /// Scale the inertia blend by delta-time (normalized to 60 Hz) instead of
    /// applying a fixed per-tick rate. Off by default: fixed-rate blending is
    /// the original control feel at typical frame rates.
    pub dt_scaled_inertia: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            duration_secs: MATCH_DURATION,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            agent_radius: DRONE_RADIUS,
            agent_mass: DRONE_MASS,
            team_size: TEAM_SIZE,
            post_size: GOAL_POST_SIZE,
            gate_gap: GOAL_POST_GAP,
            goal_offset: GOAL_OFFSET,
            player_max_speed: PLAYER_MAX_SPEED,
            player_inertia: PLAYER_INERTIA,
            ai_max_speed: AI_MAX_SPEED,
            ai_inertia: AI_INERTIA,
            dt_scaled_inertia: false,
        }
    }
}

impl MatchConfig {
    /// Validate the configuration, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration_secs > 0.0) {
            return Err(ConfigError::NonPositiveDuration(self.duration_secs));
        }
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if !(self.agent_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.agent_radius));
        }
        if !(self.agent_mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(self.agent_mass));
        }
        if self.team_size == 0 {
            return Err(ConfigError::EmptyTeam);
        }
        if self.gate_gap + 2.0 * self.post_size > self.field_height {
            return Err(ConfigError::GateTooTall {
                gap: self.gate_gap,
                post: self.post_size,
                height: self.field_height,
            });
        }
        if !(self.goal_offset >= 0.0 && self.goal_offset + self.post_size < self.field_width / 2.0)
        {
            return Err(ConfigError::GoalOffsetOutOfField {
                offset: self.goal_offset,
                width: self.field_width,
            });
        }
        for speed in [self.player_max_speed, self.ai_max_speed] {
            if !(speed > 0.0) {
                return Err(ConfigError::NonPositiveSpeed(speed));
            }
        }
        for rate in [self.player_inertia, self.ai_inertia] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::InertiaOutOfRange(rate));
            }
        }
        Ok(())
    }

    /// Inertia blend rate for this tick, honoring `dt_scaled_inertia`
    pub fn blend_rate(&self, base_rate: f32, dt: f32) -> f32 {
        if self.dt_scaled_inertia {
            // Normalize to the 60 Hz feel the fixed rate was tuned at
            (base_rate * dt * 60.0).min(1.0)
        } else {
            base_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let cfg = MatchConfig {
            agent_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveRadius(0.0)));
    }

    #[test]
    fn rejects_nan_duration() {
        let cfg = MatchConfig {
            duration_secs: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveDuration(_))
        ));
    }

    #[test]
    fn rejects_inverted_field() {
        let cfg = MatchConfig {
            field_width: -100.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidField { .. })));
    }

    #[test]
    fn rejects_gate_taller_than_field() {
        let cfg = MatchConfig {
            gate_gap: 600.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::GateTooTall { .. })));
    }

    #[test]
    fn fixed_rate_blend_ignores_dt() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.blend_rate(0.12, 1.0 / 30.0), 0.12);
        assert_eq!(cfg.blend_rate(0.12, 1.0 / 240.0), 0.12);
    }

    #[test]
    fn scaled_blend_tracks_dt() {
        let cfg = MatchConfig {
            dt_scaled_inertia: true,
            ..Default::default()
        };
        let at_60 = cfg.blend_rate(0.12, 1.0 / 60.0);
        let at_120 = cfg.blend_rate(0.12, 1.0 / 120.0);
        assert!((at_60 - 0.12).abs() < 1e-6);
        assert!((at_120 - 0.06).abs() < 1e-6);
    }
}
