//! SmartBot - search/flee AI for snake-style arcade bots
//!
//! Core modules:
//! - `bot`: The SmartBot controller and the host traits it senses and moves through
//! - `settings`: Immutable bot configuration (JSON-loadable)
//! - `layer`: Physics layer masks used by spatial queries
//! - `sim`: Deterministic reference world (snakes, orbs, obstacles)

pub mod bot;
pub mod layer;
pub mod settings;
pub mod sim;

pub use bot::{AgentId, Behaviour, BotHost, BotState, EntityId, Hit, Owner, SmartBot};
pub use layer::{Layer, LayerMask};
pub use settings::{BotSettings, SettingsError};

use glam::Vec2;

/// World configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Reference arena radius
    pub const ARENA_RADIUS: f32 = 60.0;

    /// Snake defaults
    pub const SNAKE_SPEED: f32 = 5.0;
    pub const HEAD_RADIUS: f32 = 0.5;
    pub const SEGMENT_RADIUS: f32 = 0.45;
    /// Distance kept between consecutive body segments
    pub const SEGMENT_SPACING: f32 = 0.6;

    /// Orb defaults
    pub const ORB_RADIUS: f32 = 0.25;

    /// Tag carried by snake heads and body segments
    pub const SNAKE_TAG: &str = "Snake";
    /// Tag carried by static obstacles
    pub const OBSTACLE_TAG: &str = "Obstacle";
    /// Tag carried by orbs
    pub const ORB_TAG: &str = "Orb";
}

/// Move `current` toward `target` by at most `max_distance`, never overshooting
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_distance || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_distance
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_clamps_step() {
        let next = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.5);
        assert!((next - Vec2::new(2.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let target = Vec2::new(0.0, 1.0);
        let next = move_towards(Vec2::ZERO, target, 50.0);
        assert_eq!(next, target);
    }

    #[test]
    fn test_move_towards_zero_step() {
        let start = Vec2::new(3.0, -2.0);
        assert_eq!(move_towards(start, Vec2::ZERO, 0.0), start);
    }

    #[test]
    fn test_polar_to_cartesian_unit() {
        let v = polar_to_cartesian(1.0, std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
