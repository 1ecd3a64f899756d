//! The monkey: fixed column, vertical motion under gravity.

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::geometry::Rect;

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f64,
    /// Bottom edge, world units.
    pub y: f64,
    /// Positive is upward.
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
    physics: PhysicsConfig,
    ceiling: f64,
    /// Mid-screen, clamped under the ceiling.
    start_y: f64,
}

impl Player {
    pub fn new(player: &PlayerConfig, physics: PhysicsConfig, screen_height: f64) -> Self {
        let ceiling = (screen_height - player.height).max(0.0);
        let start_y = (screen_height / 2.0).min(ceiling);
        Self {
            x: player.x,
            y: start_y,
            velocity: 0.0,
            width: player.width,
            height: player.height,
            physics,
            ceiling,
            start_y,
        }
    }

    /// Back to mid-screen, at rest.
    pub fn reset(&mut self) {
        self.y = self.start_y;
        self.velocity = 0.0;
    }

    /// Jump velocity replaces whatever the monkey was doing.
    pub fn jump(&mut self) {
        self.velocity = self.physics.jump_velocity;
    }

    pub fn step(&mut self, dt: f64) {
        self.y += self.velocity * dt;
        self.velocity -= self.physics.gravity * dt;

        if self.y < 0.0 {
            self.y = 0.0;
            if self.physics.floor_resets_velocity && self.velocity < 0.0 {
                self.velocity = 0.0;
            }
        } else if self.y > self.ceiling {
            self.y = self.ceiling;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&PlayerConfig::default(), PhysicsConfig::default(), 600.0)
    }

    #[test]
    fn test_starts_mid_screen_at_rest() {
        let p = player();
        assert_eq!(p.y, 300.0);
        assert_eq!(p.velocity, 0.0);
        assert_eq!(p.x, 100.0);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut p = player();
        p.y = 12.0;
        p.velocity = -400.0;
        p.reset();
        assert_eq!(p.y, 300.0);
        assert_eq!(p.velocity, 0.0);
    }

    #[test]
    fn test_start_clamped_under_short_ceiling() {
        let config = PlayerConfig {
            height: 80.0,
            ..PlayerConfig::default()
        };
        let mut p = Player::new(&config, PhysicsConfig::default(), 100.0);
        assert_eq!(p.y, 20.0);
        p.y = 0.0;
        p.reset();
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut p = player();
        p.velocity = -900.0;
        p.jump();
        assert_eq!(p.velocity, 170.0);
        p.velocity = 500.0;
        p.jump();
        assert_eq!(p.velocity, 170.0);
    }

    #[test]
    fn test_position_integrates_before_gravity() {
        let mut p = player();
        p.velocity = 60.0;
        p.step(0.5);
        assert_eq!(p.y, 330.0);
        assert_eq!(p.velocity, -90.0);
    }

    #[test]
    fn test_ceiling_clamp() {
        let mut p = player();
        p.velocity = 10_000.0;
        p.step(1.0);
        assert_eq!(p.y, 530.0);
    }

    #[test]
    fn test_floor_keeps_velocity_by_default() {
        let mut p = player();
        p.y = 1.0;
        p.velocity = -100.0;
        p.step(0.1);
        assert_eq!(p.y, 0.0);
        assert!(p.velocity < -100.0);
    }

    #[test]
    fn test_floor_resets_velocity_when_enabled() {
        let physics = PhysicsConfig {
            floor_resets_velocity: true,
            ..PhysicsConfig::default()
        };
        let mut p = Player::new(&PlayerConfig::default(), physics, 600.0);
        p.y = 1.0;
        p.velocity = -100.0;
        p.step(0.1);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.velocity, 0.0);
    }

    #[test]
    fn test_stays_in_bounds_for_mixed_dts() {
        let mut p = player();
        let dts = [0.0, 1.0 / 60.0, 0.5, 3.0, 0.001, 10.0];
        for (i, dt) in dts.iter().cycle().take(200).enumerate() {
            if i % 7 == 0 {
                p.jump();
            }
            p.step(*dt);
            assert!(p.y >= 0.0 && p.y <= 530.0, "y = {}", p.y);
        }
    }
}
