//! A top/bottom stick pair with a gap, scrolling right to left.

use crate::config::ObstacleConfig;
use crate::geometry::Rect;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct ObstaclePair {
    pub gap_size: u32,
    pub bottom_height: u32,
    pub top_height: u32,
    /// Left edge shared by both sticks.
    pub x: f64,
    pub width: f64,
    /// Set once the monkey is past the trailing edge; cleared on recycle.
    pub passed: bool,
    margin: u32,
    speed: f64,
    screen_width: f64,
    screen_height: u32,
}

impl ObstaclePair {
    pub fn new<R: Rng>(
        config: &ObstacleConfig,
        screen_width: f64,
        screen_height: f64,
        rng: &mut R,
    ) -> Self {
        let mut pair = Self {
            gap_size: config.gap_size,
            bottom_height: 0,
            top_height: 0,
            x: screen_width,
            width: config.width,
            passed: false,
            margin: config.margin,
            speed: config.speed,
            screen_width,
            screen_height: screen_height.floor().max(0.0) as u32,
        };
        pair.reset(rng);
        pair
    }

    /// Valid bottom-stick heights. Collapses to `margin` rather than going
    /// empty when the gap leaves no room.
    pub fn bottom_range(&self) -> (u32, u32) {
        let lo = self.margin;
        let hi = self
            .screen_height
            .saturating_sub(self.gap_size)
            .saturating_sub(self.margin)
            .max(lo);
        (lo, hi)
    }

    /// Park the pair at the right edge with a fresh random gap.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let (lo, hi) = self.bottom_range();
        self.bottom_height = rng.gen_range(lo..=hi);
        self.top_height = self
            .screen_height
            .saturating_sub(self.bottom_height)
            .saturating_sub(self.gap_size);
        self.x = self.screen_width;
        self.passed = false;
    }

    /// Scroll by `dt`. Returns true when the pair went off-screen and was
    /// regenerated.
    pub fn step<R: Rng>(&mut self, dt: f64, rng: &mut R) -> bool {
        self.x -= self.speed * dt;
        if self.x < -self.width {
            self.reset(rng);
            return true;
        }
        false
    }

    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.bottom_height as f64)
    }

    pub fn top_rect(&self) -> Rect {
        let h = self.top_height as f64;
        Rect::new(self.x, self.screen_height as f64 - h, self.width, h)
    }

    pub fn collides(&self, other: &Rect) -> bool {
        other.overlaps(&self.top_rect()) || other.overlaps(&self.bottom_rect())
    }
}
