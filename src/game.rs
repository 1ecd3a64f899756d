//! Game controller: owns every entity, advances them once per tick and runs
//! the Ready / Running / GameOver state machine.
//!
//! The controller never touches the terminal or the sound device. Each call
//! reports what happened as [`GameEvent`]s and the frontend reacts to them.

use crate::background::ScrollingBackground;
use crate::config::{Config, Variant};
use crate::geometry::Rect;
use crate::obstacle::ObstaclePair;
use crate::player::Player;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting on the Start button (mobile only).
    Ready,
    Running,
    /// Ticks halted, Replay button shown.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Jumped,
    /// Carries the new score.
    Scored(u32),
    Collided,
    GameOver,
    Restarted,
}

/// On-screen controls, in world units.
pub const BUTTON_W: f64 = 200.0;
pub const BUTTON_H: f64 = 50.0;

pub struct Game {
    pub config: Config,
    pub player: Player,
    pub obstacle: ObstaclePair,
    pub background: ScrollingBackground,
    pub score: u32,
    pub best: u32,
    pub state: GameState,
    pub ticks: u64,
    rng: StdRng,
}

impl Game {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: Config, mut rng: StdRng) -> Self {
        let w = config.screen.width;
        let h = config.screen.height;
        let player = Player::new(&config.player, config.physics, h);
        let obstacle = ObstaclePair::new(&config.obstacle, w, h, &mut rng);
        let background = ScrollingBackground::new(w, config.background.speed);
        let state = match config.variant {
            Variant::Desktop => GameState::Running,
            Variant::Mobile => GameState::Ready,
        };
        info!("new {:?} game {}x{}, state {:?}", config.variant, w, h, state);
        Self {
            config,
            player,
            obstacle,
            background,
            score: 0,
            best: 0,
            state,
            ticks: 0,
            rng,
        }
    }

    pub fn screen_width(&self) -> f64 {
        self.config.screen.width
    }

    pub fn screen_height(&self) -> f64 {
        self.config.screen.height
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Re-fit a full-screen game to a resized surface. Only while waiting on
    /// Start: once play begins the logical width stays fixed.
    pub fn refit(&mut self, pixel_w: usize, pixel_h: usize) -> bool {
        if self.state != GameState::Ready {
            return false;
        }
        self.config.fit_fullscreen(pixel_w, pixel_h);
        let w = self.screen_width();
        let h = self.screen_height();
        self.obstacle = ObstaclePair::new(&self.config.obstacle, w, h, &mut self.rng);
        self.background = ScrollingBackground::new(w, self.config.background.speed);
        debug!("refit to {w}x{h}");
        true
    }

    /// Ready -> Running.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.state != GameState::Ready {
            return Vec::new();
        }
        info!("game started");
        self.state = GameState::Running;
        vec![GameEvent::Started]
    }

    /// Jump input. Ignored unless the game is running.
    pub fn tap(&mut self) -> Vec<GameEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        self.player.jump();
        vec![GameEvent::Jumped]
    }

    /// GameOver -> Running with a fresh monkey, score and stick pair.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        if self.state != GameState::GameOver {
            return Vec::new();
        }
        self.score = 0;
        self.player.reset();
        self.obstacle.reset(&mut self.rng);
        self.state = GameState::Running;
        info!("game restarted");
        vec![GameEvent::Restarted]
    }

    /// The single on-screen control for the current state: Start, Replay,
    /// or nothing while running.
    pub fn press_button(&mut self) -> Vec<GameEvent> {
        match self.state {
            GameState::Ready => self.start(),
            GameState::GameOver => self.restart(),
            GameState::Running => Vec::new(),
        }
    }

    /// Where the current state's button sits, if it has one.
    pub fn button_rect(&self) -> Option<Rect> {
        if self.is_running() {
            return None;
        }
        let x = (self.screen_width() - BUTTON_W) / 2.0;
        Some(Rect::new(x, self.screen_height() / 3.0, BUTTON_W, BUTTON_H))
    }

    /// Advance one frame. Does nothing unless running.
    pub fn tick(&mut self, dt: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }
        let dt = dt.max(0.0);
        self.ticks += 1;

        self.background.step(dt);
        self.player.step(dt);
        if self.obstacle.step(dt, &mut self.rng) {
            debug!("sticks recycled, bottom height {}", self.obstacle.bottom_height);
        }

        if self.obstacle.collides(&self.player.rect()) {
            events.push(GameEvent::Collided);
            self.game_over();
            events.push(GameEvent::GameOver);
        }

        // Scoring still runs on the tick that collided.
        if self.player.x > self.obstacle.trailing_edge() && !self.obstacle.passed {
            self.obstacle.passed = true;
            self.score += 1;
            self.best = self.best.max(self.score);
            info!("Score: {}", self.score);
            events.push(GameEvent::Scored(self.score));
        }

        events
    }

    fn game_over(&mut self) {
        info!("Game Over at score {}", self.score);
        self.best = self.best.max(self.score);
        self.state = GameState::GameOver;
    }
}
